use serde::{Deserialize, Serialize};

use crate::geo::GeoCatalogs;
use crate::model::ficha::{Ficha, FichaStatus};
use crate::model::form::Form;
use crate::values::FichaData;

/// Body of `PUT /web/fichas/{id}`. `datos` never carries the reserved keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FichaUpdate {
    pub datos: FichaData,
    pub nombre_familia: String,
    pub status: FichaStatus,
}

/// Body of `PATCH /web/fichas/bulk-status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkStatusRequest {
    pub ids: Vec<i64>,
    pub status: FichaStatus,
}

/// Request payload for the ficha PDF endpoint.
/// Carries everything needed to print so the host never calls the fichas API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRequest {
    pub form: Form,
    pub ficha: Ficha,
    #[serde(default)]
    pub catalogs: GeoCatalogs,
}

/// Request payload for the data dictionary PDF endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryRequest {
    pub form: Form,
}

/// Body of `POST /admin/forms`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewForm {
    pub name: String,
    pub description: String,
    pub version: String,
}

/// Body of `POST /admin/forms/{id}/sections` and `PUT /admin/sections/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionWrite {
    pub name: String,
    pub order_index: i64,
    pub is_template: bool,
}
