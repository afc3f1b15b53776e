//! Runtime state of the ficha editor.
//!
//! The edited values live in a single [`FormStore`]; everything shown next to
//! them (quality score, risk score, row counts) is derived from it after each
//! change. The remaining fields are the DOM references and flags of the three
//! dialogs (row confirmation, signature zoom, PDF viewer).

use std::collections::HashSet;

use gloo_file::ObjectUrl;
use yew::prelude::*;

use common::geo::GeoCatalogs;
use common::model::ficha::Ficha;
use common::model::form::{Field, Form, Section};
use common::quality::{analyze, QualityAnalysis};
use common::requests::ReportRequest;
use common::store::{FormAction, FormStore};

use crate::components::helpers::compute_md5;

/// Row change waiting for confirmation.
#[derive(Debug, Clone, PartialEq)]
pub enum RowRequest {
    Append { key: String, columns: Vec<String> },
    Remove { key: String, index: usize },
}

impl RowRequest {
    pub fn into_action(self) -> FormAction {
        match self {
            RowRequest::Append { key, columns } => FormAction::AppendRow { key, columns },
            RowRequest::Remove { key, index } => FormAction::RemoveRow { key, index },
        }
    }

    pub fn prompt(&self) -> String {
        match self {
            RowRequest::Append { .. } => "¿Desea agregar un nuevo registro?".to_string(),
            RowRequest::Remove { index, .. } => format!(
                "¿Desea eliminar el registro #{}? Esta acción no se puede deshacer.",
                index + 1
            ),
        }
    }
}

pub struct FichaEditor {
    /// Schema of the record. `None` until both requests have finished.
    pub form: Option<Form>,

    /// Every field of the schema, used to type the columns of `_data` tables.
    pub all_fields: Vec<Field>,

    /// Record as loaded; its audit fields and `risk_level` are shown verbatim.
    pub ficha: Option<Ficha>,

    pub store: FormStore,

    /// Geographic catalogs fetched so far.
    pub catalogs: GeoCatalogs,

    /// Quality of the current values, recomputed on every change.
    pub quality: Option<QualityAnalysis>,

    pub active_section: usize,

    pub load_error: Option<String>,

    pub saving: bool,

    /// Fingerprint of the state at load or at the last successful save.
    pub original_md5: Option<String>,

    pub pending_row: Option<RowRequest>,
    pub confirm_dialog_ref: NodeRef,

    pub signature_src: Option<String>,
    pub signature_dialog_ref: NodeRef,

    pub pdf_url: Option<ObjectUrl>,
    pub pdf_loading: bool,
    pub pdf_dialog_ref: NodeRef,

    /// Guard for the first-render fetch.
    pub loaded: bool,
}

impl FichaEditor {
    pub fn new() -> Self {
        Self {
            form: None,
            all_fields: Vec::new(),
            ficha: None,
            store: FormStore::default(),
            catalogs: GeoCatalogs::default(),
            quality: None,
            active_section: 0,
            load_error: None,
            saving: false,
            original_md5: None,
            pending_row: None,
            confirm_dialog_ref: NodeRef::default(),
            signature_src: None,
            signature_dialog_ref: NodeRef::default(),
            pdf_url: None,
            pdf_loading: false,
            pdf_dialog_ref: NodeRef::default(),
            loaded: false,
        }
    }

    pub fn fingerprint(&self) -> String {
        compute_md5(&serde_json::to_string(&self.store.to_update()).unwrap_or_default())
    }

    pub fn is_dirty(&self) -> bool {
        self.original_md5
            .as_ref()
            .is_some_and(|orig| orig != &self.fingerprint())
    }

    pub fn rescore(&mut self) {
        self.quality = self.form.as_ref().map(|form| analyze(form, self.store.data()));
    }

    /// Sections shown as tabs. Template sections driven by a repeat counter are
    /// rendered under their counter instead.
    pub fn tab_sections(&self) -> Vec<&Section> {
        let Some(form) = &self.form else {
            return Vec::new();
        };
        let linked: HashSet<i64> = form
            .all_fields()
            .filter(|f| f.is_repeat_counter())
            .filter_map(|f| f.linked_section_id)
            .collect();
        form.sections
            .iter()
            .filter(|s| !(s.is_template && s.id.is_some_and(|id| linked.contains(&id))))
            .collect()
    }

    /// Snapshot of the edited record for the PDF endpoint.
    pub fn report_request(&self) -> Option<ReportRequest> {
        let form = self.form.clone()?;
        let mut ficha = self.ficha.clone()?;
        let update = self.store.to_update();
        ficha.datos = update.datos;
        ficha.nombre_familia = Some(update.nombre_familia);
        ficha.status = update.status;
        Some(ReportRequest {
            form,
            ficha,
            catalogs: self.catalogs.clone(),
        })
    }
}
