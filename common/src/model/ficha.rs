use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::lenient;
use crate::values::FichaData;

/// Reserved top-level key holding the record's display name.
pub const NOMBRE_FAMILIA_KEY: &str = "nombre_familia";
/// Reserved top-level key holding the verification status.
pub const STATUS_KEY: &str = "status";
/// Keys kept out of `datos` and submitted as separate columns.
pub const RESERVED_KEYS: [&str; 2] = [NOMBRE_FAMILIA_KEY, STATUS_KEY];

/// A filled family record as returned by `GET /web/fichas/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ficha {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::id")]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub local_id: Option<String>,
    #[serde(default)]
    pub nombre_familia: Option<String>,
    #[serde(default, deserialize_with = "datos")]
    pub datos: FichaData,
    #[serde(default)]
    pub status: FichaStatus,
    /// Computed by the backend after save; shown verbatim.
    #[serde(default, deserialize_with = "lenient::text")]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub risk_score: Option<f64>,
    #[serde(default)]
    pub device_model: Option<String>,
    #[serde(default)]
    pub app_version: Option<String>,
    #[serde(default)]
    pub geo_location: Option<Value>,
    #[serde(default)]
    pub user: Option<FichaUser>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FichaUser {
    #[serde(default)]
    pub name: String,
}

/// Verification status of a ficha.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FichaStatus {
    #[default]
    Pending,
    Verified,
    Rejected,
}

impl FichaStatus {
    pub const ALL: [FichaStatus; 3] = [
        FichaStatus::Pending,
        FichaStatus::Verified,
        FichaStatus::Rejected,
    ];

    /// Maps current and legacy spellings onto the three statuses.
    ///
    /// Drafts and completed-but-unreviewed records (`borrador`, `completo`) are
    /// still awaiting verification, so they read as pending. Anything else also
    /// reads as pending, with a warning.
    pub fn normalize(raw: &str) -> FichaStatus {
        match raw.trim().to_lowercase().as_str() {
            "pending" | "pendiente" | "borrador" | "completo" => FichaStatus::Pending,
            "verified" | "verificado" => FichaStatus::Verified,
            "rejected" | "rechazado" => FichaStatus::Rejected,
            other => {
                log::warn!("Unknown ficha status {:?}, using pending", other);
                FichaStatus::Pending
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FichaStatus::Pending => "pending",
            FichaStatus::Verified => "verified",
            FichaStatus::Rejected => "rejected",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FichaStatus::Pending => "Pendiente",
            FichaStatus::Verified => "Verificado",
            FichaStatus::Rejected => "Rechazado",
        }
    }
}

impl<'de> Deserialize<'de> for FichaStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(|s| FichaStatus::normalize(&s)).unwrap_or_default())
    }
}

fn datos<'de, D>(deserializer: D) -> Result<FichaData, D::Error>
where
    D: Deserializer<'de>,
{
    // Some records arrive with `datos` double-encoded as a JSON string.
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Object(map)) => map,
        Some(Value::String(s)) => serde_json::from_str(&s).unwrap_or_default(),
        _ => FichaData::new(),
    })
}

/// Summary row of `GET /web/fichas`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FichaSummary {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: Option<i64>,
    #[serde(default)]
    pub nombre_familia: Option<String>,
    #[serde(default)]
    pub status: FichaStatus,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Paginated envelope of `GET /web/fichas`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FichaPage {
    #[serde(default)]
    pub data: Vec<FichaSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn legacy_statuses_are_normalized() {
        assert_eq!(FichaStatus::normalize("PENDIENTE"), FichaStatus::Pending);
        assert_eq!(FichaStatus::normalize("verificado"), FichaStatus::Verified);
        assert_eq!(FichaStatus::normalize("rechazado"), FichaStatus::Rejected);
        assert_eq!(FichaStatus::normalize("BORRADOR"), FichaStatus::Pending);
        assert_eq!(FichaStatus::normalize("COMPLETO"), FichaStatus::Pending);
        assert_eq!(FichaStatus::normalize("archivado"), FichaStatus::Pending);
    }

    #[test]
    fn ficha_decodes_with_string_datos_and_null_status() {
        let ficha: Ficha = serde_json::from_value(json!({
            "id": 4,
            "nombre_familia": "Familia Quispe",
            "datos": "{\"jefe_hogar\": \"Rosa\"}",
            "status": null,
            "risk_level": "Riesgo Medio"
        }))
        .unwrap();

        assert_eq!(ficha.id, Some(4));
        assert_eq!(ficha.datos["jefe_hogar"], json!("Rosa"));
        assert_eq!(ficha.status, FichaStatus::Pending);
        assert_eq!(ficha.risk_level.as_deref(), Some("Riesgo Medio"));
    }
}
