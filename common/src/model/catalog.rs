use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::values::value_to_string;

/// Entry of an externally fetched catalog (provinces, cantons, parishes).
///
/// The geo endpoints return `{id, name}`; other catalogs may already be
/// `{label, value}` shaped, so all four are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl CatalogEntry {
    pub fn new(id: impl Into<Value>, name: &str) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    /// `label`, falling back to `name`.
    pub fn display_label(&self) -> String {
        self.label
            .clone()
            .or_else(|| self.name.clone())
            .unwrap_or_default()
    }

    /// `value`, falling back to `id`, as a string.
    pub fn key(&self) -> String {
        self.value
            .as_ref()
            .or(self.id.as_ref())
            .map(value_to_string)
            .unwrap_or_default()
    }

    /// Whether this entry is the one a stored value refers to (by id or value).
    pub fn matches(&self, stored: &str) -> bool {
        [self.id.as_ref(), self.value.as_ref()]
            .into_iter()
            .flatten()
            .any(|v| value_to_string(v) == stored)
    }
}
