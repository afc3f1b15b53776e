//! Resolution of the selectable options of a field.
//!
//! Precedence is fixed: a non-empty external catalog replaces everything;
//! otherwise inline schema options come first, followed by the integers
//! generated by a `range:<min>-<max>` directive.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::catalog::CatalogEntry;
use crate::model::form::{Field, FieldType};
use crate::values::value_to_string;

/// A `(label, value)` pair ready to be shown in a dropdown, radio or checkbox group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedOption {
    pub label: String,
    pub value: String,
}

impl ResolvedOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Computes the ordered options of `field`.
pub fn resolve(field: &Field, external: &[CatalogEntry]) -> Vec<ResolvedOption> {
    if !external.is_empty() {
        return external
            .iter()
            .map(|entry| ResolvedOption::new(entry.display_label(), entry.key()))
            .collect();
    }

    let mut options: Vec<ResolvedOption> = field
        .inline_options()
        .iter()
        .map(|opt| {
            let label = opt
                .label
                .clone()
                .filter(|l| !l.is_empty())
                .or_else(|| opt.name.clone().filter(|n| !n.is_empty()))
                .unwrap_or_else(|| "Sin etiqueta".to_string());
            let value = opt
                .value
                .as_ref()
                .filter(|v| !v.is_null())
                .or(opt.id.as_ref())
                .map(value_to_string)
                .unwrap_or_default();
            ResolvedOption::new(label, value.trim())
        })
        .collect();

    if let Some(directive) = field.option_directive() {
        options.extend(range_options(&field.name, directive));
    }
    options
}

/// Largest number of options a `range:` directive may generate.
pub const MAX_RANGE_OPTIONS: i64 = 10_000;

/// Options generated by a `range:` directive; empty for other directives.
fn range_options(field_name: &str, directive: &str) -> Vec<ResolvedOption> {
    let directive = directive.trim();
    let Some(prefix) = directive.get(..6) else {
        return Vec::new();
    };
    if !prefix.eq_ignore_ascii_case("range:") {
        return Vec::new();
    }
    match parse_range(&directive[6..]) {
        Some((min, max)) if max.checked_sub(min).is_none_or(|span| span >= MAX_RANGE_OPTIONS) => {
            log::warn!(
                "Range directive {:?} on field {} exceeds {} options",
                directive,
                field_name,
                MAX_RANGE_OPTIONS
            );
            Vec::new()
        }
        Some((min, max)) => (min..=max)
            .map(|n| ResolvedOption::new(n.to_string(), n.to_string()))
            .collect(),
        None => {
            log::warn!(
                "Ignoring malformed range directive {:?} on field {}",
                directive,
                field_name
            );
            Vec::new()
        }
    }
}

/// Parses the `<min>-<max>` body of a range directive.
///
/// A leading minus sign on `min` is accepted. An inverted range is valid and
/// simply generates nothing.
pub fn parse_range(body: &str) -> Option<(i64, i64)> {
    let body = body.trim();
    let split_at = body
        .char_indices()
        .skip(1)
        .find(|(_, c)| *c == '-')
        .map(|(i, _)| i)?;
    let min = body[..split_at].trim().parse::<i64>().ok()?;
    let max = body[split_at + 1..].trim().parse::<i64>().ok()?;
    Some((min, max))
}

/// Human label for a stored value, used by reports.
///
/// Catalog entries win, then the field's resolved options (comma-joined
/// multi-values are mapped one by one), then boolean checkboxes read as Sí/No.
pub fn label_for_value(value: &Value, field: Option<&Field>, catalog: &[CatalogEntry]) -> String {
    match value {
        Value::Null => return String::new(),
        Value::Object(map) => {
            let lat = map.get("lat").or_else(|| map.get("latitude"));
            let lng = map.get("lng").or_else(|| map.get("longitude"));
            if let Some(lat) = lat {
                let lng = lng.map(value_to_string).unwrap_or_default();
                return format!("Lat: {} Lng: {}", value_to_string(lat), lng);
            }
            return value.to_string();
        }
        Value::Array(_) => return value.to_string(),
        _ => {}
    }

    let raw = value_to_string(value);
    if let Some(entry) = catalog.iter().find(|e| e.matches(&raw)) {
        return entry.display_label();
    }

    let Some(field) = field else {
        return raw;
    };
    let options = resolve(field, &[]);
    if !options.is_empty() {
        if let Some(option) = options.iter().find(|o| o.value == raw) {
            return option.label.clone();
        }
        if raw.contains(',') {
            return raw
                .split(',')
                .map(|part| {
                    let part = part.trim();
                    options
                        .iter()
                        .find(|o| o.value == part)
                        .map(|o| o.label.clone())
                        .unwrap_or_else(|| part.to_string())
                })
                .collect::<Vec<_>>()
                .join(", ");
        }
        return raw;
    }
    if field.field_type == FieldType::Checkbox {
        return if crate::widgets::is_truthy(value) { "Sí" } else { "No" }.to_string();
    }
    raw
}
