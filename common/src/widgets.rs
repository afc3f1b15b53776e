//! Field type to input widget dispatch, plus the value encodings each widget
//! reads and writes.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{Datelike, NaiveDate};
use serde_json::Value;

use crate::error::FichaError;
use crate::model::form::{Field, FieldType};
use crate::options::ResolvedOption;

pub const SIGNATURE_FIELD: &str = "firma_responsable";
pub const GEOREFERENCE_FIELD: &str = "georreferencia";
pub const ARRAY_SUFFIX: &str = "_data";

/// Input modality chosen for one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    /// Read-only preview of a stored base64 image, zoomable.
    Signature,
    /// Map centred on the stored coordinates.
    Map,
    /// Repeatable rows handled by the array renderer.
    Array,
    Text,
    Number,
    TextArea,
    /// Calendar bound to a `YYYY-MM-DD` string.
    Date,
    /// Dropdown; also used for `range` fields.
    Select(Vec<ResolvedOption>),
    Radio(Vec<ResolvedOption>),
    /// Multi-choice stored as a comma-joined string.
    CheckboxGroup(Vec<ResolvedOption>),
    /// Single boolean stored as `"1"` / `"0"`.
    Toggle,
    /// File picker storing a base64 data URL.
    Image,
}

/// Picks the widget for `field` given its current value and resolved options.
pub fn widget_for(field: &Field, value: Option<&Value>, options: Vec<ResolvedOption>) -> Widget {
    if field.field_type == FieldType::Signature || field.name == SIGNATURE_FIELD {
        return Widget::Signature;
    }
    if field.field_type == FieldType::Gps || field.name == GEOREFERENCE_FIELD {
        return Widget::Map;
    }
    let holds_rows = matches!(value, Some(Value::Array(_)))
        && !matches!(
            field.field_type,
            FieldType::Checkbox | FieldType::Select | FieldType::Range
        );
    if field.name.ends_with(ARRAY_SUFFIX) || holds_rows {
        return Widget::Array;
    }

    match field.field_type {
        FieldType::Text => Widget::Text,
        FieldType::Number => Widget::Number,
        FieldType::Textarea => Widget::TextArea,
        FieldType::Date => Widget::Date,
        FieldType::Select | FieldType::Range => Widget::Select(options),
        FieldType::Radio => Widget::Radio(options),
        FieldType::Checkbox if options.is_empty() => Widget::Toggle,
        FieldType::Checkbox => Widget::CheckboxGroup(options),
        FieldType::Image => Widget::Image,
        FieldType::Signature => Widget::Signature,
        FieldType::Gps => Widget::Map,
    }
}

/// Values selected in a comma-joined multi-choice string.
pub fn split_multi(raw: &str) -> Vec<&str> {
    raw.split(',').filter(|v| !v.is_empty()).collect()
}

/// Adds or removes `option` keeping the order in which values were first selected.
pub fn toggle_multi(raw: &str, option: &str, checked: bool) -> String {
    let mut selected = split_multi(raw);
    if checked {
        if !selected.contains(&option) {
            selected.push(option);
        }
    } else {
        selected.retain(|v| *v != option);
    }
    selected.join(",")
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => matches!(s.as_str(), "true" | "1" | "on"),
        Value::Number(n) => n.as_i64() == Some(1),
        _ => false,
    }
}

pub fn toggle_value(checked: bool) -> &'static str {
    if checked { "1" } else { "0" }
}

const MONTHS_ES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Earliest selectable date.
pub fn min_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Parses a stored date. Timestamps are cut to their date part.
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Whether `date` is inside `[1900-01-01, today]`.
pub fn date_in_bounds(date: NaiveDate, today: NaiveDate) -> bool {
    date >= min_date() && date <= today
}

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `2026-10-19` -> `19 de octubre de 2026`.
pub fn format_long_es(date: NaiveDate) -> String {
    format!(
        "{} de {} de {}",
        date.day(),
        MONTHS_ES[date.month0() as usize],
        date.year()
    )
}

/// `2026-10-19T08:05:00` -> `19/10/2026 08:05`; unparseable input is returned as is.
pub fn format_short_es(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_local())
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .map(|dt| dt.format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Splits a base64 data URL into its mime type and decoded bytes.
pub fn decode_data_url(url: &str) -> Result<(String, Vec<u8>), FichaError> {
    let rest = url.strip_prefix("data:").ok_or(FichaError::InvalidDataUrl)?;
    let (meta, payload) = rest.split_once(',').ok_or(FichaError::InvalidDataUrl)?;
    let mime = meta
        .strip_suffix(";base64")
        .ok_or(FichaError::InvalidDataUrl)?;
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|_| FichaError::InvalidDataUrl)?;
    Ok((mime.to_string(), bytes))
}

/// Image source for a stored signature. Signatures are saved as bare PNG base64.
pub fn signature_src(stored: &str) -> String {
    if stored.starts_with("data:") {
        stored.to_string()
    } else {
        format!("data:image/png;base64,{}", stored)
    }
}
