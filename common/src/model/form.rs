use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::lenient;
use crate::error::FichaError;

/// A complete form schema as returned by `GET /admin/forms/{id}/full`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Form {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub version: Option<String>,
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// Row of `GET /admin/forms`, also returned by `POST /admin/forms`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSummary {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: Option<String>,
}

/// Named group of fields. A template section describes one row of a
/// repeatable structure instead of top-level fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::id")]
    pub form_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub order_index: i64,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_template: bool,
    #[serde(default)]
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Field {
    #[serde(default, deserialize_with = "lenient::id")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::id")]
    pub section_id: Option<i64>,
    /// Stable machine key, snake_case by convention.
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub label: String,
    #[serde(rename = "type", default, deserialize_with = "field_type")]
    pub field_type: FieldType,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub required: bool,
    #[serde(default, deserialize_with = "lenient::number")]
    pub order_index: i64,
    #[serde(
        default,
        deserialize_with = "field_options",
        skip_serializing_if = "Option::is_none"
    )]
    pub options: Option<FieldOptions>,
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub dynamic_source: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::id",
        skip_serializing_if = "Option::is_none"
    )]
    pub linked_section_id: Option<i64>,
}

/// Input modality declared by the schema. Unknown types decode as [`FieldType::Text`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Number,
    Date,
    Select,
    Radio,
    Checkbox,
    Textarea,
    Signature,
    Gps,
    Image,
    Range,
    #[default]
    #[serde(other)]
    Text,
}

/// `null`, non-string and unknown types all read as [`FieldType::Text`].
fn field_type<'de, D>(deserializer: D) -> Result<FieldType, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => {
            serde_json::from_value(Value::String(s.trim().to_lowercase())).unwrap_or_default()
        }
        _ => FieldType::Text,
    })
}

impl FieldType {
    /// Order offered by the form builder.
    pub const ALL: [FieldType; 11] = [
        FieldType::Text,
        FieldType::Number,
        FieldType::Date,
        FieldType::Select,
        FieldType::Radio,
        FieldType::Checkbox,
        FieldType::Textarea,
        FieldType::Range,
        FieldType::Signature,
        FieldType::Gps,
        FieldType::Image,
    ];

    /// Types whose inline option list is edited in the form builder.
    pub fn takes_inline_options(&self) -> bool {
        matches!(self, FieldType::Select | FieldType::Radio | FieldType::Checkbox)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Select => "select",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
            FieldType::Textarea => "textarea",
            FieldType::Signature => "signature",
            FieldType::Gps => "gps",
            FieldType::Image => "image",
            FieldType::Range => "range",
        }
    }
}

/// Schema `options`: either an inline list or a directive string such as `range:1-10`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldOptions {
    List(Vec<FieldOption>),
    Directive(String),
}

/// Inline option as stored by the form builder. `value` falls back to `id` and
/// `label` to `name`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub label: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i64>,
}

fn field_options<'de, D>(deserializer: D) -> Result<Option<FieldOptions>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(FieldOptions::Directive(s)),
        Some(Value::Array(items)) => Some(FieldOptions::List(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        )),
        _ => None,
    })
}

impl Field {
    /// Inline option list, if the schema declares one.
    pub fn inline_options(&self) -> &[FieldOption] {
        match &self.options {
            Some(FieldOptions::List(list)) => list,
            _ => &[],
        }
    }

    /// Directive that generates options: `dynamic_source`, or a string-typed `options`.
    pub fn option_directive(&self) -> Option<&str> {
        self.dynamic_source.as_deref().filter(|s| !s.is_empty()).or(
            match &self.options {
                Some(FieldOptions::Directive(s)) => Some(s.as_str()),
                _ => None,
            },
        )
    }

    /// Whether options come from a `range:` directive.
    pub fn has_range_source(&self) -> bool {
        self.option_directive()
            .map(|d| d.trim().to_lowercase().starts_with("range:"))
            .unwrap_or(false)
    }

    /// Counter field that controls how many rows a template section holds.
    pub fn is_repeat_counter(&self) -> bool {
        self.field_type == FieldType::Range && self.linked_section_id.is_some()
    }

    /// Key under which the rows counted by this field are stored.
    pub fn repeat_data_key(&self) -> String {
        format!("{}_data", self.name)
    }
}

impl Form {
    /// Accepts a single form object or an array whose first element is the form.
    pub fn from_value(value: &Value) -> Result<Form, FichaError> {
        let candidate = match value {
            Value::Array(items) => items
                .first()
                .ok_or(FichaError::InvalidSchema("empty schema array"))?,
            other => other,
        };
        if !candidate.get("sections").is_some_and(Value::is_array) {
            return Err(FichaError::InvalidSchema("no sections found"));
        }
        Ok(Form::deserialize(candidate)?)
    }

    pub fn section_by_id(&self, id: i64) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == Some(id))
    }

    pub fn all_fields(&self) -> impl Iterator<Item = &Field> {
        self.sections.iter().flat_map(|s| s.fields.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_loose_api_encodings() {
        let field: Field = serde_json::from_value(json!({
            "id": "12",
            "name": "numero_miembros",
            "label": "Número de miembros",
            "type": "range",
            "required": 1,
            "order_index": "3",
            "dynamic_source": "range:0-20",
            "linked_section_id": "7"
        }))
        .unwrap();

        assert_eq!(field.id, Some(12));
        assert!(field.required);
        assert_eq!(field.order_index, 3);
        assert_eq!(field.linked_section_id, Some(7));
        assert!(field.is_repeat_counter());
        assert_eq!(field.repeat_data_key(), "numero_miembros_data");
    }

    #[test]
    fn unknown_type_falls_back_to_text() {
        let field: Field =
            serde_json::from_value(json!({"name": "x", "type": "color"})).unwrap();
        assert_eq!(field.field_type, FieldType::Text);
    }

    #[test]
    fn unknown_and_null_types_decode_as_text() {
        for raw in [json!("foo"), json!(null), json!(7)] {
            let field: Field = serde_json::from_value(json!({"name": "x", "type": raw})).unwrap();
            assert_eq!(field.field_type, FieldType::Text);
        }
        let field: Field = serde_json::from_value(json!({"name": "x", "type": " Date "})).unwrap();
        assert_eq!(field.field_type, FieldType::Date);
        assert_eq!(serde_json::to_value(FieldType::Text).unwrap(), json!("text"));
    }

    #[test]
    fn null_attributes_do_not_reject_the_schema() {
        let form = Form::from_value(&json!({
            "name": null,
            "description": null,
            "sections": [{
                "name": "General",
                "fields": [
                    {"name": "jefe", "label": null, "type": null, "dynamic_source": null},
                    {"name": "etnia", "type": "select", "options": [{"label": 1, "value": "1"}]}
                ]
            }]
        }))
        .unwrap();

        let fields = &form.sections[0].fields;
        assert_eq!(form.name, "");
        assert_eq!(fields[0].label, "");
        assert_eq!(fields[0].field_type, FieldType::Text);
        assert_eq!(fields[1].inline_options()[0].label.as_deref(), Some("1"));
    }

    #[test]
    fn string_options_are_a_directive() {
        let field: Field =
            serde_json::from_value(json!({"name": "edad", "options": "RANGE: 1 - 3"})).unwrap();
        assert_eq!(field.option_directive(), Some("RANGE: 1 - 3"));
        assert!(field.has_range_source());
        assert!(field.inline_options().is_empty());
    }

    #[test]
    fn schema_may_arrive_wrapped_in_an_array() {
        let form = Form::from_value(&json!([{ "id": 1, "name": "Ficha", "sections": [] }])).unwrap();
        assert_eq!(form.name, "Ficha");
        assert!(Form::from_value(&json!({ "name": "sin secciones" })).is_err());
        assert!(Form::from_value(&json!([])).is_err());
    }
}
