//! ISO 8000 data dictionary of a form: one row per field with its syntax and
//! quality rules.

use serde::{Deserialize, Serialize};

use crate::model::form::{Field, FieldType, Form};

pub const DICTIONARY_HEADERS: [&str; 4] = [
    "Identificador (ISO 8000-110)",
    "Etiqueta Visual",
    "Definición Semántica",
    "Reglas Sintaxis/Calidad",
];

/// The schema has no per-field descriptions, so every field gets this one.
pub const SEMANTIC_PLACEHOLDER: &str = "Campo de datos del formulario.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub identifier: String,
    pub label: String,
    pub definition: String,
    pub rules: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionarySection {
    pub title: String,
    pub entries: Vec<DictionaryEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataDictionary {
    pub title: String,
    pub file_name: String,
    pub sections: Vec<DictionarySection>,
}

pub fn syntax_rules(field: &Field) -> Vec<String> {
    let mut rules = vec![
        format!("Tipo: {}", field.field_type.as_str()),
        format!("Obligatorio: {}", if field.required { "Sí" } else { "No" }),
    ];
    match field.field_type {
        FieldType::Number => rules.push("Validación: Solo dígitos.".to_string()),
        FieldType::Date => rules.push("Formato: YYYY-MM-DD.".to_string()),
        FieldType::Select | FieldType::Radio => {
            rules.push("Selección de lista predefinida.".to_string())
        }
        _ => {}
    }
    if let Some(source) = field.dynamic_source.as_deref().filter(|s| !s.is_empty()) {
        rules.push(format!("Fuente Dinámica: {}", source));
    }
    rules
}

pub fn build_dictionary(form: &Form) -> DataDictionary {
    DataDictionary {
        title: format!("Reporte Cumplimiento ISO 8000 - {}", form.name),
        file_name: format!("ISO8000_{}.pdf", form.name.split_whitespace().collect::<Vec<_>>().join("_")),
        sections: form
            .sections
            .iter()
            .map(|section| DictionarySection {
                title: format!("SECCIÓN: {}", section.name),
                entries: section
                    .fields
                    .iter()
                    .map(|field| DictionaryEntry {
                        identifier: field.name.clone(),
                        label: field.label.clone(),
                        definition: SEMANTIC_PLACEHOLDER.to_string(),
                        rules: syntax_rules(field),
                    })
                    .collect(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::form::Section;

    #[test]
    fn rules_describe_type_requirement_and_source() {
        let field = Field {
            name: "edad".to_string(),
            field_type: FieldType::Number,
            required: true,
            dynamic_source: Some("range:0-120".to_string()),
            ..Default::default()
        };
        assert_eq!(
            syntax_rules(&field),
            vec![
                "Tipo: number",
                "Obligatorio: Sí",
                "Validación: Solo dígitos.",
                "Fuente Dinámica: range:0-120"
            ]
        );
    }

    #[test]
    fn dictionary_groups_fields_by_section() {
        let form = Form {
            name: "Ficha Familiar 2026".to_string(),
            sections: vec![Section {
                name: "General".to_string(),
                fields: vec![Field {
                    name: "fecha".to_string(),
                    label: "Fecha".to_string(),
                    field_type: FieldType::Date,
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        };
        let dictionary = build_dictionary(&form);
        assert_eq!(dictionary.file_name, "ISO8000_Ficha_Familiar_2026.pdf");
        assert_eq!(dictionary.sections[0].title, "SECCIÓN: General");
        assert_eq!(
            dictionary.sections[0].entries[0].rules,
            vec!["Tipo: date", "Obligatorio: No", "Formato: YYYY-MM-DD."]
        );
    }
}
