//! Helpers for array-valued sections: column inference, per-cell widgets and
//! new rows.

use serde_json::{Map, Value};

use crate::model::form::{Field, FieldType};
use crate::options::{ResolvedOption, resolve};

/// Row identity key, never shown as a column.
pub const ROW_ID_KEY: &str = "id";

const MIEMBROS_GENERALES_COLUMNS: [&str; 14] = [
    "cedula",
    "nombres",
    "apellidos",
    "sexo",
    "fecha_nacimiento",
    "parentesco",
    "grupo_edad",
    "ocupacion",
    "escolaridad",
    "salud_bucal",
    "esquema_vacunas",
    "predis_enfermedad_discapacidad",
    "histoira_clinica",
    "familiar_general_x",
];
const MIEMBROS_FALLECIDOS_COLUMNS: [&str; 4] = ["nombres", "edad", "cause", "fecha_fallecimiento"];
const PROBLEMAS_AMBIENTALES_COLUMNS: [&str; 3] = ["tipo_contaminacion", "causa", "frecuencia"];
const GENERIC_COLUMNS: [&str; 1] = ["valor"];

/// Columns shown for the rows stored under `key`.
///
/// Taken from the first row when there is one. Otherwise a fixed list is used
/// for the well-known arrays and a single `valor` column for anything else.
pub fn infer_columns(key: &str, rows: &[Value]) -> Vec<String> {
    if let Some(Value::Object(first)) = rows.first() {
        return first
            .keys()
            .filter(|k| k.as_str() != ROW_ID_KEY)
            .cloned()
            .collect();
    }
    let fallback: &[&str] = if key.contains("miembros_generales") {
        &MIEMBROS_GENERALES_COLUMNS
    } else if key.contains("miembros_fallecidos") {
        &MIEMBROS_FALLECIDOS_COLUMNS
    } else if key.contains("problemas_ambientales") {
        &PROBLEMAS_AMBIENTALES_COLUMNS
    } else {
        &GENERIC_COLUMNS
    };
    fallback.iter().map(|c| c.to_string()).collect()
}

/// Columns of rows counted by a repeat counter whose template section
/// declares `fields`. An empty list falls back to the template's field names.
pub fn counter_columns(key: &str, rows: &[Value], fields: &[Field]) -> Vec<String> {
    if rows.is_empty() && !fields.is_empty() {
        return fields.iter().map(|f| f.name.clone()).collect();
    }
    infer_columns(key, rows)
}

/// Editor used for one table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellWidget {
    Select(Vec<ResolvedOption>),
    Date,
    /// Removable badges over a comma-joined string.
    Chips(Vec<ResolvedOption>),
    Text,
}

pub fn find_column_field<'a>(column: &str, fields: &'a [Field]) -> Option<&'a Field> {
    fields.iter().find(|f| f.name == column)
}

pub fn cell_widget(column: &str, field: Option<&Field>) -> CellWidget {
    let options = field.map(|f| resolve(f, &[])).unwrap_or_default();
    if let Some(f) = field {
        let choice = matches!(
            f.field_type,
            FieldType::Select | FieldType::Radio | FieldType::Range
        );
        if choice || f.has_range_source() {
            return CellWidget::Select(options);
        }
    }
    if column.contains("fecha") || field.is_some_and(|f| f.field_type == FieldType::Date) {
        return CellWidget::Date;
    }
    if field.is_some_and(|f| f.field_type == FieldType::Checkbox) && !options.is_empty() {
        return CellWidget::Chips(options);
    }
    CellWidget::Text
}

/// Header for a column: the field label when known, else the key with spaces.
pub fn column_label(column: &str, field: Option<&Field>) -> String {
    field
        .map(|f| f.label.clone())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| column.replace('_', " "))
}

/// `"miembros_fallecidos_data"` -> `"miembros fallecidos"`.
pub fn table_title(label: &str) -> String {
    label.replacen("_data", "", 1).replace('_', " ")
}

/// New row with every column set to an empty string.
pub fn new_row(columns: &[String]) -> Value {
    let row: Map<String, Value> = columns
        .iter()
        .map(|c| (c.clone(), Value::String(String::new())))
        .collect();
    Value::Object(row)
}

/// Heading of a member card: names when present, else a numbered placeholder.
pub fn card_title(row: &Value, index: usize) -> String {
    let text = |key: &str| {
        row.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };
    match text("nombres") {
        Some(nombres) => match text("apellidos") {
            Some(apellidos) => format!("{} {}", nombres, apellidos),
            None => nombres.to_string(),
        },
        None => format!("Miembro del Hogar #{}", index + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::form::{FieldOption, FieldOptions};
    use serde_json::json;

    fn typed(name: &str, field_type: FieldType) -> Field {
        Field {
            name: name.to_string(),
            label: String::new(),
            field_type,
            ..Default::default()
        }
    }

    #[test]
    fn columns_come_from_the_first_row_without_id() {
        let rows = vec![json!({"id": 3, "nombres": "Ana", "edad": "30"})];
        let columns = infer_columns("x_data", &rows);
        assert_eq!(columns, vec!["nombres".to_string(), "edad".to_string()]);
    }

    #[test]
    fn empty_arrays_use_known_fallbacks() {
        assert_eq!(infer_columns("miembros_generales_data", &[]).len(), 14);
        assert_eq!(
            infer_columns("miembros_fallecidos_data", &[]),
            vec!["nombres", "edad", "cause", "fecha_fallecimiento"]
        );
        assert_eq!(
            infer_columns("problemas_ambientales_data", &[]),
            vec!["tipo_contaminacion", "causa", "frecuencia"]
        );
        assert_eq!(infer_columns("vivienda_data", &[]), vec!["valor"]);
    }

    #[test]
    fn counter_rows_start_from_template_fields() {
        let fields = vec![typed("nombres", FieldType::Text), typed("edad", FieldType::Number)];
        assert_eq!(
            counter_columns("numero_miembros_data", &[], &fields),
            vec!["nombres", "edad"]
        );
        assert_eq!(
            counter_columns("numero_miembros_data", &[json!({"id": 1, "nombres": "Ana"})], &fields),
            vec!["nombres"]
        );
        assert_eq!(counter_columns("otros_data", &[], &[]), vec!["valor"]);
    }

    #[test]
    fn cell_dispatch() {
        let ranged = Field {
            name: "edad".to_string(),
            dynamic_source: Some("range:0-2".to_string()),
            ..Default::default()
        };
        match cell_widget("edad", Some(&ranged)) {
            CellWidget::Select(options) => assert_eq!(options.len(), 3),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(cell_widget("fecha_nacimiento", None), CellWidget::Date);
        assert_eq!(
            cell_widget("dia", Some(&typed("dia", FieldType::Date))),
            CellWidget::Date
        );
        assert_eq!(
            cell_widget("vacunas", Some(&typed("vacunas", FieldType::Checkbox))),
            CellWidget::Text
        );

        let mut chips = typed("vacunas", FieldType::Checkbox);
        chips.options = Some(FieldOptions::List(vec![FieldOption {
            label: Some("BCG".to_string()),
            value: Some(json!("bcg")),
            ..Default::default()
        }]));
        assert_eq!(
            cell_widget("vacunas", Some(&chips)),
            CellWidget::Chips(vec![ResolvedOption::new("BCG", "bcg")])
        );
        assert_eq!(cell_widget("nombres", None), CellWidget::Text);
    }

    #[test]
    fn columns_typed_elsewhere_in_the_form_keep_their_widgets() {
        use crate::model::form::{Form, Section};

        let mut parentesco = typed("parentesco", FieldType::Select);
        parentesco.options = Some(FieldOptions::List(vec![FieldOption {
            label: Some("Hijo/a".to_string()),
            value: Some(json!("hijo")),
            ..Default::default()
        }]));
        let form = Form {
            sections: vec![
                Section {
                    name: "Información General".to_string(),
                    fields: vec![typed("miembros_generales_data", FieldType::Text)],
                    ..Default::default()
                },
                Section {
                    name: "Familiares".to_string(),
                    is_template: true,
                    fields: vec![parentesco, typed("nacimiento", FieldType::Date)],
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let all_fields: Vec<Field> = form.all_fields().cloned().collect();

        assert_eq!(
            cell_widget("parentesco", find_column_field("parentesco", &all_fields)),
            CellWidget::Select(vec![ResolvedOption::new("Hijo/a", "hijo")])
        );
        assert_eq!(
            cell_widget("nacimiento", find_column_field("nacimiento", &all_fields)),
            CellWidget::Date
        );
        assert_eq!(
            cell_widget("parentesco", find_column_field("parentesco", &[])),
            CellWidget::Text
        );
    }

    #[test]
    fn new_rows_are_blank() {
        let row = new_row(&["a".to_string(), "b".to_string()]);
        assert_eq!(row, json!({"a": "", "b": ""}));
    }

    #[test]
    fn titles() {
        assert_eq!(table_title("miembros_fallecidos_data"), "miembros fallecidos");
        assert_eq!(column_label("fecha_nacimiento", None), "fecha nacimiento");
        assert_eq!(card_title(&json!({"nombres": "Ana", "apellidos": "Paz"}), 0), "Ana Paz");
        assert_eq!(card_title(&json!({"nombres": ""}), 1), "Miembro del Hogar #2");
    }
}
