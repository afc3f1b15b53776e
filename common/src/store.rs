//! The single in-memory state of a ficha being edited.
//!
//! Every widget writes through [`FormStore::apply`] with an action scoped to
//! its own key; derived displays (quality score, risk score, row counts) read
//! [`FormStore::data`].

use serde_json::Value;

use crate::geo::GeoLevel;
use crate::model::ficha::{Ficha, FichaStatus, RESERVED_KEYS};
use crate::model::form::Form;
use crate::requests::FichaUpdate;
use crate::sections::classify;
use crate::values::FichaData;

/// Count fields kept equal to the length of the array they summarise.
const COUNTER_SYNC: [(&str, &[&str]); 4] = [
    (
        "miembros_generales_data",
        &["miembros_generales", "numero_miembros"],
    ),
    ("miembros_fallecidos_data", &["miembros_fallecidos"]),
    ("problemas_ambientales_data", &["problemas_ambientales"]),
    (
        "personas_lugares_tratamiento_data",
        &["personas_lugares_tratamiento"],
    ),
];

#[derive(Debug, Clone, PartialEq)]
pub enum FormAction {
    /// Programmatic write of one value.
    Set { name: String, value: Value },
    /// Value picked by the user in a dropdown. Geographic parents clear
    /// their descendants.
    UserSelect { name: String, value: String },
    SetCell {
        key: String,
        row: usize,
        column: String,
        value: Value,
    },
    /// Appends a row whose columns are all empty strings.
    AppendRow { key: String, columns: Vec<String> },
    RemoveRow { key: String, index: usize },
    SetNombreFamilia(String),
    SetStatus(FichaStatus),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormStore {
    data: FichaData,
    nombre_familia: String,
    status: FichaStatus,
}

impl FormStore {
    /// Schema defaults overlaid with the stored record.
    ///
    /// Every array-backed section and every linked repeat counter starts with
    /// an empty row list so the array renderer always has something to bind to.
    pub fn load(form: &Form, ficha: &Ficha) -> FormStore {
        let mut data = schema_defaults(form);
        for (key, value) in &ficha.datos {
            if !RESERVED_KEYS.contains(&key.as_str()) {
                data.insert(key.clone(), value.clone());
            }
        }

        let mut store = FormStore {
            data,
            nombre_familia: ficha.nombre_familia.clone().unwrap_or_default(),
            status: ficha.status,
        };
        // Only arrays the record actually carries drive their counters.
        for (key, _) in COUNTER_SYNC {
            if ficha.datos.get(key).is_some_and(Value::is_array) {
                store.sync_counter(key);
            }
        }
        store
    }

    pub fn data(&self) -> &FichaData {
        &self.data
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }

    pub fn rows(&self, key: &str) -> &[Value] {
        match self.data.get(key) {
            Some(Value::Array(rows)) => rows,
            _ => &[],
        }
    }

    pub fn nombre_familia(&self) -> &str {
        &self.nombre_familia
    }

    pub fn status(&self) -> FichaStatus {
        self.status
    }

    /// Applies `action`. Returns whether anything changed.
    pub fn apply(&mut self, action: FormAction) -> bool {
        match action {
            FormAction::Set { name, value } => self.set(name, value),
            FormAction::UserSelect { name, value } => {
                let mut changed = self.set(name.clone(), Value::String(value));
                if !changed {
                    return false;
                }
                if let Some(level) = GeoLevel::from_field_name(&name) {
                    for dependent in level.dependents() {
                        changed |= self.set(
                            dependent.field_name().to_string(),
                            Value::String(String::new()),
                        );
                    }
                }
                changed
            }
            FormAction::SetCell {
                key,
                row,
                column,
                value,
            } => {
                let Some(Value::Object(cells)) = self.rows_mut(&key).and_then(|rows| rows.get_mut(row))
                else {
                    log::warn!("No row {} in {}", row, key);
                    return false;
                };
                if cells.get(&column) == Some(&value) {
                    return false;
                }
                cells.insert(column, value);
                true
            }
            FormAction::AppendRow { key, columns } => {
                let row = crate::repeat::new_row(&columns);
                let Some(rows) = self.rows_mut(&key) else {
                    return false;
                };
                rows.push(row);
                self.sync_counter(&key);
                true
            }
            FormAction::RemoveRow { key, index } => {
                let Some(rows) = self.rows_mut(&key).filter(|rows| index < rows.len()) else {
                    return false;
                };
                rows.remove(index);
                self.sync_counter(&key);
                true
            }
            FormAction::SetNombreFamilia(name) => {
                let changed = self.nombre_familia != name;
                self.nombre_familia = name;
                changed
            }
            FormAction::SetStatus(status) => {
                let changed = self.status != status;
                self.status = status;
                changed
            }
        }
    }

    /// Body for `PUT /web/fichas/{id}`.
    pub fn to_update(&self) -> FichaUpdate {
        FichaUpdate {
            datos: self.data.clone(),
            nombre_familia: self.nombre_familia.clone(),
            status: self.status,
        }
    }

    fn set(&mut self, name: String, value: Value) -> bool {
        if RESERVED_KEYS.contains(&name.as_str()) {
            log::warn!("Ignoring write to reserved key {}", name);
            return false;
        }
        if self.data.get(&name) == Some(&value) {
            return false;
        }
        let is_array = value.is_array();
        self.data.insert(name.clone(), value);
        if is_array {
            self.sync_counter(&name);
        }
        true
    }

    fn rows_mut(&mut self, key: &str) -> Option<&mut Vec<Value>> {
        let slot = self
            .data
            .entry(key.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if !slot.is_array() {
            *slot = Value::Array(Vec::new());
        }
        slot.as_array_mut()
    }

    fn sync_counter(&mut self, key: &str) {
        let Some((_, counters)) = COUNTER_SYNC.iter().find(|(k, _)| *k == key) else {
            return;
        };
        let Some(Value::Array(rows)) = self.data.get(key) else {
            return;
        };
        let count = Value::String(rows.len().to_string());
        for counter in counters.iter() {
            self.data.insert(counter.to_string(), count.clone());
        }
    }
}

fn schema_defaults(form: &Form) -> FichaData {
    let mut data = FichaData::new();
    for section in &form.sections {
        if let Some(key) = classify(&section.name, section.is_template) {
            data.insert(key, Value::Array(Vec::new()));
        }
        for field in section.fields.iter().filter(|f| f.is_repeat_counter()) {
            data.insert(field.repeat_data_key(), Value::Array(Vec::new()));
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::form::{Field, FieldType, Section};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn form() -> Form {
        Form {
            sections: vec![
                Section {
                    id: Some(1),
                    name: "Información General".to_string(),
                    fields: vec![Field {
                        name: "numero_miembros".to_string(),
                        field_type: FieldType::Range,
                        linked_section_id: Some(2),
                        ..Default::default()
                    }],
                    ..Default::default()
                },
                Section {
                    id: Some(2),
                    name: "Familiares".to_string(),
                    is_template: true,
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    fn ficha(datos: Value) -> Ficha {
        Ficha {
            nombre_familia: Some("Familia Paz".to_string()),
            datos: datos.as_object().cloned().unwrap_or_default(),
            ..Default::default()
        }
    }

    #[test]
    fn load_merges_defaults_and_strips_reserved_keys() {
        let store = FormStore::load(
            &form(),
            &ficha(json!({"jefe": "Ana", "status": "verified", "nombre_familia": "x"})),
        );
        assert_eq!(store.get("numero_miembros_data"), Some(&json!([])));
        assert_eq!(store.get("miembros_generales_data"), Some(&json!([])));
        assert_eq!(store.get("jefe"), Some(&json!("Ana")));
        assert_eq!(store.get("status"), None);
        assert_eq!(store.nombre_familia(), "Familia Paz");
    }

    #[test]
    fn loading_never_clears_geographic_children() {
        let store = FormStore::load(
            &form(),
            &ficha(json!({"select_provincia": "17", "select_canton": "1701", "select_parroquia": "170150"})),
        );
        assert_eq!(store.get("select_parroquia"), Some(&json!("170150")));
    }

    #[test]
    fn user_province_change_clears_canton_and_parish() {
        let mut store = FormStore::load(
            &form(),
            &ficha(json!({"select_provincia": "17", "select_canton": "1701", "select_parroquia": "170150"})),
        );
        assert!(store.apply(FormAction::UserSelect {
            name: "select_provincia".to_string(),
            value: "9".to_string(),
        }));
        assert_eq!(store.get("select_provincia"), Some(&json!("9")));
        assert_eq!(store.get("select_canton"), Some(&json!("")));
        assert_eq!(store.get("select_parroquia"), Some(&json!("")));

        store.apply(FormAction::Set {
            name: "select_canton".to_string(),
            value: json!("901"),
        });
        assert_eq!(store.get("select_canton"), Some(&json!("901")));
    }

    #[test]
    fn reselecting_the_same_province_keeps_children() {
        let mut store = FormStore::load(
            &form(),
            &ficha(json!({"select_provincia": "17", "select_canton": "1701", "select_parroquia": "170150"})),
        );
        assert!(!store.apply(FormAction::UserSelect {
            name: "select_provincia".to_string(),
            value: "17".to_string(),
        }));
        assert_eq!(store.get("select_canton"), Some(&json!("1701")));
        assert_eq!(store.get("select_parroquia"), Some(&json!("170150")));
    }

    #[test]
    fn row_mutations_keep_counters_in_sync() {
        let mut store = FormStore::load(&form(), &ficha(json!({})));
        let key = "miembros_generales_data".to_string();
        let columns = vec!["nombres".to_string(), "edad".to_string()];

        store.apply(FormAction::AppendRow {
            key: key.clone(),
            columns: columns.clone(),
        });
        store.apply(FormAction::AppendRow {
            key: key.clone(),
            columns,
        });
        assert_eq!(store.get("numero_miembros"), Some(&json!("2")));
        assert_eq!(store.get("miembros_generales"), Some(&json!("2")));

        assert!(store.apply(FormAction::SetCell {
            key: key.clone(),
            row: 1,
            column: "nombres".to_string(),
            value: json!("Luis"),
        }));
        assert!(store.apply(FormAction::RemoveRow {
            key: key.clone(),
            index: 0,
        }));
        assert_eq!(store.rows(&key), &[json!({"nombres": "Luis", "edad": ""})]);
        assert_eq!(store.get("numero_miembros"), Some(&json!("1")));
        assert!(!store.apply(FormAction::RemoveRow { key, index: 5 }));
    }

    #[test]
    fn update_body_splits_reserved_columns() {
        let mut store = FormStore::load(&form(), &ficha(json!({"jefe": "Ana"})));
        store.apply(FormAction::SetStatus(FichaStatus::Verified));
        store.apply(FormAction::SetNombreFamilia("Familia Paz Ortiz".to_string()));
        assert!(!store.apply(FormAction::Set {
            name: "status".to_string(),
            value: json!("rejected"),
        }));

        let update = serde_json::to_value(store.to_update()).unwrap();
        assert_eq!(update["status"], json!("verified"));
        assert_eq!(update["nombre_familia"], json!("Familia Paz Ortiz"));
        assert_eq!(update["datos"]["jefe"], json!("Ana"));
        assert!(update["datos"].get("status").is_none());
    }
}
