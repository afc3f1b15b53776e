//! Printable layout of a ficha.
//!
//! [`build_report`] turns the schema, the record and the geographic catalogs
//! into a list of titled sections made of blocks. Rendering to PDF happens on
//! the host, which only has to draw these blocks in order; option labels, row
//! layout and section order are all decided here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::geo::{GeoCatalogs, GeoLevel, GeoPoint};
use crate::model::ficha::Ficha;
use crate::model::form::{Field, FieldType, Form, Section};
use crate::options::label_for_value;
use crate::repeat::{ROW_ID_KEY, card_title};
use crate::sections::{RenderMode, classify, render_mode, sort_sections_for_report};
use crate::values::{FichaData, value_to_string};
use crate::widgets::{SIGNATURE_FIELD, format_short_es};

pub const REPORT_TITLE: &str = "FICHA FAMILIAR";
pub const EMPTY_ROWS: &str = "(Sin registros)";

const AUDIT_HEADERS: [&str; 5] = ["Dispositivo", "Versión App", "Ubicación", "Usuario", "Actualizado"];
const GEO_HEADERS: [&str; 3] = ["Provincia", "Cantón", "Parroquia"];
/// Signatures shorter than this are placeholders rather than images.
const MIN_SIGNATURE_LEN: usize = 100;
const MIN_IMAGE_URL_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FichaReport {
    pub title: String,
    pub ficha_id: String,
    pub familia: String,
    pub risk_level: String,
    pub risk_score: String,
    pub audit: TableBlock,
    pub georeference: TableBlock,
    pub sections: Vec<ReportSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSection {
    pub title: String,
    pub blocks: Vec<ReportBlock>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableBlock {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub title: String,
    pub entries: Vec<(String, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Signature,
    Photo,
}

/// Where an image's bytes come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ImageSource {
    /// Base64 payload, with or without a `data:` prefix.
    Embedded(String),
    /// HTTP(S) URL fetched at print time.
    Remote(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "block", rename_all = "snake_case")]
pub enum ReportBlock {
    KeyValues { entries: Vec<(String, String)> },
    Table(TableBlock),
    Cards { cards: Vec<Card> },
    Empty { message: String },
    Image {
        label: String,
        kind: ImageKind,
        source: ImageSource,
    },
}

pub fn build_report(form: &Form, ficha: &Ficha, catalogs: &GeoCatalogs) -> FichaReport {
    let datos = &ficha.datos;
    let all_fields: Vec<&Field> = form.all_fields().collect();

    let sections = sort_sections_for_report(&form.sections)
        .into_iter()
        .map(|section| ReportSection {
            title: section.name.to_uppercase(),
            blocks: section_blocks(section, &all_fields, datos, catalogs),
        })
        .collect();

    FichaReport {
        title: REPORT_TITLE.to_string(),
        ficha_id: ficha
            .id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "N/A".to_string()),
        familia: ficha
            .nombre_familia
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Sin nombre".to_string()),
        risk_level: ficha
            .risk_level
            .clone()
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| "No calculado".to_string()),
        risk_score: format!("Puntaje: {}", ficha.risk_score.unwrap_or(0.0)),
        audit: audit_table(ficha),
        georeference: georeference_table(datos, catalogs),
        sections,
    }
}

fn audit_table(ficha: &Ficha) -> TableBlock {
    let dash = || "-".to_string();
    let location = match &ficha.geo_location {
        None | Some(Value::Null) => dash(),
        Some(raw) => GeoPoint::parse(Some(raw))
            .map(|p| p.describe())
            .unwrap_or_else(|| value_to_string(raw)),
    };
    TableBlock {
        headers: AUDIT_HEADERS.iter().map(|h| h.to_string()).collect(),
        rows: vec![vec![
            ficha.device_model.clone().unwrap_or_else(dash),
            ficha.app_version.clone().unwrap_or_else(dash),
            location,
            ficha.user.as_ref().map(|u| u.name.clone()).unwrap_or_else(dash),
            ficha
                .updated_at
                .as_deref()
                .map(format_short_es)
                .unwrap_or_else(dash),
        ]],
    }
}

fn georeference_table(datos: &FichaData, catalogs: &GeoCatalogs) -> TableBlock {
    TableBlock {
        headers: GEO_HEADERS.iter().map(|h| h.to_string()).collect(),
        rows: vec![
            GeoLevel::ALL
                .iter()
                .map(|level| catalogs.display_name(*level, datos.get(level.field_name())))
                .collect(),
        ],
    }
}

fn section_blocks(
    section: &Section,
    all_fields: &[&Field],
    datos: &FichaData,
    catalogs: &GeoCatalogs,
) -> Vec<ReportBlock> {
    let rows = classify(&section.name, true).and_then(|key| match datos.get(&key) {
        Some(Value::Array(rows)) => Some(rows),
        _ => None,
    });
    match rows {
        Some(rows) => row_blocks(section, all_fields, rows),
        None => field_blocks(section, datos, catalogs),
    }
}

fn lookup<'a>(section: &'a Section, all_fields: &[&'a Field], key: &str) -> Option<&'a Field> {
    section
        .fields
        .iter()
        .find(|f| f.name == key)
        .or_else(|| all_fields.iter().copied().find(|f| f.name == key))
}

fn row_label(field: Option<&Field>, key: &str) -> String {
    field
        .map(|f| f.label.clone())
        .unwrap_or_else(|| key.replace('_', " "))
}

fn row_blocks(section: &Section, all_fields: &[&Field], rows: &[Value]) -> Vec<ReportBlock> {
    let Some(Value::Object(first)) = rows.first() else {
        return vec![ReportBlock::Empty {
            message: EMPTY_ROWS.to_string(),
        }];
    };
    let keys: Vec<&String> = first.keys().filter(|k| k.as_str() != ROW_ID_KEY).collect();

    if render_mode(&section.name) == RenderMode::Cards {
        let cards = rows
            .iter()
            .enumerate()
            .map(|(i, row)| Card {
                title: card_title(row, i).to_uppercase(),
                entries: keys
                    .iter()
                    .filter_map(|key| {
                        let value = row.get(key.as_str())?;
                        if value.is_null() || value.as_str() == Some("") {
                            return None;
                        }
                        let field = lookup(section, all_fields, key);
                        Some((row_label(field, key), label_for_value(value, field, &[])))
                    })
                    .collect(),
            })
            .collect();
        return vec![ReportBlock::Cards { cards }];
    }

    let headers = keys
        .iter()
        .map(|key| row_label(lookup(section, all_fields, key), key))
        .collect();
    let body = rows
        .iter()
        .map(|row| {
            keys.iter()
                .map(|key| {
                    let value = row.get(key.as_str()).unwrap_or(&Value::Null);
                    label_for_value(value, lookup(section, all_fields, key), &[])
                })
                .collect()
        })
        .collect();
    vec![ReportBlock::Table(TableBlock {
        headers,
        rows: body,
    })]
}

fn is_signature(field: &Field) -> bool {
    field.field_type == FieldType::Signature || field.name == SIGNATURE_FIELD || field.name == "firma"
}

fn looks_like_image_url(raw: &str) -> bool {
    if raw.starts_with("data:image") {
        return true;
    }
    let path = raw.split('?').next().unwrap_or(raw).to_lowercase();
    [".jpeg", ".jpg", ".png", ".webp"]
        .iter()
        .any(|ext| path.ends_with(ext))
}

fn strip_data_prefix(raw: &str) -> &str {
    match raw.split_once(";base64,") {
        Some((prefix, payload)) if prefix.starts_with("data:image/") => payload,
        _ => raw,
    }
}

fn field_blocks(section: &Section, datos: &FichaData, catalogs: &GeoCatalogs) -> Vec<ReportBlock> {
    let mut blocks = Vec::new();
    let mut entries: Vec<(String, String)> = Vec::new();
    let flush = |entries: &mut Vec<(String, String)>, blocks: &mut Vec<ReportBlock>| {
        if !entries.is_empty() {
            blocks.push(ReportBlock::KeyValues {
                entries: std::mem::take(entries),
            });
        }
    };

    for field in &section.fields {
        let Some(value) = datos.get(&field.name) else {
            continue;
        };
        if value.is_null() || value.as_str() == Some("") {
            continue;
        }
        // Shown in the georeference table.
        if GeoLevel::from_field_name(&field.name).is_some() {
            continue;
        }
        let raw = value_to_string(value);

        if is_signature(field) {
            let payload = strip_data_prefix(&raw);
            if payload.len() > MIN_SIGNATURE_LEN {
                flush(&mut entries, &mut blocks);
                blocks.push(ReportBlock::Image {
                    label: field.label.clone(),
                    kind: ImageKind::Signature,
                    source: ImageSource::Embedded(payload.to_string()),
                });
                continue;
            }
        }

        let image_field = field.field_type == FieldType::Image || field.name.starts_with("img_");
        let image_value = looks_like_image_url(&raw) && raw.len() > MIN_IMAGE_URL_LEN;
        if image_field || image_value {
            let source = if raw.starts_with("http") {
                Some(ImageSource::Remote(raw.clone()))
            } else if raw.starts_with("data:") {
                Some(ImageSource::Embedded(raw.clone()))
            } else {
                None
            };
            if let Some(source) = source {
                flush(&mut entries, &mut blocks);
                blocks.push(ReportBlock::Image {
                    label: field.label.clone(),
                    kind: ImageKind::Photo,
                    source,
                });
                continue;
            }
        }

        let display = label_for_value(value, Some(field), catalogs.for_field(&field.name));
        entries.push((field.label.clone(), display));
    }
    flush(&mut entries, &mut blocks);
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::catalog::CatalogEntry;
    use crate::model::form::{FieldOption, FieldOptions};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn field(name: &str, label: &str, field_type: FieldType) -> Field {
        Field {
            name: name.to_string(),
            label: label.to_string(),
            field_type,
            ..Default::default()
        }
    }

    fn section(name: &str, fields: Vec<Field>) -> Section {
        Section {
            name: name.to_string(),
            fields,
            ..Default::default()
        }
    }

    fn ficha(datos: Value) -> Ficha {
        Ficha {
            id: Some(12),
            datos: datos.as_object().cloned().unwrap_or_default(),
            ..Default::default()
        }
    }

    #[test]
    fn header_defaults_and_geo_names() {
        let catalogs = GeoCatalogs {
            provinces: vec![CatalogEntry::new(17, "Pichincha")],
            ..Default::default()
        };
        let report = build_report(
            &Form::default(),
            &ficha(json!({"select_provincia": "17", "select_canton": "1701"})),
            &catalogs,
        );
        assert_eq!(report.ficha_id, "12");
        assert_eq!(report.familia, "Sin nombre");
        assert_eq!(report.risk_level, "No calculado");
        assert_eq!(report.risk_score, "Puntaje: 0");
        assert_eq!(report.georeference.rows, vec![vec!["Pichincha", "1701", "-"]]);
        assert_eq!(report.audit.rows[0], vec!["-", "-", "-", "-", "-"]);
    }

    #[test]
    fn key_values_use_option_labels_and_skip_geo_and_empty() {
        let mut sexo = field("sexo", "Sexo", FieldType::Select);
        sexo.options = Some(FieldOptions::List(vec![FieldOption {
            label: Some("Femenino".to_string()),
            value: Some(json!("F")),
            ..Default::default()
        }]));
        let form = Form {
            sections: vec![section(
                "Información General",
                vec![
                    sexo,
                    field("select_provincia", "Provincia", FieldType::Select),
                    field("vacio", "Vacío", FieldType::Text),
                    field("tiene_agua", "Agua", FieldType::Checkbox),
                ],
            )],
            ..Default::default()
        };
        let report = build_report(
            &form,
            &ficha(json!({"sexo": "F", "select_provincia": "17", "vacio": "", "tiene_agua": "1"})),
            &GeoCatalogs::default(),
        );
        assert_eq!(
            report.sections[0].blocks,
            vec![ReportBlock::KeyValues {
                entries: vec![
                    ("Sexo".to_string(), "Femenino".to_string()),
                    ("Agua".to_string(), "Sí".to_string()),
                ]
            }]
        );
    }

    #[test]
    fn members_print_as_cards_and_others_as_tables() {
        let form = Form {
            sections: vec![
                section("Fallecidos", vec![field("edad", "Edad", FieldType::Number)]),
                section("Familiares", vec![field("nombres", "Nombres", FieldType::Text)]),
                section("Problemas Ambientales", vec![]),
            ],
            ..Default::default()
        };
        let report = build_report(
            &form,
            &ficha(json!({
                "miembros_generales_data": [
                    {"id": 1, "nombres": "Ana", "apellidos": "Paz", "ocupacion": ""},
                    {"id": 2, "nombres": ""}
                ],
                "miembros_fallecidos_data": [{"nombres": "Juan", "edad": "70"}],
                "problemas_ambientales_data": []
            })),
            &GeoCatalogs::default(),
        );

        let titles: Vec<&str> = report.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["FAMILIARES", "FALLECIDOS", "PROBLEMAS AMBIENTALES"]);

        assert_eq!(
            report.sections[0].blocks,
            vec![ReportBlock::Cards {
                cards: vec![
                    Card {
                        title: "ANA PAZ".to_string(),
                        entries: vec![
                            ("Nombres".to_string(), "Ana".to_string()),
                            ("apellidos".to_string(), "Paz".to_string()),
                        ],
                    },
                    Card {
                        title: "MIEMBRO DEL HOGAR #2".to_string(),
                        entries: vec![],
                    },
                ]
            }]
        );
        assert_eq!(
            report.sections[1].blocks,
            vec![ReportBlock::Table(TableBlock {
                headers: vec!["nombres".to_string(), "Edad".to_string()],
                rows: vec![vec!["Juan".to_string(), "70".to_string()]],
            })]
        );
        assert_eq!(
            report.sections[2].blocks,
            vec![ReportBlock::Empty {
                message: EMPTY_ROWS.to_string()
            }]
        );
    }

    #[test]
    fn images_split_key_value_runs() {
        let long_signature = "A".repeat(120);
        let form = Form {
            sections: vec![section(
                "Responsable",
                vec![
                    field("nombre_responsable", "Nombre", FieldType::Text),
                    field("firma_responsable", "Firma", FieldType::Text),
                    field("img_vivienda", "Foto", FieldType::Text),
                    field("cargo", "Cargo", FieldType::Text),
                    field("firma", "Firma corta", FieldType::Signature),
                ],
            )],
            ..Default::default()
        };
        let report = build_report(
            &form,
            &ficha(json!({
                "nombre_responsable": "Rosa",
                "firma_responsable": format!("data:image/png;base64,{}", long_signature),
                "img_vivienda": "https://cdn.example.org/v.jpg?x=1",
                "cargo": "TAPS",
                "firma": "corta"
            })),
            &GeoCatalogs::default(),
        );
        assert_eq!(
            report.sections[0].blocks,
            vec![
                ReportBlock::KeyValues {
                    entries: vec![("Nombre".to_string(), "Rosa".to_string())]
                },
                ReportBlock::Image {
                    label: "Firma".to_string(),
                    kind: ImageKind::Signature,
                    source: ImageSource::Embedded(long_signature),
                },
                ReportBlock::Image {
                    label: "Foto".to_string(),
                    kind: ImageKind::Photo,
                    source: ImageSource::Remote("https://cdn.example.org/v.jpg?x=1".to_string()),
                },
                ReportBlock::KeyValues {
                    entries: vec![
                        ("Cargo".to_string(), "TAPS".to_string()),
                        ("Firma corta".to_string(), "corta".to_string()),
                    ]
                },
            ]
        );
    }
}
