//! Client-side completeness scoring of a ficha against its form schema.
//!
//! Only non-template sections are walked at the top level. Template sections
//! contribute through the repeat counters that link to them: for every filled
//! counter with a positive value, each row stored under `<counter>_data` is
//! scored against the template's fields. A template whose counter is zero,
//! missing or unlinked contributes nothing.
//!
//! Required fields weigh 70% and optional fields 30% when both exist; with no
//! optional fields the required ratio is the whole score.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::form::{Field, Form, Section};
use crate::values::{FichaData, is_filled, numeric_value};

pub const MISSING_REQUIRED: &str = "Missing Required Field";
pub const FAIL: &str = "FAIL";
pub const INVALID_SCHEMA: &str = "Invalid Schema";

const REQUIRED_WEIGHT: f64 = 70.0;
const OPTIONAL_WEIGHT: f64 = 30.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityAnalysis {
    pub score: u8,
    pub report: QualityReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QualityReport {
    Invalid {
        status: String,
    },
    Scored {
        total_fields: usize,
        missing_required: usize,
        metrics: QualityMetrics,
        details: Vec<Finding>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub completeness_required: f64,
    pub completeness_optional: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub field: String,
    pub issue: String,
    pub status: String,
}

impl QualityAnalysis {
    fn invalid() -> Self {
        Self {
            score: 0,
            report: QualityReport::Invalid {
                status: INVALID_SCHEMA.to_string(),
            },
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self.report, QualityReport::Scored { .. })
    }

    pub fn findings(&self) -> &[Finding] {
        match &self.report {
            QualityReport::Scored { details, .. } => details,
            QualityReport::Invalid { .. } => &[],
        }
    }
}

/// Scores raw schema JSON, which may be a form object or an array wrapping one.
pub fn analyze_value(schema: &Value, data: &FichaData) -> QualityAnalysis {
    match Form::from_value(schema) {
        Ok(form) => analyze(&form, data),
        Err(e) => {
            log::debug!("Quality analysis skipped: {}", e);
            QualityAnalysis::invalid()
        }
    }
}

pub fn analyze(form: &Form, data: &FichaData) -> QualityAnalysis {
    let mut tally = Tally::default();
    for section in form.sections.iter().filter(|s| !s.is_template) {
        tally.walk(&form.sections, &section.fields, data);
    }
    tally.finish()
}

#[derive(Default)]
struct Tally {
    total_required: usize,
    filled_required: usize,
    total_optional: usize,
    filled_optional: usize,
    details: Vec<Finding>,
}

impl Tally {
    fn walk(&mut self, sections: &[Section], fields: &[Field], data: &FichaData) {
        for field in fields {
            let value = data.get(&field.name);
            let filled = is_filled(value);

            // Counters are never tallied themselves, even when required: a ficha
            // with jefe_hogar and direccion filled, numero_miembros = 1 and one
            // member row with empty nombres scores 67, not 75.
            if field.is_repeat_counter() {
                if filled && numeric_value(value).is_some_and(|n| n > 0.0) {
                    self.expand_rows(sections, field, data);
                }
                continue;
            }

            if field.required {
                self.total_required += 1;
                if filled {
                    self.filled_required += 1;
                } else {
                    self.details.push(Finding {
                        field: field.name.clone(),
                        issue: MISSING_REQUIRED.to_string(),
                        status: FAIL.to_string(),
                    });
                }
            } else {
                self.total_optional += 1;
                if filled {
                    self.filled_optional += 1;
                }
            }
        }
    }

    fn expand_rows(&mut self, sections: &[Section], counter: &Field, data: &FichaData) {
        let Some(Value::Array(rows)) = data.get(&counter.repeat_data_key()) else {
            return;
        };
        let Some(template) = counter
            .linked_section_id
            .and_then(|id| sections.iter().find(|s| s.id == Some(id)))
        else {
            return;
        };
        let empty = FichaData::new();
        for row in rows {
            let row = row.as_object().unwrap_or(&empty);
            self.walk(sections, &template.fields, row);
        }
    }

    fn finish(self) -> QualityAnalysis {
        let completeness_required = if self.total_required > 0 {
            self.filled_required as f64 / self.total_required as f64
        } else {
            1.0
        };
        let completeness_optional = if self.total_optional > 0 {
            self.filled_optional as f64 / self.total_optional as f64
        } else {
            0.0
        };
        let score = if self.total_optional == 0 {
            completeness_required * 100.0
        } else {
            completeness_required * REQUIRED_WEIGHT + completeness_optional * OPTIONAL_WEIGHT
        };

        QualityAnalysis {
            score: score.round().clamp(0.0, 100.0) as u8,
            report: QualityReport::Scored {
                total_fields: self.total_required + self.total_optional,
                missing_required: self.total_required - self.filled_required,
                metrics: QualityMetrics {
                    completeness_required,
                    completeness_optional,
                },
                details: self.details,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::form::FieldType;
    use proptest::prelude::*;
    use serde_json::json;

    fn field(name: &str, required: bool) -> Field {
        Field {
            name: name.to_string(),
            label: name.to_string(),
            required,
            ..Default::default()
        }
    }

    fn section(id: i64, name: &str, is_template: bool, fields: Vec<Field>) -> Section {
        Section {
            id: Some(id),
            name: name.to_string(),
            is_template,
            fields,
            ..Default::default()
        }
    }

    fn data(value: Value) -> FichaData {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn all_required_three_of_four_scores_75() {
        let form = Form {
            sections: vec![section(
                1,
                "General",
                false,
                ["a", "b", "c", "d"].iter().map(|n| field(n, true)).collect(),
            )],
            ..Default::default()
        };
        let analysis = analyze(&form, &data(json!({"a": "x", "b": 0, "c": ["y"], "d": "  "})));

        assert_eq!(analysis.score, 75);
        assert_eq!(
            analysis.findings(),
            &[Finding {
                field: "d".to_string(),
                issue: MISSING_REQUIRED.to_string(),
                status: FAIL.to_string(),
            }]
        );
    }

    #[test]
    fn mixed_required_and_optional_scores_78() {
        let form = Form {
            sections: vec![section(
                1,
                "General",
                false,
                vec![
                    field("r1", true),
                    field("r2", true),
                    field("o1", false),
                    field("o2", false),
                    field("o3", false),
                    field("o4", false),
                ],
            )],
            ..Default::default()
        };
        let analysis = analyze(&form, &data(json!({"r1": "a", "r2": "b", "o3": "c"})));

        assert_eq!(analysis.score, 78);
        match analysis.report {
            QualityReport::Scored {
                total_fields,
                missing_required,
                metrics,
                ..
            } => {
                assert_eq!(total_fields, 6);
                assert_eq!(missing_required, 0);
                assert_eq!(metrics.completeness_required, 1.0);
                assert_eq!(metrics.completeness_optional, 0.25);
            }
            other => panic!("unexpected report {:?}", other),
        }
    }

    #[test]
    fn linked_template_rows_are_expanded() {
        let counter = Field {
            name: "numero_miembros".to_string(),
            field_type: FieldType::Range,
            linked_section_id: Some(2),
            ..Default::default()
        };
        let form = Form {
            sections: vec![
                section(1, "General", false, vec![counter]),
                section(
                    2,
                    "Miembros",
                    true,
                    vec![field("nombres", true), field("cedula", true)],
                ),
            ],
            ..Default::default()
        };
        let record = data(json!({
            "numero_miembros": 2,
            "numero_miembros_data": [
                {"nombres": "Ana", "cedula": "1710034065"},
                {"nombres": "Luis", "cedula": "0926687856"}
            ]
        }));

        let analysis = analyze(&form, &record);
        match analysis.report {
            QualityReport::Scored { total_fields, .. } => assert_eq!(total_fields, 4),
            other => panic!("unexpected report {:?}", other),
        }
        assert_eq!(analysis.score, 100);
    }

    #[test]
    fn zero_or_missing_counter_ignores_rows() {
        let counter = Field {
            name: "n".to_string(),
            field_type: FieldType::Range,
            linked_section_id: Some(2),
            ..Default::default()
        };
        let form = Form {
            sections: vec![
                section(1, "General", false, vec![counter, field("a", true)]),
                section(2, "Filas", true, vec![field("x", true)]),
            ],
            ..Default::default()
        };
        for record in [
            json!({"a": "1", "n": 0, "n_data": [{"x": ""}]}),
            json!({"a": "1", "n_data": [{"x": ""}]}),
            json!({"a": "1", "n": "2", "n_data": []}),
        ] {
            assert_eq!(analyze(&form, &data(record)).score, 100);
        }
        // Numeric strings count as positive counters.
        let analysis = analyze(&form, &data(json!({"a": "1", "n": "1", "n_data": [{"x": ""}]})));
        assert_eq!(analysis.score, 50);
    }

    #[test]
    fn missing_sections_fail_closed() {
        let analysis = analyze_value(&json!({"name": "roto"}), &FichaData::new());
        assert_eq!(analysis.score, 0);
        assert!(!analysis.is_valid());
        assert_eq!(
            serde_json::to_value(&analysis.report).unwrap(),
            json!({"status": "Invalid Schema"})
        );
    }

    #[test]
    fn null_labels_and_types_still_score() {
        let schema = json!({
            "sections": [{"id": 1, "name": "G", "fields": [
                {"name": "a", "label": null, "type": null, "required": true},
                {"name": "b", "label": "B", "type": "telefono"}
            ]}]
        });
        let analysis = analyze_value(&schema, &data(json!({"a": "si"})));
        assert!(analysis.is_valid());
        assert_eq!(analysis.score, 70);
    }

    #[test]
    fn wrapped_schema_is_accepted() {
        let schema = json!([{
            "sections": [{"id": 1, "name": "G", "fields": [{"name": "a", "required": "1"}]}]
        }]);
        let analysis = analyze_value(&schema, &data(json!({"a": "si"})));
        assert!(analysis.is_valid());
        assert_eq!(analysis.score, 100);
    }

    proptest! {
        #[test]
        fn score_stays_within_bounds(
            flags in proptest::collection::vec((any::<bool>(), any::<bool>()), 0..12)
        ) {
            let fields = flags
                .iter()
                .enumerate()
                .map(|(i, (required, _))| field(&format!("f{}", i), *required))
                .collect();
            let mut record = FichaData::new();
            for (i, (_, filled)) in flags.iter().enumerate() {
                if *filled {
                    record.insert(format!("f{}", i), json!("x"));
                }
            }
            let form = Form { sections: vec![section(1, "G", false, fields)], ..Default::default() };
            let analysis = analyze(&form, &record);
            prop_assert!(analysis.score <= 100);
            prop_assert_eq!(analysis, analyze(&form, &record));
        }
    }
}
