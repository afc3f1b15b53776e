//! Risk assessment panel: field grouping and the live score shown while editing.
//!
//! The score here is only a preview. The textual risk level displayed next to
//! it comes from the record's `risk_level`, which the backend recomputes on
//! save, so both can disagree until the next save.

use serde::{Deserialize, Serialize};

use crate::model::form::Field;
use crate::sections::fold;
use crate::values::{FichaData, int_value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RiskGroup {
    /// Assessment date and responsible person; not scored.
    Header,
    Biological,
    Sanitation,
    Socioeconomic,
    Other,
}

impl RiskGroup {
    pub const ALL: [RiskGroup; 5] = [
        RiskGroup::Header,
        RiskGroup::Biological,
        RiskGroup::Sanitation,
        RiskGroup::Socioeconomic,
        RiskGroup::Other,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            RiskGroup::Header => "Datos de la evaluación",
            RiskGroup::Biological => "A. Riesgos biológicos",
            RiskGroup::Sanitation => "B. Riesgos sanitarios",
            RiskGroup::Socioeconomic => "C. Riesgos socioeconómicos",
            RiskGroup::Other => "Otros",
        }
    }

    pub fn of(field: &Field) -> RiskGroup {
        let label = fold(field.label.trim());
        let name = fold(&field.name);
        let mentions = |keywords: &[&str]| {
            keywords
                .iter()
                .any(|k| label.contains(k) || name.contains(k))
        };

        if mentions(&["fecha", "responsable"]) {
            RiskGroup::Header
        } else if label.starts_with("a.") || mentions(&["biologic"]) {
            RiskGroup::Biological
        } else if label.starts_with("b.") || mentions(&["sanit", "saneamiento"]) {
            RiskGroup::Sanitation
        } else if label.starts_with("c.") || mentions(&["socio", "economic"]) {
            RiskGroup::Socioeconomic
        } else {
            RiskGroup::Other
        }
    }
}

/// Fields of a risk section split into their panels, in declaration order.
/// Empty groups are left out.
pub fn group_fields(fields: &[Field]) -> Vec<(RiskGroup, Vec<&Field>)> {
    RiskGroup::ALL
        .iter()
        .map(|group| {
            let members: Vec<&Field> = fields
                .iter()
                .filter(|f| RiskGroup::of(f) == *group)
                .collect();
            (*group, members)
        })
        .filter(|(_, members)| !members.is_empty())
        .collect()
}

/// Sum of the integer values of every scored field. Unreadable values add 0
/// and the sum saturates instead of overflowing.
pub fn live_score(fields: &[Field], data: &FichaData) -> i64 {
    fields
        .iter()
        .filter(|f| RiskGroup::of(f) != RiskGroup::Header)
        .map(|f| int_value(data.get(&f.name)))
        .fold(0i64, |acc, v| acc.saturating_add(v))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    None,
    Low,
    Medium,
    High,
}

impl RiskBand {
    pub fn from_score(score: i64) -> RiskBand {
        match score {
            i64::MIN..=0 => RiskBand::None,
            1..=14 => RiskBand::Low,
            15..=34 => RiskBand::Medium,
            _ => RiskBand::High,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            RiskBand::None => "green",
            RiskBand::Low => "yellow",
            RiskBand::Medium => "orange",
            RiskBand::High => "red",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field(name: &str, label: &str) -> Field {
        Field {
            name: name.to_string(),
            label: label.to_string(),
            ..Default::default()
        }
    }

    fn fields() -> Vec<Field> {
        vec![
            field("fecha_evaluacion", "Fecha de evaluación"),
            field("responsable_eval", "Responsable"),
            field("r1", "A. Vectores"),
            field("riesgo_biologico_2", "Exposición a animales"),
            field("r3", "B. Agua segura"),
            field("excretas", "Saneamiento básico"),
            field("r5", "C. Desempleo"),
            field("ingresos", "Situación socioeconómica"),
            field("otro", "Violencia"),
        ]
    }

    #[test]
    fn fields_are_partitioned_by_prefix_and_keyword() {
        let fields = fields();
        let groups = group_fields(&fields);
        let shape: Vec<(RiskGroup, usize)> =
            groups.iter().map(|(g, members)| (*g, members.len())).collect();
        assert_eq!(
            shape,
            vec![
                (RiskGroup::Header, 2),
                (RiskGroup::Biological, 2),
                (RiskGroup::Sanitation, 2),
                (RiskGroup::Socioeconomic, 2),
                (RiskGroup::Other, 1),
            ]
        );
    }

    #[test]
    fn live_score_skips_header_and_garbage() {
        let data = json!({
            "fecha_evaluacion": "2026",
            "r1": "3",
            "riesgo_biologico_2": 4,
            "r3": "2 puntos",
            "excretas": "n/a",
            "otro": 6
        });
        let score = live_score(&fields(), data.as_object().unwrap());
        assert_eq!(score, 15);
        assert_eq!(RiskBand::from_score(score), RiskBand::Medium);
    }

    #[test]
    fn huge_values_saturate_the_score() {
        let data = json!({ "r1": 1e30, "r3": "5", "otro": "99999999999999999999" });
        let score = live_score(&fields(), data.as_object().unwrap());
        assert_eq!(score, i64::MAX);
        assert_eq!(RiskBand::from_score(score), RiskBand::High);
    }

    #[test]
    fn bands() {
        assert_eq!(RiskBand::from_score(0), RiskBand::None);
        assert_eq!(RiskBand::from_score(1), RiskBand::Low);
        assert_eq!(RiskBand::from_score(14), RiskBand::Low);
        assert_eq!(RiskBand::from_score(34), RiskBand::Medium);
        assert_eq!(RiskBand::from_score(35), RiskBand::High);
        assert_eq!(RiskBand::High.color(), "red");
    }
}
