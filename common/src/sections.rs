//! Maps a section's display name to the way it is stored and rendered.
//!
//! Classification is keyword based and runs on the case-folded,
//! accent-stripped name. Renaming a section in the form builder therefore
//! changes where its rows are stored; the keyword list below must stay as is
//! for existing records to keep loading.

use serde::{Deserialize, Serialize};

use crate::model::form::{Field, Section};

/// How a rule combines with the ones evaluated before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Precedence {
    /// Applies only if no earlier base rule matched.
    Base,
    /// Replaces whatever was chosen so far.
    Override,
}

struct Rule {
    keyword: &'static str,
    array_key: &'static str,
    precedence: Precedence,
}

const fn rule(keyword: &'static str, array_key: &'static str, precedence: Precedence) -> Rule {
    Rule {
        keyword,
        array_key,
        precedence,
    }
}

/// Evaluated top to bottom. The overrides come after the general `familiares`
/// rule so that "Familiares Especiales" and "Familiares Fallecidos" land in
/// their own arrays.
const RULES: [Rule; 7] = [
    rule("familiares", "miembros_generales_data", Precedence::Base),
    rule("especiales", "miembros_especiales_data", Precedence::Base),
    rule("fallecidos", "miembros_fallecidos_data", Precedence::Base),
    rule("ambiental", "problemas_ambientales_data", Precedence::Base),
    rule("tratamiento", "personas_lugares_tratamiento_data", Precedence::Base),
    rule("especiales", "miembros_especiales_data", Precedence::Override),
    rule("fallecidos", "miembros_fallecidos_data", Precedence::Override),
];

const RISK_KEYWORD: &str = "riesgo";
const GRID_KEYWORDS: [&str; 3] = ["general", "responsable", "llenado"];
const FULL_WIDTH_KEYWORDS: [&str; 2] = ["firma", "observacion"];

/// Keyword order used to arrange sections in the printed report. Unmatched
/// sections go last, keeping their schema order.
const REPORT_ORDER: [&str; 17] = [
    "codigo",
    "locali",
    "general",
    "datos_generales",
    "informacion_general",
    "miembros",
    "familiares",
    "especiales",
    "fallecidos",
    "tratamiento",
    "ambiental",
    "contaminacion",
    "familiograma",
    "vivienda",
    "ubicacion",
    "responsable",
    "firma",
];

/// Replaces accented Latin letters with their base letter.
pub fn fold_diacritics(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' | 'ã' => 'a',
            'Á' | 'À' | 'Ä' | 'Â' | 'Ã' => 'A',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'É' | 'È' | 'Ë' | 'Ê' => 'E',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'Í' | 'Ì' | 'Ï' | 'Î' => 'I',
            'ó' | 'ò' | 'ö' | 'ô' | 'õ' => 'o',
            'Ó' | 'Ò' | 'Ö' | 'Ô' | 'Õ' => 'O',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'Ú' | 'Ù' | 'Ü' | 'Û' => 'U',
            'ñ' => 'n',
            'Ñ' => 'N',
            'ç' => 'c',
            'Ç' => 'C',
            other => other,
        })
        .collect()
}

/// Lowercase, accent-free form used for every keyword test.
pub fn fold(input: &str) -> String {
    fold_diacritics(&input.to_lowercase())
}

/// `"Datos de Vivienda"` -> `"datos_de_vivienda"`.
pub fn normalize_section_key(name: &str) -> String {
    let mut key = String::with_capacity(name.len());
    let mut pending_separator = false;
    for c in fold(name).chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !key.is_empty() {
                key.push('_');
            }
            pending_separator = false;
            key.push(c);
        } else {
            pending_separator = true;
        }
    }
    key
}

/// Array key under which a section's rows are stored, if it holds rows.
pub fn classify(section_name: &str, is_template: bool) -> Option<String> {
    let name = fold(section_name);
    let mut chosen: Option<&'static str> = None;
    for rule in RULES.iter().filter(|r| name.contains(r.keyword)) {
        match rule.precedence {
            Precedence::Base if chosen.is_none() => chosen = Some(rule.array_key),
            Precedence::Base => {}
            Precedence::Override => chosen = Some(rule.array_key),
        }
    }

    match chosen {
        Some(key) => Some(key.to_string()),
        None if is_template => {
            let base = normalize_section_key(section_name);
            Some(format!("{}_data", base))
        }
        None => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    Table,
    Cards,
}

/// Household members render as cards; every other array section as a table.
pub fn render_mode(section_name: &str) -> RenderMode {
    let name = fold(section_name);
    if name.contains("familiares") && !name.contains("especiales") && !name.contains("fallecidos")
    {
        RenderMode::Cards
    } else {
        RenderMode::Table
    }
}

/// How a section is laid out in the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionLayout {
    /// Grouped risk panels with a live score.
    Risk,
    /// Rows stored under `key`.
    Array { key: String, mode: RenderMode },
    /// Plain field list, multi-column when `grid` is set.
    Fields { grid: bool },
}

pub fn is_risk_section(section_name: &str) -> bool {
    fold(section_name).contains(RISK_KEYWORD)
}

pub fn section_layout(section: &Section) -> SectionLayout {
    if is_risk_section(&section.name) {
        return SectionLayout::Risk;
    }
    if let Some(key) = classify(&section.name, section.is_template) {
        return SectionLayout::Array {
            key,
            mode: render_mode(&section.name),
        };
    }
    let name = fold(&section.name);
    SectionLayout::Fields {
        grid: GRID_KEYWORDS.iter().any(|k| name.contains(k)),
    }
}

/// Signature and observation fields span the whole row.
pub fn is_full_width(field: &Field) -> bool {
    FULL_WIDTH_KEYWORDS.iter().any(|k| field.name.contains(k))
}

fn report_rank(section: &Section) -> usize {
    let key = normalize_section_key(&section.name);
    REPORT_ORDER
        .iter()
        .position(|k| key.contains(k))
        .unwrap_or(REPORT_ORDER.len())
}

/// Sections in printing order. The sort is stable.
pub fn sort_sections_for_report(sections: &[Section]) -> Vec<&Section> {
    let mut sorted: Vec<&Section> = sections.iter().collect();
    sorted.sort_by_key(|s| report_rank(s));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str, is_template: bool) -> Section {
        Section {
            name: name.to_string(),
            is_template,
            ..Default::default()
        }
    }

    #[test]
    fn override_rules_beat_familiares() {
        assert_eq!(
            classify("Familiares Especiales", true).as_deref(),
            Some("miembros_especiales_data")
        );
        assert_eq!(
            classify("Familiares Fallecidos", false).as_deref(),
            Some("miembros_fallecidos_data")
        );
        assert_eq!(
            classify("Miembros Fallecidos", true).as_deref(),
            Some("miembros_fallecidos_data")
        );
        assert_eq!(
            classify("Datos Familiares", false).as_deref(),
            Some("miembros_generales_data")
        );
    }

    #[test]
    fn first_base_rule_wins_over_later_base_rules() {
        assert_eq!(
            classify("Tratamiento ambiental", false).as_deref(),
            Some("problemas_ambientales_data")
        );
        assert_eq!(
            classify("Lugares de TRATAMIENTO", false).as_deref(),
            Some("personas_lugares_tratamiento_data")
        );
    }

    #[test]
    fn template_sections_fall_back_to_a_derived_key() {
        assert_eq!(
            classify("Datos de Vivienda", true).as_deref(),
            Some("datos_de_vivienda_data")
        );
        assert_eq!(
            classify("  ¿Situación   Económica? ", true).as_deref(),
            Some("situacion_economica_data")
        );
        assert_eq!(classify("Datos de Vivienda", false), None);
    }

    #[test]
    fn matching_ignores_accents() {
        assert_eq!(
            classify("Problemática AMBIENTAL", false).as_deref(),
            Some("problemas_ambientales_data")
        );
        assert!(is_risk_section("Evaluación de Riesgo"));
    }

    #[test]
    fn render_modes() {
        assert_eq!(render_mode("Familiares"), RenderMode::Cards);
        assert_eq!(render_mode("Familiares Especiales"), RenderMode::Table);
        assert_eq!(render_mode("Miembros Fallecidos"), RenderMode::Table);
        assert_eq!(render_mode("Problemas ambientales"), RenderMode::Table);
    }

    #[test]
    fn risk_layout_takes_priority() {
        assert_eq!(
            section_layout(&named("Riesgos familiares", true)),
            SectionLayout::Risk
        );
        assert_eq!(
            section_layout(&named("Familiares", true)),
            SectionLayout::Array {
                key: "miembros_generales_data".to_string(),
                mode: RenderMode::Cards
            }
        );
        assert_eq!(
            section_layout(&named("Información General", false)),
            SectionLayout::Fields { grid: true }
        );
        assert_eq!(
            section_layout(&named("Vivienda", false)),
            SectionLayout::Fields { grid: false }
        );
    }

    #[test]
    fn full_width_fields() {
        let firma = Field {
            name: "firma_responsable".to_string(),
            ..Default::default()
        };
        let edad = Field {
            name: "edad".to_string(),
            ..Default::default()
        };
        assert!(is_full_width(&firma));
        assert!(!is_full_width(&edad));
    }

    #[test]
    fn report_order_follows_keywords() {
        let sections = vec![
            named("Firma del responsable", false),
            named("Vivienda", false),
            named("Otros", false),
            named("Información General", false),
            named("Código y Localización", false),
        ];
        let names: Vec<&str> = sort_sections_for_report(&sections)
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "Código y Localización",
                "Información General",
                "Vivienda",
                "Firma del responsable",
                "Otros"
            ]
        );
    }
}
