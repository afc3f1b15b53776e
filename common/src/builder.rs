//! Editing state of the form builder.
//!
//! Forms, sections and fields are edited as drafts and only turn into API
//! bodies once they validate. Section reordering is computed here so the
//! frontend only has to send the resulting writes.

use serde_json::Value;
use thiserror::Error;

use crate::model::form::{Field, FieldOption, FieldOptions, FieldType, Section};
use crate::options::{parse_range, MAX_RANGE_OPTIONS};
use crate::requests::{NewForm, SectionWrite};
use crate::values::value_to_string;

/// `order_index` given to fields created from the builder; they land last.
pub const NEW_FIELD_ORDER: i64 = 999;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    #[error("El nombre del formulario es obligatorio")]
    MissingFormName,

    #[error("El nombre de la sección es obligatorio")]
    MissingSectionName,

    #[error("El nombre interno del campo es obligatorio")]
    MissingFieldName,

    #[error("La etiqueta del campo es obligatoria")]
    MissingFieldLabel,

    #[error("El mínimo ({min}) es mayor que el máximo ({max})")]
    InvertedRange { min: i64, max: i64 },

    #[error("El rango genera demasiadas opciones")]
    RangeTooLarge,

    #[error("La opción {0} necesita etiqueta y valor")]
    IncompleteOption(usize),
}

/// Spanish label shown in the type picker.
pub fn type_label(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Text => "Texto",
        FieldType::Number => "Número",
        FieldType::Date => "Fecha",
        FieldType::Select => "Selección (Dropdown)",
        FieldType::Radio => "Radio Button",
        FieldType::Checkbox => "Checkbox",
        FieldType::Textarea => "Área de texto",
        FieldType::Range => "Rango / Slider",
        FieldType::Signature => "Firma",
        FieldType::Gps => "GPS",
        FieldType::Image => "Imagen",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormDraft {
    pub name: String,
    pub description: String,
    pub version: String,
}

impl Default for FormDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            version: "1.0".to_string(),
        }
    }
}

impl FormDraft {
    pub fn validate(&self) -> Result<NewForm, BuilderError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(BuilderError::MissingFormName);
        }
        let version = match self.version.trim() {
            "" => "1.0",
            v => v,
        };
        Ok(NewForm {
            name: name.to_string(),
            description: self.description.trim().to_string(),
            version: version.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionDraft {
    /// `None` until the section exists on the server.
    pub id: Option<i64>,
    pub name: String,
    pub order_index: i64,
    pub is_template: bool,
}

impl SectionDraft {
    /// Blank section placed after every existing one.
    pub fn after(sections: &[Section]) -> Self {
        Self {
            order_index: next_section_order(sections),
            ..Default::default()
        }
    }

    pub fn from_section(section: &Section) -> Self {
        Self {
            id: section.id,
            name: section.name.clone(),
            order_index: section.order_index,
            is_template: section.is_template,
        }
    }

    pub fn validate(&self) -> Result<SectionWrite, BuilderError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(BuilderError::MissingSectionName);
        }
        Ok(SectionWrite {
            name: name.to_string(),
            order_index: self.order_index,
            is_template: self.is_template,
        })
    }
}

/// Where the options of a field come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceDraft {
    Static,
    Range { min: i64, max: i64 },
    /// Directive the builder does not edit, kept as found.
    Other(String),
}

impl SourceDraft {
    pub const DEFAULT_RANGE: SourceDraft = SourceDraft::Range { min: 0, max: 10 };

    pub fn parse(directive: Option<&str>) -> Self {
        let Some(directive) = directive.map(str::trim).filter(|d| !d.is_empty()) else {
            return SourceDraft::Static;
        };
        if directive.eq_ignore_ascii_case("static") {
            return SourceDraft::Static;
        }
        match directive.get(..6) {
            Some(prefix) if prefix.eq_ignore_ascii_case("range:") => {
                match parse_range(&directive[6..]) {
                    Some((min, max)) => SourceDraft::Range { min, max },
                    None => SourceDraft::Other(directive.to_string()),
                }
            }
            _ => SourceDraft::Other(directive.to_string()),
        }
    }

    /// Value stored in `dynamic_source`.
    pub fn directive(&self) -> String {
        match self {
            SourceDraft::Static => "static".to_string(),
            SourceDraft::Range { min, max } => format!("range:{}-{}", min, max),
            SourceDraft::Other(directive) => directive.clone(),
        }
    }

    pub fn is_range(&self) -> bool {
        matches!(self, SourceDraft::Range { .. })
    }

    fn validate(&self) -> Result<(), BuilderError> {
        match *self {
            SourceDraft::Range { min, max } if min > max => {
                Err(BuilderError::InvertedRange { min, max })
            }
            SourceDraft::Range { min, max }
                if max.checked_sub(min).is_none_or(|span| span >= MAX_RANGE_OPTIONS) =>
            {
                Err(BuilderError::RangeTooLarge)
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionDraft {
    pub label: String,
    pub value: String,
}

/// One change made in the field editor.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    Name(String),
    Label(String),
    Type(FieldType),
    Required(bool),
    StaticSource,
    RangeSource,
    RangeMin(i64),
    RangeMax(i64),
    LinkedSection(Option<i64>),
    AddOption,
    RemoveOption(usize),
    OptionLabel(usize, String),
    OptionValue(usize, String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDraft {
    pub id: Option<i64>,
    pub section_id: Option<i64>,
    pub name: String,
    pub label: String,
    pub field_type: FieldType,
    pub required: bool,
    pub order_index: i64,
    pub source: SourceDraft,
    pub options: Vec<OptionDraft>,
    pub linked_section_id: Option<i64>,
}

impl FieldDraft {
    pub fn new_in(section_id: i64) -> Self {
        Self {
            id: None,
            section_id: Some(section_id),
            name: String::new(),
            label: String::new(),
            field_type: FieldType::Text,
            required: false,
            order_index: NEW_FIELD_ORDER,
            source: SourceDraft::Static,
            options: Vec::new(),
            linked_section_id: None,
        }
    }

    pub fn from_field(field: &Field) -> Self {
        let options = field
            .inline_options()
            .iter()
            .map(|opt| OptionDraft {
                label: opt
                    .label
                    .clone()
                    .filter(|l| !l.is_empty())
                    .or_else(|| opt.name.clone())
                    .unwrap_or_default(),
                value: opt
                    .value
                    .as_ref()
                    .filter(|v| !v.is_null())
                    .or(opt.id.as_ref())
                    .map(value_to_string)
                    .unwrap_or_default(),
            })
            .collect();
        Self {
            id: field.id,
            section_id: field.section_id,
            name: field.name.clone(),
            label: field.label.clone(),
            field_type: field.field_type,
            required: field.required,
            order_index: field.order_index,
            source: SourceDraft::parse(field.option_directive()),
            options,
            linked_section_id: field.linked_section_id,
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    pub fn apply(&mut self, edit: FieldEdit) {
        match edit {
            FieldEdit::Name(name) => self.name = name,
            FieldEdit::Label(label) => self.label = label,
            FieldEdit::Type(field_type) => self.field_type = field_type,
            FieldEdit::Required(required) => self.required = required,
            FieldEdit::StaticSource => self.source = SourceDraft::Static,
            FieldEdit::RangeSource => {
                if !self.source.is_range() {
                    self.source = SourceDraft::DEFAULT_RANGE;
                }
            }
            FieldEdit::RangeMin(value) => {
                if let SourceDraft::Range { min, .. } = &mut self.source {
                    *min = value;
                }
            }
            FieldEdit::RangeMax(value) => {
                if let SourceDraft::Range { max, .. } = &mut self.source {
                    *max = value;
                }
            }
            FieldEdit::LinkedSection(section_id) => self.linked_section_id = section_id,
            FieldEdit::AddOption => self.options.push(OptionDraft::default()),
            FieldEdit::RemoveOption(index) => {
                if index < self.options.len() {
                    self.options.remove(index);
                }
            }
            FieldEdit::OptionLabel(index, label) => {
                if let Some(option) = self.options.get_mut(index) {
                    option.label = label;
                }
            }
            FieldEdit::OptionValue(index, value) => {
                if let Some(option) = self.options.get_mut(index) {
                    option.value = value;
                }
            }
        }
    }

    /// Field body for `POST /admin/sections/{id}/fields` or `PUT /admin/fields/{id}`.
    ///
    /// Inline options are only sent for select, radio and checkbox fields.
    pub fn validate(&self) -> Result<Field, BuilderError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(BuilderError::MissingFieldName);
        }
        let label = self.label.trim();
        if label.is_empty() {
            return Err(BuilderError::MissingFieldLabel);
        }
        self.source.validate()?;

        let options = if self.field_type.takes_inline_options() && !self.options.is_empty() {
            let mut list = Vec::with_capacity(self.options.len());
            for (index, option) in self.options.iter().enumerate() {
                let (label, value) = (option.label.trim(), option.value.trim());
                if label.is_empty() || value.is_empty() {
                    return Err(BuilderError::IncompleteOption(index + 1));
                }
                list.push(FieldOption {
                    label: Some(label.to_string()),
                    value: Some(Value::String(value.to_string())),
                    order_index: Some(index as i64 + 1),
                    ..Default::default()
                });
            }
            Some(FieldOptions::List(list))
        } else {
            None
        };

        Ok(Field {
            id: self.id,
            section_id: self.section_id,
            name: name.to_string(),
            label: label.to_string(),
            field_type: self.field_type,
            required: self.required,
            order_index: self.order_index,
            options,
            dynamic_source: Some(self.source.directive()),
            linked_section_id: self.linked_section_id,
        })
    }
}

/// Sections by `order_index`, ties broken by id.
pub fn ordered_sections(sections: &[Section]) -> Vec<&Section> {
    let mut ordered: Vec<&Section> = sections.iter().collect();
    ordered.sort_by_key(|s| (s.order_index, s.id));
    ordered
}

pub fn next_section_order(sections: &[Section]) -> i64 {
    sections
        .iter()
        .map(|s| s.order_index)
        .max()
        .map_or(1, |max| max.saturating_add(1))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Moves section `id` one slot and renumbers every section `1..=n`.
///
/// Returns the section writes to send, only for sections whose
/// `order_index` changed. Moving past either end returns nothing.
pub fn move_section(sections: &[Section], id: i64, direction: Direction) -> Vec<(i64, SectionWrite)> {
    let mut ordered: Vec<&Section> = ordered_sections(sections)
        .into_iter()
        .filter(|s| s.id.is_some())
        .collect();
    let Some(position) = ordered.iter().position(|s| s.id == Some(id)) else {
        return Vec::new();
    };
    let target = match direction {
        Direction::Up => position.checked_sub(1),
        Direction::Down => Some(position + 1).filter(|&t| t < ordered.len()),
    };
    let Some(target) = target else {
        return Vec::new();
    };
    ordered.swap(position, target);

    ordered
        .into_iter()
        .enumerate()
        .filter_map(|(index, section)| {
            let order_index = index as i64 + 1;
            let section_id = section.id?;
            (section.order_index != order_index).then(|| {
                (
                    section_id,
                    SectionWrite {
                        name: section.name.clone(),
                        order_index,
                        is_template: section.is_template,
                    },
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn section(id: i64, name: &str, order_index: i64) -> Section {
        Section {
            id: Some(id),
            name: name.to_string(),
            order_index,
            ..Default::default()
        }
    }

    #[test]
    fn new_fields_start_as_static_text_at_the_end() {
        let draft = FieldDraft::new_in(4);
        assert!(draft.is_new());
        assert_eq!(draft.section_id, Some(4));
        assert_eq!(draft.field_type, FieldType::Text);
        assert_eq!(draft.order_index, NEW_FIELD_ORDER);
        assert_eq!(draft.source, SourceDraft::Static);
    }

    #[test]
    fn form_needs_a_name_and_defaults_its_version() {
        assert_eq!(FormDraft::default().validate(), Err(BuilderError::MissingFormName));

        let draft = FormDraft {
            name: "  Ficha Familiar ".to_string(),
            description: String::new(),
            version: " ".to_string(),
        };
        let body = draft.validate().unwrap();
        assert_eq!(body.name, "Ficha Familiar");
        assert_eq!(body.version, "1.0");
    }

    #[test]
    fn blank_section_names_are_rejected() {
        let draft = SectionDraft {
            name: "   ".to_string(),
            ..Default::default()
        };
        assert_eq!(draft.validate(), Err(BuilderError::MissingSectionName));
    }

    #[test]
    fn new_sections_go_after_the_last_one() {
        let sections = vec![section(1, "A", 3), section(2, "B", 7)];
        assert_eq!(SectionDraft::after(&sections).order_index, 8);
        assert_eq!(SectionDraft::after(&[]).order_index, 1);
    }

    #[test]
    fn source_directives_are_recognised() {
        assert_eq!(SourceDraft::parse(None), SourceDraft::Static);
        assert_eq!(SourceDraft::parse(Some("static")), SourceDraft::Static);
        assert_eq!(
            SourceDraft::parse(Some("RANGE:1-5")),
            SourceDraft::Range { min: 1, max: 5 }
        );
        assert_eq!(
            SourceDraft::parse(Some("catalog:provincias")),
            SourceDraft::Other("catalog:provincias".to_string())
        );
        assert_eq!(SourceDraft::Range { min: -2, max: 3 }.directive(), "range:-2-3");
    }

    #[test]
    fn switching_to_range_starts_at_zero_to_ten_and_keeps_edits() {
        let mut draft = FieldDraft::new_in(1);
        draft.apply(FieldEdit::RangeSource);
        assert_eq!(draft.source, SourceDraft::Range { min: 0, max: 10 });

        draft.apply(FieldEdit::RangeMax(15));
        draft.apply(FieldEdit::RangeSource);
        assert_eq!(draft.source, SourceDraft::Range { min: 0, max: 15 });

        draft.apply(FieldEdit::StaticSource);
        draft.apply(FieldEdit::RangeMin(4));
        assert_eq!(draft.source, SourceDraft::Static);
    }

    #[test]
    fn ranges_must_be_ordered_and_bounded() {
        let mut draft = FieldDraft::new_in(1);
        draft.apply(FieldEdit::Name("edad".to_string()));
        draft.apply(FieldEdit::Label("Edad".to_string()));
        draft.apply(FieldEdit::RangeSource);
        draft.apply(FieldEdit::RangeMin(20));
        assert_eq!(
            draft.validate(),
            Err(BuilderError::InvertedRange { min: 20, max: 10 })
        );

        draft.apply(FieldEdit::RangeMin(0));
        draft.apply(FieldEdit::RangeMax(MAX_RANGE_OPTIONS));
        assert_eq!(draft.validate(), Err(BuilderError::RangeTooLarge));

        draft.apply(FieldEdit::RangeMax(120));
        let field = draft.validate().unwrap();
        assert_eq!(field.dynamic_source.as_deref(), Some("range:0-120"));
    }

    #[test]
    fn options_are_sent_only_for_choice_types() {
        let mut draft = FieldDraft::new_in(1);
        draft.apply(FieldEdit::Name("agua".to_string()));
        draft.apply(FieldEdit::Label("Fuente de agua".to_string()));
        draft.apply(FieldEdit::AddOption);
        draft.apply(FieldEdit::OptionLabel(0, "Red pública".to_string()));
        draft.apply(FieldEdit::OptionValue(0, "red".to_string()));

        assert_eq!(draft.validate().unwrap().options, None);

        draft.apply(FieldEdit::Type(FieldType::Radio));
        let field = draft.validate().unwrap();
        assert_eq!(field.inline_options().len(), 1);
        assert_eq!(field.inline_options()[0].label.as_deref(), Some("Red pública"));
        assert_eq!(field.inline_options()[0].value, Some(json!("red")));

        draft.apply(FieldEdit::AddOption);
        assert_eq!(draft.validate(), Err(BuilderError::IncompleteOption(2)));
        draft.apply(FieldEdit::RemoveOption(1));
        draft.apply(FieldEdit::RemoveOption(7));
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn editing_an_existing_field_keeps_its_identity() {
        let field: Field = serde_json::from_value(json!({
            "id": "12",
            "section_id": 3,
            "name": "sexo",
            "label": "Sexo",
            "type": "select",
            "required": 1,
            "order_index": 2,
            "options": [{"name": "Mujer", "id": 1}, {"label": "Hombre", "value": "2"}],
            "linked_section_id": null
        }))
        .unwrap();

        let draft = FieldDraft::from_field(&field);
        assert!(!draft.is_new());
        assert_eq!(
            draft.options,
            vec![
                OptionDraft { label: "Mujer".to_string(), value: "1".to_string() },
                OptionDraft { label: "Hombre".to_string(), value: "2".to_string() },
            ]
        );

        let saved = draft.validate().unwrap();
        assert_eq!(saved.id, Some(12));
        assert_eq!(saved.section_id, Some(3));
        assert!(saved.required);
        assert_eq!(saved.order_index, 2);
        assert_eq!(saved.dynamic_source.as_deref(), Some("static"));
    }

    #[test]
    fn counter_fields_keep_their_linked_section() {
        let mut draft = FieldDraft::new_in(1);
        draft.apply(FieldEdit::Name("numero_miembros".to_string()));
        draft.apply(FieldEdit::Label("Número de miembros".to_string()));
        draft.apply(FieldEdit::Type(FieldType::Range));
        draft.apply(FieldEdit::RangeSource);
        draft.apply(FieldEdit::LinkedSection(Some(9)));

        let field = draft.validate().unwrap();
        assert!(field.is_repeat_counter());
        assert_eq!(field.repeat_data_key(), "numero_miembros_data");
    }

    #[test]
    fn moving_a_section_renumbers_only_what_changed() {
        let sections = vec![section(1, "A", 1), section(2, "B", 2), section(3, "C", 3)];

        let writes = move_section(&sections, 3, Direction::Up);
        let orders: Vec<(i64, i64)> = writes.iter().map(|(id, w)| (*id, w.order_index)).collect();
        assert_eq!(orders, vec![(3, 2), (2, 3)]);
        assert_eq!(writes[0].1.name, "C");

        assert!(move_section(&sections, 1, Direction::Up).is_empty());
        assert!(move_section(&sections, 3, Direction::Down).is_empty());
        assert!(move_section(&sections, 42, Direction::Down).is_empty());
    }

    #[test]
    fn moving_normalises_gapped_orders() {
        let sections = vec![section(7, "B", 20), section(5, "A", 10)];
        let writes = move_section(&sections, 5, Direction::Down);
        let orders: Vec<(i64, i64)> = writes.iter().map(|(id, w)| (*id, w.order_index)).collect();
        assert_eq!(orders, vec![(7, 1), (5, 2)]);
    }

    #[test]
    fn every_type_has_a_label() {
        for field_type in FieldType::ALL {
            assert!(!type_label(field_type).is_empty());
        }
        assert_eq!(type_label(FieldType::Range), "Rango / Slider");
    }
}
