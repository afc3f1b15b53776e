//! Field editor sheet. Shows the option list only for select, radio and
//! checkbox fields, and the min/max inputs only for a range source.

use yew::html::Scope;
use yew::prelude::*;

use common::builder::{ordered_sections, type_label, FieldDraft, FieldEdit, SourceDraft};
use common::model::form::{FieldType, Section};

use crate::components::form_builder::{FormBuilder, Msg};
use crate::components::helpers::{changed_checked, changed_value, input_value, selected_value};
use crate::tops_sheet::top_sheet::TopSheet;

fn edit(f: impl Fn(String) -> FieldEdit + 'static) -> impl Fn(InputEvent) -> Msg + 'static {
    move |e: InputEvent| Msg::EditDraft(f(input_value(&e)))
}

pub fn field_dialog(component: &FormBuilder, link: &Scope<FormBuilder>) -> Html {
    let body = match &component.field_draft {
        Some(draft) => {
            let sections = component
                .form
                .as_ref()
                .map(|f| ordered_sections(&f.sections))
                .unwrap_or_default();
            editor_body(draft, &sections, component.saving, link)
        }
        None => html! {},
    };

    html! {
        <TopSheet node_ref={component.field_dialog_ref.clone()}>
            <div class="sheet-backdrop">
                <div class="confirm-card editor-card">
                    { body }
                </div>
            </div>
        </TopSheet>
    }
}

fn editor_body(draft: &FieldDraft, sections: &[&Section], saving: bool, link: &Scope<FormBuilder>) -> Html {
    let title = if draft.is_new() { "Nuevo Campo" } else { "Editar Campo" };
    let current_type = draft.field_type;

    html! {
        <>
            <h3>{ title }</h3>
            <div class="field">
                <label>{"Etiqueta"}</label>
                <input type="text" value={draft.label.clone()} oninput={link.callback(edit(FieldEdit::Label))} />
            </div>
            <div class="field">
                <label>{"Nombre interno"}</label>
                <input type="text" value={draft.name.clone()} oninput={link.callback(edit(FieldEdit::Name))} />
            </div>
            <div class="field">
                <label>{"Tipo"}</label>
                <select
                    onchange={link.batch_callback(|e: Event| {
                        let value = selected_value(&e);
                        FieldType::ALL
                            .into_iter()
                            .find(|t| t.as_str() == value)
                            .map(|t| Msg::EditDraft(FieldEdit::Type(t)))
                    })}
                >
                    { for FieldType::ALL.into_iter().map(|t| html! {
                        <option value={t.as_str()} selected={t == current_type}>{ type_label(t) }</option>
                    }) }
                </select>
            </div>
            { source_inputs(&draft.source, link) }
            <div class="field">
                <label>{"Sección vinculada"}</label>
                <select
                    onchange={link.callback(|e: Event| {
                        Msg::EditDraft(FieldEdit::LinkedSection(selected_value(&e).parse::<i64>().ok()))
                    })}
                >
                    <option value="" selected={draft.linked_section_id.is_none()}>{"-- Ninguna --"}</option>
                    { for sections.iter().filter_map(|s| s.id.map(|id| (id, s))).map(|(id, s)| html! {
                        <option value={id.to_string()} selected={draft.linked_section_id == Some(id)}>
                            { format!("{} (Orden: {})", s.name, s.order_index) }
                        </option>
                    }) }
                </select>
            </div>
            <label class="switch-row">
                <input
                    type="checkbox"
                    checked={draft.required}
                    onchange={link.callback(|e: Event| Msg::EditDraft(FieldEdit::Required(changed_checked(&e))))}
                />
                {"Requerido"}
            </label>
            if current_type.takes_inline_options() {
                { options_list(draft, link) }
            }
            <div class="confirm-actions">
                <button class="btn outline" onclick={link.callback(|_| Msg::CloseField)}>{"Cancelar"}</button>
                <button class="btn primary" disabled={saving} onclick={link.callback(|_| Msg::SaveField)}>
                    {"Guardar"}
                </button>
            </div>
        </>
    }
}

fn source_inputs(source: &SourceDraft, link: &Scope<FormBuilder>) -> Html {
    let range = match source {
        SourceDraft::Range { min, max } => {
            let bound = |label: &'static str, value: i64, make: fn(i64) -> FieldEdit| html! {
                <div class="field">
                    <label>{ label }</label>
                    <input
                        type="number"
                        value={value.to_string()}
                        onchange={link.batch_callback(move |e: Event| {
                            changed_value(&e).trim().parse::<i64>().ok().map(|n| Msg::EditDraft(make(n)))
                        })}
                    />
                </div>
            };
            html! {
                <div class="range-inputs">
                    { bound("Mínimo", *min, FieldEdit::RangeMin) }
                    { bound("Máximo", *max, FieldEdit::RangeMax) }
                </div>
            }
        }
        SourceDraft::Other(directive) => html! {
            <p class="muted">{ format!("Origen actual: {}", directive) }</p>
        },
        SourceDraft::Static => html! {},
    };

    html! {
        <div class="field">
            <label>{"Origen de opciones"}</label>
            <div class="switch-row">
                <label>
                    <input
                        type="radio"
                        name="option-source"
                        checked={*source == SourceDraft::Static}
                        onchange={link.callback(|_| Msg::EditDraft(FieldEdit::StaticSource))}
                    />
                    {"Estático"}
                </label>
                <label>
                    <input
                        type="radio"
                        name="option-source"
                        checked={source.is_range()}
                        onchange={link.callback(|_| Msg::EditDraft(FieldEdit::RangeSource))}
                    />
                    {"Rango Numérico"}
                </label>
            </div>
            { range }
        </div>
    }
}

fn options_list(draft: &FieldDraft, link: &Scope<FormBuilder>) -> Html {
    html! {
        <div class="field">
            <label>{"Opciones"}</label>
            { for draft.options.iter().enumerate().map(|(index, option)| html! {
                <div class="option-row">
                    <input
                        type="text"
                        placeholder="Etiqueta"
                        value={option.label.clone()}
                        oninput={link.callback(edit(move |v| FieldEdit::OptionLabel(index, v)))}
                    />
                    <input
                        type="text"
                        placeholder="Valor"
                        value={option.value.clone()}
                        oninput={link.callback(edit(move |v| FieldEdit::OptionValue(index, v)))}
                    />
                    <button
                        class="icon-btn danger"
                        title="Quitar opción"
                        onclick={link.callback(move |_| Msg::EditDraft(FieldEdit::RemoveOption(index)))}
                    >
                        {"✕"}
                    </button>
                </div>
            }) }
            <button class="btn outline" onclick={link.callback(|_| Msg::EditDraft(FieldEdit::AddOption))}>
                {"+ Agregar"}
            </button>
        </div>
    }
}
