//! Renders one schema field with the widget [`widget_for`] selects.
//!
//! All writes go through `Msg::Edit`; dropdowns use `FormAction::UserSelect`
//! so a geographic parent clears its descendants.

use serde_json::Value;
use yew::html::Scope;
use yew::prelude::*;

use common::model::form::Field;
use common::options::{resolve, ResolvedOption};
use common::repeat::counter_columns;
use common::sections::render_mode;
use common::store::FormAction;
use common::validation::{is_cedula_field, is_valid_cedula};
use common::values::opt_value_to_string;
use common::widgets::{
    date_in_bounds, format_iso_date, format_long_es, is_truthy, min_date, parse_iso_date,
    signature_src, toggle_multi, toggle_value, widget_for, Widget,
};

use super::array_field::{self, ArraySpec};
use super::map_widget::map_widget;
use super::messages::Msg;
use super::state::FichaEditor;
use crate::components::helpers::{
    changed_checked, changed_value, input_value, selected_file, selected_value, show_toast,
    textarea_value, today,
};

fn set(name: &str, value: String) -> Msg {
    Msg::Edit(FormAction::Set {
        name: name.to_string(),
        value: Value::String(value),
    })
}

pub fn field_switch(component: &FichaEditor, link: &Scope<FichaEditor>, field: &Field) -> Html {
    let value = component.store.get(&field.name);
    let options = resolve(field, component.catalogs.for_field(&field.name));
    let raw = opt_value_to_string(value);

    let body = match widget_for(field, value, options) {
        Widget::Signature => signature(link, &raw),
        Widget::Map => map_widget(value),
        Widget::Array => array_field::view(
            component,
            link,
            ArraySpec {
                key: &field.name,
                label: &field.label,
                fields: &component.all_fields,
                mode: render_mode(&field.name),
            },
        ),
        Widget::Text => text_input(link, field, &raw, "text"),
        Widget::Number => text_input(link, field, &raw, "number"),
        Widget::TextArea => {
            let name = field.name.clone();
            html! {
                <textarea
                    value={raw.clone()}
                    rows="3"
                    oninput={link.callback(move |e: InputEvent| set(&name, textarea_value(&e)))}
                />
            }
        }
        Widget::Date => date_input(link, field, &raw),
        Widget::Select(options) => dropdown(link, field, &raw, &options),
        Widget::Radio(options) => radio_group(link, field, &raw, &options),
        Widget::CheckboxGroup(options) => checkbox_group(link, field, &raw, &options),
        Widget::Toggle => {
            let name = field.name.clone();
            html! {
                <input
                    type="checkbox"
                    checked={value.is_some_and(is_truthy)}
                    onchange={link.callback(move |e: Event| {
                        set(&name, toggle_value(changed_checked(&e)).to_string())
                    })}
                />
            }
        }
        Widget::Image => image_input(link, field, &raw),
    };

    html! {
        <div class="field">
            <label>
                { field.label.clone() }
                { if field.required { html! { <span class="required">{" *"}</span> } } else { html! {} } }
            </label>
            { body }
            { cedula_hint(field, &raw) }
            { counter_rows(component, link, field) }
        </div>
    }
}

fn text_input(link: &Scope<FichaEditor>, field: &Field, raw: &str, kind: &'static str) -> Html {
    let name = field.name.clone();
    html! {
        <input
            type={kind}
            value={raw.to_string()}
            oninput={link.callback(move |e: InputEvent| set(&name, input_value(&e)))}
        />
    }
}

fn date_input(link: &Scope<FichaEditor>, field: &Field, raw: &str) -> Html {
    let today = today();
    let parsed = parse_iso_date(raw);
    let shown = parsed.map(format_iso_date).unwrap_or_default();
    let name = field.name.clone();
    let onchange = link.batch_callback(move |e: Event| {
        let picked = changed_value(&e);
        if picked.is_empty() {
            return Some(set(&name, String::new()));
        }
        match parse_iso_date(&picked) {
            Some(date) if date_in_bounds(date, today) => Some(set(&name, format_iso_date(date))),
            _ => {
                show_toast("La fecha debe estar entre 1900-01-01 y hoy.");
                None
            }
        }
    });
    html! {
        <div class="date-field">
            <input
                type="date"
                value={shown}
                min={format_iso_date(min_date())}
                max={format_iso_date(today)}
                {onchange}
            />
            <span class="muted">
                { parsed.map(format_long_es).unwrap_or_else(|| "Seleccione una fecha".to_string()) }
            </span>
        </div>
    }
}

fn dropdown(link: &Scope<FichaEditor>, field: &Field, raw: &str, options: &[ResolvedOption]) -> Html {
    let name = field.name.clone();
    html! {
        <select
            onchange={link.callback(move |e: Event| {
                Msg::Edit(FormAction::UserSelect {
                    name: name.clone(),
                    value: selected_value(&e),
                })
            })}
        >
            <option value="" disabled=true selected={raw.is_empty()}>{"Seleccione..."}</option>
            { for options.iter().map(|opt| html! {
                <option value={opt.value.clone()} selected={opt.value == raw}>{ opt.label.clone() }</option>
            }) }
        </select>
    }
}

fn radio_group(link: &Scope<FichaEditor>, field: &Field, raw: &str, options: &[ResolvedOption]) -> Html {
    html! {
        <div class="radio-group">
            { for options.iter().map(|opt| {
                let name = field.name.clone();
                let value = opt.value.clone();
                html! {
                    <label class="choice">
                        <input
                            type="radio"
                            name={field.name.clone()}
                            checked={opt.value == raw}
                            onchange={link.callback(move |_| set(&name, value.clone()))}
                        />
                        { opt.label.clone() }
                    </label>
                }
            }) }
        </div>
    }
}

fn checkbox_group(
    link: &Scope<FichaEditor>,
    field: &Field,
    raw: &str,
    options: &[ResolvedOption],
) -> Html {
    let selected: Vec<&str> = common::widgets::split_multi(raw);
    html! {
        <div class="checkbox-group">
            { for options.iter().map(|opt| {
                let name = field.name.clone();
                let current = raw.to_string();
                let value = opt.value.clone();
                html! {
                    <label class="choice">
                        <input
                            type="checkbox"
                            checked={selected.contains(&opt.value.as_str())}
                            onchange={link.callback(move |e: Event| {
                                set(&name, toggle_multi(&current, &value, changed_checked(&e)))
                            })}
                        />
                        { opt.label.clone() }
                    </label>
                }
            }) }
        </div>
    }
}

fn signature(link: &Scope<FichaEditor>, raw: &str) -> Html {
    if raw.trim().is_empty() {
        return html! { <span class="muted">{"Sin firma registrada"}</span> };
    }
    let src = signature_src(raw);
    let zoom = src.clone();
    html! {
        <img
            class="signature-preview"
            src={src}
            alt="Firma"
            title="Ampliar"
            onclick={link.callback(move |_| Msg::ZoomSignature(zoom.clone()))}
        />
    }
}

fn image_input(link: &Scope<FichaEditor>, field: &Field, raw: &str) -> Html {
    let name = field.name.clone();
    if !raw.is_empty() {
        return html! {
            <div class="image-field">
                <img src={raw.to_string()} alt={field.label.clone()} />
                <button class="btn danger" onclick={link.callback(move |_| set(&name, String::new()))}>
                    {"Eliminar"}
                </button>
            </div>
        };
    }
    html! {
        <input
            type="file"
            accept="image/*"
            onchange={link.batch_callback(move |e: Event| {
                selected_file(&e).map(|file| Msg::ImageSelected { name: name.clone(), file })
            })}
        />
    }
}

fn cedula_hint(field: &Field, raw: &str) -> Html {
    if is_cedula_field(&field.name) && !raw.trim().is_empty() && !is_valid_cedula(raw) {
        html! { <span class="field-hint error">{"Cédula inválida"}</span> }
    } else {
        html! {}
    }
}

/// Rows of the template section a repeat counter points to.
fn counter_rows(component: &FichaEditor, link: &Scope<FichaEditor>, field: &Field) -> Html {
    if !field.is_repeat_counter() {
        return html! {};
    }
    let Some(section) = component
        .form
        .as_ref()
        .zip(field.linked_section_id)
        .and_then(|(form, id)| form.section_by_id(id))
    else {
        return html! {};
    };
    let key = field.repeat_data_key();
    let columns = counter_columns(&key, component.store.rows(&key), &section.fields);
    array_field::view_with_columns(
        component,
        link,
        ArraySpec {
            key: &key,
            label: &section.name,
            fields: &section.fields,
            mode: render_mode(&section.name),
        },
        columns,
    )
}
