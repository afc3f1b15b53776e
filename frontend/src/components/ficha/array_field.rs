//! Repeatable rows stored under one key, shown as an editable table or as one
//! card per row. Adding and removing rows goes through the confirmation dialog.

use serde_json::Value;
use yew::html::Scope;
use yew::prelude::*;

use common::model::form::Field;
use common::repeat::{
    card_title, cell_widget, column_label, find_column_field, infer_columns, table_title, CellWidget,
};
use common::sections::RenderMode;
use common::store::FormAction;
use common::values::opt_value_to_string;
use common::widgets::{date_in_bounds, format_iso_date, min_date, parse_iso_date};

use super::chip_select::ChipSelect;
use super::messages::Msg;
use super::state::{FichaEditor, RowRequest};
use crate::components::helpers::{changed_value, input_value, selected_value, show_toast, today};

pub struct ArraySpec<'a> {
    pub key: &'a str,
    pub label: &'a str,
    /// Schema fields describing the columns, when the section declares them.
    pub fields: &'a [Field],
    pub mode: RenderMode,
}

pub fn view(component: &FichaEditor, link: &Scope<FichaEditor>, spec: ArraySpec) -> Html {
    let columns = infer_columns(spec.key, component.store.rows(spec.key));
    view_with_columns(component, link, spec, columns)
}

pub fn view_with_columns(
    component: &FichaEditor,
    link: &Scope<FichaEditor>,
    spec: ArraySpec,
    columns: Vec<String>,
) -> Html {
    let rows = component.store.rows(spec.key);
    let title = if spec.label.trim().is_empty() {
        table_title(spec.key)
    } else {
        spec.label.to_string()
    };
    let append = {
        let key = spec.key.to_string();
        let columns = columns.clone();
        link.callback(move |_| {
            Msg::RequestRow(RowRequest::Append {
                key: key.clone(),
                columns: columns.clone(),
            })
        })
    };

    let body = if rows.is_empty() {
        html! { <p class="muted">{"No hay registros. Use \"Agregar\" para crear uno."}</p> }
    } else {
        match spec.mode {
            RenderMode::Table => table(link, &spec, &columns, rows),
            RenderMode::Cards => cards(link, &spec, &columns, rows),
        }
    };

    html! {
        <div class="array-field">
            <div class="array-header">
                <h3>{ title }</h3>
                <span class="muted">{ format!("{} registros", rows.len()) }</span>
                <button class="btn outline" type="button" onclick={append}>{"Agregar"}</button>
            </div>
            { body }
        </div>
    }
}

fn remove_button(link: &Scope<FichaEditor>, key: &str, index: usize) -> Html {
    let key = key.to_string();
    html! {
        <button
            class="icon-btn danger"
            type="button"
            title="Eliminar"
            onclick={link.callback(move |_| Msg::RequestRow(RowRequest::Remove { key: key.clone(), index }))}
        >
            <i class="material-icons">{"delete"}</i>
        </button>
    }
}

fn table(link: &Scope<FichaEditor>, spec: &ArraySpec, columns: &[String], rows: &[Value]) -> Html {
    html! {
        <div class="table-scroll">
            <table class="array-table">
                <thead>
                    <tr>
                        { for columns.iter().map(|c| html! {
                            <th>{ column_label(c, find_column_field(c, spec.fields)) }</th>
                        }) }
                        <th />
                    </tr>
                </thead>
                <tbody>
                    { for rows.iter().enumerate().map(|(index, row)| html! {
                        <tr>
                            { for columns.iter().map(|c| html! {
                                <td>{ cell(link, spec, index, c, row) }</td>
                            }) }
                            <td>{ remove_button(link, spec.key, index) }</td>
                        </tr>
                    }) }
                </tbody>
            </table>
        </div>
    }
}

fn cards(link: &Scope<FichaEditor>, spec: &ArraySpec, columns: &[String], rows: &[Value]) -> Html {
    html! {
        <div class="array-cards">
            { for rows.iter().enumerate().map(|(index, row)| html! {
                <div class="row-card">
                    <div class="row-card-header">
                        <strong>{ card_title(row, index) }</strong>
                        { remove_button(link, spec.key, index) }
                    </div>
                    <div class="section-fields grid">
                        { for columns.iter().map(|c| html! {
                            <div class="field">
                                <label>{ column_label(c, find_column_field(c, spec.fields)) }</label>
                                { cell(link, spec, index, c, row) }
                            </div>
                        }) }
                    </div>
                </div>
            }) }
        </div>
    }
}

fn set_cell(key: &str, row: usize, column: &str, value: String) -> Msg {
    Msg::Edit(FormAction::SetCell {
        key: key.to_string(),
        row,
        column: column.to_string(),
        value: Value::String(value),
    })
}

fn cell(link: &Scope<FichaEditor>, spec: &ArraySpec, row: usize, column: &str, values: &Value) -> Html {
    let raw = opt_value_to_string(values.get(column));
    let key = spec.key.to_string();
    let col = column.to_string();

    match cell_widget(column, find_column_field(column, spec.fields)) {
        CellWidget::Select(options) => html! {
            <select onchange={link.callback(move |e: Event| set_cell(&key, row, &col, selected_value(&e)))}>
                <option value="" disabled=true selected={raw.is_empty()}>{"Seleccione..."}</option>
                { for options.iter().map(|opt| html! {
                    <option value={opt.value.clone()} selected={opt.value == raw}>{ opt.label.clone() }</option>
                }) }
            </select>
        },
        CellWidget::Date => {
            let today = today();
            let shown = parse_iso_date(&raw).map(format_iso_date).unwrap_or_default();
            html! {
                <input
                    type="date"
                    value={shown}
                    min={format_iso_date(min_date())}
                    max={format_iso_date(today)}
                    onchange={link.batch_callback(move |e: Event| {
                        let picked = changed_value(&e);
                        match parse_iso_date(&picked) {
                            Some(date) if date_in_bounds(date, today) => {
                                Some(set_cell(&key, row, &col, format_iso_date(date)))
                            }
                            None if picked.is_empty() => Some(set_cell(&key, row, &col, picked)),
                            _ => {
                                show_toast("La fecha debe estar entre 1900-01-01 y hoy.");
                                None
                            }
                        }
                    })}
                />
            }
        }
        CellWidget::Chips(options) => html! {
            <ChipSelect
                {options}
                value={raw}
                on_change={link.callback(move |value: String| set_cell(&key, row, &col, value))}
            />
        },
        CellWidget::Text => html! {
            <input
                value={raw}
                oninput={link.callback(move |e: InputEvent| set_cell(&key, row, &col, input_value(&e)))}
            />
        },
    }
}
