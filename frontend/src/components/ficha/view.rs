//! View of the ficha editor: header with status, quality and actions, one tab
//! per section, and the dialogs.

use yew::html::Scope;
use yew::prelude::*;

use common::model::ficha::FichaStatus;
use common::model::form::Section;
use common::quality::QualityAnalysis;
use common::sections::{is_full_width, section_layout, SectionLayout};
use common::store::FormAction;

use super::array_field::{self, ArraySpec};
use super::dialogs::{confirm_dialog, pdf_dialog, signature_dialog};
use super::field_switch::field_switch;
use super::messages::Msg;
use super::risk_panel::risk_panel;
use super::state::FichaEditor;
use crate::components::helpers::{input_value, selected_value};

pub fn view(component: &FichaEditor, ctx: &Context<FichaEditor>) -> Html {
    let link = ctx.link();

    if component.load_error.is_some() {
        return html! {
            <div class="ficha-error">{"No se pudo cargar la estructura del formulario."}</div>
        };
    }
    if component.form.is_none() {
        return html! { <div class="ficha-loading">{"Cargando ficha..."}</div> };
    }

    let sections = component.tab_sections();
    let active = component.active_section.min(sections.len().saturating_sub(1));

    html! {
        <div class="ficha-editor">
            { build_header(component, ctx) }
            { build_nombre_familia(component, link) }
            <div class="tab-bar">
                { for sections.iter().enumerate().map(|(index, section)| html! {
                    <button
                        class={classes!("tab-btn", (index == active).then_some("active"))}
                        onclick={link.callback(move |_| Msg::SelectSection(index))}
                    >
                        { section.name.clone() }
                    </button>
                }) }
            </div>
            {
                match sections.get(active) {
                    Some(section) => build_section(component, link, section),
                    None => html! { <p class="muted">{"El formulario no tiene secciones."}</p> },
                }
            }
            { confirm_dialog(component, link) }
            { signature_dialog(component, link) }
            { pdf_dialog(component, link) }
        </div>
    }
}

fn build_header(component: &FichaEditor, ctx: &Context<FichaEditor>) -> Html {
    let link = ctx.link();
    let title = match component.store.nombre_familia() {
        "" => ctx.props().ficha_id.to_string(),
        name => name.to_string(),
    };
    let status = component.store.status();
    let risk_level = component
        .ficha
        .as_ref()
        .and_then(|f| f.risk_level.clone())
        .unwrap_or_else(|| "Sin evaluar".to_string());

    html! {
        <div class="ficha-header">
            <div>
                <h2>{ format!("Editar Ficha: {}", title) }</h2>
                <p class="muted">{"Complete la información requerida."}</p>
                <span class="risk-level">{ format!("Nivel de riesgo: {}", risk_level) }</span>
            </div>
            { build_quality_badge(component.quality.as_ref()) }
            <div class="ficha-actions">
                <select
                    onchange={link.callback(|e: Event| {
                        Msg::Edit(FormAction::SetStatus(FichaStatus::normalize(&selected_value(&e))))
                    })}
                >
                    { for FichaStatus::ALL.iter().map(|s| html! {
                        <option value={s.as_str()} selected={*s == status}>{ s.label() }</option>
                    }) }
                </select>
                <a class="btn outline" href="?">{"Cancelar"}</a>
                <button class="btn outline" onclick={link.callback(|_| Msg::OpenPdf)}>{"PDF"}</button>
                <button
                    class="btn primary"
                    disabled={component.saving}
                    onclick={link.callback(|_| Msg::Save)}
                    style="position: relative;"
                >
                    {"Guardar Cambios"}
                    {
                        if component.is_dirty() {
                            html! { <span class="dirty-dot" title="Cambios sin guardar" /> }
                        } else {
                            html! {}
                        }
                    }
                </button>
            </div>
        </div>
    }
}

fn build_quality_badge(quality: Option<&QualityAnalysis>) -> Html {
    let Some(quality) = quality else {
        return html! {};
    };
    let findings = quality.findings();
    html! {
        <details class="quality-badge">
            <summary>{ format!("Calidad de datos: {}%", quality.score) }</summary>
            {
                if !quality.is_valid() {
                    html! { <p>{"Estructura del formulario inválida."}</p> }
                } else if findings.is_empty() {
                    html! { <p>{"Todos los campos obligatorios están completos."}</p> }
                } else {
                    html! {
                        <ul>
                            { for findings.iter().map(|f| html! {
                                <li>{ format!("{}: {}", f.field, f.issue) }</li>
                            }) }
                        </ul>
                    }
                }
            }
        </details>
    }
}

fn build_nombre_familia(component: &FichaEditor, link: &Scope<FichaEditor>) -> Html {
    html! {
        <div class="field nombre-familia">
            <label for="nombre_familia">{"Nombre Familia"}</label>
            <input
                id="nombre_familia"
                value={component.store.nombre_familia().to_string()}
                oninput={link.callback(|e: InputEvent| {
                    Msg::Edit(FormAction::SetNombreFamilia(input_value(&e)))
                })}
            />
        </div>
    }
}

fn build_section(component: &FichaEditor, link: &Scope<FichaEditor>, section: &Section) -> Html {
    let body = match section_layout(section) {
        SectionLayout::Risk => risk_panel(component, link, section),
        SectionLayout::Array { key, mode } => array_field::view(
            component,
            link,
            ArraySpec {
                key: &key,
                label: &section.name,
                fields: &section.fields,
                mode,
            },
        ),
        SectionLayout::Fields { .. } if section.fields.is_empty() => html! {
            <p class="muted">{"Esta sección no tiene campos."}</p>
        },
        SectionLayout::Fields { grid } => html! {
            <div class={classes!("section-fields", grid.then_some("grid"))}>
                { for section.fields.iter().map(|field| html! {
                    <div class={classes!(is_full_width(field).then_some("full-width"))}>
                        { field_switch(component, link, field) }
                    </div>
                }) }
            </div>
        },
    };
    html! { <div class="section-card">{ body }</div> }
}
