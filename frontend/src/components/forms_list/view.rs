use yew::html::Scope;
use yew::prelude::*;

use common::model::form::FormSummary;

use super::messages::Msg;
use super::state::FormsListComponent;
use crate::components::helpers::{input_value, textarea_value};
use crate::tops_sheet::top_sheet::TopSheet;

pub fn view(component: &FormsListComponent, ctx: &Context<FormsListComponent>) -> Html {
    let link = ctx.link();

    html! {
        <div class="forms-page">
            <div class="ficha-header">
                <div>
                    <h2>{"Formularios"}</h2>
                    <p class="muted">{"Estructuras disponibles para las fichas familiares."}</p>
                </div>
                <div class="ficha-actions">
                    <button class="btn primary" onclick={link.callback(|_| Msg::OpenCreate)}>
                        {"Nuevo Formulario"}
                    </button>
                </div>
            </div>
            {
                if component.loading {
                    html! { <div class="ficha-loading">{"Cargando formularios..."}</div> }
                } else if component.forms.is_empty() {
                    html! { <p class="muted">{"No hay formularios creados."}</p> }
                } else {
                    html! {
                        <div class="form-grid">
                            { for component.forms.iter().map(form_card) }
                        </div>
                    }
                }
            }
            { create_dialog(component, link) }
        </div>
    }
}

fn form_card(form: &FormSummary) -> Html {
    let description = form
        .description
        .clone()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| "Sin descripción".to_string());
    html! {
        <div class="section-card form-card">
            <h3>{ form.name.clone() }</h3>
            <p class="muted">{ description }</p>
            {
                match form.id {
                    Some(id) => html! {
                        <a class="btn outline" href={format!("?builder={}", id)}>{"Configurar Campos"}</a>
                    },
                    None => html! {},
                }
            }
        </div>
    }
}

fn create_dialog(component: &FormsListComponent, link: &Scope<FormsListComponent>) -> Html {
    let draft = &component.draft;
    html! {
        <TopSheet node_ref={component.create_dialog_ref.clone()}>
            <div class="sheet-backdrop">
                <div class="confirm-card editor-card">
                    <h3>{"Crear Nuevo Formulario"}</h3>
                    <div class="field">
                        <label>{"Nombre"}</label>
                        <input
                            type="text"
                            value={draft.name.clone()}
                            oninput={link.callback(|e: InputEvent| Msg::EditName(input_value(&e)))}
                        />
                    </div>
                    <div class="field">
                        <label>{"Descripción"}</label>
                        <textarea
                            value={draft.description.clone()}
                            oninput={link.callback(|e: InputEvent| Msg::EditDescription(textarea_value(&e)))}
                        />
                    </div>
                    <div class="field">
                        <label>{"Versión"}</label>
                        <input
                            type="text"
                            value={draft.version.clone()}
                            oninput={link.callback(|e: InputEvent| Msg::EditVersion(input_value(&e)))}
                        />
                    </div>
                    <div class="confirm-actions">
                        <button class="btn outline" onclick={link.callback(|_| Msg::CloseCreate)}>{"Cancelar"}</button>
                        <button
                            class="btn primary"
                            disabled={component.saving || draft.name.trim().is_empty()}
                            onclick={link.callback(|_| Msg::Create)}
                        >
                            {"Crear"}
                        </button>
                    </div>
                </div>
            </div>
        </TopSheet>
    }
}
