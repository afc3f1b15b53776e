use yew::html::Scope;
use yew::prelude::*;

use common::builder::{ordered_sections, type_label, Direction};
use common::model::form::{Field, Form, Section};

use super::dialogs::{confirm_dialog, field_dialog, section_dialog};
use super::messages::Msg;
use super::state::FormBuilder;

pub fn view(component: &FormBuilder, ctx: &Context<FormBuilder>) -> Html {
    let link = ctx.link();
    let body = match (&component.form, &component.load_error) {
        (Some(form), _) => build_sections(form, component.saving, link),
        (None, Some(err)) => html! {
            <div class="section-card">
                <h3>{"No se pudo cargar el formulario"}</h3>
                <p class="muted">{ err.clone() }</p>
            </div>
        },
        (None, None) => html! { <div class="ficha-loading">{"Cargando formulario..."}</div> },
    };

    html! {
        <div class="form-builder">
            { build_header(component, link) }
            { body }
            { section_dialog(component, link) }
            { field_dialog(component, link) }
            { confirm_dialog(component, link) }
        </div>
    }
}

fn build_header(component: &FormBuilder, link: &Scope<FormBuilder>) -> Html {
    let (title, subtitle) = match &component.form {
        Some(form) => (
            form.name.clone(),
            format!(
                "Versión {} · {}",
                form.version.clone().unwrap_or_else(|| "1.0".to_string()),
                form.description.clone().filter(|d| !d.is_empty()).unwrap_or_else(|| "Sin descripción".to_string())
            ),
        ),
        None => ("Formulario".to_string(), String::new()),
    };
    html! {
        <div class="ficha-header">
            <div>
                <h2>{ title }</h2>
                <p class="muted">{ subtitle }</p>
            </div>
            <div class="ficha-actions">
                <a class="btn outline" href="?view=formularios">{"Volver"}</a>
                <button
                    class="btn primary"
                    disabled={component.form.is_none() || component.saving}
                    onclick={link.callback(|_| Msg::NewSection)}
                >
                    {"Nueva Sección"}
                </button>
            </div>
        </div>
    }
}

fn build_sections(form: &Form, saving: bool, link: &Scope<FormBuilder>) -> Html {
    let sections = ordered_sections(&form.sections);
    if sections.is_empty() {
        return html! { <p class="muted">{"El formulario no tiene secciones."}</p> };
    }
    let last = sections.len() - 1;
    html! {
        <div class="builder-sections">
            { for sections.iter().enumerate().map(|(index, section)| {
                build_section(form, section, index == 0, index == last, saving, link)
            }) }
        </div>
    }
}

/// Button inside a `<summary>` that does not toggle the `<details>`.
fn summary_button(
    link: &Scope<FormBuilder>,
    icon: &'static str,
    title: &'static str,
    disabled: bool,
    msg: impl Fn() -> Msg + 'static,
) -> Html {
    html! {
        <button
            class="icon-btn"
            title={title}
            disabled={disabled}
            onclick={link.callback(move |e: MouseEvent| {
                e.prevent_default();
                msg()
            })}
        >
            <span class="material-icons">{ icon }</span>
        </button>
    }
}

fn build_section(
    form: &Form,
    section: &Section,
    first: bool,
    last: bool,
    saving: bool,
    link: &Scope<FormBuilder>,
) -> Html {
    let mut fields: Vec<&Field> = section.fields.iter().collect();
    fields.sort_by_key(|f| (f.order_index, f.id));

    let actions = match section.id {
        Some(id) => html! {
            <span class="builder-actions">
                { summary_button(link, "arrow_upward", "Subir", first || saving, move || Msg::MoveSection(id, Direction::Up)) }
                { summary_button(link, "arrow_downward", "Bajar", last || saving, move || Msg::MoveSection(id, Direction::Down)) }
                { summary_button(link, "edit", "Editar sección", saving, move || Msg::EditSection(id)) }
            </span>
        },
        None => html! {},
    };

    html! {
        <details class="section-card builder-section" open=true>
            <summary class="builder-section-header">
                <strong>{ section.name.clone() }</strong>
                if section.is_template {
                    <span class="badge">{"Plantilla"}</span>
                }
                <span class="muted">{ format!("({} campos)", fields.len()) }</span>
                { actions }
            </summary>
            {
                if fields.is_empty() {
                    html! { <p class="muted">{"No hay campos en esta sección."}</p> }
                } else {
                    html! {
                        <ul class="builder-fields">
                            { for fields.iter().map(|field| build_field(form, field, link)) }
                        </ul>
                    }
                }
            }
            {
                match section.id {
                    Some(id) => html! {
                        <button class="btn outline" onclick={link.callback(move |_| Msg::NewField(id))}>
                            {"Agregar Campo"}
                        </button>
                    },
                    None => html! {},
                }
            }
        </details>
    }
}

fn build_field(form: &Form, field: &Field, link: &Scope<FormBuilder>) -> Html {
    let mut details = vec![type_label(field.field_type).to_string()];
    let option_count = field.inline_options().len();
    if option_count > 0 {
        details.push(format!("{} opciones", option_count));
    }
    if let Some(directive) = field.option_directive().filter(|d| *d != "static") {
        details.push(directive.to_string());
    }
    if let Some(linked) = field.linked_section_id {
        let name = form
            .section_by_id(linked)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| format!("#{}", linked));
        details.push(format!("repite: {}", name));
    }

    html! {
        <li class="builder-field">
            <div>
                <span>{ field.label.clone() }</span>
                if field.required {
                    <span class="required">{" *"}</span>
                }
                <div class="muted">
                    <code>{ field.name.clone() }</code>{ " · " }{ details.join(" · ") }
                </div>
            </div>
            {
                match field.id {
                    Some(id) => html! {
                        <span class="builder-actions">
                            <button class="icon-btn" title="Editar campo" onclick={link.callback(move |_| Msg::EditField(id))}>
                                <span class="material-icons">{"edit"}</span>
                            </button>
                            <button class="icon-btn danger" title="Eliminar campo" onclick={link.callback(move |_| Msg::AskDeleteField(id))}>
                                <span class="material-icons">{"delete"}</span>
                            </button>
                        </span>
                    },
                    None => html! {},
                }
            }
        </li>
    }
}
