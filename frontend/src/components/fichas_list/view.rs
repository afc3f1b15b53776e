use yew::html::Scope;
use yew::prelude::*;

use common::model::ficha::{FichaStatus, FichaSummary};
use common::widgets::format_short_es;

use super::messages::Msg;
use super::state::FichasListComponent;
use crate::components::helpers::changed_checked;

pub fn view(component: &FichasListComponent, ctx: &Context<FichasListComponent>) -> Html {
    let link = ctx.link();
    if component.loading && component.fichas.is_empty() {
        return html! { <div class="ficha-loading">{"Cargando fichas..."}</div> };
    }

    html! {
        <div class="fichas-list">
            <div>
                <h2>{"Fichas Familiares"}</h2>
                <p class="muted">{"Listado de fichas registradas en el sistema."}</p>
            </div>
            { build_toolbar(component, link) }
            <table class="array-table">
                <thead>
                    <tr>
                        <th>
                            <input
                                type="checkbox"
                                aria-label="Seleccionar todo"
                                checked={component.all_selected()}
                                onchange={link.callback(|e: Event| Msg::ToggleAll(changed_checked(&e)))}
                            />
                        </th>
                        <th>{"ID"}</th>
                        <th>{"Nombre Familia"}</th>
                        <th>{"Estado"}</th>
                        <th>{"Fecha Actualización"}</th>
                        <th>{"Acciones"}</th>
                    </tr>
                </thead>
                <tbody>
                    {
                        if component.fichas.is_empty() {
                            html! { <tr><td colspan="6" class="muted">{"No se encontraron fichas."}</td></tr> }
                        } else {
                            component.fichas.iter().map(|f| build_row(component, link, f)).collect::<Html>()
                        }
                    }
                </tbody>
            </table>
        </div>
    }
}

fn build_toolbar(component: &FichasListComponent, link: &Scope<FichasListComponent>) -> Html {
    if component.selected.is_empty() {
        return html! {};
    }
    let action = |status: FichaStatus, icon: &'static str, text: &'static str| {
        html! {
            <button
                class="btn outline"
                disabled={component.processing}
                onclick={link.callback(move |_| Msg::ApplyStatus(status))}
            >
                <i class="material-icons">{ icon }</i>
                { text }
            </button>
        }
    };
    html! {
        <div class="bulk-toolbar">
            <span>{ format!("{} seleccionados", component.selected.len()) }</span>
            { action(FichaStatus::Verified, "check_circle", "Verificar") }
            { action(FichaStatus::Pending, "schedule", "Marcar Pendiente") }
            { action(FichaStatus::Rejected, "cancel", "Rechazar") }
        </div>
    }
}

fn build_row(
    component: &FichasListComponent,
    link: &Scope<FichasListComponent>,
    ficha: &FichaSummary,
) -> Html {
    let Some(id) = ficha.id else {
        return html! {};
    };
    let name = ficha
        .nombre_familia
        .clone()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| "Sin Nombre".to_string());
    let updated = ficha.updated_at.as_deref().map(format_short_es).unwrap_or_default();

    html! {
        <tr class={classes!(component.selected.contains(&id).then_some("selected"))}>
            <td>
                <input
                    type="checkbox"
                    aria-label={format!("Seleccionar ficha {}", id)}
                    checked={component.selected.contains(&id)}
                    onchange={link.callback(move |e: Event| Msg::ToggleRow(id, changed_checked(&e)))}
                />
            </td>
            <td>{ id.to_string() }</td>
            <td>{ name }</td>
            <td>
                <span class={classes!("status-pill", ficha.status.as_str())}>{ ficha.status.label() }</span>
            </td>
            <td>{ updated }</td>
            <td>
                <a class="icon-btn" href={format!("?ficha={}", id)} title="Editar">
                    <i class="material-icons">{"edit"}</i>
                </a>
            </td>
        </tr>
    }
}
