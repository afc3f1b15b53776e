use yew::html::Scope;
use yew::prelude::*;

use crate::components::form_builder::{FormBuilder, Msg};
use crate::tops_sheet::top_sheet::TopSheet;

pub fn confirm_dialog(component: &FormBuilder, link: &Scope<FormBuilder>) -> Html {
    let label = component
        .pending_delete
        .as_ref()
        .map(|(_, label)| label.clone())
        .unwrap_or_default();

    html! {
        <TopSheet node_ref={component.confirm_dialog_ref.clone()}>
            <div class="sheet-backdrop">
                <div class="confirm-card">
                    <h3>{"¿Eliminar campo?"}</h3>
                    <p>{ format!("Se eliminará el campo \"{}\" del formulario.", label) }</p>
                    <div class="confirm-actions">
                        <button class="btn outline" onclick={link.callback(|_| Msg::CancelDelete)}>{"Cancelar"}</button>
                        <button class="btn primary danger" onclick={link.callback(|_| Msg::ConfirmDelete)}>{"Eliminar"}</button>
                    </div>
                </div>
            </div>
        </TopSheet>
    }
}
