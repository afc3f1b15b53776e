use yew::html::Scope;
use yew::prelude::*;

use crate::components::ficha::{FichaEditor, Msg};
use crate::tops_sheet::top_sheet::TopSheet;

/// Asks before a row is added to or removed from a repeatable section.
pub fn confirm_dialog(component: &FichaEditor, link: &Scope<FichaEditor>) -> Html {
    let prompt = component
        .pending_row
        .as_ref()
        .map(|request| request.prompt())
        .unwrap_or_default();

    html! {
        <TopSheet node_ref={component.confirm_dialog_ref.clone()}>
            <div class="sheet-backdrop">
                <div class="confirm-card">
                    <h3>{"Confirmar"}</h3>
                    <p>{ prompt }</p>
                    <div class="confirm-actions">
                        <button class="btn outline" onclick={link.callback(|_| Msg::CancelRow)}>{"Cancelar"}</button>
                        <button class="btn primary" onclick={link.callback(|_| Msg::ConfirmRow)}>{"Aceptar"}</button>
                    </div>
                </div>
            </div>
        </TopSheet>
    }
}
