use yew::html::Scope;
use yew::prelude::*;

use crate::components::form_builder::{FormBuilder, Msg};
use crate::components::helpers::{changed_checked, input_value};
use crate::tops_sheet::top_sheet::TopSheet;

/// Creates a section, or renames an existing one.
pub fn section_dialog(component: &FormBuilder, link: &Scope<FormBuilder>) -> Html {
    let draft = &component.section_draft;
    let title = if draft.id.is_some() { "Editar Sección" } else { "Nueva Sección" };

    html! {
        <TopSheet node_ref={component.section_dialog_ref.clone()}>
            <div class="sheet-backdrop">
                <div class="confirm-card editor-card">
                    <h3>{ title }</h3>
                    <div class="field">
                        <label>{"Nombre de la sección"}</label>
                        <input
                            type="text"
                            value={draft.name.clone()}
                            oninput={link.callback(|e: InputEvent| Msg::SectionName(input_value(&e)))}
                        />
                    </div>
                    <label class="switch-row">
                        <input
                            type="checkbox"
                            checked={draft.is_template}
                            onchange={link.callback(|e: Event| Msg::SectionTemplate(changed_checked(&e)))}
                        />
                        {"Plantilla (filas repetibles)"}
                    </label>
                    <div class="confirm-actions">
                        <button class="btn outline" onclick={link.callback(|_| Msg::CloseSection)}>{"Cancelar"}</button>
                        <button
                            class="btn primary"
                            disabled={component.saving || draft.name.trim().is_empty()}
                            onclick={link.callback(|_| Msg::SaveSection)}
                        >
                            {"Guardar"}
                        </button>
                    </div>
                </div>
            </div>
        </TopSheet>
    }
}
