use yew::html::Scope;
use yew::prelude::*;

use crate::components::ficha::{FichaEditor, Msg};
use crate::tops_sheet::top_sheet::TopSheet;

/// Enlarged view of the responsible person's signature.
pub fn signature_dialog(component: &FichaEditor, link: &Scope<FichaEditor>) -> Html {
    html! {
        <TopSheet node_ref={component.signature_dialog_ref.clone()}>
            <div class="sheet-backdrop">
                <button class="sheet-close" onclick={link.callback(|_| Msg::CloseSignature)}>{ "✕" }</button>
                {
                    match &component.signature_src {
                        Some(src) => html! {
                            <img src={src.clone()} alt="Firma" style="max-width:80vw;max-height:80vh;background:#fff;border-radius:4px;" />
                        },
                        None => html! { <span style="color:#fff;">{"Sin firma"}</span> },
                    }
                }
            </div>
        </TopSheet>
    }
}
