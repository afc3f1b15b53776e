use yew::html::Scope;
use yew::prelude::*;

use crate::components::ficha::{FichaEditor, Msg};
use crate::components::pdf_viewer::{pdf_viewer, PdfViewer};

pub fn pdf_dialog(component: &FichaEditor, link: &Scope<FichaEditor>) -> Html {
    pdf_viewer(PdfViewer {
        dialog_ref: component.pdf_dialog_ref.clone(),
        url: component.pdf_url.as_deref(),
        loading: component.pdf_loading,
        download: None,
        on_close: link.callback(|_| Msg::ClosePdf),
        on_loaded: link.callback(|_: Event| Msg::PdfLoaded),
    })
}
