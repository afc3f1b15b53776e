use yew::platform::spawn_local;
use yew::prelude::*;

use common::dictionary::build_dictionary;
use common::requests::DictionaryRequest;

use super::messages::Msg;
use super::state::DictionaryComponent;
use crate::api;
use crate::components::helpers::{pdf_object_url, show_toast};
use crate::tops_sheet::top_sheet::{close_top_sheet, open_top_sheet};

pub fn update(component: &mut DictionaryComponent, ctx: &Context<DictionaryComponent>, msg: Msg) -> bool {
    match msg {
        Msg::LoadForms => {
            let link = ctx.link().clone();
            spawn_local(async move {
                match api::fetch_forms().await {
                    Ok(forms) => link.send_message(Msg::FormsLoaded(forms)),
                    Err(err) => {
                        log::error!("Forms failed to load: {}", err);
                        show_toast("Error cargando formularios");
                    }
                }
            });
            false
        }
        Msg::FormsLoaded(forms) => {
            component.forms = forms;
            true
        }
        Msg::SelectForm(form_id) => {
            component.selected_form = Some(form_id);
            component.loading = true;
            let link = ctx.link().clone();
            spawn_local(async move {
                match api::fetch_form(form_id).await {
                    Ok(form) => link.send_message(Msg::FormLoaded(Box::new(form))),
                    Err(err) => {
                        log::error!("Form {} failed to load: {}", form_id, err);
                        show_toast("Error cargando formulario");
                        link.send_message(Msg::FormFailed);
                    }
                }
            });
            true
        }
        Msg::FormLoaded(form) => {
            component.dictionary = Some(build_dictionary(&form));
            component.form = Some(*form);
            component.loading = false;
            true
        }
        Msg::FormFailed => {
            component.form = None;
            component.dictionary = None;
            component.loading = false;
            true
        }
        Msg::ExportPdf => {
            let Some(form) = component.form.clone() else {
                show_toast("Seleccione un formulario.");
                return false;
            };
            component.pdf_url = None;
            component.pdf_loading = true;
            open_top_sheet(component.pdf_dialog_ref.clone());

            let link = ctx.link().clone();
            spawn_local(async move {
                match api::dictionary_pdf(&DictionaryRequest { form }).await {
                    Ok(bytes) => link.send_message(Msg::PdfReady(pdf_object_url(&bytes))),
                    Err(err) => {
                        log::error!("Dictionary export failed: {}", err);
                        show_toast("Error al generar el PDF.");
                        link.send_message(Msg::PdfFailed);
                    }
                }
            });
            true
        }
        Msg::PdfReady(url) => {
            component.pdf_url = Some(url);
            true
        }
        Msg::PdfFailed => {
            component.pdf_loading = false;
            close_top_sheet(component.pdf_dialog_ref.clone());
            true
        }
        Msg::PdfLoaded => {
            component.pdf_loading = false;
            true
        }
        Msg::ClosePdf => {
            close_top_sheet(component.pdf_dialog_ref.clone());
            component.pdf_url = None;
            component.pdf_loading = false;
            true
        }
    }
}
