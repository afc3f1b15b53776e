use yew::platform::spawn_local;
use yew::prelude::*;

use common::builder::FormDraft;

use super::messages::Msg;
use super::state::FormsListComponent;
use crate::api;
use crate::components::helpers::{navigate, show_toast};
use crate::tops_sheet::top_sheet::{close_top_sheet, open_top_sheet};

pub fn update(component: &mut FormsListComponent, ctx: &Context<FormsListComponent>, msg: Msg) -> bool {
    match msg {
        Msg::Load => {
            component.loading = true;
            let link = ctx.link().clone();
            spawn_local(async move {
                match api::fetch_forms().await {
                    Ok(forms) => link.send_message(Msg::Loaded(forms)),
                    Err(err) => {
                        log::error!("Forms failed to load: {}", err);
                        show_toast("Error al cargar los formularios");
                        link.send_message(Msg::LoadFailed);
                    }
                }
            });
            true
        }
        Msg::Loaded(forms) => {
            component.forms = forms;
            component.loading = false;
            true
        }
        Msg::LoadFailed => {
            component.loading = false;
            true
        }
        Msg::OpenCreate => {
            component.draft = FormDraft::default();
            open_top_sheet(component.create_dialog_ref.clone());
            true
        }
        Msg::CloseCreate => {
            close_top_sheet(component.create_dialog_ref.clone());
            false
        }
        Msg::EditName(name) => {
            component.draft.name = name;
            true
        }
        Msg::EditDescription(description) => {
            component.draft.description = description;
            false
        }
        Msg::EditVersion(version) => {
            component.draft.version = version;
            false
        }
        Msg::Create => {
            if component.saving {
                return false;
            }
            let body = match component.draft.validate() {
                Ok(body) => body,
                Err(err) => {
                    show_toast(&err.to_string());
                    return false;
                }
            };
            component.saving = true;
            let link = ctx.link().clone();
            spawn_local(async move {
                match api::create_form(&body).await {
                    Ok(created) => link.send_message(Msg::Created(created.id)),
                    Err(err) => {
                        log::error!("Form creation failed: {}", err);
                        show_toast("Error al crear el formulario");
                        link.send_message(Msg::CreateFailed);
                    }
                }
            });
            true
        }
        Msg::Created(form_id) => {
            component.saving = false;
            close_top_sheet(component.create_dialog_ref.clone());
            show_toast("Formulario creado correctamente");
            match form_id {
                Some(form_id) => navigate(&format!("?builder={}", form_id)),
                None => ctx.link().send_message(Msg::Load),
            }
            true
        }
        Msg::CreateFailed => {
            component.saving = false;
            true
        }
    }
}
