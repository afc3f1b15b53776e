use std::future::Future;

use yew::platform::spawn_local;
use yew::prelude::*;

use common::builder::{move_section, FieldDraft, SectionDraft};

use super::messages::Msg;
use super::state::FormBuilder;
use crate::api::{self, ApiResult};
use crate::components::helpers::show_toast;
use crate::tops_sheet::top_sheet::{close_top_sheet, open_top_sheet};

pub fn update(component: &mut FormBuilder, ctx: &Context<FormBuilder>, msg: Msg) -> bool {
    let form_id = ctx.props().form_id;
    match msg {
        Msg::Load => {
            let link = ctx.link().clone();
            spawn_local(async move {
                match api::fetch_form(form_id).await {
                    Ok(form) => link.send_message(Msg::Loaded(Box::new(form))),
                    Err(err) => {
                        log::error!("Form {} failed to load: {}", form_id, err);
                        show_toast("Error al cargar el formulario");
                        link.send_message(Msg::LoadFailed(err.to_string()));
                    }
                }
            });
            false
        }
        Msg::Loaded(form) => {
            component.form = Some(*form);
            component.loading = false;
            component.load_error = None;
            true
        }
        Msg::LoadFailed(err) => {
            component.loading = false;
            component.load_error = Some(err);
            true
        }
        Msg::NewSection => {
            let sections = component.form.as_ref().map(|f| f.sections.as_slice()).unwrap_or_default();
            component.section_draft = SectionDraft::after(sections);
            open_top_sheet(component.section_dialog_ref.clone());
            true
        }
        Msg::EditSection(section_id) => {
            let Some(section) = component.form.as_ref().and_then(|f| f.section_by_id(section_id)) else {
                return false;
            };
            component.section_draft = SectionDraft::from_section(section);
            open_top_sheet(component.section_dialog_ref.clone());
            true
        }
        Msg::SectionName(name) => {
            component.section_draft.name = name;
            true
        }
        Msg::SectionTemplate(is_template) => {
            component.section_draft.is_template = is_template;
            true
        }
        Msg::SaveSection => {
            if component.saving {
                return false;
            }
            let body = match component.section_draft.validate() {
                Ok(body) => body,
                Err(err) => {
                    show_toast(&err.to_string());
                    return false;
                }
            };
            match component.section_draft.id {
                None => spawn_write(component, ctx, "Sección creada", "Error creando sección", async move {
                    api::create_section(form_id, &body).await
                }),
                Some(section_id) => spawn_write(
                    component,
                    ctx,
                    "Sección actualizada",
                    "Error actualizando sección",
                    async move { api::update_section(section_id, &body).await },
                ),
            }
            true
        }
        Msg::CloseSection => {
            close_top_sheet(component.section_dialog_ref.clone());
            false
        }
        Msg::MoveSection(section_id, direction) => {
            if component.saving {
                return false;
            }
            let writes = component
                .form
                .as_ref()
                .map(|f| move_section(&f.sections, section_id, direction))
                .unwrap_or_default();
            if writes.is_empty() {
                return false;
            }
            spawn_write(component, ctx, "Orden actualizado", "Error al reordenar secciones", async move {
                for (section_id, body) in writes {
                    api::update_section(section_id, &body).await?;
                }
                Ok::<(), api::ApiError>(())
            });
            true
        }
        Msg::NewField(section_id) => {
            component.field_draft = Some(FieldDraft::new_in(section_id));
            open_top_sheet(component.field_dialog_ref.clone());
            true
        }
        Msg::EditField(field_id) => {
            let field = component
                .form
                .as_ref()
                .and_then(|f| f.all_fields().find(|field| field.id == Some(field_id)));
            let Some(field) = field else {
                return false;
            };
            component.field_draft = Some(FieldDraft::from_field(field));
            open_top_sheet(component.field_dialog_ref.clone());
            true
        }
        Msg::EditDraft(edit) => match component.field_draft.as_mut() {
            Some(draft) => {
                draft.apply(edit);
                true
            }
            None => false,
        },
        Msg::SaveField => {
            if component.saving {
                return false;
            }
            let Some(draft) = component.field_draft.as_ref() else {
                return false;
            };
            let field = match draft.validate() {
                Ok(field) => field,
                Err(err) => {
                    show_toast(&err.to_string());
                    return false;
                }
            };
            match (field.id, field.section_id) {
                (Some(field_id), _) => spawn_write(component, ctx, "Campo actualizado", "Error al guardar campo", async move {
                    api::update_field(field_id, &field).await
                }),
                (None, Some(section_id)) => spawn_write(component, ctx, "Campo creado", "Error al guardar campo", async move {
                    api::create_field(section_id, &field).await
                }),
                (None, None) => {
                    log::warn!("Field draft {} has no section", field.name);
                    return false;
                }
            }
            true
        }
        Msg::CloseField => {
            close_top_sheet(component.field_dialog_ref.clone());
            component.field_draft = None;
            true
        }
        Msg::AskDeleteField(field_id) => {
            let label = component
                .form
                .as_ref()
                .and_then(|f| f.all_fields().find(|field| field.id == Some(field_id)))
                .map(|field| field.label.clone())
                .unwrap_or_default();
            component.pending_delete = Some((field_id, label));
            open_top_sheet(component.confirm_dialog_ref.clone());
            true
        }
        Msg::CancelDelete => {
            close_top_sheet(component.confirm_dialog_ref.clone());
            component.pending_delete = None;
            true
        }
        Msg::ConfirmDelete => {
            if component.saving {
                return false;
            }
            let Some((field_id, _)) = component.pending_delete.take() else {
                return false;
            };
            spawn_write(component, ctx, "Campo eliminado", "Error al eliminar campo", async move {
                api::delete_field(field_id).await
            });
            true
        }
        Msg::Written(message) => {
            component.saving = false;
            close_top_sheet(component.section_dialog_ref.clone());
            close_top_sheet(component.field_dialog_ref.clone());
            close_top_sheet(component.confirm_dialog_ref.clone());
            component.field_draft = None;
            show_toast(message);
            ctx.link().send_message(Msg::Load);
            true
        }
        Msg::WriteFailed(message) => {
            component.saving = false;
            show_toast(message);
            true
        }
    }
}

/// Runs one API write and reports back with [`Msg::Written`] or [`Msg::WriteFailed`].
fn spawn_write<F>(
    component: &mut FormBuilder,
    ctx: &Context<FormBuilder>,
    done: &'static str,
    failed: &'static str,
    write: F,
) where
    F: Future<Output = ApiResult<()>> + 'static,
{
    component.saving = true;
    let link = ctx.link().clone();
    spawn_local(async move {
        match write.await {
            Ok(()) => link.send_message(Msg::Written(done)),
            Err(err) => {
                log::error!("{}: {}", failed, err);
                link.send_message(Msg::WriteFailed(failed));
            }
        }
    });
}
