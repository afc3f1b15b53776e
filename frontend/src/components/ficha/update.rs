//! Update function of the ficha editor.
//!
//! Every value change arrives as `Msg::Edit` carrying a [`FormAction`]; the
//! store applies it, the quality score is recomputed and `window.app_dirty`
//! follows the fingerprint. Row additions and removals first pass through the
//! confirmation dialog. Network work (catalogs, save, PDF) is spawned and
//! reports back with a message.

use gloo_file::futures::read_as_bytes;
use gloo_file::File;
use serde_json::Value;
use yew::html::Scope;
use yew::platform::spawn_local;
use yew::prelude::*;

use common::geo::GeoLevel;
use common::store::{FormAction, FormStore};
use common::widgets::encode_data_url;

use crate::api;
use crate::components::helpers::{pdf_object_url, set_window_dirty_flag, show_toast};
use crate::tops_sheet::top_sheet::{close_top_sheet, open_top_sheet};

use super::messages::Msg;
use super::state::FichaEditor;

pub fn update(component: &mut FichaEditor, ctx: &Context<FichaEditor>, msg: Msg) -> bool {
    match msg {
        Msg::Loaded { form, ficha } => {
            component.store = FormStore::load(&form, &ficha);
            component.all_fields = form.all_fields().cloned().collect();
            component.form = Some(*form);
            component.ficha = Some(*ficha);
            component.load_error = None;
            component.rescore();
            component.original_md5 = Some(component.fingerprint());
            set_window_dirty_flag(false);

            for level in GeoLevel::ALL {
                request_catalog(ctx.link(), component, level);
            }
            true
        }
        Msg::LoadFailed(reason) => {
            component.load_error = Some(reason);
            true
        }
        Msg::CatalogLoaded {
            level,
            parent,
            entries,
        } => {
            if !level.is_current_parent(parent.as_deref(), component.store.data()) {
                log::debug!("Dropping stale {:?} catalog for parent {:?}", level, parent);
                return false;
            }
            component.catalogs.set(level, entries);
            true
        }
        Msg::Edit(action) => {
            let geo_child = match &action {
                FormAction::UserSelect { name, .. } => {
                    GeoLevel::from_field_name(name).and_then(|level| level.child())
                }
                _ => None,
            };
            if !component.store.apply(action) {
                return false;
            }
            if let Some(child) = geo_child {
                for dependent in std::iter::once(child).chain(child.dependents()) {
                    component.catalogs.set(dependent, Vec::new());
                }
                request_catalog(ctx.link(), component, child);
            }
            component.rescore();
            set_window_dirty_flag(component.is_dirty());
            true
        }
        Msg::SelectSection(index) => {
            component.active_section = index;
            true
        }
        Msg::RequestRow(request) => {
            component.pending_row = Some(request);
            open_top_sheet(component.confirm_dialog_ref.clone());
            true
        }
        Msg::ConfirmRow => {
            close_top_sheet(component.confirm_dialog_ref.clone());
            match component.pending_row.take() {
                Some(request) => {
                    ctx.link().send_message(Msg::Edit(request.into_action()));
                    true
                }
                None => false,
            }
        }
        Msg::CancelRow => {
            close_top_sheet(component.confirm_dialog_ref.clone());
            component.pending_row = None;
            true
        }
        Msg::ImageSelected { name, file } => {
            let file = File::from(file);
            let mime = file.raw_mime_type();
            let link = ctx.link().clone();
            spawn_local(async move {
                match read_as_bytes(&file).await {
                    Ok(bytes) => link.send_message(Msg::Edit(FormAction::Set {
                        name,
                        value: Value::String(encode_data_url(&mime, &bytes)),
                    })),
                    Err(err) => {
                        log::warn!("Could not read image for {}: {}", name, err);
                        show_toast("No se pudo leer la imagen.");
                    }
                }
            });
            false
        }
        Msg::ZoomSignature(src) => {
            component.signature_src = Some(src);
            open_top_sheet(component.signature_dialog_ref.clone());
            true
        }
        Msg::CloseSignature => {
            close_top_sheet(component.signature_dialog_ref.clone());
            component.signature_src = None;
            true
        }
        Msg::Save => {
            if component.saving {
                return false;
            }
            let ficha_id = ctx.props().ficha_id;
            let body = component.store.to_update();
            component.saving = true;
            let link = ctx.link().clone();
            spawn_local(async move {
                match api::save_ficha(ficha_id, &body).await {
                    Ok(()) => {
                        show_toast("Ficha actualizada correctamente");
                        link.send_message(Msg::SaveFinished(true));
                    }
                    Err(err) => {
                        log::error!("Saving ficha {} failed: {}", ficha_id, err);
                        show_toast("Error al guardar la ficha");
                        link.send_message(Msg::SaveFinished(false));
                    }
                }
            });
            true
        }
        Msg::SaveFinished(saved) => {
            component.saving = false;
            if saved {
                component.original_md5 = Some(component.fingerprint());
                set_window_dirty_flag(false);
            }
            true
        }
        Msg::OpenPdf => {
            let Some(request) = component.report_request() else {
                show_toast("No hay ficha cargada.");
                return false;
            };
            component.pdf_url = None;
            component.pdf_loading = true;
            open_top_sheet(component.pdf_dialog_ref.clone());

            let link = ctx.link().clone();
            spawn_local(async move {
                match api::ficha_pdf(&request).await {
                    Ok(bytes) => link.send_message(Msg::PdfReady(pdf_object_url(&bytes))),
                    Err(err) => {
                        log::error!("Report generation failed: {}", err);
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

/// Fetches the catalog of `level` when its parent has a value.
fn request_catalog(link: &Scope<FichaEditor>, component: &FichaEditor, level: GeoLevel) {
    let parent = level.parent_value(component.store.data());
    let Some(path) = level.catalog_path(parent.as_deref()) else {
        return;
    };
    let link = link.clone();
    spawn_local(async move {
        match api::fetch_catalog(&path).await {
            Ok(entries) => link.send_message(Msg::CatalogLoaded {
                level,
                parent,
                entries,
            }),
            Err(err) => {
                log::warn!("Catalog {} failed to load: {}", path, err);
                show_toast("Error al cargar el catálogo geográfico.");
            }
        }
    });
}
