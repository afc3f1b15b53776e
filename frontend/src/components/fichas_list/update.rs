use yew::platform::spawn_local;
use yew::prelude::*;

use common::requests::BulkStatusRequest;

use super::messages::Msg;
use super::state::FichasListComponent;
use crate::api;
use crate::components::helpers::show_toast;

pub fn update(component: &mut FichasListComponent, ctx: &Context<FichasListComponent>, msg: Msg) -> bool {
    match msg {
        Msg::Reload => {
            component.loading = true;
            let link = ctx.link().clone();
            spawn_local(async move {
                match api::fetch_fichas().await {
                    Ok(fichas) => link.send_message(Msg::Loaded(fichas)),
                    Err(err) => {
                        log::error!("Fichas failed to load: {}", err);
                        show_toast("Error al cargar las fichas");
                        link.send_message(Msg::LoadFailed);
                    }
                }
            });
            true
        }
        Msg::Loaded(fichas) => {
            component.fichas = fichas;
            component.selected.clear();
            component.loading = false;
            true
        }
        Msg::LoadFailed => {
            component.loading = false;
            true
        }
        Msg::ToggleRow(id, checked) => {
            if checked {
                component.selected.insert(id)
            } else {
                component.selected.remove(&id)
            }
        }
        Msg::ToggleAll(checked) => {
            component.selected = if checked {
                component.fichas.iter().filter_map(|f| f.id).collect()
            } else {
                Default::default()
            };
            true
        }
        Msg::ApplyStatus(status) => {
            if component.selected.is_empty() || component.processing {
                return false;
            }
            component.processing = true;
            let body = BulkStatusRequest {
                ids: component.selected.iter().copied().collect(),
                status,
            };
            let link = ctx.link().clone();
            spawn_local(async move {
                match api::bulk_status(&body).await {
                    Ok(()) => {
                        show_toast(&format!(
                            "Se actualizaron {} fichas a {}",
                            body.ids.len(),
                            body.status.label()
                        ));
                        link.send_message(Msg::StatusApplied);
                    }
                    Err(err) => {
                        log::error!("Bulk status update failed: {}", err);
                        show_toast("Error al actualizar estados");
                        link.send_message(Msg::StatusFailed);
                    }
                }
            });
            true
        }
        Msg::StatusApplied => {
            component.processing = false;
            ctx.link().send_message(Msg::Reload);
            true
        }
        Msg::StatusFailed => {
            component.processing = false;
            true
        }
    }
}
