//! Ficha editor: loads a form schema and one record, renders every section
//! with the widget its fields call for, and saves the result back.
//!
//! The component follows the same split as the rest of the console: `state`
//! holds the data, `update` reacts to [`Msg`], `view` renders, and the widget
//! renderers live in their own modules (`field_switch`, `array_field`,
//! `risk_panel`, `map_widget`, `chip_select`, `dialogs`).

use futures::join;
use yew::platform::spawn_local;
use yew::prelude::*;

mod array_field;
mod chip_select;
mod dialogs;
mod field_switch;
mod map_widget;
mod messages;
mod props;
mod risk_panel;
mod state;
mod update;
mod view;

use crate::api;
use crate::components::helpers::show_toast;
pub use messages::Msg;
pub use props::FichaEditorProps;
pub use state::FichaEditor;

impl Component for FichaEditor {
    type Message = Msg;
    type Properties = FichaEditorProps;

    fn create(_ctx: &Context<Self>) -> Self {
        FichaEditor::new()
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render && !self.loaded {
            self.loaded = true;

            let link = ctx.link().clone();
            let FichaEditorProps { ficha_id, form_id } = ctx.props().clone();
            spawn_local(async move {
                let (form, ficha) = join!(api::fetch_form(form_id), api::fetch_ficha(ficha_id));
                match (form, ficha) {
                    (Ok(form), Ok(ficha)) => link.send_message(Msg::Loaded {
                        form: Box::new(form),
                        ficha: Box::new(ficha),
                    }),
                    (Err(err), _) => {
                        log::error!("Form {} failed to load: {}", form_id, err);
                        show_toast("No se pudo cargar la estructura del formulario.");
                        link.send_message(Msg::LoadFailed(err.to_string()));
                    }
                    (_, Err(err)) => {
                        log::error!("Ficha {} failed to load: {}", ficha_id, err);
                        show_toast("Error al cargar la ficha.");
                        link.send_message(Msg::LoadFailed(err.to_string()));
                    }
                }
            });
        }
    }
}
