//! List of registered fichas with bulk status changes.
//!
//! Rows are selected with checkboxes; the toolbar that appears with a
//! selection sends one `PATCH /web/fichas/bulk-status` for all of them and
//! reloads the list afterwards.

use yew::prelude::*;

mod messages;
mod state;
mod update;
mod view;

pub use messages::Msg;
pub use state::FichasListComponent;

impl Component for FichasListComponent {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        FichasListComponent::new()
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render {
            ctx.link().send_message(Msg::Reload);
        }
    }
}
