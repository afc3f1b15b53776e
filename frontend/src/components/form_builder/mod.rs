//! Form builder: lists the sections of one form with their fields, lets the
//! sections be created, renamed and reordered, and fields be added, edited
//! or removed.
//!
//! Every write goes straight to the API; on success the form is fetched
//! again so the page always shows what the server stored.

use yew::prelude::*;

mod dialogs;
mod messages;
mod props;
mod state;
mod update;
mod view;

pub use messages::Msg;
pub use props::FormBuilderProps;
pub use state::FormBuilder;

impl Component for FormBuilder {
    type Message = Msg;
    type Properties = FormBuilderProps;

    fn create(_ctx: &Context<Self>) -> Self {
        FormBuilder::new()
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render {
            ctx.link().send_message(Msg::Load);
        }
    }
}
