//! Full-screen sheet used by every dialog of the console.
//!
//! The sheet is always mounted; [`open_top_sheet`] and [`close_top_sheet`]
//! toggle its `show` class one tick later so the CSS transition runs.

use gloo_timers::callback::Timeout;
use yew::{html, Component, Context, Html, NodeRef, Properties};

const SHOW_CLASS: &str = "show";

pub struct TopSheet;

#[derive(Properties, PartialEq)]
pub struct Props {
    #[prop_or_default]
    pub children: Html,
    pub node_ref: NodeRef,
}

impl Component for TopSheet {
    type Message = ();
    type Properties = Props;

    fn create(_ctx: &Context<Self>) -> Self {
        Self
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="top-sheet" ref={ctx.props().node_ref.clone()}>
                { ctx.props().children.clone() }
            </div>
        }
    }
}

fn toggle(top_sheet_ref: &NodeRef, show: bool) {
    let Some(sheet) = top_sheet_ref.cast::<web_sys::HtmlElement>() else {
        return;
    };
    Timeout::new(50, move || {
        let classes = sheet.class_list();
        let result = if show {
            classes.add_1(SHOW_CLASS)
        } else {
            classes.remove_1(SHOW_CLASS)
        };
        if result.is_err() {
            log::warn!("Could not toggle top sheet");
        }
    })
    .forget();
}

pub fn open_top_sheet(top_sheet_ref: NodeRef) {
    toggle(&top_sheet_ref, true);
}

pub fn close_top_sheet(top_sheet_ref: NodeRef) {
    toggle(&top_sheet_ref, false);
}
