use crate::app::App;

mod api;
mod app;
mod components;
mod config;
mod logging;
mod tops_sheet;

fn main() {
    logging::init();
    yew::Renderer::<App>::new().render();
}
