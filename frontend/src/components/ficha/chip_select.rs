use yew::{html, Callback, Component, Context, Event, Html, Properties};

use common::options::ResolvedOption;
use common::widgets::{split_multi, toggle_multi};

use crate::components::helpers::selected_value;

/// Multi-choice cell editor: selected values as removable chips plus a
/// dropdown of the ones still available. The value is a comma-joined string.
pub struct ChipSelect;

#[derive(Properties, PartialEq)]
pub struct ChipSelectProps {
    pub options: Vec<ResolvedOption>,
    pub value: String,
    pub on_change: Callback<String>,
}

impl Component for ChipSelect {
    type Message = ();
    type Properties = ChipSelectProps;

    fn create(_ctx: &Context<Self>) -> Self {
        ChipSelect
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        let selected = split_multi(&props.value);
        let label_of = |value: &str| {
            props
                .options
                .iter()
                .find(|o| o.value == value)
                .map(|o| o.label.clone())
                .unwrap_or_else(|| value.to_string())
        };

        let on_add = {
            let current = props.value.clone();
            let on_change = props.on_change.clone();
            Callback::from(move |e: Event| {
                let picked = selected_value(&e);
                if !picked.is_empty() {
                    on_change.emit(toggle_multi(&current, &picked, true));
                }
            })
        };

        html! {
            <div class="chip-select">
                { for selected.iter().map(|value| {
                    let current = props.value.clone();
                    let on_change = props.on_change.clone();
                    let removed = value.to_string();
                    html! {
                        <span class="chip">
                            { label_of(value) }
                            <button
                                type="button"
                                title="Quitar"
                                onclick={Callback::from(move |_| {
                                    on_change.emit(toggle_multi(&current, &removed, false))
                                })}
                            >
                                {"×"}
                            </button>
                        </span>
                    }
                }) }
                <select onchange={on_add}>
                    <option value="" selected=true>{"Agregar..."}</option>
                    { for props.options.iter().filter(|o| !selected.contains(&o.value.as_str())).map(|o| html! {
                        <option value={o.value.clone()}>{ o.label.clone() }</option>
                    }) }
                </select>
            </div>
        }
    }
}
