//! Risk assessment section: fields grouped into panels plus a live score.
//!
//! The live score only reflects the values on screen. The risk level next to
//! it is whatever the backend stored with the record.

use yew::html::Scope;
use yew::prelude::*;

use common::model::form::Section;
use common::risk::{group_fields, live_score, RiskBand, RiskGroup};

use super::field_switch::field_switch;
use super::state::FichaEditor;

pub fn risk_panel(component: &FichaEditor, link: &Scope<FichaEditor>, section: &Section) -> Html {
    let score = live_score(&section.fields, component.store.data());
    let band = RiskBand::from_score(score);
    let level = component
        .ficha
        .as_ref()
        .and_then(|f| f.risk_level.clone())
        .unwrap_or_else(|| "Sin evaluar".to_string());

    html! {
        <div class="risk-section">
            <div class={classes!("risk-score", format!("band-{}", band.color()))}>
                <span class="risk-score-value">{ score.to_string() }</span>
                <span>{ format!("Puntaje en vivo · {}", level) }</span>
            </div>
            { for group_fields(&section.fields).into_iter().map(|(group, fields)| html! {
                <div class={classes!("risk-group", (group == RiskGroup::Header).then_some("header"))}>
                    <h4>{ group.title() }</h4>
                    <div class="section-fields grid">
                        { for fields.into_iter().map(|field| field_switch(component, link, field)) }
                    </div>
                </div>
            }) }
        </div>
    }
}
