use serde_json::Value;
use yew::prelude::*;

use common::geo::GeoPoint;

/// Read-only location: the stored point, or the default center with a notice
/// when the record has none. Links out to OpenStreetMap.
pub fn map_widget(value: Option<&Value>) -> Html {
    let (point, recorded) = GeoPoint::or_default_center(GeoPoint::parse(value));
    let osm = format!(
        "https://www.openstreetmap.org/?mlat={lat}&mlon={lng}#map=15/{lat}/{lng}",
        lat = point.lat,
        lng = point.lng
    );
    html! {
        <div class="map-widget">
            <span>{ point.describe() }</span>
            {
                if recorded {
                    html! {}
                } else {
                    html! { <span class="muted">{"Ubicación no registrada; se muestra el centro por defecto."}</span> }
                }
            }
            <a href={osm} target="_blank" rel="noopener">{"Ver en mapa"}</a>
        </div>
    }
}
