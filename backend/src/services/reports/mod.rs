//! # Report Service Module
//!
//! PDF endpoints of the console host, under `/api/reports`. The browser sends
//! everything needed to print, so these handlers never call the fichas API.
//!
//! ## Sub-modules:
//! - `ficha`: the printable ficha with audit, georeference, sections and images.
//! - `dictionary`: the ISO 8000 data dictionary of a form.
//! - `pdf`: genpdf document setup and table helpers.
//! - `images`: remote fetch, two-tier decode and PNG flattening.

mod dictionary;
mod ficha;
mod images;
mod pdf;

use actix_web::web::{post, scope};
use actix_web::Scope;

use crate::config::ReportsConfig;

/// The base path for all report endpoints.
const API_PATH: &str = "/api/reports";

/// Shared by the report handlers.
#[derive(Clone)]
pub struct ReportsState {
    pub settings: ReportsConfig,
    /// Client used for remote images, with the configured timeout.
    pub client: reqwest::Client,
}

impl ReportsState {
    pub fn new(settings: ReportsConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(settings.fetch_timeout())
            .build()?;
        Ok(Self { settings, client })
    }
}

/// Configures and returns the Actix `Scope` for the report routes.
///
/// # Registered Routes:
///
/// *   **`POST /ficha`**:
///     - **Handler**: `ficha::process`
///     - **Description**: Expects `{form, ficha, catalogs}` and returns the ficha PDF
///       inline (`application/pdf`).
///
/// *   **`POST /dictionary`**:
///     - **Handler**: `dictionary::process`
///     - **Description**: Expects `{form}` and returns the data dictionary PDF as an
///       attachment named after the form.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/ficha", post().to(ficha::process))
        .route("/dictionary", post().to(dictionary::process))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, web, App};

    #[actix_web::test]
    async fn malformed_report_body_is_rejected() {
        let state = ReportsState::new(ReportsConfig::default()).unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(configure_routes()),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/reports/dictionary")
            .set_json(serde_json::json!({"schema": []}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn report_routes_only_accept_post() {
        let state = ReportsState::new(ReportsConfig::default()).unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(configure_routes()),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/reports/ficha").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_client_error());
    }
}
