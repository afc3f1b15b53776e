//! Build-time settings of the console.
//!
//! Both values are read with `option_env!` when the bundle is compiled, so a
//! deployment picks its API by exporting `FICHAS_API_URL` before `trunk build`.

/// Base URL of the fichas API.
pub const API_URL: &str = match option_env!("FICHAS_API_URL") {
    Some(url) => url,
    None => "http://localhost:8000/api",
};

/// Path prefix of the report endpoints served by the console host itself.
pub const REPORTS_URL: &str = "/api/reports";

/// `localStorage` key holding the bearer token.
pub const TOKEN_KEY: &str = "auth_token";

/// `localStorage` key holding the signed-in user as JSON.
pub const USER_KEY: &str = "auth_user";

/// Form whose schema drives the editor when the URL does not name one.
pub fn default_form_id() -> i64 {
    option_env!("FICHAS_FORM_ID")
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(1)
}
