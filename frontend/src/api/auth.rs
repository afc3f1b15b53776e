//! Session data left in `localStorage` by the login page.

use serde::Deserialize;
use web_sys::Storage;

use crate::config::{TOKEN_KEY, USER_KEY};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionUser {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
}

fn storage() -> Option<Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// Bearer token, if the user is signed in.
pub fn token() -> Option<String> {
    storage()?
        .get_item(TOKEN_KEY)
        .ok()?
        .filter(|t| !t.trim().is_empty())
}

pub fn current_user() -> Option<SessionUser> {
    let raw = storage()?.get_item(USER_KEY).ok()??;
    match serde_json::from_str(&raw) {
        Ok(user) => Some(user),
        Err(err) => {
            log::warn!("Ignoring unreadable {}: {}", USER_KEY, err);
            None
        }
    }
}
