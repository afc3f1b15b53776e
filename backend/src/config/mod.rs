//! Host configuration.
//!
//! Values come from environment variables with the `FICHAS` prefix and `__`
//! between nested keys, after loading a `.env` file when one exists:
//!
//! - `FICHAS__SERVER__HOST` / `FICHAS__SERVER__PORT` / `FICHAS__SERVER__OPEN_BROWSER`
//! - `FICHAS__REPORTS__FONTS_DIR` / `FICHAS__REPORTS__FONT_FAMILY`
//! - `FICHAS__REPORTS__FETCH_TIMEOUT_SECS`
//!
//! Every value has a default, so an empty environment serves on
//! `127.0.0.1:8080` with LiberationSans from `./fonts`.

mod error;

pub use error::{ConfigError, ValidationError};

use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub reports: ReportsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Opens the console in the default browser once the server is up.
    #[serde(default = "default_open_browser")]
    pub open_browser: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportsConfig {
    #[serde(default = "default_fonts_dir")]
    pub fonts_dir: String,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    /// Timeout for each remote image fetched while printing.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_open_browser() -> bool {
    true
}

fn default_fonts_dir() -> String {
    "./fonts".to_string()
}

fn default_font_family() -> String {
    "LiberationSans".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            open_browser: default_open_browser(),
        }
    }
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            fonts_dir: default_fonts_dir(),
            font_family: default_font_family(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

impl ServerConfig {
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        if self.host.trim().is_empty() {
            return Err(ValidationError::EmptyHost);
        }
        Ok(())
    }
}

impl ReportsConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.font_family.trim().is_empty() {
            return Err(ValidationError::EmptyFontFamily);
        }
        if self.fetch_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl AppConfig {
    /// Loads `.env` if present, then reads the `FICHAS__*` variables.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("FICHAS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.reports.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Environment variables are process-wide.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 4] = [
        "FICHAS__SERVER__PORT",
        "FICHAS__SERVER__OPEN_BROWSER",
        "FICHAS__REPORTS__FONT_FAMILY",
        "FICHAS__REPORTS__FETCH_TIMEOUT_SECS",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn defaults_apply_without_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();

        let config = AppConfig::load().unwrap();

        assert_eq!(config.server.url(), "http://127.0.0.1:8080");
        assert!(config.server.open_browser);
        assert_eq!(config.reports.fonts_dir, "./fonts");
        assert_eq!(config.reports.font_family, "LiberationSans");
        assert_eq!(config.reports.fetch_timeout(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn nested_variables_override_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("FICHAS__SERVER__PORT", "9090");
        env::set_var("FICHAS__SERVER__OPEN_BROWSER", "false");
        env::set_var("FICHAS__REPORTS__FONT_FAMILY", "Arial");

        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 9090);
        assert!(!config.server.open_browser);
        assert_eq!(config.reports.font_family, "Arial");
    }

    #[test]
    fn port_zero_is_rejected() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert_eq!(config.validate(), Err(ValidationError::InvalidPort));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = AppConfig::default();
        config.reports.fetch_timeout_secs = 0;
        assert_eq!(config.validate(), Err(ValidationError::InvalidTimeout));
    }
}
