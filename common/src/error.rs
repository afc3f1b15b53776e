use thiserror::Error;

/// Errors raised while decoding schemas and records coming from the fichas API.
#[derive(Debug, Error)]
pub enum FichaError {
    #[error("Invalid schema: {0}")]
    InvalidSchema(&'static str),

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed data URL")]
    InvalidDataUrl,
}
