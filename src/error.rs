//! Error types for the xrayctl CLI

use serde_json::{json, Value};
use thiserror::Error;

/// Result type alias for xrayctl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    /// Upstream API answered with a status >= 400. Carries the server-provided
    /// message and the raw (parsed-or-text) body for diagnostics.
    #[error("{message}")]
    Http {
        status: u16,
        message: String,
        body: Value,
    },

    #[error("{0}")]
    Validation(String),

    #[error("unexpected API response: {0}")]
    Response(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Process exit code: 2 for upstream HTTP errors, 1 for everything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Http { .. } => 2,
            _ => 1,
        }
    }

    /// Error payload rendered through the regular output formatter.
    pub fn to_payload(&self) -> Value {
        match self {
            Error::Http {
                status,
                message,
                body,
            } => json!({
                "ok": false,
                "error": message,
                "status_code": status,
                "details": body,
            }),
            other => json!({
                "ok": false,
                "error": other.to_string(),
            }),
        }
    }
}
