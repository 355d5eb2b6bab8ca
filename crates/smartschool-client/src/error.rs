//! Client error types.

use smartschool_config::ConfigError;
use smartschool_core::CoreError;
use thiserror::Error;

/// Errors that can occur while talking to the portal.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Credentials rejected, a verification step that cannot be completed,
    /// or still on the login page after signing in.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The portal returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the portal.
        status: u16,
        /// Response body.
        message: String,
    },

    /// The portal returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// A response did not have the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    #[error("download failed: {0}")]
    Download(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cookie store error: {0}")]
    CookieStore(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CoreError> for ClientError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Parse(msg) => Self::Parse(msg),
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(format!("unexpected JSON: {err}"))
    }
}
