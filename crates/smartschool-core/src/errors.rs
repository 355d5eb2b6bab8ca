//! Cross-cutting error types.
//!
//! Transport and session errors live in `smartschool-client`; this crate only
//! fails while interpreting portal values.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// A portal value did not have the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),
}
