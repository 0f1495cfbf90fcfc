//! Error types for the fallible edges of the game
//!
//! The simulation itself never fails. Errors only come from decoding
//! persisted data or tuning overrides, and callers fall back to defaults.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to decode `{key}`: {source}")]
    Decode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode `{key}`: {source}")]
    Encode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning value `{field}` {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}
