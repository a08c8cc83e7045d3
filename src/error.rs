//! OrderTalk Error Types
//!
//! Centralized error handling for the order engine.
//!
//! Unrecognized or malformed utterances are NOT errors: they degrade to a
//! noop outcome (see [`crate::mutator`]). These variants cover collaborator
//! failures only (configuration files, serialization, catalog plumbing).

use thiserror::Error;

/// Central error type for OrderTalk
#[derive(Error, Debug)]
pub enum OrderError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Menu catalog error: {0}")]
    Catalog(String),

    #[error("Order store error: {0}")]
    Store(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for OrderTalk operations
pub type OrderResult<T> = Result<T, OrderError>;
