//! Error types for the store client.

use thiserror::Error;

/// Errors that can occur when talking to the remote task/agent store.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store rejected the request. `message` is human-readable and
    /// safe to surface to the operator.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The required scope is not available yet (e.g. no agent of the
    /// requested kind exists).
    #[error("not ready: {0}")]
    NotReady(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}
