//! Core domain errors.

use thiserror::Error;

/// Core domain errors for Agentdeck.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Invalid submission input, rejected before reaching the remote store.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
