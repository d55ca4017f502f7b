//! Errors from the observability layer.

use qsim_core::state::StateError;
use thiserror::Error;

/// Convenience alias for results within the observe crate.
pub type Result<T> = std::result::Result<T, ObserveError>;

/// Errors that can occur during view rendering.
#[derive(Debug, Error)]
pub enum ObserveError {
    #[error("unknown view: '{name}'. Available views: adjacency, states, transitions, summary, dot")]
    UnknownView { name: String },

    #[error("unknown format: '{name}'. Available formats: text, json")]
    UnknownFormat { name: String },

    #[error("state not in graph: '{query}'")]
    UnknownState { query: String },

    #[error("invalid state: {0}")]
    InvalidState(#[from] StateError),

    #[error("summary view requires phase statistics")]
    NoPhaseStats,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
