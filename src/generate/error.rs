//! Error taxonomy for the generation panel.
//!
//! Nothing here is fatal: validation errors are surfaced as pre-dispatch
//! notices, transport and format problems are converted into a `Failed`
//! classification so the panel always has something to render.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    /// Rejected before dispatch; no network call was made
    #[error("no content supplied")]
    Validation,

    /// Network failure or the request could not be built
    #[error("request to {endpoint} failed: {message}")]
    Transport { endpoint: String, message: String },

    /// Structured response did not have the expected shape
    #[error("unexpected response payload: {0}")]
    Format(String),
}

impl GenerateError {
    pub(crate) fn transport(endpoint: impl Into<String>, message: impl ToString) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }
}
