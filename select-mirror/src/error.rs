//! Error types

use pagedom::{DomError, NodeId};
use thiserror::Error;

/// Failure to read a caller-supplied options object.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid options object: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure to render the mirror list of one control.
///
/// Only the control being rendered is affected; the orchestrator keeps going
/// with the next one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("control {control} is a <{tag}>, expected a <select>")]
    NotASelect { control: NodeId, tag: String },

    #[error(transparent)]
    Dom(#[from] DomError),
}
