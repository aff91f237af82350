use thiserror::Error;

use crate::domain::allocation::TargetId;

/// Errors surfaced by the analytics engine. Degenerate-but-valid inputs
/// (zero basis totals, undersized samples, no matching tier) are not errors;
/// they produce empty or zero results instead.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("operation references unknown target `{target_id}`")]
    UnknownTarget { target_id: String },
}

impl EngineError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput { message: message.into() }
    }

    pub fn unknown_target(target_id: &TargetId) -> Self {
        Self::UnknownTarget { target_id: target_id.0.clone() }
    }
}
