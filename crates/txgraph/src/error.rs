//! Error types for the processor.

use thiserror::Error;

use txgraph_core::ValidationFailure;
use txgraph_state::StateError;

/// Processor error: a transaction failed validation or application.
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// The transaction violated a validation rule.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationFailure),

    /// The transaction could not be applied to chain state.
    #[error("state application failed: {0}")]
    State(#[from] StateError),
}

/// Result type for processor operations.
pub type Result<T> = std::result::Result<T, ProcessorError>;
