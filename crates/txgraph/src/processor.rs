//! The processor: validate + apply under one chain-state scope.
//!
//! Validation is pure and runs first; only an accepted transaction
//! touches state. Application happens inside the state's uncommitted
//! scope and is committed on success or rolled back on any error, so a
//! rejected transaction leaves no trace.

use std::sync::Arc;

use tracing::{info, warn};

use txgraph_core::{validate, ProgramValidator, Transaction};
use txgraph_state::{apply, BlockContext, ChainState, StateDelta};

use crate::error::{ProcessorError, Result};

/// Configuration for the processor.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Whether to validate transactions on submit. Disable only for
    /// transactions already validated by the same build (replays from a
    /// trusted log).
    pub validate_on_submit: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            validate_on_submit: true,
        }
    }
}

/// Runs transactions through `validate + apply` against a chain state.
///
/// The processor owns nothing mutable itself; it can be shared across
/// threads and used for distinct transactions concurrently, subject to
/// the chain state's own serialization policy.
pub struct TxProcessor<S: ChainState, V: ProgramValidator> {
    state: Arc<S>,
    vm: V,
    config: ProcessorConfig,
}

impl<S: ChainState, V: ProgramValidator> TxProcessor<S, V> {
    /// Create a processor with the default configuration.
    pub fn new(state: S, vm: V) -> Self {
        Self::with_config(state, vm, ProcessorConfig::default())
    }

    /// Create a processor with an explicit configuration.
    pub fn with_config(state: S, vm: V, config: ProcessorConfig) -> Self {
        Self {
            state: Arc::new(state),
            vm,
            config,
        }
    }

    /// The underlying chain state.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Validate a transaction and apply its effects.
    ///
    /// On success the state scope is committed and the applied delta
    /// returned. On any failure the scope is rolled back and the
    /// transaction rejected; the process continues.
    pub async fn submit(&self, tx: &Transaction, ctx: &BlockContext) -> Result<StateDelta> {
        if self.config.validate_on_submit {
            if let Err(failure) = validate(tx, &self.vm) {
                warn!(tx = %tx.id(), error = %failure, "transaction rejected");
                return Err(ProcessorError::Validation(failure));
            }
        }

        match apply(&*self.state, tx, ctx).await {
            Ok(delta) => {
                self.state.commit().await?;
                info!(
                    tx = %tx.id(),
                    spent = delta.spent_outputs.len(),
                    created = delta.created_outputs.len(),
                    "transaction accepted"
                );
                Ok(delta)
            }
            Err(e) => {
                self.state.rollback().await?;
                warn!(tx = %tx.id(), error = %e, "transaction rejected at apply");
                Err(e.into())
            }
        }
    }
}
