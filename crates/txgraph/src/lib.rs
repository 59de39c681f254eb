//! # txgraph
//!
//! A transaction model built from content-addressed entries: a header
//! roots a DAG of outputs, spends, issuances, nonces, and muxes, wired
//! together by self-verifying value-flow edges.
//!
//! ## Core Invariants
//!
//! 1. **Content-addressable**: `entry_id = H("entryid:" || tag || ":" || H(body))`
//! 2. **Witness-independent IDs**: witness data never changes an ID
//! 3. **Edge symmetry**: every value edge agrees with its reverse edge
//! 4. **Conservation**: per-asset totals balance at every mux
//! 5. **Atomic application**: accepted effects commit together or not at
//!    all
//!
//! ## Example
//!
//! ```no_run
//! use txgraph::{BlockContext, MemoryState, TxProcessor};
//! # use bytes::Bytes;
//! # use txgraph::{Program, ProgramValidator, Transaction, TxContext};
//! # struct Vm;
//! # impl ProgramValidator for Vm {
//! #     fn verify_program(&self, _: &Program, _: &[Bytes], _: &TxContext<'_>) -> bool { true }
//! # }
//! # async fn submit(tx: Transaction) -> Result<(), txgraph::ProcessorError> {
//! let processor = TxProcessor::new(MemoryState::new(), Vm);
//! processor.submit(&tx, &BlockContext::new(1_000)).await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod processor;

pub use error::{ProcessorError, Result};
pub use processor::{ProcessorConfig, TxProcessor};

pub use txgraph_core::{
    entry_id, validate, AssetAmount, AssetDefinition, AssetId, ConservationError, DecodeError,
    Entry, EntryId, ExtensionError, Hash, Issuance, IssuanceAnchorError, Mux, Nonce, Output,
    Pointer, Program, ProgramError, ProgramValidator, Retirement, Spend, StructuralError,
    TimeRange, TimeRangeError, Transaction, TxContext, TxHeader, TypeError, ValidationError,
    ValidationFailure, ValueDestination, ValueFlowError, ValueSource,
};
pub use txgraph_state::{apply, BlockContext, ChainState, MemoryState, StateDelta, StateError};
