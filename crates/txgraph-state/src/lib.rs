//! # txgraph State
//!
//! The chain-state side of txgraph: the [`ChainState`] interface to the
//! UTXO and Nonce sets, an in-memory reference implementation, and the
//! application of accepted transactions.
//!
//! Validation (in `txgraph-core`) is pure; this crate owns everything
//! that touches state. The intended calling pattern is:
//!
//! 1. open a chain-state scope,
//! 2. `validate` the transaction,
//! 3. [`apply`] its delta,
//! 4. commit on success, roll back on any error.

pub mod apply;
pub mod error;
pub mod memory;
pub mod traits;

pub use apply::{apply, BlockContext, StateDelta};
pub use error::StateError;
pub use memory::MemoryState;
pub use traits::ChainState;
