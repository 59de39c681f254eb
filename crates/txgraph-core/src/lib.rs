//! # txgraph Core
//!
//! Pure primitives for the txgraph transaction model: entries, canonical
//! encoding, content-addressed IDs, and validation.
//!
//! This crate contains no I/O, no storage, no networking. It is pure
//! computation over cryptographic data structures.
//!
//! ## Key Types
//!
//! - [`Entry`] - The eight entry variants a transaction is built from
//! - [`EntryId`] - Content-addressed identifier (SHA3-256, body only)
//! - [`Transaction`] - A header-rooted graph of entries
//! - [`ProgramValidator`] - The injected seam to the program VM
//!
//! ## Canonical encoding
//!
//! Entry bodies use a fixed varint/length-prefix encoding; see [`codec`].
//! The encoding is frozen: it is the input to the entry ID hash, and any
//! deviation forks the chain.
//!
//! ## Validation
//!
//! [`validate`] walks the graph from the header, enforcing per-entry
//! rules, value-flow edge symmetry, and per-asset conservation at every
//! mux. It is pure and safe to call concurrently on distinct
//! transactions.

pub mod codec;
pub mod entry;
pub mod error;
pub mod graph;
pub mod hash;
pub mod types;
pub mod validation;
pub mod vm;

pub use codec::{DecodeError, MAX_INT};
pub use entry::{
    Entry, Issuance, IssuanceWitness, Mux, MuxWitness, Nonce, NonceWitness, Output, Retirement,
    Spend, SpendWitness, TimeRange, TxHeader,
};
pub use error::{
    ConservationError, ExtensionError, IssuanceAnchorError, ProgramError, StructuralError,
    TimeRangeError, TypeError, ValidationError, ValidationFailure, ValueFlowError,
};
pub use graph::Transaction;
pub use hash::{entry_id, AssetId, EntryId, Hash};
pub use types::{
    AssetAmount, AssetDefinition, IssuanceOnly, NonceOrSpend, OutputOnly, OutputOrRetirement,
    OutputRetirementOrMux, Pointer, Program, SpendIssuanceOrMux, TargetSet, TimeRangeOnly,
    ValueDestination, ValueSource,
};
pub use validation::validate;
pub use vm::{ProgramValidator, TxContext};
