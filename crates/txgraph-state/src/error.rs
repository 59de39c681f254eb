//! Error types for the state module.

use thiserror::Error;

use txgraph_core::EntryId;

/// Errors that can occur while applying an accepted transaction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    /// A spend references an output that is not in the UTXO set.
    #[error("spent output {0} is not in the utxo set")]
    MissingUtxo(EntryId),

    /// A nonce was already consumed (replay).
    #[error("nonce {0} was already consumed")]
    DuplicateNonce(EntryId),

    /// The header's time window excludes the block timestamp.
    #[error(
        "block timestamp {timestamp_ms} outside header window [{mintime}, {maxtime}]"
    )]
    TimeBounds {
        mintime: u64,
        maxtime: u64,
        timestamp_ms: u64,
    },

    /// The backing store failed.
    #[error("state backend error: {0}")]
    Backend(String),
}

/// Result type for state operations.
pub type Result<T> = std::result::Result<T, StateError>;
