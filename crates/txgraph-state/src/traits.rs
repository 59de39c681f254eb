//! ChainState trait: the abstract interface to the UTXO and Nonce sets.
//!
//! This trait keeps the core storage-agnostic. Durable backends live
//! elsewhere; this crate ships an in-memory implementation for tests and
//! reference semantics.

use async_trait::async_trait;

use txgraph_core::EntryId;

use crate::error::Result;

/// The chain-state interface: membership and mutation of the UTXO and
/// Nonce sets, inside a transactional scope.
///
/// # Design Notes
///
/// - **Transactional scope**: mutations accumulate until [`commit`] and
///   disappear on [`rollback`]. A `validate + apply` pair runs inside
///   one scope so a rejected application leaves no trace.
/// - **Snapshot reads**: reads observe earlier uncommitted writes of the
///   same scope. The implementation owns its serialization policy across
///   concurrent scopes.
/// - **Idempotence**: applying the same accepted transaction to the same
///   snapshot produces the same final state.
///
/// [`commit`]: ChainState::commit
/// [`rollback`]: ChainState::rollback
#[async_trait]
pub trait ChainState: Send + Sync {
    /// Whether the output is currently unspent.
    async fn contains_utxo(&self, id: &EntryId) -> Result<bool>;

    /// Add an output to the UTXO set.
    async fn insert_utxo(&self, id: EntryId) -> Result<()>;

    /// Remove an output from the UTXO set. Returns whether it was
    /// present.
    async fn remove_utxo(&self, id: &EntryId) -> Result<bool>;

    /// Whether the nonce was already consumed.
    async fn contains_nonce(&self, id: &EntryId) -> Result<bool>;

    /// Record a nonce as consumed.
    async fn insert_nonce(&self, id: EntryId) -> Result<()>;

    /// Make all uncommitted mutations durable.
    async fn commit(&self) -> Result<()>;

    /// Discard all uncommitted mutations.
    async fn rollback(&self) -> Result<()>;
}
