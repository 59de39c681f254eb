//! In-memory implementation of the ChainState trait.
//!
//! This is primarily for testing. It has the same transactional
//! semantics a durable backend must provide, but keeps everything in
//! memory: committed sets plus an uncommitted overlay.

use std::collections::HashSet;
use std::sync::RwLock;

use async_trait::async_trait;

use txgraph_core::EntryId;

use crate::error::Result;
use crate::traits::ChainState;

/// In-memory chain state.
///
/// All data is lost when the value is dropped. Thread-safe via RwLock.
pub struct MemoryState {
    inner: RwLock<MemoryStateInner>,
}

#[derive(Default)]
struct MemoryStateInner {
    /// Committed UTXO set.
    utxos: HashSet<EntryId>,

    /// Committed nonce set.
    nonces: HashSet<EntryId>,

    /// Uncommitted overlay.
    pending_utxo_inserts: HashSet<EntryId>,
    pending_utxo_removes: HashSet<EntryId>,
    pending_nonce_inserts: HashSet<EntryId>,
}

impl MemoryState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStateInner::default()),
        }
    }

    /// Seed the committed UTXO set directly, bypassing the overlay.
    /// Test setup only.
    pub fn seed_utxo(&self, id: EntryId) {
        self.inner.write().unwrap().utxos.insert(id);
    }

    /// Number of committed unspent outputs.
    pub fn utxo_count(&self) -> usize {
        self.inner.read().unwrap().utxos.len()
    }

    /// Number of committed consumed nonces.
    pub fn nonce_count(&self) -> usize {
        self.inner.read().unwrap().nonces.len()
    }
}

impl Default for MemoryState {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChainState for MemoryState {
    async fn contains_utxo(&self, id: &EntryId) -> Result<bool> {
        let inner = self.inner.read().unwrap();
        let present = inner.pending_utxo_inserts.contains(id)
            || (inner.utxos.contains(id) && !inner.pending_utxo_removes.contains(id));
        Ok(present)
    }

    async fn insert_utxo(&self, id: EntryId) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        inner.pending_utxo_removes.remove(&id);
        inner.pending_utxo_inserts.insert(id);
        Ok(())
    }

    async fn remove_utxo(&self, id: &EntryId) -> Result<bool> {
        let mut inner = self.inner.write().unwrap();
        if inner.pending_utxo_inserts.remove(id) {
            return Ok(true);
        }
        if inner.utxos.contains(id) && !inner.pending_utxo_removes.contains(id) {
            inner.pending_utxo_removes.insert(*id);
            return Ok(true);
        }
        Ok(false)
    }

    async fn contains_nonce(&self, id: &EntryId) -> Result<bool> {
        let inner = self.inner.read().unwrap();
        Ok(inner.nonces.contains(id) || inner.pending_nonce_inserts.contains(id))
    }

    async fn insert_nonce(&self, id: EntryId) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        inner.pending_nonce_inserts.insert(id);
        Ok(())
    }

    async fn commit(&self) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        let removes: Vec<EntryId> = inner.pending_utxo_removes.drain().collect();
        for id in removes {
            inner.utxos.remove(&id);
        }
        let inserts: Vec<EntryId> = inner.pending_utxo_inserts.drain().collect();
        inner.utxos.extend(inserts);
        let nonces: Vec<EntryId> = inner.pending_nonce_inserts.drain().collect();
        inner.nonces.extend(nonces);
        Ok(())
    }

    async fn rollback(&self) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        inner.pending_utxo_inserts.clear();
        inner.pending_utxo_removes.clear();
        inner.pending_nonce_inserts.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(byte: u8) -> EntryId {
        EntryId::from_bytes([byte; 32])
    }

    #[tokio::test]
    async fn test_insert_visible_before_commit() {
        let state = MemoryState::new();
        state.insert_utxo(id(1)).await.unwrap();

        assert!(state.contains_utxo(&id(1)).await.unwrap());
        assert_eq!(state.utxo_count(), 0); // not yet committed

        state.commit().await.unwrap();
        assert_eq!(state.utxo_count(), 1);
    }

    #[tokio::test]
    async fn test_rollback_discards_overlay() {
        let state = MemoryState::new();
        state.insert_utxo(id(1)).await.unwrap();
        state.insert_nonce(id(2)).await.unwrap();

        state.rollback().await.unwrap();

        assert!(!state.contains_utxo(&id(1)).await.unwrap());
        assert!(!state.contains_nonce(&id(2)).await.unwrap());
        assert_eq!(state.utxo_count(), 0);
        assert_eq!(state.nonce_count(), 0);
    }

    #[tokio::test]
    async fn test_remove_committed_utxo() {
        let state = MemoryState::new();
        state.seed_utxo(id(1));

        assert!(state.remove_utxo(&id(1)).await.unwrap());
        assert!(!state.contains_utxo(&id(1)).await.unwrap());

        // double remove within the same scope fails
        assert!(!state.remove_utxo(&id(1)).await.unwrap());

        state.commit().await.unwrap();
        assert_eq!(state.utxo_count(), 0);
    }

    #[tokio::test]
    async fn test_remove_uncommitted_insert() {
        let state = MemoryState::new();
        state.insert_utxo(id(1)).await.unwrap();
        assert!(state.remove_utxo(&id(1)).await.unwrap());
        assert!(!state.contains_utxo(&id(1)).await.unwrap());

        state.commit().await.unwrap();
        assert_eq!(state.utxo_count(), 0);
    }

    #[tokio::test]
    async fn test_remove_missing_utxo_reports_absent() {
        let state = MemoryState::new();
        assert!(!state.remove_utxo(&id(9)).await.unwrap());
    }

    #[tokio::test]
    async fn test_rollback_restores_removed_utxo() {
        let state = MemoryState::new();
        state.seed_utxo(id(1));

        assert!(state.remove_utxo(&id(1)).await.unwrap());
        state.rollback().await.unwrap();

        assert!(state.contains_utxo(&id(1)).await.unwrap());
        assert_eq!(state.utxo_count(), 1);
    }

    #[tokio::test]
    async fn test_nonce_visibility() {
        let state = MemoryState::new();
        assert!(!state.contains_nonce(&id(3)).await.unwrap());

        state.insert_nonce(id(3)).await.unwrap();
        assert!(state.contains_nonce(&id(3)).await.unwrap());

        state.commit().await.unwrap();
        assert!(state.contains_nonce(&id(3)).await.unwrap());
        assert_eq!(state.nonce_count(), 1);
    }
}
