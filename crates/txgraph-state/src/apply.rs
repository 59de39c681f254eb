//! State application: turning an accepted transaction into UTXO and
//! Nonce set mutations.
//!
//! The delta is computed by a pure second pass over the transaction;
//! applying it mutates chain state through the [`ChainState`] scope. The
//! caller commits on success and rolls back on any error, so application
//! is atomic.

use tracing::debug;

use txgraph_core::{Entry, EntryId, Transaction};

use crate::error::{Result, StateError};
use crate::traits::ChainState;

/// The block-level context a transaction is applied under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockContext {
    /// Timestamp of the enclosing block, in milliseconds.
    pub timestamp_ms: u64,
}

impl BlockContext {
    /// Create a context for the given block timestamp.
    pub fn new(timestamp_ms: u64) -> Self {
        Self { timestamp_ms }
    }
}

/// The effects of one accepted transaction, in a deterministic order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StateDelta {
    /// Outputs consumed by spends.
    pub spent_outputs: Vec<EntryId>,

    /// Outputs created by this transaction's results.
    pub created_outputs: Vec<EntryId>,

    /// Nonces consumed for replay protection.
    pub consumed_nonces: Vec<EntryId>,
}

impl StateDelta {
    /// Compute the delta for a transaction.
    ///
    /// Spends and nonces are collected from the reachable set; created
    /// outputs come from the header's results, which is where every
    /// validated output lives. Each list is sorted so the delta is a
    /// pure function of the transaction.
    pub fn compute(tx: &Transaction) -> Self {
        let mut delta = Self::default();

        for id in tx.reachable() {
            match tx.get(&id) {
                Some(Entry::Spend(spend)) => delta.spent_outputs.push(spend.spent_output.id()),
                Some(Entry::Nonce(_)) => delta.consumed_nonces.push(id),
                _ => {}
            }
        }

        for result in &tx.header().results {
            if let Some(Entry::Output(_)) = tx.get(&result.id()) {
                delta.created_outputs.push(result.id());
            }
        }

        delta.spent_outputs.sort();
        delta.created_outputs.sort();
        delta.consumed_nonces.sort();
        delta
    }

    /// Whether the transaction leaves chain state untouched.
    pub fn is_empty(&self) -> bool {
        self.spent_outputs.is_empty()
            && self.created_outputs.is_empty()
            && self.consumed_nonces.is_empty()
    }
}

/// Apply an accepted transaction's effects against chain state.
///
/// Checks the header's time bounds, removes spent outputs, inserts
/// created outputs, and consumes nonces, in that order. Every mutation
/// lands in the state's uncommitted scope; on error the caller must
/// roll the scope back.
pub async fn apply<S: ChainState + ?Sized>(
    state: &S,
    tx: &Transaction,
    ctx: &BlockContext,
) -> Result<StateDelta> {
    let header = tx.header();

    // mintime/maxtime of zero leave that side of the window open
    if header.mintime != 0 && header.mintime >= ctx.timestamp_ms {
        return Err(time_bounds(header.mintime, header.maxtime, ctx));
    }
    if header.maxtime != 0 && header.maxtime <= ctx.timestamp_ms {
        return Err(time_bounds(header.mintime, header.maxtime, ctx));
    }

    let delta = StateDelta::compute(tx);

    for id in &delta.spent_outputs {
        if !state.remove_utxo(id).await? {
            return Err(StateError::MissingUtxo(*id));
        }
    }
    for id in &delta.created_outputs {
        state.insert_utxo(*id).await?;
    }
    for id in &delta.consumed_nonces {
        if state.contains_nonce(id).await? {
            return Err(StateError::DuplicateNonce(*id));
        }
        state.insert_nonce(*id).await?;
    }

    debug!(
        tx = %tx.id(),
        spent = delta.spent_outputs.len(),
        created = delta.created_outputs.len(),
        nonces = delta.consumed_nonces.len(),
        "applied transaction delta"
    );

    Ok(delta)
}

fn time_bounds(mintime: u64, maxtime: u64, ctx: &BlockContext) -> StateError {
    StateError::TimeBounds {
        mintime,
        maxtime,
        timestamp_ms: ctx.timestamp_ms,
    }
}
