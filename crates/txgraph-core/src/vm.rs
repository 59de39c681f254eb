//! The injected program-validator seam.
//!
//! The virtual machine that evaluates control and issuance programs is
//! an external collaborator. The core only needs a yes/no answer, given
//! the program, its arguments, and read access to the transaction.

use bytes::Bytes;

use crate::entry::{Entry, TxHeader};
use crate::graph::Transaction;
use crate::hash::EntryId;
use crate::types::Program;

/// Read-only view handed to the program validator: the entry whose
/// program is running, the transaction header, and entry lookup.
pub struct TxContext<'a> {
    entry_id: EntryId,
    tx: &'a Transaction,
}

impl<'a> TxContext<'a> {
    pub(crate) fn new(entry_id: EntryId, tx: &'a Transaction) -> Self {
        Self { entry_id, tx }
    }

    /// The entry whose program is being evaluated.
    pub fn entry_id(&self) -> EntryId {
        self.entry_id
    }

    /// The transaction ID.
    pub fn tx_id(&self) -> EntryId {
        self.tx.id()
    }

    /// The transaction header.
    pub fn header(&self) -> &TxHeader {
        self.tx.header()
    }

    /// Look up any entry in the transaction.
    pub fn entry(&self, id: &EntryId) -> Option<&Entry> {
        self.tx.get(id)
    }
}

/// Evaluates version-1 programs against their arguments.
///
/// Implementations must be reentrant: one validator instance may be
/// shared across threads validating distinct transactions.
pub trait ProgramValidator: Send + Sync {
    /// Evaluate the program with the given arguments. `true` accepts.
    fn verify_program(&self, program: &Program, args: &[Bytes], ctx: &TxContext<'_>) -> bool;
}

impl<V: ProgramValidator + ?Sized> ProgramValidator for &V {
    fn verify_program(&self, program: &Program, args: &[Bytes], ctx: &TxContext<'_>) -> bool {
        (**self).verify_program(program, args, ctx)
    }
}

impl<V: ProgramValidator + ?Sized> ProgramValidator for std::sync::Arc<V> {
    fn verify_program(&self, program: &Program, args: &[Bytes], ctx: &TxContext<'_>) -> bool {
        (**self).verify_program(program, args, ctx)
    }
}
