//! The transaction graph: a set of entries addressed by ID, rooted at a
//! header.
//!
//! Construction computes content addresses and rejects collisions.
//! Everything else (dangling pointers, type discipline, edge symmetry)
//! is checked during validation, so a graph value may represent an
//! invalid transaction.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::entry::{Entry, TxHeader};
use crate::error::{StructuralError, TypeError, ValidationError};
use crate::hash::EntryId;
use crate::types::{Pointer, TargetSet};

/// A transaction: a header plus the entries it references, keyed by
/// entry ID. The header's ID is the transaction ID.
#[derive(Debug, Clone)]
pub struct Transaction {
    header_id: EntryId,
    entries: HashMap<EntryId, Entry>,
}

impl Transaction {
    /// Assemble a transaction from its header and remaining entries.
    ///
    /// Entry IDs are computed here; an ID already present is fatal.
    pub fn new(header: TxHeader, rest: Vec<Entry>) -> Result<Self, StructuralError> {
        let header_id = header.id();
        let mut entries = HashMap::with_capacity(rest.len() + 1);
        entries.insert(header_id, Entry::TxHeader(header));

        for entry in rest {
            let id = entry.id();
            if entries.insert(id, entry).is_some() {
                return Err(StructuralError::DuplicateEntry(id));
            }
        }

        Ok(Self { header_id, entries })
    }

    /// The transaction ID (the header's entry ID).
    pub fn id(&self) -> EntryId {
        self.header_id
    }

    /// The header entry.
    pub fn header(&self) -> &TxHeader {
        match &self.entries[&self.header_id] {
            Entry::TxHeader(h) => h,
            _ => unreachable!("header slot always holds a TxHeader"),
        }
    }

    /// Look up an entry by ID.
    pub fn get(&self, id: &EntryId) -> Option<&Entry> {
        self.entries.get(id)
    }

    /// Number of entries, header included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the transaction holds only its header.
    pub fn is_empty(&self) -> bool {
        self.entries.len() == 1
    }

    /// Iterate over all entries in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = (&EntryId, &Entry)> {
        self.entries.iter()
    }

    /// Resolve a typed pointer: the entry must be present and its
    /// variant must be in the pointer's target set.
    pub fn resolve<T: TargetSet>(&self, ptr: &Pointer<T>) -> Result<&Entry, ValidationError> {
        let entry = self
            .entries
            .get(&ptr.id())
            .ok_or(StructuralError::MissingEntry(ptr.id()))?;
        if !T::admits(entry) {
            return Err(TypeError::WrongVariant {
                id: ptr.id(),
                found: entry.type_tag(),
                expected: T::EXPECTED,
            }
            .into());
        }
        Ok(entry)
    }

    /// The set of entries reachable from the header, traversing both
    /// body and witness edges. Entries outside this set are never
    /// validated, though they may still resolve pointer lookups.
    pub fn reachable(&self) -> HashSet<EntryId> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::new();

        seen.insert(self.header_id);
        queue.push_back(self.header_id);

        while let Some(id) = queue.pop_front() {
            let Some(entry) = self.entries.get(&id) else {
                continue;
            };
            for next in neighbor_ids(entry) {
                if !next.is_nil() && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        seen
    }
}

/// Every edge out of an entry, body and witness alike.
fn neighbor_ids(entry: &Entry) -> Vec<EntryId> {
    match entry {
        Entry::TxHeader(h) => h.results.iter().map(|p| p.id()).collect(),
        Entry::Output(o) => vec![o.source.ref_id.id()],
        Entry::Retirement(r) => vec![r.source.ref_id.id()],
        Entry::Spend(s) => {
            let mut ids = vec![s.spent_output.id()];
            if let Some(dest) = &s.witness.destination {
                ids.push(dest.ref_id.id());
            }
            ids
        }
        Entry::Issuance(i) => {
            let mut ids = vec![i.anchor.id()];
            if let Some(dest) = &i.witness.destination {
                ids.push(dest.ref_id.id());
            }
            ids
        }
        Entry::Nonce(n) => vec![n.time_range.id(), n.witness.issuance.id()],
        Entry::TimeRange(_) => Vec::new(),
        Entry::Mux(m) => {
            let mut ids: Vec<EntryId> = m.sources.iter().map(|s| s.ref_id.id()).collect();
            ids.extend(m.witness.destinations.iter().map(|d| d.ref_id.id()));
            ids
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{Output, Spend, TimeRange};
    use crate::hash::{AssetId, Hash};
    use crate::types::{AssetAmount, OutputOnly, Program, ValueSource};

    fn sample_output() -> Output {
        Output::new(
            ValueSource::new(
                Pointer::new(EntryId::from_bytes([0x11; 32])),
                AssetAmount::new(AssetId::from_bytes([0x22; 32]), 100),
                0,
            ),
            Program::new(1, vec![0x51]),
            Hash::ZERO,
        )
    }

    fn header_for(results: Vec<EntryId>) -> TxHeader {
        TxHeader::new(
            1,
            results.into_iter().map(Pointer::new).collect(),
            Hash::ZERO,
            0,
            0,
        )
    }

    #[test]
    fn test_transaction_id_is_header_id() {
        let output = sample_output();
        let header = header_for(vec![output.id()]);
        let header_id = header.id();

        let tx = Transaction::new(header, vec![output.into()]).unwrap();
        assert_eq!(tx.id(), header_id);
        assert_eq!(tx.len(), 2);
    }

    #[test]
    fn test_duplicate_entry_is_fatal() {
        let output = sample_output();
        let header = header_for(vec![output.id()]);

        let result = Transaction::new(header, vec![output.clone().into(), output.into()]);
        assert!(matches!(result, Err(StructuralError::DuplicateEntry(_))));
    }

    #[test]
    fn test_resolve_checks_presence() {
        let header = header_for(vec![EntryId::from_bytes([0xee; 32])]);
        let tx = Transaction::new(header, vec![]).unwrap();

        let ptr: Pointer<OutputOnly> = Pointer::new(EntryId::from_bytes([0xee; 32]));
        let err = tx.resolve(&ptr).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::Structural(StructuralError::MissingEntry(_))
        ));
    }

    #[test]
    fn test_resolve_checks_variant() {
        let tr = TimeRange::new(0, 0);
        let tr_id = tr.id();
        let header = header_for(vec![]);
        let tx = Transaction::new(header, vec![tr.into()]).unwrap();

        let ptr: Pointer<OutputOnly> = Pointer::new(tr_id);
        let err = tx.resolve(&ptr).unwrap_err();
        assert!(matches!(err, ValidationError::Type(_)));
    }

    #[test]
    fn test_reachability_skips_unreferenced_entries() {
        let output = sample_output();
        let output_id = output.id();
        let stray = Spend::new(Pointer::new(EntryId::from_bytes([0xde; 32])), Hash::ZERO);
        let stray_id = stray.id();

        let header = header_for(vec![output_id]);
        let tx = Transaction::new(header, vec![output.into(), stray.into()]).unwrap();

        let reachable = tx.reachable();
        assert!(reachable.contains(&tx.id()));
        assert!(reachable.contains(&output_id));
        assert!(!reachable.contains(&stray_id));
    }

    #[test]
    fn test_reachability_tolerates_dangling_edges() {
        // the output's source points at an entry that is not present;
        // reachability records the ID without failing
        let output = sample_output();
        let output_id = output.id();
        let header = header_for(vec![output_id]);
        let tx = Transaction::new(header, vec![output.into()]).unwrap();

        let reachable = tx.reachable();
        assert!(reachable.contains(&EntryId::from_bytes([0x11; 32])));
    }
}
