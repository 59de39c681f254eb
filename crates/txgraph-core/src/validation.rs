//! The validation engine: per-entry rules, value-flow symmetry, and
//! per-asset conservation.
//!
//! Validation is a pure walk of the graph rooted at the header. Each
//! entry is visited at most once per invocation; the memo set is
//! populated on entry so the redundant back-pointers of the value-flow
//! edges cannot cause unbounded recursion. The first failure aborts the
//! walk and is reported together with the entry path that led to it.

use std::collections::{BTreeMap, HashSet};

use crate::codec::MAX_INT;
use crate::entry::{Entry, Issuance, Mux, Nonce, Spend, TimeRange, TxHeader};
use crate::error::{
    ConservationError, ExtensionError, IssuanceAnchorError, ProgramError, StructuralError,
    TimeRangeError, TypeError, ValidationError, ValidationFailure, ValueFlowError,
};
use crate::graph::Transaction;
use crate::hash::EntryId;
use crate::types::{
    IssuanceOnly, Pointer, Program, TargetSet, ValueDestination, ValueSource,
};
use crate::vm::{ProgramValidator, TxContext};

use bytes::Bytes;

/// Validate a transaction against the per-entry rules.
///
/// Pure: the result depends only on the transaction and the injected
/// program validator. Distinct transactions may be validated on
/// distinct threads concurrently.
pub fn validate<V: ProgramValidator + ?Sized>(
    tx: &Transaction,
    vm: &V,
) -> Result<(), ValidationFailure> {
    let mut validator = Validator {
        tx,
        vm,
        tx_version: tx.header().version,
        reachable: tx.reachable(),
        visited: HashSet::new(),
        path: Vec::new(),
    };
    validator.check_entry(tx.id())
}

struct Validator<'a, V: ?Sized> {
    tx: &'a Transaction,
    vm: &'a V,
    tx_version: u64,
    reachable: HashSet<EntryId>,
    visited: HashSet<EntryId>,
    path: Vec<EntryId>,
}

impl<'a, V: ProgramValidator + ?Sized> Validator<'a, V> {
    fn fail(&self, error: impl Into<ValidationError>) -> ValidationFailure {
        ValidationFailure::new(self.path.clone(), error)
    }

    fn resolve<T: TargetSet>(&self, ptr: &Pointer<T>) -> Result<&'a Entry, ValidationFailure> {
        self.tx.resolve(ptr).map_err(|e| self.fail(e))
    }

    /// Validate one entry, at most once per invocation.
    fn check_entry(&mut self, id: EntryId) -> Result<(), ValidationFailure> {
        if !self.visited.insert(id) {
            return Ok(());
        }
        self.path.push(id);
        let result = self.check_entry_rules(id);
        self.path.pop();
        result
    }

    fn check_entry_rules(&mut self, id: EntryId) -> Result<(), ValidationFailure> {
        let entry = match self.tx.get(&id) {
            Some(entry) => entry,
            None => return Err(self.fail(StructuralError::MissingEntry(id))),
        };

        if self.tx_version == 1 && !entry.ext_hash().is_zero() {
            return Err(self.fail(ExtensionError::NonZeroExtHash(id)));
        }

        match entry {
            Entry::TxHeader(h) => self.check_header(h),
            Entry::Output(o) => self.check_value_source(id, &o.source, 0, false),
            Entry::Retirement(r) => self.check_value_source(id, &r.source, 0, false),
            Entry::Spend(s) => self.check_spend(id, s),
            Entry::Issuance(i) => self.check_issuance(id, i),
            Entry::Nonce(n) => self.check_nonce(id, n),
            Entry::TimeRange(t) => self.check_time_range(id, t),
            Entry::Mux(m) => self.check_mux(id, m),
        }
    }

    fn check_header(&mut self, header: &'a TxHeader) -> Result<(), ValidationFailure> {
        if header.version == 0 {
            return Err(self.fail(StructuralError::BadTxVersion(0)));
        }
        if header.version == 1 && header.results.is_empty() {
            return Err(self.fail(StructuralError::EmptyResults));
        }
        for result in &header.results {
            self.resolve(result)?;
            self.check_entry(result.id())?;
        }
        Ok(())
    }

    fn check_spend(&mut self, id: EntryId, spend: &'a Spend) -> Result<(), ValidationFailure> {
        // presence only: the spent output is prior chain state, not part
        // of this transaction's value flow
        let spent = match self.resolve(&spend.spent_output)? {
            Entry::Output(o) => o,
            _ => unreachable!("target set admits outputs only"),
        };

        self.check_program(&spent.control_program, &spend.witness.arguments, id)?;

        let dest = spend
            .witness
            .destination
            .as_ref()
            .ok_or_else(|| self.fail(ValueFlowError::MissingDestination(id)))?;

        if spent.source.value != dest.value {
            return Err(self.fail(ValueFlowError::MismatchedValue {
                entry: id,
                other: spend.spent_output.id(),
            }));
        }

        self.check_value_destination(id, dest, 0, false)
    }

    fn check_issuance(
        &mut self,
        id: EntryId,
        issuance: &'a Issuance,
    ) -> Result<(), ValidationFailure> {
        let computed = issuance.witness.asset_definition.asset_id();
        if computed != issuance.value.asset_id {
            return Err(self.fail(IssuanceAnchorError::AssetIdMismatch {
                computed,
                declared: issuance.value.asset_id,
            }));
        }

        self.check_program(
            &issuance.witness.asset_definition.issuance_program,
            &issuance.witness.arguments,
            id,
        )?;

        self.resolve(&issuance.anchor)?;
        self.check_entry(issuance.anchor.id())?;

        let dest = issuance
            .witness
            .destination
            .as_ref()
            .ok_or_else(|| self.fail(ValueFlowError::MissingDestination(id)))?;
        self.check_value_destination(id, dest, 0, false)
    }

    fn check_nonce(&mut self, id: EntryId, nonce: &'a Nonce) -> Result<(), ValidationFailure> {
        self.check_program(&nonce.program, &nonce.witness.arguments, id)?;

        let issuance = self.resolve_issuance(&nonce.witness.issuance)?;
        let issuance_id = nonce.witness.issuance.id();
        if !self.reachable.contains(&issuance_id) {
            return Err(self.fail(IssuanceAnchorError::UnreachableIssuance(issuance_id)));
        }
        if issuance.anchor.id() != id {
            return Err(self.fail(IssuanceAnchorError::AnchorMismatch {
                nonce: id,
                issuance: issuance_id,
                anchor: issuance.anchor.id(),
            }));
        }

        self.resolve(&nonce.time_range)?;
        self.check_entry(nonce.time_range.id())
    }

    fn check_time_range(
        &mut self,
        id: EntryId,
        range: &'a TimeRange,
    ) -> Result<(), ValidationFailure> {
        let header = self.tx.header();
        if range.mintime > header.mintime {
            return Err(self.fail(TimeRangeError::MintimeAfterHeader {
                entry: id,
                mintime: range.mintime,
                header_mintime: header.mintime,
            }));
        }
        if range.maxtime != 0 && range.maxtime < header.maxtime {
            return Err(self.fail(TimeRangeError::MaxtimeBeforeHeader {
                entry: id,
                maxtime: range.maxtime,
                header_maxtime: header.maxtime,
            }));
        }
        Ok(())
    }

    fn check_mux(&mut self, id: EntryId, mux: &'a Mux) -> Result<(), ValidationFailure> {
        self.check_program(&mux.program, &mux.witness.arguments, id)?;

        for (index, source) in mux.sources.iter().enumerate() {
            self.check_value_source(id, source, index as u64, true)?;
        }
        for (index, dest) in mux.witness.destinations.iter().enumerate() {
            self.check_value_destination(id, dest, index as u64, true)?;
        }

        self.check_conservation(id, mux)
    }

    /// Per-asset conservation with checked 63-bit totals.
    fn check_conservation(&self, id: EntryId, mux: &'a Mux) -> Result<(), ValidationFailure> {
        let mut totals: BTreeMap<_, (u64, u64)> = BTreeMap::new();

        for source in &mux.sources {
            let slot = &mut totals.entry(source.value.asset_id).or_default().0;
            *slot = slot
                .checked_add(source.value.amount)
                .filter(|&total| total <= MAX_INT)
                .ok_or_else(|| {
                    self.fail(ConservationError::Overflow {
                        mux: id,
                        asset_id: source.value.asset_id,
                    })
                })?;
        }
        for dest in &mux.witness.destinations {
            let slot = &mut totals.entry(dest.value.asset_id).or_default().1;
            *slot = slot
                .checked_add(dest.value.amount)
                .filter(|&total| total <= MAX_INT)
                .ok_or_else(|| {
                    self.fail(ConservationError::Overflow {
                        mux: id,
                        asset_id: dest.value.asset_id,
                    })
                })?;
        }

        for (asset_id, (source_total, destination_total)) in totals {
            if source_total != destination_total {
                return Err(self.fail(ConservationError::Unbalanced {
                    mux: id,
                    asset_id,
                    source_total,
                    destination_total,
                }));
            }
        }
        Ok(())
    }

    /// Check a backward edge out of `entry_id` and validate the entry it
    /// comes from.
    fn check_value_source(
        &mut self,
        entry_id: EntryId,
        source: &'a ValueSource,
        index: u64,
        entry_is_mux: bool,
    ) -> Result<(), ValidationFailure> {
        let ref_id = source.ref_id.id();
        let referenced = self.resolve(&source.ref_id)?;
        self.check_entry(ref_id)?;

        let ref_dest = match referenced {
            Entry::Spend(s) => {
                self.sole_destination(ref_id, source.position, s.witness.destination.as_ref())?
            }
            Entry::Issuance(i) => {
                self.sole_destination(ref_id, source.position, i.witness.destination.as_ref())?
            }
            Entry::Mux(m) => m
                .witness
                .destinations
                .get(source.position as usize)
                .ok_or_else(|| {
                    self.fail(ValueFlowError::PositionOutOfRange {
                        entry: ref_id,
                        position: source.position,
                    })
                })?,
            _ => unreachable!("target set admits spend|issuance|mux only"),
        };

        if ref_dest.ref_id.id() != entry_id {
            return Err(self.fail(ValueFlowError::MismatchedReference {
                entry: ref_id,
                expected: entry_id,
                found: ref_dest.ref_id.id(),
            }));
        }
        let expected_position = if entry_is_mux { index } else { 0 };
        if ref_dest.position != expected_position {
            return Err(self.fail(ValueFlowError::MismatchedPosition {
                entry: ref_id,
                expected: expected_position,
                found: ref_dest.position,
            }));
        }
        if ref_dest.value != source.value {
            return Err(self.fail(ValueFlowError::MismatchedValue {
                entry: entry_id,
                other: ref_id,
            }));
        }
        Ok(())
    }

    /// Check a forward edge out of `entry_id`. The referenced entry is
    /// validated by the header-rooted walk, not from here.
    fn check_value_destination(
        &mut self,
        entry_id: EntryId,
        dest: &'a ValueDestination,
        index: u64,
        entry_is_mux: bool,
    ) -> Result<(), ValidationFailure> {
        let ref_id = dest.ref_id.id();
        let referenced = self.resolve(&dest.ref_id)?;

        let ref_source = match referenced {
            Entry::Output(o) => self.sole_source(ref_id, dest.position, &o.source)?,
            Entry::Retirement(r) => self.sole_source(ref_id, dest.position, &r.source)?,
            Entry::Mux(m) => {
                m.sources.get(dest.position as usize).ok_or_else(|| {
                    self.fail(ValueFlowError::PositionOutOfRange {
                        entry: ref_id,
                        position: dest.position,
                    })
                })?
            }
            _ => unreachable!("target set admits output|retirement|mux only"),
        };

        if ref_source.ref_id.id() != entry_id {
            return Err(self.fail(ValueFlowError::MismatchedReference {
                entry: ref_id,
                expected: entry_id,
                found: ref_source.ref_id.id(),
            }));
        }
        let expected_position = if entry_is_mux { index } else { 0 };
        if ref_source.position != expected_position {
            return Err(self.fail(ValueFlowError::MismatchedPosition {
                entry: ref_id,
                expected: expected_position,
                found: ref_source.position,
            }));
        }
        if ref_source.value != dest.value {
            return Err(self.fail(ValueFlowError::MismatchedValue {
                entry: entry_id,
                other: ref_id,
            }));
        }
        Ok(())
    }

    fn sole_destination(
        &self,
        ref_id: EntryId,
        position: u64,
        dest: Option<&'a ValueDestination>,
    ) -> Result<&'a ValueDestination, ValidationFailure> {
        if position != 0 {
            return Err(self.fail(ValueFlowError::PositionOutOfRange {
                entry: ref_id,
                position,
            }));
        }
        dest.ok_or_else(|| self.fail(ValueFlowError::MissingDestination(ref_id)))
    }

    fn sole_source(
        &self,
        ref_id: EntryId,
        position: u64,
        source: &'a ValueSource,
    ) -> Result<&'a ValueSource, ValidationFailure> {
        if position != 0 {
            return Err(self.fail(ValueFlowError::PositionOutOfRange {
                entry: ref_id,
                position,
            }));
        }
        Ok(source)
    }

    fn resolve_issuance(
        &self,
        ptr: &Pointer<IssuanceOnly>,
    ) -> Result<&'a Issuance, ValidationFailure> {
        match self.tx.get(&ptr.id()) {
            Some(Entry::Issuance(i)) => Ok(i),
            Some(other) => Err(self.fail(TypeError::WrongVariant {
                id: ptr.id(),
                found: other.type_tag(),
                expected: IssuanceOnly::EXPECTED,
            })),
            None => Err(self.fail(StructuralError::MissingEntry(ptr.id()))),
        }
    }

    /// The program rule: vm version 1 is evaluated; later vm versions
    /// only pass on later transaction versions; version 0 never runs.
    fn check_program(
        &self,
        program: &Program,
        args: &[Bytes],
        entry_id: EntryId,
    ) -> Result<(), ValidationFailure> {
        match program.vm_version {
            1 => {
                let ctx = TxContext::new(entry_id, self.tx);
                if self.vm.verify_program(program, args, &ctx) {
                    Ok(())
                } else {
                    Err(self.fail(ProgramError::Rejected(entry_id)))
                }
            }
            0 => Err(self.fail(ProgramError::UnsupportedVmVersion {
                entry: entry_id,
                vm_version: 0,
            })),
            later => {
                if self.tx_version > 1 {
                    Ok(())
                } else {
                    Err(self.fail(ProgramError::UnsupportedVmVersion {
                        entry: entry_id,
                        vm_version: later,
                    }))
                }
            }
        }
    }
}
