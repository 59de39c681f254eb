//! Supporting model types: amounts, programs, typed pointers, and the
//! value-flow edges.
//!
//! All identifiers are newtypes and every pointer carries its admissible
//! target variants as a zero-sized marker, so wiring an entry to the
//! wrong variant is caught by the type system where possible and by
//! graph resolution otherwise.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

use crate::codec::{self, DecodeError, Reader};
use crate::entry::Entry;
use crate::hash::{AssetId, EntryId, Hash};

/// A quantity of one asset. Amounts are capped at 2^63 - 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssetAmount {
    pub asset_id: AssetId,
    pub amount: u64,
}

impl AssetAmount {
    /// Create a new asset amount.
    pub fn new(asset_id: AssetId, amount: u64) -> Self {
        Self { asset_id, amount }
    }

    pub(crate) fn encode(&self, buf: &mut Vec<u8>) {
        codec::write_hash32(buf, self.asset_id.as_bytes());
        codec::write_varint(buf, self.amount);
    }

    pub(crate) fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let asset_id = AssetId::from_bytes(r.read_hash32()?);
        let amount = r.read_varint()?;
        Ok(Self { asset_id, amount })
    }
}

impl fmt::Display for AssetAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", self.amount, self.asset_id)
    }
}

/// A predicate script plus the virtual-machine version that runs it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Program {
    pub vm_version: u64,
    pub code: Bytes,
}

impl Program {
    /// Create a new program.
    pub fn new(vm_version: u64, code: impl Into<Bytes>) -> Self {
        Self {
            vm_version,
            code: code.into(),
        }
    }

    pub(crate) fn encode(&self, buf: &mut Vec<u8>) {
        codec::write_varint(buf, self.vm_version);
        codec::write_string(buf, &self.code);
    }

    pub(crate) fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let vm_version = r.read_varint()?;
        let code = Bytes::copy_from_slice(r.read_string()?);
        Ok(Self { vm_version, code })
    }
}

/// The issuance terms of an asset. Its canonical encoding hashes to the
/// asset ID, so the terms cannot be substituted after the fact.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssetDefinition {
    pub initial_block_id: Hash,
    pub reference_data: Hash,
    pub issuance_program: Program,
}

impl AssetDefinition {
    /// Create a new asset definition.
    pub fn new(initial_block_id: Hash, reference_data: Hash, issuance_program: Program) -> Self {
        Self {
            initial_block_id,
            reference_data,
            issuance_program,
        }
    }

    pub(crate) fn encode(&self, buf: &mut Vec<u8>) {
        codec::write_hash32(buf, self.initial_block_id.as_bytes());
        codec::write_hash32(buf, self.reference_data.as_bytes());
        self.issuance_program.encode(buf);
    }

    /// The asset ID this definition binds: the hash of its canonical
    /// encoding.
    pub fn asset_id(&self) -> AssetId {
        let mut buf = Vec::new();
        self.encode(&mut buf);
        AssetId::from_bytes(Hash::hash(&buf).0)
    }
}

/// The set of entry variants a [`Pointer`] may legally resolve to.
pub trait TargetSet:
    Copy + Clone + fmt::Debug + Default + Eq + std::hash::Hash + Send + Sync + 'static
{
    /// Human name of the admissible variants, used in type errors.
    const EXPECTED: &'static str;

    /// Whether the entry's variant is in the set.
    fn admits(entry: &Entry) -> bool;
}

macro_rules! target_set {
    ($name:ident, $expected:literal, $($variant:ident)|+) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
        )]
        pub struct $name;

        impl TargetSet for $name {
            const EXPECTED: &'static str = $expected;

            fn admits(entry: &Entry) -> bool {
                matches!(entry, $(Entry::$variant(_))|+)
            }
        }
    };
}

target_set!(OutputOnly, "output", Output);
target_set!(TimeRangeOnly, "timerange", TimeRange);
target_set!(IssuanceOnly, "issuance", Issuance);
target_set!(OutputOrRetirement, "output|retirement", Output | Retirement);
target_set!(NonceOrSpend, "nonce|spend", Nonce | Spend);
target_set!(SpendIssuanceOrMux, "spend|issuance|mux", Spend | Issuance | Mux);
target_set!(
    OutputRetirementOrMux,
    "output|retirement|mux",
    Output | Retirement | Mux
);

/// A typed reference to another entry: a 32-byte entry ID constrained to
/// the target set `T`. The all-zero ID is nil.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Pointer<T: TargetSet> {
    id: EntryId,
    #[serde(skip)]
    _target: PhantomData<T>,
}

impl<T: TargetSet> Pointer<T> {
    /// Point at the given entry ID.
    pub fn new(id: EntryId) -> Self {
        Self {
            id,
            _target: PhantomData,
        }
    }

    /// The nil pointer.
    pub fn nil() -> Self {
        Self::new(EntryId::NIL)
    }

    /// The referenced entry ID.
    pub fn id(&self) -> EntryId {
        self.id
    }

    /// Whether this pointer is unset.
    pub fn is_nil(&self) -> bool {
        self.id.is_nil()
    }

    pub(crate) fn encode(&self, buf: &mut Vec<u8>) {
        codec::write_hash32(buf, self.id.as_bytes());
    }

    pub(crate) fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        Ok(Self::new(EntryId::from_bytes(r.read_hash32()?)))
    }
}

impl<T: TargetSet> fmt::Debug for Pointer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pointer<{}>({})", T::EXPECTED, self.id)
    }
}

impl<T: TargetSet> From<EntryId> for Pointer<T> {
    fn from(id: EntryId) -> Self {
        Self::new(id)
    }
}

/// A backward value-flow edge: where the value entering an entry comes
/// from. The referenced entry holds the matching [`ValueDestination`],
/// so every edge is locally self-verifying.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValueSource {
    pub ref_id: Pointer<SpendIssuanceOrMux>,
    pub value: AssetAmount,
    pub position: u64,
}

impl ValueSource {
    /// Create a new value source.
    pub fn new(ref_id: Pointer<SpendIssuanceOrMux>, value: AssetAmount, position: u64) -> Self {
        Self {
            ref_id,
            value,
            position,
        }
    }

    pub(crate) fn encode(&self, buf: &mut Vec<u8>) {
        self.ref_id.encode(buf);
        self.value.encode(buf);
        codec::write_varint(buf, self.position);
    }

    pub(crate) fn decode(r: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let ref_id = Pointer::decode(r)?;
        let value = AssetAmount::decode(r)?;
        let position = r.read_varint()?;
        Ok(Self {
            ref_id,
            value,
            position,
        })
    }
}

/// A forward value-flow edge: where the value leaving an entry goes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValueDestination {
    pub ref_id: Pointer<OutputRetirementOrMux>,
    pub value: AssetAmount,
    pub position: u64,
}

impl ValueDestination {
    /// Create a new value destination.
    pub fn new(ref_id: Pointer<OutputRetirementOrMux>, value: AssetAmount, position: u64) -> Self {
        Self {
            ref_id,
            value,
            position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_definition_id_deterministic() {
        let def = AssetDefinition::new(
            Hash::hash(b"genesis"),
            Hash::hash(b"terms"),
            Program::new(1, vec![0x51]),
        );
        assert_eq!(def.asset_id(), def.asset_id());
    }

    #[test]
    fn test_asset_definition_id_binds_program() {
        let base = AssetDefinition::new(
            Hash::hash(b"genesis"),
            Hash::hash(b"terms"),
            Program::new(1, vec![0x51]),
        );
        let mut altered = base.clone();
        altered.issuance_program = Program::new(1, vec![0x52]);
        assert_ne!(base.asset_id(), altered.asset_id());
    }

    #[test]
    fn test_asset_amount_roundtrip() {
        let amt = AssetAmount::new(AssetId::from_bytes([7; 32]), 100_000);
        let mut buf = Vec::new();
        amt.encode(&mut buf);

        let mut r = Reader::new(&buf);
        assert_eq!(AssetAmount::decode(&mut r).unwrap(), amt);
        assert!(r.is_empty());
    }

    #[test]
    fn test_program_roundtrip() {
        let prog = Program::new(1, b"\x01\x02\x03".to_vec());
        let mut buf = Vec::new();
        prog.encode(&mut buf);

        let mut r = Reader::new(&buf);
        assert_eq!(Program::decode(&mut r).unwrap(), prog);
    }

    #[test]
    fn test_pointer_nil() {
        let p: Pointer<OutputOnly> = Pointer::nil();
        assert!(p.is_nil());
        assert_eq!(p.id(), EntryId::NIL);

        let q: Pointer<OutputOnly> = Pointer::new(EntryId::from_bytes([1; 32]));
        assert!(!q.is_nil());
    }

    #[test]
    fn test_value_source_roundtrip() {
        let vs = ValueSource::new(
            Pointer::new(EntryId::from_bytes([9; 32])),
            AssetAmount::new(AssetId::from_bytes([7; 32]), 42),
            3,
        );
        let mut buf = Vec::new();
        vs.encode(&mut buf);

        let mut r = Reader::new(&buf);
        assert_eq!(ValueSource::decode(&mut r).unwrap(), vs);
        assert!(r.is_empty());
    }
}
