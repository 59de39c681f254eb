//! The entry model: the eight variants a transaction graph is built from.
//!
//! Every entry is an immutable record split into a *body* and a
//! *witness*. The body is canonically encoded and hashed into the entry
//! ID; the witness (program arguments, destinations, asset definitions)
//! can be attached after construction without changing the ID.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::codec::{self, DecodeError, Reader};
use crate::hash::{entry_id, EntryId, Hash};
use crate::types::{
    AssetAmount, AssetDefinition, IssuanceOnly, NonceOrSpend, OutputOnly, OutputOrRetirement,
    OutputRetirementOrMux, Pointer, Program, TimeRangeOnly, ValueDestination, ValueSource,
};

/// The root of a transaction: its version, time window, and the outputs
/// and retirements it commits to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxHeader {
    pub version: u64,
    pub results: Vec<Pointer<OutputOrRetirement>>,
    pub data: Hash,
    pub mintime: u64,
    pub maxtime: u64,
    pub ext_hash: Hash,
}

impl TxHeader {
    pub const TAG: &'static str = "txheader";

    /// Create a new header with a zero extension hash.
    pub fn new(
        version: u64,
        results: Vec<Pointer<OutputOrRetirement>>,
        data: Hash,
        mintime: u64,
        maxtime: u64,
    ) -> Self {
        Self {
            version,
            results,
            data,
            mintime,
            maxtime,
            ext_hash: Hash::ZERO,
        }
    }

    pub(crate) fn encode_body(&self, buf: &mut Vec<u8>) {
        codec::write_varint(buf, self.version);
        codec::write_list(buf, &self.results, |b, p| p.encode(b));
        codec::write_hash32(buf, self.data.as_bytes());
        codec::write_varint(buf, self.mintime);
        codec::write_varint(buf, self.maxtime);
        codec::write_hash32(buf, self.ext_hash.as_bytes());
    }

    /// Decode a header body from its canonical encoding.
    pub fn decode_body(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        let version = r.read_varint()?;
        let results = r.read_list(Pointer::decode)?;
        let data = Hash::from_bytes(r.read_hash32()?);
        let mintime = r.read_varint()?;
        let maxtime = r.read_varint()?;
        let ext_hash = Hash::from_bytes(r.read_hash32()?);
        r.finish()?;
        Ok(Self {
            version,
            results,
            data,
            mintime,
            maxtime,
            ext_hash,
        })
    }

    /// The header's entry ID, which is also the transaction ID.
    pub fn id(&self) -> EntryId {
        entry_id(Self::TAG, &body_bytes(|b| self.encode_body(b)))
    }
}

/// Value locked under a control program, available for a later spend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    pub source: ValueSource,
    pub control_program: Program,
    pub data: Hash,
    pub ext_hash: Hash,
}

impl Output {
    pub const TAG: &'static str = "output1";

    /// Create a new output with a zero extension hash.
    pub fn new(source: ValueSource, control_program: Program, data: Hash) -> Self {
        Self {
            source,
            control_program,
            data,
            ext_hash: Hash::ZERO,
        }
    }

    pub(crate) fn encode_body(&self, buf: &mut Vec<u8>) {
        self.source.encode(buf);
        self.control_program.encode(buf);
        codec::write_hash32(buf, self.data.as_bytes());
        codec::write_hash32(buf, self.ext_hash.as_bytes());
    }

    /// Decode an output body from its canonical encoding.
    pub fn decode_body(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        let source = ValueSource::decode(&mut r)?;
        let control_program = Program::decode(&mut r)?;
        let data = Hash::from_bytes(r.read_hash32()?);
        let ext_hash = Hash::from_bytes(r.read_hash32()?);
        r.finish()?;
        Ok(Self {
            source,
            control_program,
            data,
            ext_hash,
        })
    }

    /// The output's entry ID.
    pub fn id(&self) -> EntryId {
        entry_id(Self::TAG, &body_bytes(|b| self.encode_body(b)))
    }
}

/// Value removed from circulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Retirement {
    pub source: ValueSource,
    pub data: Hash,
    pub ext_hash: Hash,
}

impl Retirement {
    pub const TAG: &'static str = "retirement1";

    /// Create a new retirement with a zero extension hash.
    pub fn new(source: ValueSource, data: Hash) -> Self {
        Self {
            source,
            data,
            ext_hash: Hash::ZERO,
        }
    }

    pub(crate) fn encode_body(&self, buf: &mut Vec<u8>) {
        self.source.encode(buf);
        codec::write_hash32(buf, self.data.as_bytes());
        codec::write_hash32(buf, self.ext_hash.as_bytes());
    }

    /// Decode a retirement body from its canonical encoding.
    pub fn decode_body(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        let source = ValueSource::decode(&mut r)?;
        let data = Hash::from_bytes(r.read_hash32()?);
        let ext_hash = Hash::from_bytes(r.read_hash32()?);
        r.finish()?;
        Ok(Self {
            source,
            data,
            ext_hash,
        })
    }

    /// The retirement's entry ID.
    pub fn id(&self) -> EntryId {
        entry_id(Self::TAG, &body_bytes(|b| self.encode_body(b)))
    }
}

/// Witness data for a spend: where the unlocked value goes and the
/// arguments satisfying the spent output's control program.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpendWitness {
    pub destination: Option<ValueDestination>,
    pub arguments: Vec<Bytes>,
}

/// Consumes a previous output, unlocking its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spend {
    pub spent_output: Pointer<OutputOnly>,
    pub data: Hash,
    pub ext_hash: Hash,
    pub witness: SpendWitness,
}

impl Spend {
    pub const TAG: &'static str = "spend1";

    /// Create a new spend with an empty witness.
    pub fn new(spent_output: Pointer<OutputOnly>, data: Hash) -> Self {
        Self {
            spent_output,
            data,
            ext_hash: Hash::ZERO,
            witness: SpendWitness::default(),
        }
    }

    /// Direct the unlocked value. Witness-only: the entry ID is
    /// unaffected.
    pub fn set_destination(
        &mut self,
        ref_id: Pointer<OutputRetirementOrMux>,
        value: AssetAmount,
        position: u64,
    ) {
        self.witness.destination = Some(ValueDestination::new(ref_id, value, position));
    }

    pub(crate) fn encode_body(&self, buf: &mut Vec<u8>) {
        self.spent_output.encode(buf);
        codec::write_hash32(buf, self.data.as_bytes());
        codec::write_hash32(buf, self.ext_hash.as_bytes());
    }

    /// Decode a spend body from its canonical encoding. The witness is
    /// left empty.
    pub fn decode_body(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        let spent_output = Pointer::decode(&mut r)?;
        let data = Hash::from_bytes(r.read_hash32()?);
        let ext_hash = Hash::from_bytes(r.read_hash32()?);
        r.finish()?;
        Ok(Self {
            spent_output,
            data,
            ext_hash,
            witness: SpendWitness::default(),
        })
    }

    /// The spend's entry ID.
    pub fn id(&self) -> EntryId {
        entry_id(Self::TAG, &body_bytes(|b| self.encode_body(b)))
    }
}

/// Witness data for an issuance: the destination of the new value, the
/// asset definition whose hash is the asset ID, and the arguments
/// satisfying the issuance program.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IssuanceWitness {
    pub destination: Option<ValueDestination>,
    pub asset_definition: AssetDefinition,
    pub arguments: Vec<Bytes>,
}

/// Creates new units of an asset, anchored to a nonce or spend for
/// uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issuance {
    pub anchor: Pointer<NonceOrSpend>,
    pub value: AssetAmount,
    pub data: Hash,
    pub ext_hash: Hash,
    pub witness: IssuanceWitness,
}

impl Issuance {
    pub const TAG: &'static str = "issuance1";

    /// Create a new issuance. The asset ID is derived from the
    /// definition, which is retained in the witness.
    pub fn new(
        anchor: Pointer<NonceOrSpend>,
        asset_definition: AssetDefinition,
        amount: u64,
        data: Hash,
    ) -> Self {
        let value = AssetAmount::new(asset_definition.asset_id(), amount);
        Self {
            anchor,
            value,
            data,
            ext_hash: Hash::ZERO,
            witness: IssuanceWitness {
                destination: None,
                asset_definition,
                arguments: Vec::new(),
            },
        }
    }

    /// Direct the issued value. Witness-only: the entry ID is
    /// unaffected.
    pub fn set_destination(
        &mut self,
        ref_id: Pointer<OutputRetirementOrMux>,
        value: AssetAmount,
        position: u64,
    ) {
        self.witness.destination = Some(ValueDestination::new(ref_id, value, position));
    }

    pub(crate) fn encode_body(&self, buf: &mut Vec<u8>) {
        self.anchor.encode(buf);
        self.value.encode(buf);
        codec::write_hash32(buf, self.data.as_bytes());
        codec::write_hash32(buf, self.ext_hash.as_bytes());
    }

    /// Decode an issuance body from its canonical encoding. The witness
    /// is left empty.
    pub fn decode_body(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        let anchor = Pointer::decode(&mut r)?;
        let value = AssetAmount::decode(&mut r)?;
        let data = Hash::from_bytes(r.read_hash32()?);
        let ext_hash = Hash::from_bytes(r.read_hash32()?);
        r.finish()?;
        Ok(Self {
            anchor,
            value,
            data,
            ext_hash,
            witness: IssuanceWitness::default(),
        })
    }

    /// The issuance's entry ID.
    pub fn id(&self) -> EntryId {
        entry_id(Self::TAG, &body_bytes(|b| self.encode_body(b)))
    }
}

/// Witness data for a nonce: program arguments and the issuance this
/// nonce anchors.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NonceWitness {
    pub arguments: Vec<Bytes>,
    pub issuance: Pointer<IssuanceOnly>,
}

/// A single-use anchor giving an issuance its uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nonce {
    pub program: Program,
    pub time_range: Pointer<TimeRangeOnly>,
    pub ext_hash: Hash,
    pub witness: NonceWitness,
}

impl Nonce {
    pub const TAG: &'static str = "nonce";

    /// Create a new nonce with an empty witness.
    pub fn new(program: Program, time_range: Pointer<TimeRangeOnly>) -> Self {
        Self {
            program,
            time_range,
            ext_hash: Hash::ZERO,
            witness: NonceWitness::default(),
        }
    }

    /// Record the anchored issuance. Witness-only: the entry ID is
    /// unaffected.
    pub fn set_issuance(&mut self, issuance: Pointer<IssuanceOnly>) {
        self.witness.issuance = issuance;
    }

    pub(crate) fn encode_body(&self, buf: &mut Vec<u8>) {
        self.program.encode(buf);
        self.time_range.encode(buf);
        codec::write_hash32(buf, self.ext_hash.as_bytes());
    }

    /// Decode a nonce body from its canonical encoding. The witness is
    /// left empty.
    pub fn decode_body(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        let program = Program::decode(&mut r)?;
        let time_range = Pointer::decode(&mut r)?;
        let ext_hash = Hash::from_bytes(r.read_hash32()?);
        r.finish()?;
        Ok(Self {
            program,
            time_range,
            ext_hash,
            witness: NonceWitness::default(),
        })
    }

    /// The nonce's entry ID.
    pub fn id(&self) -> EntryId {
        entry_id(Self::TAG, &body_bytes(|b| self.encode_body(b)))
    }
}

/// A time window constraining the transaction that carries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub mintime: u64,
    pub maxtime: u64,
    pub ext_hash: Hash,
}

impl TimeRange {
    pub const TAG: &'static str = "timerange";

    /// Create a new time range with a zero extension hash.
    pub fn new(mintime: u64, maxtime: u64) -> Self {
        Self {
            mintime,
            maxtime,
            ext_hash: Hash::ZERO,
        }
    }

    pub(crate) fn encode_body(&self, buf: &mut Vec<u8>) {
        codec::write_varint(buf, self.mintime);
        codec::write_varint(buf, self.maxtime);
        codec::write_hash32(buf, self.ext_hash.as_bytes());
    }

    /// Decode a time-range body from its canonical encoding.
    pub fn decode_body(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        let mintime = r.read_varint()?;
        let maxtime = r.read_varint()?;
        let ext_hash = Hash::from_bytes(r.read_hash32()?);
        r.finish()?;
        Ok(Self {
            mintime,
            maxtime,
            ext_hash,
        })
    }

    /// The time range's entry ID.
    pub fn id(&self) -> EntryId {
        entry_id(Self::TAG, &body_bytes(|b| self.encode_body(b)))
    }
}

/// Witness data for a mux: where the rebalanced value goes and the
/// arguments satisfying the mux program.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MuxWitness {
    pub destinations: Vec<ValueDestination>,
    pub arguments: Vec<Bytes>,
}

/// Rebalances value across multiple sources and destinations under a
/// single program. Per-asset totals must be conserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mux {
    pub sources: Vec<ValueSource>,
    pub program: Program,
    pub ext_hash: Hash,
    pub witness: MuxWitness,
}

impl Mux {
    pub const TAG: &'static str = "mux1";

    /// Create a new mux with an empty witness.
    pub fn new(sources: Vec<ValueSource>, program: Program) -> Self {
        Self {
            sources,
            program,
            ext_hash: Hash::ZERO,
            witness: MuxWitness::default(),
        }
    }

    /// Append a destination. Witness-only: the entry ID is unaffected.
    pub fn add_destination(
        &mut self,
        ref_id: Pointer<OutputRetirementOrMux>,
        value: AssetAmount,
        position: u64,
    ) {
        self.witness
            .destinations
            .push(ValueDestination::new(ref_id, value, position));
    }

    pub(crate) fn encode_body(&self, buf: &mut Vec<u8>) {
        codec::write_list(buf, &self.sources, |b, s| s.encode(b));
        self.program.encode(buf);
        codec::write_hash32(buf, self.ext_hash.as_bytes());
    }

    /// Decode a mux body from its canonical encoding. The witness is
    /// left empty.
    pub fn decode_body(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut r = Reader::new(bytes);
        let sources = r.read_list(ValueSource::decode)?;
        let program = Program::decode(&mut r)?;
        let ext_hash = Hash::from_bytes(r.read_hash32()?);
        r.finish()?;
        Ok(Self {
            sources,
            program,
            ext_hash,
            witness: MuxWitness::default(),
        })
    }

    /// The mux's entry ID.
    pub fn id(&self) -> EntryId {
        entry_id(Self::TAG, &body_bytes(|b| self.encode_body(b)))
    }
}

/// Any entry. The closed set of variants guarantees exhaustive handling
/// in validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Entry {
    TxHeader(TxHeader),
    Output(Output),
    Retirement(Retirement),
    Spend(Spend),
    Issuance(Issuance),
    Nonce(Nonce),
    TimeRange(TimeRange),
    Mux(Mux),
}

impl Entry {
    /// The short ASCII tag hashed into the entry ID.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Entry::TxHeader(_) => TxHeader::TAG,
            Entry::Output(_) => Output::TAG,
            Entry::Retirement(_) => Retirement::TAG,
            Entry::Spend(_) => Spend::TAG,
            Entry::Issuance(_) => Issuance::TAG,
            Entry::Nonce(_) => Nonce::TAG,
            Entry::TimeRange(_) => TimeRange::TAG,
            Entry::Mux(_) => Mux::TAG,
        }
    }

    /// The canonical encoding of the entry's body.
    pub fn body_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        match self {
            Entry::TxHeader(e) => e.encode_body(&mut buf),
            Entry::Output(e) => e.encode_body(&mut buf),
            Entry::Retirement(e) => e.encode_body(&mut buf),
            Entry::Spend(e) => e.encode_body(&mut buf),
            Entry::Issuance(e) => e.encode_body(&mut buf),
            Entry::Nonce(e) => e.encode_body(&mut buf),
            Entry::TimeRange(e) => e.encode_body(&mut buf),
            Entry::Mux(e) => e.encode_body(&mut buf),
        }
        buf
    }

    /// The content-addressed entry ID.
    pub fn id(&self) -> EntryId {
        entry_id(self.type_tag(), &self.body_bytes())
    }

    /// The extension hash carried by every variant.
    pub fn ext_hash(&self) -> &Hash {
        match self {
            Entry::TxHeader(e) => &e.ext_hash,
            Entry::Output(e) => &e.ext_hash,
            Entry::Retirement(e) => &e.ext_hash,
            Entry::Spend(e) => &e.ext_hash,
            Entry::Issuance(e) => &e.ext_hash,
            Entry::Nonce(e) => &e.ext_hash,
            Entry::TimeRange(e) => &e.ext_hash,
            Entry::Mux(e) => &e.ext_hash,
        }
    }
}

macro_rules! entry_from {
    ($($variant:ident),+) => {
        $(
            impl From<$variant> for Entry {
                fn from(e: $variant) -> Self {
                    Entry::$variant(e)
                }
            }
        )+
    };
}

entry_from!(TxHeader, Output, Retirement, Spend, Issuance, Nonce, TimeRange, Mux);

fn body_bytes(encode: impl FnOnce(&mut Vec<u8>)) -> Vec<u8> {
    let mut buf = Vec::new();
    encode(&mut buf);
    buf
}
