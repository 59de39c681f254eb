//! Proptest generators for property-based testing.

use bytes::Bytes;
use proptest::prelude::*;

use txgraph_core::{
    AssetAmount, AssetDefinition, AssetId, Entry, EntryId, Hash, Issuance, Mux, Nonce, Output,
    Pointer, Program, Retirement, Spend, TimeRange, TxHeader, ValueSource, MAX_INT,
};

/// Generate a random hash.
pub fn hash() -> impl Strategy<Value = Hash> {
    any::<[u8; 32]>().prop_map(Hash::from_bytes)
}

/// Generate a random entry ID.
pub fn entry_id() -> impl Strategy<Value = EntryId> {
    any::<[u8; 32]>().prop_map(EntryId::from_bytes)
}

/// Generate a random asset ID.
pub fn asset_id() -> impl Strategy<Value = AssetId> {
    any::<[u8; 32]>().prop_map(AssetId::from_bytes)
}

/// Generate an amount within the 63-bit cap.
pub fn amount() -> impl Strategy<Value = u64> {
    0u64..=MAX_INT
}

/// Generate a random asset amount.
pub fn asset_amount() -> impl Strategy<Value = AssetAmount> {
    (asset_id(), amount()).prop_map(|(id, amt)| AssetAmount::new(id, amt))
}

/// Generate a program with a short script.
pub fn program() -> impl Strategy<Value = Program> {
    (1u64..=3, prop::collection::vec(any::<u8>(), 0..=64))
        .prop_map(|(vm, code)| Program::new(vm, code))
}

/// Generate an asset definition.
pub fn asset_definition() -> impl Strategy<Value = AssetDefinition> {
    (hash(), hash(), program())
        .prop_map(|(block, data, prog)| AssetDefinition::new(block, data, prog))
}

/// Generate a value source with an arbitrary referent.
pub fn value_source() -> impl Strategy<Value = ValueSource> {
    (entry_id(), asset_amount(), 0u64..=8).prop_map(|(id, value, position)| {
        ValueSource::new(Pointer::new(id), value, position)
    })
}

/// Generate witness arguments.
pub fn arguments() -> impl Strategy<Value = Vec<Bytes>> {
    prop::collection::vec(
        prop::collection::vec(any::<u8>(), 0..=32).prop_map(Bytes::from),
        0..=4,
    )
}

/// Generate any entry, covering all eight variants.
pub fn entry() -> impl Strategy<Value = Entry> {
    prop_oneof![
        (
            1u64..=2,
            prop::collection::vec(entry_id(), 0..=4),
            hash(),
            amount(),
            amount()
        )
            .prop_map(|(version, results, data, mintime, maxtime)| {
                Entry::TxHeader(TxHeader::new(
                    version,
                    results.into_iter().map(Pointer::new).collect(),
                    data,
                    mintime,
                    maxtime,
                ))
            }),
        (value_source(), program(), hash())
            .prop_map(|(source, prog, data)| Entry::Output(Output::new(source, prog, data))),
        (value_source(), hash())
            .prop_map(|(source, data)| Entry::Retirement(Retirement::new(source, data))),
        (entry_id(), hash())
            .prop_map(|(id, data)| Entry::Spend(Spend::new(Pointer::new(id), data))),
        (entry_id(), asset_definition(), amount(), hash()).prop_map(
            |(anchor, definition, amt, data)| {
                Entry::Issuance(Issuance::new(Pointer::new(anchor), definition, amt, data))
            }
        ),
        (program(), entry_id())
            .prop_map(|(prog, range)| Entry::Nonce(Nonce::new(prog, Pointer::new(range)))),
        (amount(), amount())
            .prop_map(|(mintime, maxtime)| Entry::TimeRange(TimeRange::new(mintime, maxtime))),
        (prop::collection::vec(value_source(), 0..=4), program())
            .prop_map(|(sources, prog)| Entry::Mux(Mux::new(sources, prog))),
    ]
}

/// Decode an entry's body as the same variant and re-wrap it.
pub fn decode_like(entry: &Entry, body: &[u8]) -> Result<Entry, txgraph_core::DecodeError> {
    Ok(match entry {
        Entry::TxHeader(_) => Entry::TxHeader(TxHeader::decode_body(body)?),
        Entry::Output(_) => Entry::Output(Output::decode_body(body)?),
        Entry::Retirement(_) => Entry::Retirement(Retirement::decode_body(body)?),
        Entry::Spend(_) => Entry::Spend(Spend::decode_body(body)?),
        Entry::Issuance(_) => Entry::Issuance(Issuance::decode_body(body)?),
        Entry::Nonce(_) => Entry::Nonce(Nonce::decode_body(body)?),
        Entry::TimeRange(_) => Entry::TimeRange(TimeRange::decode_body(body)?),
        Entry::Mux(_) => Entry::Mux(Mux::decode_body(body)?),
    })
}
