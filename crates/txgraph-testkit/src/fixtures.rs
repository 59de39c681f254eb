//! Test fixtures and helpers.
//!
//! Scenario transaction builders and mock program validators for
//! integration tests. Each builder returns the transaction plus the
//! entry IDs a test needs to assert state effects.

use bytes::Bytes;

use txgraph_core::{
    AssetAmount, AssetDefinition, AssetId, Entry, EntryId, Hash, Issuance, Mux, Nonce, Output,
    Pointer, Program, ProgramValidator, Spend, TimeRange, Transaction, TxContext, TxHeader,
    ValueSource,
};

/// A program validator that accepts every program.
pub struct AcceptAll;

impl ProgramValidator for AcceptAll {
    fn verify_program(&self, _: &Program, _: &[Bytes], _: &TxContext<'_>) -> bool {
        true
    }
}

/// A program validator that rejects every program.
pub struct RejectAll;

impl ProgramValidator for RejectAll {
    fn verify_program(&self, _: &Program, _: &[Bytes], _: &TxContext<'_>) -> bool {
        false
    }
}

/// An issuance transaction plus the IDs its assertions need.
pub struct IssuanceFixture {
    pub tx: Transaction,
    pub output_id: EntryId,
    pub nonce_id: EntryId,
    pub issuance_id: EntryId,
}

/// A spend transaction plus the IDs its assertions need.
pub struct SpendFixture {
    pub tx: Transaction,
    pub prev_output_id: EntryId,
    pub new_output_id: EntryId,
    pub spend_id: EntryId,
}

/// Builds scenario transactions around one asset and one trivial
/// program.
pub struct TxFixture {
    pub program: Program,
    pub definition: AssetDefinition,
}

impl TxFixture {
    /// Create a fixture with a trivial version-1 program.
    pub fn new() -> Self {
        let program = Program::new(1, vec![0x51]);
        let definition = AssetDefinition::new(
            Hash::hash(b"initial block"),
            Hash::hash(b"asset terms"),
            program.clone(),
        );
        Self {
            program,
            definition,
        }
    }

    /// The fixture's asset ID.
    pub fn asset_id(&self) -> AssetId {
        self.definition.asset_id()
    }

    /// A quantity of the fixture's asset.
    pub fn amount(&self, amount: u64) -> AssetAmount {
        AssetAmount::new(self.asset_id(), amount)
    }

    /// Nonce -> Issuance -> Output, header committing to the output.
    pub fn issuance_tx(&self, amount: u64) -> IssuanceFixture {
        self.issuance_tx_with_ext(amount, Hash::ZERO)
    }

    /// Same shape, with the output carrying the given extension hash.
    pub fn issuance_tx_with_ext(&self, amount: u64, output_ext: Hash) -> IssuanceFixture {
        let range = TimeRange::new(0, 0);
        let mut nonce = Nonce::new(self.program.clone(), Pointer::new(range.id()));
        let mut issuance = Issuance::new(
            Pointer::new(nonce.id()),
            self.definition.clone(),
            amount,
            Hash::ZERO,
        );
        let value = issuance.value;

        let mut output = Output::new(
            ValueSource::new(Pointer::new(issuance.id()), value, 0),
            self.program.clone(),
            Hash::ZERO,
        );
        output.ext_hash = output_ext;

        issuance.set_destination(Pointer::new(output.id()), value, 0);
        nonce.set_issuance(Pointer::new(issuance.id()));

        IssuanceFixture {
            output_id: output.id(),
            nonce_id: nonce.id(),
            issuance_id: issuance.id(),
            tx: Transaction::new(
                TxHeader::new(1, vec![Pointer::new(output.id())], Hash::ZERO, 0, 0),
                vec![range.into(), nonce.into(), issuance.into(), output.into()],
            )
            .expect("fixture entries are distinct"),
        }
    }

    /// Spend of a prior output into a fresh output of equal value.
    ///
    /// The prior output entry is included in the transaction so the
    /// spend's pointer resolves; seed it into the UTXO set before
    /// applying.
    pub fn spend_tx(&self, amount: u64) -> SpendFixture {
        let value = self.amount(amount);
        let prev = Output::new(
            ValueSource::new(Pointer::new(EntryId::from_bytes([0xaa; 32])), value, 0),
            self.program.clone(),
            Hash::ZERO,
        );

        let mut spend = Spend::new(Pointer::new(prev.id()), Hash::ZERO);
        let fresh = Output::new(
            ValueSource::new(Pointer::new(spend.id()), value, 0),
            self.program.clone(),
            Hash::ZERO,
        );
        spend.set_destination(Pointer::new(fresh.id()), value, 0);

        SpendFixture {
            prev_output_id: prev.id(),
            new_output_id: fresh.id(),
            spend_id: spend.id(),
            tx: Transaction::new(
                TxHeader::new(1, vec![Pointer::new(fresh.id())], Hash::ZERO, 0, 0),
                vec![prev.into(), spend.into(), fresh.into()],
            )
            .expect("fixture entries are distinct"),
        }
    }

    /// A spend whose pointer does not resolve to any entry.
    pub fn dangling_spend_tx(&self, amount: u64) -> Transaction {
        let value = self.amount(amount);
        let mut spend = Spend::new(Pointer::new(EntryId::from_bytes([0xdd; 32])), Hash::ZERO);
        let fresh = Output::new(
            ValueSource::new(Pointer::new(spend.id()), value, 0),
            self.program.clone(),
            Hash::ZERO,
        );
        spend.set_destination(Pointer::new(fresh.id()), value, 0);

        Transaction::new(
            TxHeader::new(1, vec![Pointer::new(fresh.id())], Hash::ZERO, 0, 0),
            vec![spend.into(), fresh.into()],
        )
        .expect("fixture entries are distinct")
    }

    /// Two issuances feeding a mux that fans out to one output per
    /// destination amount. Source and destination totals may disagree.
    pub fn mux_tx(&self, source_amounts: [u64; 2], dest_amounts: [u64; 2]) -> Transaction {
        let range = TimeRange::new(0, 0);
        let mut nonce = Nonce::new(self.program.clone(), Pointer::new(range.id()));

        let mut iss_a = Issuance::new(
            Pointer::new(nonce.id()),
            self.definition.clone(),
            source_amounts[0],
            Hash::ZERO,
        );
        let mut iss_b = Issuance::new(
            Pointer::new(nonce.id()),
            self.definition.clone(),
            source_amounts[1],
            Hash::hash(b"second issuance"),
        );

        let mut mux = Mux::new(
            vec![
                ValueSource::new(Pointer::new(iss_a.id()), iss_a.value, 0),
                ValueSource::new(Pointer::new(iss_b.id()), iss_b.value, 0),
            ],
            self.program.clone(),
        );
        let mux_id = mux.id();

        iss_a.set_destination(Pointer::new(mux_id), iss_a.value, 0);
        iss_b.set_destination(Pointer::new(mux_id), iss_b.value, 1);
        nonce.set_issuance(Pointer::new(iss_a.id()));

        let mut results = Vec::new();
        let mut outputs = Vec::new();
        for (index, &amount) in dest_amounts.iter().enumerate() {
            let value = self.amount(amount);
            let output = Output::new(
                ValueSource::new(Pointer::new(mux_id), value, index as u64),
                self.program.clone(),
                Hash::ZERO,
            );
            mux.add_destination(Pointer::new(output.id()), value, 0);
            results.push(Pointer::new(output.id()));
            outputs.push(Entry::from(output));
        }

        let mut entries = vec![
            range.into(),
            nonce.into(),
            iss_a.into(),
            iss_b.into(),
            mux.into(),
        ];
        entries.extend(outputs);

        Transaction::new(
            TxHeader::new(1, results, Hash::ZERO, 0, 0),
            entries,
        )
        .expect("fixture entries are distinct")
    }
}

impl Default for TxFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use txgraph_core::validate;

    #[test]
    fn test_issuance_fixture_validates() {
        let fixture = TxFixture::new();
        let issuance = fixture.issuance_tx(100);
        validate(&issuance.tx, &AcceptAll).unwrap();
    }

    #[test]
    fn test_spend_fixture_validates() {
        let fixture = TxFixture::new();
        let spend = fixture.spend_tx(100);
        validate(&spend.tx, &AcceptAll).unwrap();
    }

    #[test]
    fn test_balanced_mux_fixture_validates() {
        let fixture = TxFixture::new();
        let tx = fixture.mux_tx([60, 40], [75, 25]);
        validate(&tx, &AcceptAll).unwrap();
    }

    #[test]
    fn test_fixture_asset_id_stable() {
        let fixture = TxFixture::new();
        assert_eq!(fixture.asset_id(), TxFixture::new().asset_id());
    }
}
