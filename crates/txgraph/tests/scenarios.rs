//! End-to-end scenarios: validate + apply against an in-memory chain
//! state, accept and reject paths both.

use txgraph::{
    BlockContext, ChainState, ConservationError, ExtensionError, Hash, MemoryState,
    ProcessorError, StateError, StructuralError, TxProcessor, ValidationError,
};
use txgraph_testkit::{AcceptAll, RejectAll, TxFixture};

fn processor() -> TxProcessor<MemoryState, AcceptAll> {
    TxProcessor::new(MemoryState::new(), AcceptAll)
}

#[tokio::test]
async fn test_minimal_issuance_to_output() {
    let fixture = TxFixture::new();
    let issuance = fixture.issuance_tx(100);
    let processor = processor();

    let delta = processor
        .submit(&issuance.tx, &BlockContext::new(1_000))
        .await
        .unwrap();

    assert!(delta.spent_outputs.is_empty());
    assert_eq!(delta.created_outputs, vec![issuance.output_id]);
    assert_eq!(delta.consumed_nonces, vec![issuance.nonce_id]);

    let state = processor.state();
    assert!(state.contains_utxo(&issuance.output_id).await.unwrap());
    assert!(state.contains_nonce(&issuance.nonce_id).await.unwrap());
}

#[tokio::test]
async fn test_spend_to_output() {
    let fixture = TxFixture::new();
    let spend = fixture.spend_tx(100);
    let processor = processor();
    processor.state().seed_utxo(spend.prev_output_id);

    let delta = processor
        .submit(&spend.tx, &BlockContext::new(1_000))
        .await
        .unwrap();

    assert_eq!(delta.spent_outputs, vec![spend.prev_output_id]);
    assert_eq!(delta.created_outputs, vec![spend.new_output_id]);

    let state = processor.state();
    assert!(!state.contains_utxo(&spend.prev_output_id).await.unwrap());
    assert!(state.contains_utxo(&spend.new_output_id).await.unwrap());
}

#[tokio::test]
async fn test_mux_conservation_violation() {
    let fixture = TxFixture::new();
    let tx = fixture.mux_tx([60, 40], [60, 39]);
    let processor = processor();

    let err = processor
        .submit(&tx, &BlockContext::new(1_000))
        .await
        .unwrap_err();

    match err {
        ProcessorError::Validation(failure) => assert!(matches!(
            failure.error,
            ValidationError::Conservation(ConservationError::Unbalanced { .. })
        )),
        other => panic!("expected conservation failure, got {other}"),
    }
    assert_eq!(processor.state().utxo_count(), 0);
}

#[tokio::test]
async fn test_dangling_pointer() {
    let fixture = TxFixture::new();
    let tx = fixture.dangling_spend_tx(100);
    let processor = processor();

    let err = processor
        .submit(&tx, &BlockContext::new(1_000))
        .await
        .unwrap_err();

    match err {
        ProcessorError::Validation(failure) => assert!(matches!(
            failure.error,
            ValidationError::Structural(StructuralError::MissingEntry(_))
        )),
        other => panic!("expected structural failure, got {other}"),
    }
}

#[tokio::test]
async fn test_replay_rejected_with_duplicate_nonce() {
    let fixture = TxFixture::new();
    let issuance = fixture.issuance_tx(100);
    let processor = processor();
    let ctx = BlockContext::new(1_000);

    processor.submit(&issuance.tx, &ctx).await.unwrap();

    let err = processor.submit(&issuance.tx, &ctx).await.unwrap_err();
    match err {
        ProcessorError::State(StateError::DuplicateNonce(id)) => {
            assert_eq!(id, issuance.nonce_id);
        }
        other => panic!("expected duplicate nonce, got {other}"),
    }

    // the replay left no partial effects behind
    assert_eq!(processor.state().utxo_count(), 1);
    assert_eq!(processor.state().nonce_count(), 1);
}

#[tokio::test]
async fn test_nonzero_ext_hash_rejected() {
    let fixture = TxFixture::new();
    let issuance = fixture.issuance_tx_with_ext(100, Hash::hash(b"extension"));
    let processor = processor();

    let err = processor
        .submit(&issuance.tx, &BlockContext::new(1_000))
        .await
        .unwrap_err();

    match err {
        ProcessorError::Validation(failure) => assert!(matches!(
            failure.error,
            ValidationError::Extension(ExtensionError::NonZeroExtHash(_))
        )),
        other => panic!("expected extension failure, got {other}"),
    }
}

#[tokio::test]
async fn test_program_rejection_blocks_application() {
    let fixture = TxFixture::new();
    let issuance = fixture.issuance_tx(100);
    let processor = TxProcessor::new(MemoryState::new(), RejectAll);

    let err = processor
        .submit(&issuance.tx, &BlockContext::new(1_000))
        .await
        .unwrap_err();
    assert!(matches!(err, ProcessorError::Validation(_)));

    // rejected before touching state
    assert_eq!(processor.state().utxo_count(), 0);
    assert_eq!(processor.state().nonce_count(), 0);
}

#[test]
fn test_validation_is_deterministic() {
    let fixture = TxFixture::new();
    let tx = fixture.mux_tx([60, 40], [60, 39]);

    let first = txgraph::validate(&tx, &AcceptAll).unwrap_err();
    let second = txgraph::validate(&tx, &AcceptAll).unwrap_err();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_failed_spend_rolls_back() {
    let fixture = TxFixture::new();
    let spend = fixture.spend_tx(100);
    let processor = processor();
    // prev output deliberately not seeded

    let err = processor
        .submit(&spend.tx, &BlockContext::new(1_000))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ProcessorError::State(StateError::MissingUtxo(_))
    ));

    // nothing leaked from the rolled-back scope
    assert!(!processor
        .state()
        .contains_utxo(&spend.new_output_id)
        .await
        .unwrap());
    assert_eq!(processor.state().utxo_count(), 0);
}
