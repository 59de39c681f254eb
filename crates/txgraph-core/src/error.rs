//! The validation error taxonomy.
//!
//! Errors are grouped into the closed set of failure classes so callers
//! can dispatch on the class without parsing messages. A failure also
//! carries the path of entry IDs from the header to the failing entry.

use thiserror::Error;

use crate::codec::DecodeError;
use crate::hash::{AssetId, EntryId};

/// Malformed transaction structure: dangling or duplicate entries,
/// empty results, bad encodings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StructuralError {
    #[error("entry {0} is not present in the transaction")]
    MissingEntry(EntryId),

    #[error("duplicate entry id {0}")]
    DuplicateEntry(EntryId),

    #[error("header lists no results")]
    EmptyResults,

    #[error("unsupported transaction version {0}")]
    BadTxVersion(u64),

    #[error("non-canonical encoding: {0}")]
    Encoding(#[from] DecodeError),
}

/// A pointer resolved to an entry outside its admissible variant set.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("entry {id} is a {found}, expected {expected}")]
    WrongVariant {
        id: EntryId,
        found: &'static str,
        expected: &'static str,
    },
}

/// A value-flow edge whose reverse edge disagrees.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValueFlowError {
    #[error("entry {0} has no destination witness")]
    MissingDestination(EntryId),

    #[error("edge position {position} is out of range for entry {entry}")]
    PositionOutOfRange { entry: EntryId, position: u64 },

    #[error("reverse edge of {entry} points at {found}, expected {expected}")]
    MismatchedReference {
        entry: EntryId,
        expected: EntryId,
        found: EntryId,
    },

    #[error("reverse edge of {entry} carries position {found}, expected {expected}")]
    MismatchedPosition {
        entry: EntryId,
        expected: u64,
        found: u64,
    },

    #[error("value mismatch on the edge between {entry} and {other}")]
    MismatchedValue { entry: EntryId, other: EntryId },
}

/// Per-asset imbalance or arithmetic overflow at a mux.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConservationError {
    #[error(
        "mux {mux} does not conserve asset {asset_id}: sources {source_total}, destinations {destination_total}"
    )]
    Unbalanced {
        mux: EntryId,
        asset_id: AssetId,
        source_total: u64,
        destination_total: u64,
    },

    #[error("mux {mux} overflows the 63-bit total for asset {asset_id}")]
    Overflow { mux: EntryId, asset_id: AssetId },
}

/// Program evaluation failed or the program cannot run at this version.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgramError {
    #[error("program for entry {0} evaluated to false")]
    Rejected(EntryId),

    #[error("entry {entry} carries a program for unsupported vm version {vm_version}")]
    UnsupportedVmVersion { entry: EntryId, vm_version: u64 },
}

/// An issuance whose asset definition or anchor does not hold up.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IssuanceAnchorError {
    #[error("asset definition hashes to {computed}, issuance declares {declared}")]
    AssetIdMismatch { computed: AssetId, declared: AssetId },

    #[error("issuance {0} is not reachable from the header")]
    UnreachableIssuance(EntryId),

    #[error("issuance {issuance} is anchored at {anchor}, not at nonce {nonce}")]
    AnchorMismatch {
        nonce: EntryId,
        issuance: EntryId,
        anchor: EntryId,
    },
}

/// A time range that does not cover the header's window.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeRangeError {
    #[error("time range {entry} starts at {mintime}, after the header mintime {header_mintime}")]
    MintimeAfterHeader {
        entry: EntryId,
        mintime: u64,
        header_mintime: u64,
    },

    #[error("time range {entry} ends at {maxtime}, before the header maxtime {header_maxtime}")]
    MaxtimeBeforeHeader {
        entry: EntryId,
        maxtime: u64,
        header_maxtime: u64,
    },
}

/// A nonzero extension hash in a version-1 transaction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtensionError {
    #[error("entry {0} carries a nonzero extension hash at version 1")]
    NonZeroExtHash(EntryId),
}

/// Any validation failure class.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("structural error: {0}")]
    Structural(#[from] StructuralError),

    #[error("type error: {0}")]
    Type(#[from] TypeError),

    #[error("value flow error: {0}")]
    ValueFlow(#[from] ValueFlowError),

    #[error("conservation error: {0}")]
    Conservation(#[from] ConservationError),

    #[error("program error: {0}")]
    Program(#[from] ProgramError),

    #[error("issuance anchor error: {0}")]
    IssuanceAnchor(#[from] IssuanceAnchorError),

    #[error("time range error: {0}")]
    TimeRange(#[from] TimeRangeError),

    #[error("extension error: {0}")]
    Extension(#[from] ExtensionError),
}

/// A validation error plus the chain of entry IDs that led to it, from
/// the header down to the failing entry.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{error} [at {}]", path_display(.path))]
pub struct ValidationFailure {
    pub path: Vec<EntryId>,
    pub error: ValidationError,
}

impl ValidationFailure {
    /// Wrap an error with its entry path.
    pub fn new(path: Vec<EntryId>, error: impl Into<ValidationError>) -> Self {
        Self {
            path,
            error: error.into(),
        }
    }

    /// The failure class, for dispatching without the detail.
    pub fn error(&self) -> &ValidationError {
        &self.error
    }
}

fn path_display(path: &[EntryId]) -> String {
    if path.is_empty() {
        return "<root>".to_string();
    }
    path.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_display_includes_path() {
        let failure = ValidationFailure::new(
            vec![EntryId::from_bytes([0xaa; 32]), EntryId::from_bytes([0xbb; 32])],
            StructuralError::MissingEntry(EntryId::from_bytes([0xcc; 32])),
        );
        let text = failure.to_string();
        assert!(text.contains("aaaaaaaaaaaaaaaa -> bbbbbbbbbbbbbbbb"));
        assert!(text.contains("not present"));
    }

    #[test]
    fn test_class_folding() {
        let e: ValidationError = ConservationError::Overflow {
            mux: EntryId::NIL,
            asset_id: crate::hash::AssetId::from_bytes([0; 32]),
        }
        .into();
        assert!(matches!(e, ValidationError::Conservation(_)));
    }

    #[test]
    fn test_empty_path_display() {
        let failure =
            ValidationFailure::new(Vec::new(), StructuralError::EmptyResults);
        assert!(failure.to_string().contains("<root>"));
    }
}
