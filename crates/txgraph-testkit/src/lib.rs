//! # txgraph Testkit
//!
//! Testing utilities for txgraph.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: scenario transaction builders and mock program
//!   validators
//! - **Generators**: proptest strategies over entries and their fields
//! - **Golden vectors**: pinned entry IDs for cross-implementation
//!   verification
//!
//! ## Fixtures
//!
//! ```rust
//! use txgraph_testkit::{AcceptAll, TxFixture};
//!
//! let fixture = TxFixture::new();
//! let issuance = fixture.issuance_tx(100);
//! txgraph_core::validate(&issuance.tx, &AcceptAll).unwrap();
//! ```
//!
//! ## Golden vectors
//!
//! ```rust
//! for (name, matched, id) in txgraph_testkit::verify_all_vectors() {
//!     assert!(matched, "{} drifted to {}", name, id);
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{AcceptAll, IssuanceFixture, RejectAll, SpendFixture, TxFixture};
pub use vectors::{all_vectors, asset_definition_vector, verify_all_vectors, GoldenVector};
