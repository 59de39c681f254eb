//! Hashing primitives and the entry-ID computation.
//!
//! Wraps SHA3-256 digests in strong types. Entry IDs are content
//! addresses over the *body* encoding only; witness data never reaches
//! the hasher.

use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};
use std::fmt;

/// Domain separation prefix for entry IDs.
///
/// `entry_id = H("entryid:" || type_tag || ":" || H(body))`
pub const ENTRY_ID_PREFIX: &[u8] = b"entryid:";

/// A 32-byte SHA3-256 digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Hash(pub [u8; 32]);

impl Hash {
    /// Compute the SHA3-256 hash of the given data.
    pub fn hash(data: &[u8]) -> Self {
        let digest = Sha3_256::digest(data);
        Self(digest.into())
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// The zero hash (sentinel value).
    pub const ZERO: Self = Self([0u8; 32]);

    /// Check whether this is the all-zero sentinel.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// A 32-byte entry identifier, computed from the entry's type tag and
/// body encoding. Two entries with the same body have the same ID.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct EntryId(pub [u8; 32]);

impl EntryId {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        Hash::from_hex(s).map(|h| Self(h.0))
    }

    /// The nil entry ID (an unset pointer).
    pub const NIL: Self = Self([0u8; 32]);

    /// Check whether this is the nil sentinel.
    pub fn is_nil(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Debug for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntryId({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for EntryId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for EntryId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// A 32-byte asset identifier: the hash of the asset definition's
/// canonical encoding.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct AssetId(pub [u8; 32]);

impl AssetId {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssetId({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for AssetId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for AssetId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// Compute the content-addressed ID of an entry.
///
/// `H("entryid:" || type_tag || ":" || H(body))`. The prefix, the tag,
/// and the single colon separator are consensus-critical: changing any
/// byte forks the chain.
pub fn entry_id(type_tag: &str, body: &[u8]) -> EntryId {
    let body_hash = Hash::hash(body);

    let mut hasher = Sha3_256::new();
    hasher.update(ENTRY_ID_PREFIX);
    hasher.update(type_tag.as_bytes());
    hasher.update(b":");
    hasher.update(body_hash.as_bytes());
    EntryId(hasher.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_deterministic() {
        let h1 = Hash::hash(b"some data");
        let h2 = Hash::hash(b"some data");
        assert_eq!(h1, h2);
        assert_ne!(h1, Hash::hash(b"other data"));
    }

    #[test]
    fn test_hash_hex_roundtrip() {
        let h = Hash::hash(b"roundtrip");
        let recovered = Hash::from_hex(&h.to_hex()).unwrap();
        assert_eq!(h, recovered);
    }

    #[test]
    fn test_zero_sentinel() {
        assert!(Hash::ZERO.is_zero());
        assert!(EntryId::NIL.is_nil());
        assert!(!Hash::hash(b"x").is_zero());
    }

    #[test]
    fn test_entry_id_depends_on_tag() {
        let body = b"identical body bytes";
        let a = entry_id("output1", body);
        let b = entry_id("retirement1", body);
        assert_ne!(a, b);
    }

    #[test]
    fn test_entry_id_matches_manual_construction() {
        let body = b"body";
        let inner = Hash::hash(body);

        let mut preimage = Vec::new();
        preimage.extend_from_slice(b"entryid:");
        preimage.extend_from_slice(b"nonce");
        preimage.extend_from_slice(b":");
        preimage.extend_from_slice(inner.as_bytes());

        let expected = Hash::hash(&preimage);
        assert_eq!(entry_id("nonce", body).0, expected.0);
    }

    #[test]
    fn test_entry_id_display() {
        let id = EntryId::from_bytes([0xab; 32]);
        assert_eq!(format!("{}", id), "abababababababab");
    }
}
