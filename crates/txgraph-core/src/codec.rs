//! Canonical field encoding for entry bodies.
//!
//! This module implements the seven primitive field kinds used by entry
//! bodies:
//! - Byte: one octet
//! - Integer: unsigned LEB128 varint, magnitude at most 2^63 - 1
//! - Hash: exactly 32 octets
//! - String: varint length prefix (< 2^31), then the bytes verbatim
//! - List: a String whose content is the concatenation of the elements
//! - Struct: field encodings concatenated in declared order
//! - ExtStruct: a single 32-byte hash
//!
//! The canonical encoding is critical: it is the input to the body hash,
//! so the same entry must produce identical bytes on every platform.
//! Decoders are strict and reject any non-canonical form.

use thiserror::Error;

/// Largest value an Integer field may carry (63-bit magnitude).
pub const MAX_INT: u64 = i64::MAX as u64;

/// Largest String length prefix accepted (exclusive).
pub const MAX_STRING_LEN: u64 = 1 << 31;

/// Decoding failures for the canonical field codec.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// A varint exceeded the 63-bit magnitude limit, or input remained
    /// after a complete structure.
    #[error("encoding too long")]
    TooLong,

    /// Input ended before the structure was complete.
    #[error("truncated input")]
    Truncated,

    /// A varint used a redundant over-long form.
    #[error("non-canonical varint")]
    NonCanonicalVarint,

    /// A String length prefix at or above 2^31.
    #[error("bad length prefix")]
    BadLengthPrefix,
}

/// Append a single octet.
pub fn write_byte(buf: &mut Vec<u8>, b: u8) {
    buf.push(b);
}

/// Append an Integer as an unsigned LEB128 varint.
///
/// Callers must keep values within the 63-bit magnitude limit; the
/// model types enforce this at construction.
pub fn write_varint(buf: &mut Vec<u8>, mut n: u64) {
    debug_assert!(n <= MAX_INT);
    loop {
        let byte = (n & 0x7f) as u8;
        n >>= 7;
        if n == 0 {
            buf.push(byte);
            return;
        }
        buf.push(byte | 0x80);
    }
}

/// Append a String: varint length prefix, then the bytes verbatim.
pub fn write_string(buf: &mut Vec<u8>, s: &[u8]) {
    debug_assert!((s.len() as u64) < MAX_STRING_LEN);
    write_varint(buf, s.len() as u64);
    buf.extend_from_slice(s);
}

/// Append exactly 32 octets (Hash, Pointer, ExtStruct).
pub fn write_hash32(buf: &mut Vec<u8>, h: &[u8; 32]) {
    buf.extend_from_slice(h);
}

/// Append a List: the elements' encodings concatenated, wrapped as a
/// String.
pub fn write_list<T>(buf: &mut Vec<u8>, items: &[T], mut write: impl FnMut(&mut Vec<u8>, &T)) {
    let mut inner = Vec::new();
    for item in items {
        write(&mut inner, item);
    }
    write_string(buf, &inner);
}

/// Strict cursor over canonical bytes.
pub struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    /// Wrap a byte slice.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    /// True when all input has been consumed.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Read one octet.
    pub fn read_byte(&mut self) -> Result<u8, DecodeError> {
        let (&b, rest) = self.buf.split_first().ok_or(DecodeError::Truncated)?;
        self.buf = rest;
        Ok(b)
    }

    /// Read an Integer (canonical LEB128, 63-bit magnitude).
    pub fn read_varint(&mut self) -> Result<u64, DecodeError> {
        let mut value: u64 = 0;
        let mut shift: u32 = 0;
        loop {
            // 9 groups of 7 bits cover the full 63-bit range
            if shift == 63 {
                return Err(DecodeError::TooLong);
            }
            let byte = self.read_byte()?;
            value |= ((byte & 0x7f) as u64) << shift;
            if byte & 0x80 == 0 {
                // a multi-byte form must not end in a zero group
                if shift > 0 && byte == 0 {
                    return Err(DecodeError::NonCanonicalVarint);
                }
                return Ok(value);
            }
            shift += 7;
        }
    }

    /// Read exactly 32 octets.
    pub fn read_hash32(&mut self) -> Result<[u8; 32], DecodeError> {
        if self.buf.len() < 32 {
            return Err(DecodeError::Truncated);
        }
        let (head, rest) = self.buf.split_at(32);
        self.buf = rest;
        let mut arr = [0u8; 32];
        arr.copy_from_slice(head);
        Ok(arr)
    }

    /// Read a String: length prefix, then that many bytes.
    pub fn read_string(&mut self) -> Result<&'a [u8], DecodeError> {
        let len = self.read_varint()?;
        if len >= MAX_STRING_LEN {
            return Err(DecodeError::BadLengthPrefix);
        }
        let len = len as usize;
        if self.buf.len() < len {
            return Err(DecodeError::Truncated);
        }
        let (head, rest) = self.buf.split_at(len);
        self.buf = rest;
        Ok(head)
    }

    /// Read a List: the String wrapper, then each element decoded from
    /// its content until exhaustion.
    pub fn read_list<T>(
        &mut self,
        mut read: impl FnMut(&mut Reader<'a>) -> Result<T, DecodeError>,
    ) -> Result<Vec<T>, DecodeError> {
        let content = self.read_string()?;
        let mut inner = Reader::new(content);
        let mut items = Vec::new();
        while !inner.is_empty() {
            items.push(read(&mut inner)?);
        }
        Ok(items)
    }

    /// Require full consumption of the input.
    pub fn finish(self) -> Result<(), DecodeError> {
        if self.buf.is_empty() {
            Ok(())
        } else {
            Err(DecodeError::TooLong)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn varint_bytes(n: u64) -> Vec<u8> {
        let mut buf = Vec::new();
        write_varint(&mut buf, n);
        buf
    }

    #[test]
    fn test_varint_smallest_encoding() {
        assert_eq!(varint_bytes(0), vec![0x00]);
        assert_eq!(varint_bytes(1), vec![0x01]);
        assert_eq!(varint_bytes(127), vec![0x7f]);
        assert_eq!(varint_bytes(128), vec![0x80, 0x01]);
        assert_eq!(varint_bytes(300), vec![0xac, 0x02]);
        assert_eq!(varint_bytes(MAX_INT).len(), 9);
    }

    #[test]
    fn test_varint_roundtrip() {
        for n in [0, 1, 127, 128, 16383, 16384, 1 << 31, MAX_INT] {
            let buf = varint_bytes(n);
            let mut r = Reader::new(&buf);
            assert_eq!(r.read_varint().unwrap(), n);
            assert!(r.is_empty());
        }
    }

    #[test]
    fn test_varint_rejects_overlong_form() {
        // 0x80 0x00 is a redundant two-byte encoding of zero
        let mut r = Reader::new(&[0x80, 0x00]);
        assert_eq!(r.read_varint(), Err(DecodeError::NonCanonicalVarint));

        // 0xff 0x00 likewise encodes 127 redundantly
        let mut r = Reader::new(&[0xff, 0x00]);
        assert_eq!(r.read_varint(), Err(DecodeError::NonCanonicalVarint));
    }

    #[test]
    fn test_varint_rejects_ten_bytes() {
        // ten continuation groups exceed the 63-bit range
        let buf = [0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x01];
        let mut r = Reader::new(&buf);
        assert_eq!(r.read_varint(), Err(DecodeError::TooLong));
    }

    #[test]
    fn test_varint_truncated() {
        let mut r = Reader::new(&[0x80]);
        assert_eq!(r.read_varint(), Err(DecodeError::Truncated));
    }

    #[test]
    fn test_string_roundtrip() {
        let mut buf = Vec::new();
        write_string(&mut buf, b"hello");
        assert_eq!(buf, [&[0x05u8][..], b"hello"].concat());

        let mut r = Reader::new(&buf);
        assert_eq!(r.read_string().unwrap(), b"hello");
        assert!(r.is_empty());
    }

    #[test]
    fn test_string_truncated_body() {
        let mut r = Reader::new(&[0x05, b'h', b'i']);
        assert_eq!(r.read_string(), Err(DecodeError::Truncated));
    }

    #[test]
    fn test_hash32_roundtrip() {
        let mut buf = Vec::new();
        write_hash32(&mut buf, &[0x42; 32]);
        assert_eq!(buf.len(), 32);

        let mut r = Reader::new(&buf);
        assert_eq!(r.read_hash32().unwrap(), [0x42; 32]);
    }

    #[test]
    fn test_hash32_truncated() {
        let mut r = Reader::new(&[0u8; 31]);
        assert_eq!(r.read_hash32(), Err(DecodeError::Truncated));
    }

    #[test]
    fn test_list_roundtrip() {
        let items: Vec<u64> = vec![1, 300, MAX_INT];
        let mut buf = Vec::new();
        write_list(&mut buf, &items, |b, &n| write_varint(b, n));

        let mut r = Reader::new(&buf);
        let decoded = r.read_list(|r| r.read_varint()).unwrap();
        assert_eq!(decoded, items);
        assert!(r.is_empty());
    }

    #[test]
    fn test_empty_list_is_empty_string() {
        let items: Vec<u64> = vec![];
        let mut buf = Vec::new();
        write_list(&mut buf, &items, |b, &n| write_varint(b, n));
        assert_eq!(buf, vec![0x00]);
    }

    #[test]
    fn test_finish_rejects_trailing_bytes() {
        let mut r = Reader::new(&[0x01, 0xff]);
        r.read_byte().unwrap();
        assert_eq!(r.finish(), Err(DecodeError::TooLong));
    }
}
