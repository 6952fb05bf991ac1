//! Variable-length, SSZ-style bitlist with a sentinel length bit.
//!
//! The length `n` is not stored as a separate field: the highest set bit in
//! the backing byte buffer marks the boundary, and every bit below it is a
//! data bit. This is the same encoding `BitList` uses across the SSZ spec
//! (and the `ssz_types` crate the rest of the ecosystem reaches for) — it is
//! reproduced by hand here because the admission logic in the attestation
//! cache needs `contains`/`overlaps` to be allocation-free hot-path
//! operations, not something routed through a generic SSZ container.

use std::fmt;

use ssz::{Decode, DecodeError, Encode};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BitlistError {
    #[error("bitlist length mismatch: {a} != {b}")]
    LengthMismatch { a: usize, b: usize },
    #[error("bitlist length must be at least 1")]
    ZeroLength,
    #[error("bit index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// A bitmap of `len` participation bits plus a sentinel terminator bit.
#[derive(Clone, Eq)]
pub struct Bitlist {
    /// Backing bytes, little-endian, including the sentinel bit.
    bytes: Vec<u8>,
    len: usize,
}

impl Bitlist {
    /// Creates a zero-initialized bitlist of `len` data bits.
    pub fn new(len: usize) -> Result<Self, BitlistError> {
        if len == 0 {
            return Err(BitlistError::ZeroLength);
        }
        let mut bytes = vec![0u8; len / 8 + 1];
        set_bit(&mut bytes, len);
        Ok(Self { bytes, len })
    }

    /// Builds a bitlist of `len` bits from the indices that should be set.
    pub fn from_set_bits(
        len: usize,
        set_indices: impl IntoIterator<Item = usize>,
    ) -> Result<Self, BitlistError> {
        let mut bitlist = Self::new(len)?;
        for index in set_indices {
            bitlist.set(index, true)?;
        }
        Ok(bitlist)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of data bits set (popcount over `b[0..len)`, excluding the
    /// sentinel).
    pub fn count(&self) -> usize {
        (0..self.len).filter(|&i| self.bit_at(i)).count()
    }

    pub fn bit_at(&self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        get_bit(&self.bytes, index)
    }

    pub fn set(&mut self, index: usize, value: bool) -> Result<(), BitlistError> {
        if index >= self.len {
            return Err(BitlistError::IndexOutOfBounds {
                index,
                len: self.len,
            });
        }
        if value {
            set_bit(&mut self.bytes, index);
        } else {
            clear_bit(&mut self.bytes, index);
        }
        Ok(())
    }

    /// True iff `self` is a superset of `other`: every bit `other` sets is
    /// also set in `self`.
    pub fn contains(&self, other: &Self) -> Result<bool, BitlistError> {
        self.require_same_len(other)?;
        Ok((0..self.len).all(|i| !other.bit_at(i) || self.bit_at(i)))
    }

    /// True iff `self` and `other` share at least one set bit.
    pub fn overlaps(&self, other: &Self) -> Result<bool, BitlistError> {
        self.require_same_len(other)?;
        Ok((0..self.len).any(|i| self.bit_at(i) && other.bit_at(i)))
    }

    /// Bitwise OR of two same-length bitlists.
    pub fn or(&self, other: &Self) -> Result<Self, BitlistError> {
        self.require_same_len(other)?;
        Bitlist::from_set_bits(
            self.len,
            (0..self.len).filter(|&i| self.bit_at(i) || other.bit_at(i)),
        )
    }

    fn require_same_len(&self, other: &Self) -> Result<(), BitlistError> {
        if self.len != other.len {
            return Err(BitlistError::LengthMismatch {
                a: self.len,
                b: other.len,
            });
        }
        Ok(())
    }
}

impl PartialEq for Bitlist {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && (0..self.len).all(|i| self.bit_at(i) == other.bit_at(i))
    }
}

impl fmt::Debug for Bitlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits: String = (0..self.len)
            .map(|i| if self.bit_at(i) { '1' } else { '0' })
            .collect();
        write!(f, "Bitlist(len={}, bits={bits})", self.len)
    }
}

fn get_bit(bytes: &[u8], index: usize) -> bool {
    let byte = bytes[index / 8];
    byte & (1 << (index % 8)) != 0
}

fn set_bit(bytes: &mut [u8], index: usize) {
    bytes[index / 8] |= 1 << (index % 8);
}

fn clear_bit(bytes: &mut [u8], index: usize) {
    bytes[index / 8] &= !(1 << (index % 8));
}

/// Position of the highest set bit in `bytes`, scanning from the end.
fn highest_set_bit(bytes: &[u8]) -> Option<usize> {
    for (byte_index, byte) in bytes.iter().enumerate().rev() {
        if *byte != 0 {
            let bit_in_byte = 7 - byte.leading_zeros() as usize;
            return Some(byte_index * 8 + bit_in_byte);
        }
    }
    None
}

impl Encode for Bitlist {
    fn is_ssz_fixed_len() -> bool {
        false
    }

    fn ssz_append(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.bytes);
    }

    fn ssz_bytes_len(&self) -> usize {
        self.bytes.len()
    }
}

impl Decode for Bitlist {
    fn is_ssz_fixed_len() -> bool {
        false
    }

    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.is_empty() {
            return Err(DecodeError::InvalidByteLength {
                len: 0,
                expected: 1,
            });
        }
        let sentinel = highest_set_bit(bytes).ok_or_else(|| {
            DecodeError::BytesInvalid("bitlist is missing its sentinel bit".to_string())
        })?;
        let mut bitlist = Bitlist::new(sentinel).map_err(|err| {
            DecodeError::BytesInvalid(format!("invalid bitlist length: {err}"))
        })?;
        for i in 0..sentinel {
            if get_bit(bytes, i) {
                bitlist
                    .set(i, true)
                    .map_err(|err| DecodeError::BytesInvalid(err.to_string()))?;
            }
        }
        Ok(bitlist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_bitlist_has_sentinel_only() {
        let bitlist = Bitlist::new(4).expect("should create bitlist");
        assert_eq!(bitlist.len(), 4);
        assert_eq!(bitlist.count(), 0);
        for i in 0..4 {
            assert!(!bitlist.bit_at(i));
        }
    }

    #[test]
    fn set_and_count() {
        let bitlist = Bitlist::from_set_bits(7, [0, 1, 2, 3]).expect("should build");
        assert_eq!(bitlist.count(), 4);
        assert!(bitlist.bit_at(0));
        assert!(!bitlist.bit_at(4));
    }

    #[test]
    fn contains_is_superset_check() {
        let a = Bitlist::from_set_bits(7, [0, 1, 2, 3]).unwrap(); // 0b1111000 (LSB-first)
        let b = Bitlist::from_set_bits(7, [0, 1]).unwrap(); // 0b1100000
        assert!(a.contains(&b).unwrap());
        assert!(!b.contains(&a).unwrap());
    }

    #[test]
    fn overlaps_detects_shared_bits() {
        let a = Bitlist::from_set_bits(7, [0, 1, 2, 3]).unwrap();
        let b = Bitlist::from_set_bits(7, [3, 4, 5]).unwrap();
        assert!(a.overlaps(&b).unwrap());
        let c = Bitlist::from_set_bits(7, [4, 5, 6]).unwrap();
        assert!(!a.overlaps(&c).unwrap());
    }

    #[test]
    fn or_combines_bits() {
        let a = Bitlist::from_set_bits(4, [1]).unwrap(); // 0b0010
        let b = Bitlist::from_set_bits(4, [2]).unwrap(); // 0b0100
        let combined = a.or(&b).unwrap();
        assert_eq!(combined.count(), 2);
        assert!(combined.bit_at(1));
        assert!(combined.bit_at(2));
    }

    #[test]
    fn length_mismatch_is_an_error_not_a_panic() {
        let a = Bitlist::new(4).unwrap();
        let b = Bitlist::new(8).unwrap();
        assert_eq!(
            a.contains(&b),
            Err(BitlistError::LengthMismatch { a: 4, b: 8 })
        );
        assert_eq!(
            a.overlaps(&b),
            Err(BitlistError::LengthMismatch { a: 4, b: 8 })
        );
        assert_eq!(
            a.or(&b).unwrap_err(),
            BitlistError::LengthMismatch { a: 4, b: 8 }
        );
    }

    #[test]
    fn equal_length_and_bits_implies_equal() {
        let a = Bitlist::from_set_bits(5, [0, 2]).unwrap();
        let b = Bitlist::from_set_bits(5, [0, 2]).unwrap();
        let c = Bitlist::from_set_bits(5, [0, 3]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn ssz_round_trip() {
        let bitlist = Bitlist::from_set_bits(12, [0, 5, 11]).unwrap();
        let encoded = bitlist.as_ssz_bytes();
        assert_eq!(encoded.len(), 12 / 8 + 1);
        let decoded = Bitlist::from_ssz_bytes(&encoded).expect("should decode");
        assert_eq!(bitlist, decoded);
    }

    #[test]
    fn zero_length_is_rejected() {
        assert_eq!(Bitlist::new(0), Err(BitlistError::ZeroLength));
    }
}
