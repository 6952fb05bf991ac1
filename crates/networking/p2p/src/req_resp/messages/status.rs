use alloy_primitives::B256;
use ssz::{Decode, DecodeError, Encode};
use ssz_derive::{Decode as DeriveDecode, Encode as DeriveEncode};
use vigil_network_spec::ForkDigest;

/// Wire format from `spec.md` §6: `fork_digest(4) ‖ finalized_root(32) ‖
/// finalized_epoch(u64 LE) ‖ head_root(32) ‖ head_slot(u64 LE)` — 84 bytes,
/// mirroring the shape of `ream-p2p`'s `Status` message with `head_epoch`
/// renamed to `head_slot` per the data model in `spec.md` §3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, DeriveEncode, DeriveDecode)]
pub struct Status {
    pub fork_digest: ForkDigestBytes,
    pub finalized_root: B256,
    pub finalized_epoch: u64,
    pub head_root: B256,
    pub head_slot: u64,
}

/// `ForkDigest` itself has no SSZ impl (it lives in a lower crate with no ssz
/// dependency) — this newtype carries the 4 fixed bytes over the wire and
/// converts to/from it at the boundary. Hand-written, same as the teacher's
/// `Goodbye` impl, rather than relying on derive for a bare byte-array
/// newtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ForkDigestBytes(pub [u8; 4]);

impl Encode for ForkDigestBytes {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_append(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.0);
    }

    fn ssz_bytes_len(&self) -> usize {
        4
    }

    fn ssz_fixed_len() -> usize {
        4
    }
}

impl Decode for ForkDigestBytes {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_fixed_len() -> usize {
        4
    }

    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() != 4 {
            return Err(DecodeError::InvalidByteLength {
                len: bytes.len(),
                expected: 4,
            });
        }
        let mut out = [0u8; 4];
        out.copy_from_slice(bytes);
        Ok(ForkDigestBytes(out))
    }
}

impl From<ForkDigest> for ForkDigestBytes {
    fn from(digest: ForkDigest) -> Self {
        Self(digest.0)
    }
}

impl From<ForkDigestBytes> for ForkDigest {
    fn from(bytes: ForkDigestBytes) -> Self {
        ForkDigest(bytes.0)
    }
}

#[cfg(test)]
mod tests {
    use ssz::{Decode, Encode};

    use super::*;

    #[test]
    fn status_encode_decode_round_trips_to_84_bytes() {
        let status = Status {
            fork_digest: ForkDigestBytes([0xaa, 0xbb, 0xcc, 0xdd]),
            finalized_root: B256::repeat_byte(1),
            finalized_epoch: 10,
            head_root: B256::repeat_byte(2),
            head_slot: 320,
        };
        let encoded = status.as_ssz_bytes();
        assert_eq!(encoded.len(), 84);
        assert_eq!(Status::from_ssz_bytes(&encoded).unwrap(), status);
    }
}
