use ssz::{Decode, DecodeError, Encode};

/// Opaque BLS signature bytes. Verification and aggregation are external
/// collaborators (see `SignatureAggregator` in `vigil-attestation-pool`) —
/// this crate only carries the bytes around.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub [u8; 96]);

impl Default for Signature {
    fn default() -> Self {
        Self([0u8; 96])
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signature(0x{}…)", hex_prefix(&self.0))
    }
}

fn hex_prefix(bytes: &[u8]) -> String {
    bytes
        .iter()
        .take(4)
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

impl Encode for Signature {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_append(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.0);
    }

    fn ssz_bytes_len(&self) -> usize {
        96
    }

    fn ssz_fixed_len() -> usize {
        96
    }
}

impl Decode for Signature {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_fixed_len() -> usize {
        96
    }

    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() != 96 {
            return Err(DecodeError::InvalidByteLength {
                len: bytes.len(),
                expected: 96,
            });
        }
        let mut out = [0u8; 96];
        out.copy_from_slice(bytes);
        Ok(Signature(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ssz_round_trip() {
        let mut bytes = [0u8; 96];
        bytes[0] = 7;
        let signature = Signature(bytes);
        let encoded = signature.as_ssz_bytes();
        let decoded = Signature::from_ssz_bytes(&encoded).expect("should decode");
        assert_eq!(signature, decoded);
    }
}
