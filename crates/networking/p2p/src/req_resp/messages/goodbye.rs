use ssz::{Decode, DecodeError, Encode};

/// Disconnect reason sent on the goodbye RPC. Hand-written `Encode`/`Decode`
/// (mirroring the teacher's own `Goodbye` message) since the wire
/// representation is a single `u64` but the in-memory type is a meaningful
/// enum, something `ssz_derive` has no behaviour for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Goodbye {
    ClientShutdown,
    IrrelevantNetwork,
    FaultOrError,
    Unspecified(u64),
}

impl From<Goodbye> for u64 {
    fn from(reason: Goodbye) -> u64 {
        match reason {
            Goodbye::ClientShutdown => 1,
            Goodbye::IrrelevantNetwork => 2,
            Goodbye::FaultOrError => 3,
            Goodbye::Unspecified(reason) => reason,
        }
    }
}

impl From<u64> for Goodbye {
    fn from(reason: u64) -> Goodbye {
        match reason {
            1 => Goodbye::ClientShutdown,
            2 => Goodbye::IrrelevantNetwork,
            3 => Goodbye::FaultOrError,
            reason => Goodbye::Unspecified(reason),
        }
    }
}

impl Encode for Goodbye {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_append(&self, buf: &mut Vec<u8>) {
        u64::from(*self).ssz_append(buf);
    }

    fn ssz_bytes_len(&self) -> usize {
        8
    }

    fn ssz_fixed_len() -> usize {
        8
    }
}

impl Decode for Goodbye {
    fn is_ssz_fixed_len() -> bool {
        true
    }

    fn ssz_fixed_len() -> usize {
        8
    }

    fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let value = u64::from_ssz_bytes(bytes)?;
        Ok(Goodbye::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goodbye_round_trips_known_and_unspecified_reasons() {
        for reason in [
            Goodbye::ClientShutdown,
            Goodbye::IrrelevantNetwork,
            Goodbye::FaultOrError,
            Goodbye::Unspecified(999),
        ] {
            let encoded = reason.as_ssz_bytes();
            assert_eq!(Goodbye::from_ssz_bytes(&encoded).unwrap(), reason);
        }
    }
}
