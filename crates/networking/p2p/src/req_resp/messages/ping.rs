use ssz_derive::{Decode, Encode};

/// Carries the sender's current metadata sequence number (`spec.md` §4.4.3).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Encode, Decode)]
#[ssz(struct_behaviour = "transparent")]
pub struct Ping {
    pub sequence_number: u64,
}

impl Ping {
    pub fn new(sequence_number: u64) -> Self {
        Self { sequence_number }
    }
}

#[cfg(test)]
mod tests {
    use ssz::{Decode, Encode};

    use super::*;

    #[test]
    fn ping_encode_decode_round_trips() {
        let ping = Ping::new(42);
        let encoded = ping.as_ssz_bytes();
        let decoded = Ping::from_ssz_bytes(&encoded).unwrap();
        assert_eq!(ping, decoded);
        assert_eq!(ping.sequence_number.as_ssz_bytes(), encoded);
    }
}
