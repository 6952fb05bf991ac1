use ssz_derive::{Decode, Encode};
use vigil_consensus_types::Bitlist;

/// Subnet participation advertisement (`spec.md` §3 peer record,
/// `metadata: {seq, attnets}`). The teacher's `GetMetaDataV2` uses a
/// fixed-width `ssz_types::BitVector`; this core only has the
/// subset/superset-aware `Bitlist` from `vigil-consensus-types`, which is
/// variable-length but otherwise serves the same role here.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct MetaData {
    pub seq_number: u64,
    pub attnets: Bitlist,
}

#[cfg(test)]
mod tests {
    use ssz::{Decode, Encode};

    use super::*;

    #[test]
    fn metadata_encode_decode_round_trips() {
        let metadata = MetaData {
            seq_number: 7,
            attnets: Bitlist::from_set_bits(8, [0, 3]).unwrap(),
        };
        let encoded = metadata.as_ssz_bytes();
        assert_eq!(MetaData::from_ssz_bytes(&encoded).unwrap(), metadata);
    }
}
