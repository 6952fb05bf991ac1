use ssz_derive::{Decode, Encode};

use crate::{attestation_data::AttestationData, bitlist::Bitlist, signature::Signature};

/// A signed vote by a validator committee over a block and checkpoint pair.
///
/// An attestation is **aggregated** iff `aggregation_bits.count() >= 2`,
/// else **unaggregated** (a single validator's vote).
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
pub struct Attestation {
    pub data: AttestationData,
    pub aggregation_bits: Bitlist,
    pub signature: Signature,
}

impl Attestation {
    pub fn is_aggregated(&self) -> bool {
        self.aggregation_bits.count() >= 2
    }

    pub fn is_unaggregated(&self) -> bool {
        self.aggregation_bits.count() == 1
    }
}
