use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash::TreeHash;
use tree_hash_derive::TreeHash;

use crate::checkpoint::Checkpoint;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode, TreeHash)]
pub struct AttestationData {
    pub slot: u64,
    pub committee_index: u64,

    /// LMD GHOST vote.
    pub beacon_block_root: B256,

    /// FFG vote.
    pub source: Checkpoint,
    pub target: Checkpoint,
}

/// Deterministic fingerprint used as the attestation cache key. Two
/// attestations with the same `AttestationData` share a fingerprint
/// regardless of their `aggregation_bits`.
pub type AttestationFingerprint = alloy_primitives::B256;

impl AttestationData {
    pub fn fingerprint(&self) -> AttestationFingerprint {
        self.tree_hash_root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(slot: u64) -> AttestationData {
        AttestationData {
            slot,
            committee_index: 0,
            beacon_block_root: B256::ZERO,
            source: Checkpoint::default(),
            target: Checkpoint::default(),
        }
    }

    #[test]
    fn fingerprint_is_stable_for_equal_data() {
        assert_eq!(sample(1).fingerprint(), sample(1).fingerprint());
    }

    #[test]
    fn fingerprint_differs_across_slots() {
        assert_ne!(sample(1).fingerprint(), sample(2).fingerprint());
    }
}
