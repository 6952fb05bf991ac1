//! Three-substore attestation cache with subset/superset-aware admission.
//!
//! Grounded on the same shape as `NaiveAggregationPool` /
//! `AggregatedAttestationMap` in the lighthouse family of beacon nodes (keyed
//! by `AttestationData`'s tree-hash root, one aggregate per key), extended
//! per `spec.md` §4.2 with the explicit superset-wins rule and a third
//! "block-included" substore, and made safe under concurrent readers and
//! writers with one `RwLock` per substore (the `ream-operation-pool`
//! discipline) rather than a single lock over everything.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::trace;
use vigil_consensus_types::{Attestation, AttestationFingerprint};

use crate::{
    aggregator::SignatureAggregator,
    error::CacheError,
};

type Fingerprint = AttestationFingerprint;

#[derive(Default)]
struct SubStore {
    entries: RwLock<HashMap<Fingerprint, Vec<Attestation>>>,
}

impl SubStore {
    fn snapshot(&self) -> Vec<Attestation> {
        self.entries
            .read()
            .values()
            .flatten()
            .cloned()
            .collect()
    }

    /// Applies the superset-wins admission rule (`spec.md` §4.2.1) to a
    /// single substore's list for `candidate`'s fingerprint. Returns `true`
    /// if `candidate` was admitted (inserted, possibly displacing subsets).
    fn admit_superset_wins(&self, fingerprint: Fingerprint, candidate: Attestation) -> bool {
        let mut entries = self.entries.write();
        let list = entries.entry(fingerprint).or_default();

        if list
            .iter()
            .any(|existing| matches!(existing.aggregation_bits.contains(&candidate.aggregation_bits), Ok(true)))
        {
            trace!(?fingerprint, "candidate already covered by an existing entry");
            return false;
        }

        list.retain(|existing| {
            !matches!(candidate.aggregation_bits.contains(&existing.aggregation_bits), Ok(true))
        });
        list.push(candidate);
        true
    }

    fn contains_superset_of(&self, fingerprint: Fingerprint, bits: &vigil_consensus_types::Bitlist) -> bool {
        self.entries
            .read()
            .get(&fingerprint)
            .is_some_and(|list| {
                list.iter()
                    .any(|existing| matches!(existing.aggregation_bits.contains(bits), Ok(true)))
            })
    }

    fn delete_exact(&self, fingerprint: Fingerprint, candidate: &Attestation) {
        let mut entries = self.entries.write();
        if let Some(list) = entries.get_mut(&fingerprint) {
            list.retain(|existing| existing != candidate);
            if list.is_empty() {
                entries.remove(&fingerprint);
            }
        }
    }

    fn prune_before(&self, slot: u64) {
        self.entries
            .write()
            .retain(|_, list| list.first().is_none_or(|first| first.data.slot >= slot));
    }
}

/// The attestation pool described in `spec.md` §3-§4.2: unaggregated,
/// aggregated, and block-included attestations keyed by fingerprint.
pub struct AttestationCache {
    unaggregated: SubStore,
    aggregated: SubStore,
    block: SubStore,
    aggregator: Box<dyn SignatureAggregator>,
}

impl AttestationCache {
    pub fn new(aggregator: Box<dyn SignatureAggregator>) -> Self {
        Self {
            unaggregated: SubStore::default(),
            aggregated: SubStore::default(),
            block: SubStore::default(),
            aggregator,
        }
    }

    /// Saves an unaggregated attestation. If another unaggregated
    /// attestation with the same fingerprint already exists, the two are
    /// OR-combined into a single aggregated entry (`spec.md` §4.2.2).
    pub fn save_unaggregated(&self, attestation: Attestation) -> Result<(), CacheError> {
        let count = attestation.aggregation_bits.count();
        if count != 1 {
            return Err(CacheError::NotUnaggregated { actual: count });
        }

        let fingerprint = attestation.data.fingerprint();
        let existing = {
            let mut entries = self.unaggregated.entries.write();
            let list = entries.entry(fingerprint).or_default();

            if list
                .iter()
                .any(|other| other.aggregation_bits == attestation.aggregation_bits)
            {
                return Ok(());
            }

            if let Some(position) = list
                .iter()
                .position(|other| other.aggregation_bits != attestation.aggregation_bits)
            {
                Some(list.remove(position))
            } else {
                list.push(attestation.clone());
                None
            }
        };

        let Some(other) = existing else {
            return Ok(());
        };

        // Remove any now-empty fingerprint entry left behind in `unaggregated`.
        {
            let mut entries = self.unaggregated.entries.write();
            if let Some(list) = entries.get(&fingerprint) {
                if list.is_empty() {
                    entries.remove(&fingerprint);
                }
            }
        }

        let combined_bits = attestation.aggregation_bits.or(&other.aggregation_bits)?;
        let combined_signature = self
            .aggregator
            .aggregate(&[attestation.signature, other.signature]);
        let combined = Attestation {
            data: attestation.data,
            aggregation_bits: combined_bits,
            signature: combined_signature,
        };

        self.aggregated.admit_superset_wins(fingerprint, combined);
        Ok(())
    }

    /// Admits an aggregated attestation using the superset-wins rule.
    pub fn save_aggregated(&self, attestation: Attestation) -> Result<(), CacheError> {
        let count = attestation.aggregation_bits.count();
        if count < 2 {
            return Err(CacheError::NotAggregated { actual: count });
        }
        let fingerprint = attestation.data.fingerprint();
        self.aggregated.admit_superset_wins(fingerprint, attestation);
        Ok(())
    }

    /// Applies `save_aggregated` to each attestation, collecting errors but
    /// continuing through the rest of the list.
    pub fn save_aggregated_attestations(
        &self,
        attestations: impl IntoIterator<Item = Attestation>,
    ) -> Vec<CacheError> {
        attestations
            .into_iter()
            .filter_map(|attestation| self.save_aggregated(attestation).err())
            .collect()
    }

    /// Records an attestation observed in a processed block, applying the
    /// superset rule against the `block` substore only.
    ///
    /// Per `spec.md` §9 this does *not* evict the matching entry from
    /// `aggregated` — both are retained until `prune_before` removes them.
    pub fn save_block_attestation(&self, attestation: Attestation) -> Result<(), CacheError> {
        let count = attestation.aggregation_bits.count();
        if count < 2 {
            return Err(CacheError::NotAggregated { actual: count });
        }
        let fingerprint = attestation.data.fingerprint();
        self.block.admit_superset_wins(fingerprint, attestation);
        Ok(())
    }

    pub fn aggregated_attestations(&self) -> Vec<Attestation> {
        self.aggregated.snapshot()
    }

    pub fn unaggregated_attestations(&self) -> Vec<Attestation> {
        self.unaggregated.snapshot()
    }

    /// True iff some entry in `aggregated` or `block` with the same
    /// fingerprint is a superset of `attestation`'s bits.
    pub fn has_aggregated_attestation(&self, attestation: &Attestation) -> bool {
        let fingerprint = attestation.data.fingerprint();
        self.aggregated
            .contains_superset_of(fingerprint, &attestation.aggregation_bits)
            || self
                .block
                .contains_superset_of(fingerprint, &attestation.aggregation_bits)
    }

    pub fn delete_aggregated_attestation(&self, attestation: &Attestation) {
        self.aggregated
            .delete_exact(attestation.data.fingerprint(), attestation);
    }

    pub fn delete_unaggregated_attestation(&self, attestation: &Attestation) {
        self.unaggregated
            .delete_exact(attestation.data.fingerprint(), attestation);
    }

    /// Evicts any fingerprint whose `data.slot < slot` from every substore.
    pub fn prune_before(&self, slot: u64) {
        self.unaggregated.prune_before(slot);
        self.aggregated.prune_before(slot);
        self.block.prune_before(slot);
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::B256;
    use vigil_consensus_types::{AttestationData, Bitlist, Checkpoint, Signature};

    use super::*;
    use crate::aggregator::NullAggregator;

    fn data(slot: u64) -> AttestationData {
        AttestationData {
            slot,
            committee_index: 0,
            beacon_block_root: B256::ZERO,
            source: Checkpoint::default(),
            target: Checkpoint::default(),
        }
    }

    fn attestation(slot: u64, set_bits: impl IntoIterator<Item = usize>) -> Attestation {
        Attestation {
            data: data(slot),
            aggregation_bits: Bitlist::from_set_bits(7, set_bits).unwrap(),
            signature: Signature::default(),
        }
    }

    fn cache() -> AttestationCache {
        AttestationCache::new(Box::new(NullAggregator))
    }

    #[test]
    fn s1_subset_admission_is_a_no_op() {
        let cache = cache();
        cache
            .save_aggregated(attestation(1, [0, 1, 2, 3]))
            .unwrap(); // 0b1111000
        cache.save_aggregated(attestation(1, [0, 1])).unwrap(); // 0b1100000 is a subset

        let stored = cache.aggregated_attestations();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].aggregation_bits.count(), 4);
        assert!(cache.has_aggregated_attestation(&attestation(1, [0, 1])));
    }

    #[test]
    fn s2_superset_replaces_subset() {
        let cache = cache();
        cache.save_aggregated(attestation(1, [0, 1])).unwrap();
        cache
            .save_aggregated(attestation(1, [0, 1, 2, 3]))
            .unwrap();

        let stored = cache.aggregated_attestations();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].aggregation_bits.count(), 4);
    }

    #[test]
    fn s3_incomparable_entries_coexist() {
        let cache = cache();
        cache
            .save_aggregated(attestation(1, [0, 1, 2, 3]))
            .unwrap(); // 0b1111000
        cache
            .save_aggregated(attestation(1, [0, 1, 4, 5, 6]))
            .unwrap(); // 0b1100111

        assert_eq!(cache.aggregated_attestations().len(), 2);
        assert!(cache.has_aggregated_attestation(&attestation(1, [0, 1])));
        assert!(!cache.has_aggregated_attestation(&attestation(1, [0, 1, 2, 3, 4, 5, 6])));
    }

    #[test]
    fn s4_two_unaggregated_collapse_into_one_aggregate() {
        let cache = cache();
        cache.save_unaggregated(attestation(1, [1])).unwrap(); // 0b0010
        cache.save_unaggregated(attestation(1, [2])).unwrap(); // 0b0100

        assert!(cache.unaggregated_attestations().is_empty());
        let aggregated = cache.aggregated_attestations();
        assert_eq!(aggregated.len(), 1);
        assert_eq!(aggregated[0].aggregation_bits.count(), 2);
        assert!(aggregated[0].aggregation_bits.bit_at(1));
        assert!(aggregated[0].aggregation_bits.bit_at(2));
    }

    #[test]
    fn identical_unaggregated_resave_is_a_no_op() {
        let cache = cache();
        cache.save_unaggregated(attestation(1, [1])).unwrap();
        cache.save_unaggregated(attestation(1, [1])).unwrap();
        assert_eq!(cache.unaggregated_attestations().len(), 1);
        assert!(cache.aggregated_attestations().is_empty());
    }

    #[test]
    fn same_fingerprint_and_bits_dedupes_even_with_a_different_signature() {
        let cache = cache();
        let mut first = attestation(1, [1]);
        first.signature = Signature([1u8; 96]);
        let mut second = attestation(1, [1]);
        second.signature = Signature([2u8; 96]);

        cache.save_unaggregated(first).unwrap();
        cache.save_unaggregated(second).unwrap();

        assert_eq!(cache.unaggregated_attestations().len(), 1);
        assert!(cache.aggregated_attestations().is_empty());
    }

    #[test]
    fn save_is_inverse_of_delete() {
        let cache = cache();
        let a = attestation(1, [0, 1]);
        cache.save_aggregated(a.clone()).unwrap();
        assert!(cache.has_aggregated_attestation(&a));

        cache.delete_aggregated_attestation(&a);
        assert!(!cache.has_aggregated_attestation(&a));
    }

    #[test]
    fn deleting_an_absent_entry_is_a_silent_no_op() {
        let cache = cache();
        cache.delete_aggregated_attestation(&attestation(1, [0, 1]));
        assert!(cache.aggregated_attestations().is_empty());
    }

    #[test]
    fn rejects_wrong_cardinality() {
        let cache = cache();
        assert_eq!(
            cache.save_unaggregated(attestation(1, [0, 1])),
            Err(CacheError::NotUnaggregated { actual: 2 })
        );
        assert_eq!(
            cache.save_aggregated(attestation(1, [0])),
            Err(CacheError::NotAggregated { actual: 1 })
        );
    }

    #[test]
    fn prune_before_evicts_old_slots_from_every_substore() {
        let cache = cache();
        cache.save_unaggregated(attestation(1, [0])).unwrap();
        cache.save_aggregated(attestation(5, [0, 1])).unwrap();
        cache.save_block_attestation(attestation(10, [0, 1])).unwrap();

        cache.prune_before(6);

        assert!(cache.unaggregated_attestations().is_empty());
        assert!(cache.aggregated_attestations().is_empty());
        assert!(cache.has_aggregated_attestation(&attestation(10, [0, 1])));
    }

    #[test]
    fn save_aggregated_attestations_continues_past_errors() {
        let cache = cache();
        let errors = cache.save_aggregated_attestations(vec![
            attestation(1, [0, 1]),
            attestation(1, [0]), // invalid: single bit
            attestation(2, [0, 1]),
        ]);
        assert_eq!(errors.len(), 1);
        assert_eq!(cache.aggregated_attestations().len(), 2);
    }
}
