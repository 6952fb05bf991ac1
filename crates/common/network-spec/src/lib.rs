//! Fork-digest and chain-head seams.
//!
//! The real network parameters (fork schedule, genesis validators root, the
//! hash used to derive the fork digest) live outside this core — `spec.md`
//! §9 explicitly leaves the digest-deriving hash function unspecified here.
//! What this crate pins down is the *shape* callers depend on: a 4-byte
//! `ForkDigest` and a `ChainHeadProvider` seam the status protocol and
//! attestation cache query through, mirroring how `ream-network-spec`
//! exposes `network_spec().fork_digest(genesis_validators_root)` as a single
//! call site rather than inlining the hash everywhere it's needed.

use alloy_primitives::B256;
use vigil_consensus_types::Checkpoint;

/// 4-byte tag identifying the currently active fork and network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ForkDigest(pub [u8; 4]);

impl std::fmt::Display for ForkDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "0x{:02x}{:02x}{:02x}{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

/// Injected at construction so the status protocol and handshake
/// coordinator are testable without a real chain behind them.
pub trait ChainHeadProvider: Send + Sync {
    fn head_slot(&self) -> u64;
    fn head_root(&self) -> B256;
    fn finalized_checkpoint(&self) -> Checkpoint;
    fn fork_digest(&self) -> ForkDigest;

    /// True if `epoch` is known locally and its canonical root differs from
    /// `claimed_root` — used to reject a peer's inconsistent Status claim
    /// per spec.md §4.4.1. Default: never second-guess an unknown epoch.
    fn is_checkpoint_inconsistent(&self, _epoch: u64, _claimed_root: B256) -> bool {
        false
    }
}

/// A fixed, in-memory `ChainHeadProvider` for tests and the example binary.
#[derive(Debug, Clone)]
pub struct StaticChainHead {
    pub head_slot: u64,
    pub head_root: B256,
    pub finalized_checkpoint: Checkpoint,
    pub fork_digest: ForkDigest,
}

impl ChainHeadProvider for StaticChainHead {
    fn head_slot(&self) -> u64 {
        self.head_slot
    }

    fn head_root(&self) -> B256 {
        self.head_root
    }

    fn finalized_checkpoint(&self) -> Checkpoint {
        self.finalized_checkpoint
    }

    fn fork_digest(&self) -> ForkDigest {
        self.fork_digest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fork_digest_displays_as_hex() {
        let digest = ForkDigest([0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(digest.to_string(), "0xdeadbeef");
    }
}
