//! Per-peer record cached by the peer store (`spec.md` §3, §4.3).

use std::time::Instant;

use vigil_consensus_types::Bitlist;
use vigil_network_spec::ForkDigest;

/// Opaque peer identity. The real transport's identity scheme (libp2p
/// `PeerId`, a multihash over a public key) is outside this core's scope —
/// callers construct one from whatever the networking layer hands them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(pub String);

impl std::fmt::Display for PeerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    Connecting,
    Disconnected,
    Disconnecting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Inbound,
    Outbound,
    Unknown,
}

/// Most recently seen metadata advertisement for a peer (`spec.md` §4.4.3).
#[derive(Debug, Clone, PartialEq)]
pub struct PeerMetadata {
    pub seq: u64,
    pub attnets: Bitlist,
}

/// A peer's chain tip as learned from a completed status handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainState {
    pub fork_digest: ForkDigest,
    pub finalized_epoch: u64,
    pub finalized_root: alloy_primitives::B256,
    pub head_slot: u64,
    pub head_root: alloy_primitives::B256,
}

#[derive(Debug, Clone)]
pub struct CachedPeer {
    pub peer_id: PeerId,
    pub last_seen_p2p_address: Option<String>,
    pub state: ConnectionState,
    pub direction: Direction,
    pub enr: Option<String>,
    pub metadata: Option<PeerMetadata>,
    pub chain_state: Option<ChainState>,
    pub bad_responses: u32,
    pub last_activity: Instant,
}

impl CachedPeer {
    pub fn new(peer_id: PeerId, addr: Option<String>, enr: Option<String>, direction: Direction) -> Self {
        Self {
            peer_id,
            last_seen_p2p_address: addr,
            state: ConnectionState::Disconnected,
            direction,
            enr,
            metadata: None,
            chain_state: None,
            bad_responses: 0,
            last_activity: Instant::now(),
        }
    }

    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }
}
