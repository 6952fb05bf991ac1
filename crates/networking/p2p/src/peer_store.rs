//! Peer store (`spec.md` §4.3): one `RwLock<HashMap<..>>` keyed by [`PeerId`],
//! mirroring the `NetworkState::peer_table` / `PeerManager` locking discipline
//! used throughout the p2p and syncer crates of the teacher codebase — a
//! single write lock guards insert/update/remove, reads are taken and
//! released without ever crossing a network I/O call.

use std::collections::HashMap;

use parking_lot::RwLock;
use thiserror::Error;

use crate::peer::{CachedPeer, ChainState, ConnectionState, Direction, PeerId, PeerMetadata};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeerStoreError {
    #[error("unknown peer: {0}")]
    UnknownPeer(PeerId),
}

#[derive(Default)]
pub struct PeerStore {
    peers: RwLock<HashMap<PeerId, CachedPeer>>,
    /// Peers that crossed the bad-response threshold, kept separately from
    /// `peers` so a ban survives `forget` (mirrors the teacher's
    /// `PeerManager::banned_peers`, held apart from its live peer set).
    banned: RwLock<HashMap<PeerId, String>>,
}

impl PeerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or refreshes a peer record; freshly added peers start
    /// `Disconnected`.
    pub fn add(&self, peer_id: PeerId, addr: Option<String>, enr: Option<String>, direction: Direction) {
        self.peers
            .write()
            .entry(peer_id.clone())
            .and_modify(|peer| {
                if addr.is_some() {
                    peer.last_seen_p2p_address = addr.clone();
                }
                if enr.is_some() {
                    peer.enr = enr.clone();
                }
                peer.direction = direction;
                peer.touch();
            })
            .or_insert_with(|| CachedPeer::new(peer_id, addr, enr, direction));
    }

    /// Transitions a known peer's connection state. No legality check — the
    /// handshake coordinator owns that policy.
    pub fn set_connection_state(&self, peer_id: &PeerId, state: ConnectionState) {
        if let Some(peer) = self.peers.write().get_mut(peer_id) {
            peer.state = state;
            peer.touch();
        }
    }

    pub fn connection_state(&self, peer_id: &PeerId) -> Result<ConnectionState, PeerStoreError> {
        self.peers
            .read()
            .get(peer_id)
            .map(|peer| peer.state)
            .ok_or_else(|| PeerStoreError::UnknownPeer(peer_id.clone()))
    }

    pub fn set_metadata(&self, peer_id: &PeerId, metadata: PeerMetadata) {
        if let Some(peer) = self.peers.write().get_mut(peer_id) {
            peer.metadata = Some(metadata);
        }
    }

    pub fn metadata(&self, peer_id: &PeerId) -> Result<Option<PeerMetadata>, PeerStoreError> {
        self.peers
            .read()
            .get(peer_id)
            .map(|peer| peer.metadata.clone())
            .ok_or_else(|| PeerStoreError::UnknownPeer(peer_id.clone()))
    }

    pub fn set_chain_state(&self, peer_id: &PeerId, chain_state: Option<ChainState>) {
        if let Some(peer) = self.peers.write().get_mut(peer_id) {
            peer.chain_state = chain_state;
        }
    }

    pub fn chain_state(&self, peer_id: &PeerId) -> Result<Option<ChainState>, PeerStoreError> {
        self.peers
            .read()
            .get(peer_id)
            .map(|peer| peer.chain_state)
            .ok_or_else(|| PeerStoreError::UnknownPeer(peer_id.clone()))
    }

    pub fn increment_bad_responses(&self, peer_id: &PeerId) -> Result<u32, PeerStoreError> {
        let mut peers = self.peers.write();
        let peer = peers
            .get_mut(peer_id)
            .ok_or_else(|| PeerStoreError::UnknownPeer(peer_id.clone()))?;
        peer.bad_responses += 1;
        Ok(peer.bad_responses)
    }

    pub fn bad_responses(&self, peer_id: &PeerId) -> Result<u32, PeerStoreError> {
        self.peers
            .read()
            .get(peer_id)
            .map(|peer| peer.bad_responses)
            .ok_or_else(|| PeerStoreError::UnknownPeer(peer_id.clone()))
    }

    /// Removes a peer record entirely; it no longer counts toward
    /// `active() + inactive()`. Does not lift a ban.
    pub fn forget(&self, peer_id: &PeerId) {
        self.peers.write().remove(peer_id);
    }

    /// Permanently bans a peer for the process lifetime (`spec.md` §4.4.4).
    pub fn ban(&self, peer_id: &PeerId, reason: String) {
        self.banned.write().insert(peer_id.clone(), reason);
    }

    pub fn is_banned(&self, peer_id: &PeerId) -> bool {
        self.banned.read().contains_key(peer_id)
    }

    pub fn active(&self) -> Vec<CachedPeer> {
        self.peers
            .read()
            .values()
            .filter(|peer| peer.state == ConnectionState::Connected)
            .cloned()
            .collect()
    }

    pub fn inactive(&self) -> Vec<CachedPeer> {
        self.peers
            .read()
            .values()
            .filter(|peer| peer.state != ConnectionState::Connected)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.peers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u8) -> PeerId {
        PeerId(format!("peer-{n}"))
    }

    #[test]
    fn unknown_peer_lookups_error() {
        let store = PeerStore::new();
        assert_eq!(
            store.connection_state(&id(1)),
            Err(PeerStoreError::UnknownPeer(id(1)))
        );
    }

    #[test]
    fn active_and_inactive_partition_known_peers() {
        let store = PeerStore::new();
        store.add(id(1), None, None, Direction::Outbound);
        store.add(id(2), None, None, Direction::Inbound);
        store.set_connection_state(&id(1), ConnectionState::Connected);

        assert_eq!(store.active().len(), 1);
        assert_eq!(store.inactive().len(), 1);
        assert_eq!(store.active()[0].peer_id, id(1));
    }

    #[test]
    fn forget_removes_peer_from_both_partitions() {
        let store = PeerStore::new();
        store.add(id(1), None, None, Direction::Outbound);
        store.forget(&id(1));
        assert_eq!(store.len(), 0);
        assert!(store.connection_state(&id(1)).is_err());
    }

    #[test]
    fn bad_response_counter_increments() {
        let store = PeerStore::new();
        store.add(id(1), None, None, Direction::Outbound);
        assert_eq!(store.increment_bad_responses(&id(1)).unwrap(), 1);
        assert_eq!(store.increment_bad_responses(&id(1)).unwrap(), 2);
        assert_eq!(store.bad_responses(&id(1)).unwrap(), 2);
    }

    #[test]
    fn ban_persists_across_forget() {
        let store = PeerStore::new();
        store.add(id(1), None, None, Direction::Outbound);
        store.ban(&id(1), "too many bad responses".to_string());
        store.forget(&id(1));

        assert!(store.is_banned(&id(1)));
        assert!(!store.is_banned(&id(2)));
    }

    #[test]
    fn counts_equal_records_added_minus_forgotten() {
        let store = PeerStore::new();
        store.add(id(1), None, None, Direction::Outbound);
        store.add(id(2), None, None, Direction::Inbound);
        store.add(id(3), None, None, Direction::Inbound);
        store.forget(&id(2));

        assert_eq!(store.active().len() + store.inactive().len(), 2);
    }
}
