//! Peer store (C4) and status-protocol wire types/framing (C5).
//!
//! The handshake state machine itself lives in `vigil-handshake`, which
//! depends on this crate for the peer store and the `Status`/`Ping`/
//! `MetaData`/`Goodbye` messages it exchanges.

pub mod peer;
pub mod peer_store;
pub mod req_resp;

pub use peer::{CachedPeer, ChainState, ConnectionState, Direction, PeerId, PeerMetadata};
pub use peer_store::{PeerStore, PeerStoreError};
