//! Status-handshake state machine (C5) and coordinator (C6) from `spec.md`
//! §4.4-§4.5, built on top of `vigil_p2p`'s peer store and wire types.

mod config;
mod coordinator;
mod error;
mod transport;

pub use config::HandshakeConfig;
pub use coordinator::HandshakeCoordinator;
pub use error::HandshakeError;
pub use transport::Transport;
