//! The `Networking` collaborator from `spec.md` §6
//! (`Connect, Disconnect, NewStream, SetStreamHandler, Peers, Encoding`),
//! modeled as an injected trait so the coordinator is testable without a
//! real libp2p swarm — per spec.md §9's explicit instruction to keep
//! "dynamic dispatch through interface values" as an interface abstraction
//! injected at construction, the same role `HeadProvider`/
//! `FinalizationProvider` play for chain state.
//!
//! `SetStreamHandler` isn't a separate method here: the coordinator itself
//! *is* the inbound stream handler (`HandshakeCoordinator::handle_inbound_*`)
//! that the real networking layer would register against this protocol.

use vigil_p2p::{peer::PeerId, req_resp::SupportedProtocol};

use crate::error::HandshakeError;

#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Opens a new stream to `peer_id` for `protocol`, writes `request_body`,
    /// and returns the framed response body (response code already checked
    /// by the caller via `vigil_p2p::req_resp::wire`).
    async fn new_stream(
        &self,
        peer_id: &PeerId,
        protocol: SupportedProtocol,
        request_body: Vec<u8>,
    ) -> Result<Vec<u8>, HandshakeError>;

    async fn disconnect(&self, peer_id: &PeerId);

    fn peers(&self) -> Vec<PeerId>;

    fn encoding(&self) -> &'static str {
        "ssz"
    }
}
