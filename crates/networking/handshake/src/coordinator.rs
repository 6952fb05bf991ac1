//! Handshake Coordinator (C6, `spec.md` §4.5): wires the peer store (C4) and
//! status protocol (C5) together, installing `on_new_connection`/
//! `on_disconnect` hooks for the networking layer.
//!
//! The three-state machine from `spec.md` §4.4 (`Idle -> AwaitingReply ->
//! Handshaked`) is carried on top of `vigil_p2p::peer::ConnectionState`
//! rather than as a second parallel enum: `Connecting` covers both `Idle`
//! (no status sent yet) and `AwaitingReply` (status sent, reply pending) —
//! the distinction doesn't need its own stored state because the only
//! observer is this coordinator's own in-flight task — and `Connected`
//! is `Handshaked`.

use std::sync::Arc;

use ssz::{Decode, Encode};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};
use vigil_consensus_types::Checkpoint;
use vigil_network_spec::ChainHeadProvider;
use vigil_p2p::{
    PeerStore,
    peer::{ChainState, ConnectionState, Direction, PeerId, PeerMetadata},
    req_resp::{
        ResponseCode, SupportedProtocol,
        messages::{ForkDigestBytes, Goodbye, MetaData, Ping, Status},
        wire::{self, ERR_WRONG_FORK_DIGEST_VERSION},
    },
};

use crate::{config::HandshakeConfig, error::HandshakeError, transport::Transport};

pub struct HandshakeCoordinator {
    peer_store: Arc<PeerStore>,
    chain_head: Arc<dyn ChainHeadProvider>,
    transport: Arc<dyn Transport>,
    config: HandshakeConfig,
    root_token: CancellationToken,
}

impl HandshakeCoordinator {
    pub fn new(
        peer_store: Arc<PeerStore>,
        chain_head: Arc<dyn ChainHeadProvider>,
        transport: Arc<dyn Transport>,
        config: HandshakeConfig,
    ) -> Self {
        Self {
            peer_store,
            chain_head,
            transport,
            config,
            root_token: CancellationToken::new(),
        }
    }

    /// Sends a Goodbye to every connected peer, then aborts every in-flight
    /// handshake (`spec.md` §2: "... and goodbye on shutdown; propagates
    /// cancellation"). Safe to call more than once.
    pub async fn shutdown(&self, reason: Goodbye) {
        for peer in self.peer_store.active() {
            let body = wire::encode_request(&reason.as_ssz_bytes());
            let _ = self
                .transport
                .new_stream(&peer.peer_id, SupportedProtocol::GoodbyeV1, body)
                .await;
            self.peer_store
                .set_connection_state(&peer.peer_id, ConnectionState::Disconnected);
        }
        self.root_token.cancel();
    }

    fn our_status(&self) -> Status {
        let checkpoint: Checkpoint = self.chain_head.finalized_checkpoint();
        Status {
            fork_digest: ForkDigestBytes::from(self.chain_head.fork_digest()),
            finalized_root: checkpoint.root,
            finalized_epoch: checkpoint.epoch,
            head_root: self.chain_head.head_root(),
            head_slot: self.chain_head.head_slot(),
        }
    }

    /// `OnNewConnection(peer, dir)` (`spec.md` §4.5). Refuses peers already
    /// banned for crossing the bad-response threshold (`spec.md` §4.4.4).
    pub async fn on_new_connection(
        &self,
        peer_id: PeerId,
        direction: Direction,
    ) -> Result<(), HandshakeError> {
        if self.peer_store.is_banned(&peer_id) {
            self.peer_store
                .set_connection_state(&peer_id, ConnectionState::Disconnected);
            self.transport.disconnect(&peer_id).await;
            return Err(HandshakeError::BadHandshake("peer is banned".to_string()));
        }

        self.peer_store
            .set_connection_state(&peer_id, ConnectionState::Connecting);

        match direction {
            Direction::Outbound => self.send_status_request(&peer_id).await,
            // The remote initiated the connection, so the remote sends
            // Status first; we stay `Connecting` until
            // `handle_inbound_status` is driven by the networking layer.
            Direction::Inbound | Direction::Unknown => Ok(()),
        }
    }

    /// `OnDisconnect(peer)` (`spec.md` §4.5).
    pub fn on_disconnect(&self, peer_id: &PeerId) {
        self.peer_store
            .set_connection_state(peer_id, ConnectionState::Disconnected);
        self.peer_store.set_chain_state(peer_id, None);
    }

    /// Sends our Status to `peer_id` and processes the reply. Used for
    /// outbound connections (`spec.md` §4.4 diagram).
    pub async fn send_status_request(&self, peer_id: &PeerId) -> Result<(), HandshakeError> {
        let request_body = wire::encode_request(&self.our_status().as_ssz_bytes());
        let child_token = self.root_token.child_token();

        let outcome = tokio::select! {
            biased;
            () = child_token.cancelled() => Err(HandshakeError::Cancelled),
            () = tokio::time::sleep(self.config.request_timeout) => Err(HandshakeError::Timeout),
            response = self.transport.new_stream(peer_id, SupportedProtocol::StatusV1, request_body) => {
                response.map_err(HandshakeError::from)
            }
        };

        match outcome {
            Ok(response_bytes) => self.process_status_response(peer_id, &response_bytes).await,
            Err(HandshakeError::Cancelled) => Err(HandshakeError::Cancelled),
            Err(err) => {
                self.bump_and_disconnect(peer_id).await;
                Err(err)
            }
        }
    }

    /// Decodes and applies a Status response. A malformed frame or body is a
    /// bad response in its own right (`spec.md` §4.4.4: "malformed encoding
    /// ⇒ bump bad_responses by 1, disconnect") — distinct from the
    /// already-self-handled fork-digest-mismatch and remote-error paths
    /// inside `apply_status`/`handle_remote_error`.
    async fn process_status_response(
        &self,
        peer_id: &PeerId,
        response_bytes: &[u8],
    ) -> Result<(), HandshakeError> {
        let Ok((code, body)) = wire::decode_response(response_bytes) else {
            self.bump_and_disconnect(peer_id).await;
            return Err(HandshakeError::Encoding(
                "malformed response frame".to_string(),
            ));
        };

        if !code.is_success() {
            return self.handle_remote_error(peer_id, body).await;
        }

        let Ok(status) = Status::from_ssz_bytes(body) else {
            self.bump_and_disconnect(peer_id).await;
            return Err(HandshakeError::Encoding("malformed status body".to_string()));
        };
        self.apply_status(peer_id, status).await
    }

    async fn handle_remote_error(
        &self,
        peer_id: &PeerId,
        body: &[u8],
    ) -> Result<(), HandshakeError> {
        let message = String::from_utf8_lossy(body).into_owned();
        if message == ERR_WRONG_FORK_DIGEST_VERSION {
            self.peer_store
                .set_connection_state(peer_id, ConnectionState::Disconnected);
            self.transport.disconnect(peer_id).await;
            return Err(HandshakeError::WrongForkDigestVersion);
        }
        self.bump_and_disconnect(peer_id).await;
        Err(HandshakeError::BadHandshake(message))
    }

    /// Processes an inbound Status request (we are the receiver; the remote
    /// initiated the connection). Returns the framed response bytes the
    /// networking layer should write back on the same stream.
    pub async fn handle_inbound_status(&self, peer_id: &PeerId, request_bytes: &[u8]) -> Vec<u8> {
        if self.peer_store.is_banned(peer_id) {
            self.transport.disconnect(peer_id).await;
            return wire::encode_response(ResponseCode::InvalidRequest, b"peer is banned");
        }

        let decoded = wire::decode_request(request_bytes)
            .ok()
            .and_then(|body| Status::from_ssz_bytes(body).ok());

        let Some(status) = decoded else {
            self.bump_and_disconnect(peer_id).await;
            return wire::encode_response(ResponseCode::InvalidRequest, b"malformed status");
        };

        match self.apply_status(peer_id, status).await {
            Ok(()) => wire::encode_response(ResponseCode::Success, &self.our_status().as_ssz_bytes()),
            Err(HandshakeError::WrongForkDigestVersion) => wire::encode_response(
                ResponseCode::InvalidRequest,
                ERR_WRONG_FORK_DIGEST_VERSION.as_bytes(),
            ),
            Err(err) => wire::encode_response(ResponseCode::InvalidRequest, err.to_string().as_bytes()),
        }
    }

    /// Shared fork-digest/finalized-checkpoint validation for both the
    /// outbound reply path and the inbound request path (`spec.md` §4.4.1).
    async fn apply_status(&self, peer_id: &PeerId, status: Status) -> Result<(), HandshakeError> {
        if status.fork_digest != ForkDigestBytes::from(self.chain_head.fork_digest()) {
            warn!(%peer_id, "fork digest mismatch, disconnecting");
            self.peer_store
                .set_connection_state(peer_id, ConnectionState::Disconnected);
            self.transport.disconnect(peer_id).await;
            return Err(HandshakeError::WrongForkDigestVersion);
        }

        if self
            .chain_head
            .is_checkpoint_inconsistent(status.finalized_epoch, status.finalized_root)
        {
            debug!(%peer_id, "inconsistent finalized checkpoint claim");
            self.bump_and_disconnect(peer_id).await;
            return Err(HandshakeError::BadHandshake(
                "inconsistent finalized checkpoint".to_string(),
            ));
        }

        self.peer_store.set_chain_state(
            peer_id,
            Some(ChainState {
                fork_digest: status.fork_digest.into(),
                finalized_epoch: status.finalized_epoch,
                finalized_root: status.finalized_root,
                head_slot: status.head_slot,
                head_root: status.head_root,
            }),
        );
        self.peer_store
            .set_connection_state(peer_id, ConnectionState::Connected);
        trace!(%peer_id, "handshake complete");
        Ok(())
    }

    /// Sends a Ping carrying `our_sequence_number` and, if the reply's
    /// sequence number doesn't match our cached copy of the peer's metadata,
    /// follows up with a Metadata request to refresh `attnets` (`spec.md`
    /// §4.4.3).
    pub async fn send_ping(
        &self,
        peer_id: &PeerId,
        our_sequence_number: u64,
    ) -> Result<(), HandshakeError> {
        let request = wire::encode_request(&Ping::new(our_sequence_number).as_ssz_bytes());
        let response_bytes = self
            .transport
            .new_stream(peer_id, SupportedProtocol::PingV1, request)
            .await?;
        let (code, body) = wire::decode_response(&response_bytes)?;
        if !code.is_success() {
            return Err(HandshakeError::BadHandshake("ping rejected".to_string()));
        }
        let pong =
            Ping::from_ssz_bytes(body).map_err(|err| HandshakeError::Encoding(format!("{err:?}")))?;
        self.refresh_metadata_if_stale(peer_id, pong.sequence_number).await
    }

    /// Responds to an inbound Ping with our own sequence number, refreshing
    /// our cached copy of the peer's metadata if its advertised sequence
    /// number has moved on (`spec.md` §4.4.3).
    pub async fn handle_inbound_ping(
        &self,
        peer_id: &PeerId,
        request_bytes: &[u8],
        our_sequence_number: u64,
    ) -> Vec<u8> {
        let decoded = wire::decode_request(request_bytes)
            .ok()
            .and_then(|body| Ping::from_ssz_bytes(body).ok());

        let Some(ping) = decoded else {
            self.bump_and_disconnect(peer_id).await;
            return wire::encode_response(ResponseCode::InvalidRequest, b"malformed ping");
        };

        if self.cached_metadata_seq(peer_id) != Some(ping.sequence_number) {
            debug!(%peer_id, "peer metadata seq changed, refreshing");
            let _ = self
                .refresh_metadata_if_stale(peer_id, ping.sequence_number)
                .await;
        }

        wire::encode_response(
            ResponseCode::Success,
            &Ping::new(our_sequence_number).as_ssz_bytes(),
        )
    }

    /// Responds to an inbound Metadata request with our current `attnets`.
    pub fn handle_inbound_metadata(&self, our_metadata: &PeerMetadata) -> Vec<u8> {
        let body = MetaData {
            seq_number: our_metadata.seq,
            attnets: our_metadata.attnets.clone(),
        };
        wire::encode_response(ResponseCode::Success, &body.as_ssz_bytes())
    }

    fn cached_metadata_seq(&self, peer_id: &PeerId) -> Option<u64> {
        self.peer_store.metadata(peer_id).ok().flatten().map(|metadata| metadata.seq)
    }

    async fn refresh_metadata_if_stale(
        &self,
        peer_id: &PeerId,
        remote_seq: u64,
    ) -> Result<(), HandshakeError> {
        if self.cached_metadata_seq(peer_id) == Some(remote_seq) {
            return Ok(());
        }

        let request = wire::encode_request(&[]);
        let response_bytes = self
            .transport
            .new_stream(peer_id, SupportedProtocol::MetaDataV1, request)
            .await?;
        let (code, body) = wire::decode_response(&response_bytes)?;
        if !code.is_success() {
            return Err(HandshakeError::BadHandshake(
                "metadata request rejected".to_string(),
            ));
        }
        let metadata =
            MetaData::from_ssz_bytes(body).map_err(|err| HandshakeError::Encoding(format!("{err:?}")))?;
        self.peer_store.set_metadata(
            peer_id,
            PeerMetadata {
                seq: metadata.seq_number,
                attnets: metadata.attnets,
            },
        );
        Ok(())
    }

    /// Bumps the peer's bad-response counter and disconnects it; bans the
    /// peer for the process lifetime once the counter crosses
    /// `bad_response_threshold` (`spec.md` §4.4.4).
    async fn bump_and_disconnect(&self, peer_id: &PeerId) {
        if let Ok(count) = self.peer_store.increment_bad_responses(peer_id) {
            if count >= self.config.bad_response_threshold {
                warn!(%peer_id, count, "peer crossed bad-response threshold, banning");
                self.peer_store
                    .ban(peer_id, "bad_response_threshold exceeded".to_string());
            }
        }
        self.peer_store
            .set_connection_state(peer_id, ConnectionState::Disconnected);
        self.transport.disconnect(peer_id).await;
    }
}
