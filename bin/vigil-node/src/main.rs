mod cli;

use std::sync::Arc;

use alloy_primitives::B256;
use clap::Parser;
use cli::Cli;
use ssz::Encode;
use tracing::info;
use vigil_attestation_pool::{AttestationCache, NullAggregator};
use vigil_consensus_types::{Attestation, AttestationData, Bitlist, Checkpoint, Signature};
use vigil_handshake::{HandshakeConfig, HandshakeCoordinator, HandshakeError, Transport};
use vigil_network_spec::{ChainHeadProvider, ForkDigest, StaticChainHead};
use vigil_p2p::{
    PeerStore,
    peer::{Direction, PeerId},
    req_resp::{
        ResponseCode, SupportedProtocol,
        messages::{ForkDigestBytes, Status},
        wire,
    },
};

/// Stand-in for a real libp2p-backed transport: every "stream" is answered
/// in-process by a peer sharing our own fork digest, just enough to
/// demonstrate the coordinator completing a handshake end to end.
struct LoopbackTransport {
    chain_head: Arc<dyn ChainHeadProvider>,
}

#[async_trait::async_trait]
impl Transport for LoopbackTransport {
    async fn new_stream(
        &self,
        peer_id: &PeerId,
        protocol: SupportedProtocol,
        _request_body: Vec<u8>,
    ) -> Result<Vec<u8>, HandshakeError> {
        info!(%peer_id, ?protocol, "opening loopback stream");
        let status = Status {
            fork_digest: ForkDigestBytes::from(self.chain_head.fork_digest()),
            finalized_root: B256::ZERO,
            finalized_epoch: 0,
            head_root: B256::ZERO,
            head_slot: 0,
        };
        Ok(wire::encode_response(
            ResponseCode::Success,
            &status.as_ssz_bytes(),
        ))
    }

    async fn disconnect(&self, peer_id: &PeerId) {
        info!(%peer_id, "disconnecting");
    }

    fn peers(&self) -> Vec<PeerId> {
        vec![]
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity.level())
        .init();

    let fork_digest = cli.parsed_fork_digest()?;
    info!(fork_digest = %ForkDigest(fork_digest), "starting vigil-node demo");

    demo_attestation_cache(cli.slots_retained);
    demo_handshake(fork_digest, cli.bad_response_threshold).await;

    Ok(())
}

fn demo_attestation_cache(slots_retained: u64) {
    let cache = AttestationCache::new(Box::new(NullAggregator));

    let data = AttestationData {
        slot: 10,
        committee_index: 0,
        beacon_block_root: B256::repeat_byte(1),
        source: Checkpoint::default(),
        target: Checkpoint::default(),
    };

    let subset = Attestation {
        data: data.clone(),
        aggregation_bits: Bitlist::from_set_bits(8, [0, 1]).unwrap(),
        signature: Signature::default(),
    };
    let superset = Attestation {
        data,
        aggregation_bits: Bitlist::from_set_bits(8, [0, 1, 2, 3]).unwrap(),
        signature: Signature::default(),
    };

    cache.save_aggregated(subset.clone()).unwrap();
    cache.save_aggregated(superset).unwrap();
    info!(
        count = cache.aggregated_attestations().len(),
        has_subset = cache.has_aggregated_attestation(&subset),
        "superset-wins admission: subset absorbed into the existing aggregate"
    );

    cache.prune_before(10 + slots_retained + 1);
    info!(
        remaining = cache.aggregated_attestations().len(),
        "pruned entries older than the retention horizon"
    );
}

async fn demo_handshake(fork_digest: [u8; 4], bad_response_threshold: u32) {
    let chain_head = Arc::new(StaticChainHead {
        head_slot: 100,
        head_root: B256::repeat_byte(7),
        finalized_checkpoint: Checkpoint {
            epoch: 3,
            root: B256::repeat_byte(9),
        },
        fork_digest: ForkDigest(fork_digest),
    });
    let peer_store = Arc::new(PeerStore::new());
    let transport = Arc::new(LoopbackTransport {
        chain_head: chain_head.clone(),
    });
    let coordinator = HandshakeCoordinator::new(
        peer_store.clone(),
        chain_head,
        transport,
        HandshakeConfig::new(std::time::Duration::from_secs(10), bad_response_threshold),
    );

    let peer_id = PeerId("loopback-peer".to_string());
    peer_store.add(peer_id.clone(), None, None, Direction::Outbound);

    match coordinator
        .on_new_connection(peer_id.clone(), Direction::Outbound)
        .await
    {
        Ok(()) => info!(%peer_id, "handshake completed"),
        Err(err) => info!(%peer_id, %err, "handshake failed"),
    }

    info!(
        connected = peer_store.active().len(),
        "peer store after handshake"
    );
}
