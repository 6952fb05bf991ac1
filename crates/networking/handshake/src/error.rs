use thiserror::Error;

/// Error taxonomy from `spec.md` §7, as it applies above the wire-framing
/// layer (`vigil_p2p::req_resp::ReqRespError` covers the layer below).
#[derive(Debug, Error)]
pub enum HandshakeError {
    #[error("peer's fork digest does not match ours")]
    WrongForkDigestVersion,

    #[error("handshake failed: {0}")]
    BadHandshake(String),

    #[error("handshake cancelled")]
    Cancelled,

    #[error("handshake timed out")]
    Timeout,

    #[error("failed to decode peer message: {0}")]
    Encoding(String),
}

impl From<vigil_p2p::req_resp::ReqRespError> for HandshakeError {
    fn from(err: vigil_p2p::req_resp::ReqRespError) -> Self {
        HandshakeError::Encoding(err.to_string())
    }
}
