use thiserror::Error;

/// Mirrors the shape of `ReqRespError` in the teacher's req_resp module,
/// trimmed to the failure modes this core's wire framing can actually
/// produce (no IO/codec crates behind it — see `wire.rs`).
#[derive(Debug, Error)]
pub enum ReqRespError {
    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("incomplete stream")]
    IncompleteStream,

    #[error("stream timed out")]
    Timeout,

    #[error("peer sent error response: {0}")]
    RemoteError(String),
}

impl From<ssz::DecodeError> for ReqRespError {
    fn from(err: ssz::DecodeError) -> Self {
        ReqRespError::InvalidData(format!("failed to decode ssz: {err:?}"))
    }
}
