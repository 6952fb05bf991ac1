use std::time::Duration;

/// Threaded through the coordinator's constructor rather than read from a
/// global — per `spec.md` §9's instruction to replace "global singletons for
/// config/flags" with explicit configuration values.
#[derive(Debug, Clone, Copy)]
pub struct HandshakeConfig {
    /// Per-operation network deadline (`spec.md` §4.4.4 default: 10s).
    pub request_timeout: Duration,

    /// `bad_responses` crossing this threshold permanently bans a peer for
    /// the process lifetime (`spec.md` §4.4.4 typical value: 5). Left as a
    /// required parameter rather than a hardcoded constant per `spec.md` §9's
    /// open question on the exact threshold.
    pub bad_response_threshold: u32,
}

impl HandshakeConfig {
    pub fn new(request_timeout: Duration, bad_response_threshold: u32) -> Self {
        Self {
            request_timeout,
            bad_response_threshold,
        }
    }
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            bad_response_threshold: 5,
        }
    }
}
