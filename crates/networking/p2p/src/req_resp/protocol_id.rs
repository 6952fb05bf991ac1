//! Protocol identifiers for the four status-handshake RPCs (`spec.md` §4.4.2,
//! §6). Strings are exact and compatibility-sensitive — no `_snappy` or other
//! encoding suffix, matching the literal identifiers `spec.md` specifies.

const PROTOCOL_PREFIX: &str = "/eth2/beacon_chain/req";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportedProtocol {
    StatusV1,
    GoodbyeV1,
    PingV1,
    MetaDataV1,
}

impl SupportedProtocol {
    pub fn message_name(&self) -> &str {
        match self {
            SupportedProtocol::StatusV1 => "status",
            SupportedProtocol::GoodbyeV1 => "goodbye",
            SupportedProtocol::PingV1 => "ping",
            SupportedProtocol::MetaDataV1 => "metadata",
        }
    }

    pub fn schema_version(&self) -> &str {
        "1"
    }

    pub fn protocol_id(&self) -> String {
        format!("{PROTOCOL_PREFIX}/{}/{}/ssz", self.message_name(), self.schema_version())
    }

    pub fn supported_protocols() -> [SupportedProtocol; 4] {
        [
            SupportedProtocol::StatusV1,
            SupportedProtocol::GoodbyeV1,
            SupportedProtocol::PingV1,
            SupportedProtocol::MetaDataV1,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_ids_match_the_compatibility_sensitive_strings() {
        assert_eq!(
            SupportedProtocol::StatusV1.protocol_id(),
            "/eth2/beacon_chain/req/status/1/ssz"
        );
        assert_eq!(
            SupportedProtocol::GoodbyeV1.protocol_id(),
            "/eth2/beacon_chain/req/goodbye/1/ssz"
        );
        assert_eq!(
            SupportedProtocol::PingV1.protocol_id(),
            "/eth2/beacon_chain/req/ping/1/ssz"
        );
        assert_eq!(
            SupportedProtocol::MetaDataV1.protocol_id(),
            "/eth2/beacon_chain/req/metadata/1/ssz"
        );
    }
}
