use thiserror::Error;
use vigil_consensus_types::BitlistError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("attestation has {actual} aggregation bits set, expected exactly 1")]
    NotUnaggregated { actual: usize },

    #[error("attestation has {actual} aggregation bits set, expected at least 2")]
    NotAggregated { actual: usize },

    #[error("bitlist operation failed: {0}")]
    Bitlist(#[from] BitlistError),
}
