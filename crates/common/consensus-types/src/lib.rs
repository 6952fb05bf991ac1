pub mod attestation;
pub mod attestation_data;
pub mod bitlist;
pub mod checkpoint;
pub mod signature;

pub use attestation::Attestation;
pub use attestation_data::{AttestationData, AttestationFingerprint};
pub use bitlist::{Bitlist, BitlistError};
pub use checkpoint::Checkpoint;
pub use signature::Signature;
