pub mod error;
pub mod messages;
pub mod protocol_id;
pub mod wire;

pub use error::ReqRespError;
pub use protocol_id::SupportedProtocol;
pub use wire::{ResponseCode, ERR_WRONG_FORK_DIGEST_VERSION};
