//! Pure encode/decode functions for the request/response framing in
//! `spec.md` §4.4.2/§6: `code(1) ‖ length-prefix(varint) ‖ body` for
//! responses, `length-prefix(varint) ‖ body` for requests.
//!
//! Kept free of any actual stream/socket type (unlike the teacher's
//! `InboundSSZSnappyCodec`/`OutboundSSZSnappyCodec`, which are
//! `tokio_util::codec::{Encoder, Decoder}` impls tied to a live connection)
//! so the framing itself is testable without a transport.

use unsigned_varint::{decode, encode};

use super::error::ReqRespError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    Success,
    InvalidRequest,
    ServerError,
    ResourceUnavailable,
    Other(u8),
}

impl ResponseCode {
    pub fn is_success(self) -> bool {
        matches!(self, ResponseCode::Success)
    }

    pub fn as_u8(self) -> u8 {
        match self {
            ResponseCode::Success => 0,
            ResponseCode::InvalidRequest => 1,
            ResponseCode::ServerError => 2,
            ResponseCode::ResourceUnavailable => 3,
            ResponseCode::Other(byte) => byte,
        }
    }
}

impl From<u8> for ResponseCode {
    fn from(byte: u8) -> Self {
        match byte {
            0 => ResponseCode::Success,
            1 => ResponseCode::InvalidRequest,
            2 => ResponseCode::ServerError,
            3 => ResponseCode::ResourceUnavailable,
            other => ResponseCode::Other(other),
        }
    }
}

/// Canonical error string for a fork-digest mismatch (`spec.md` §4.4.1).
pub const ERR_WRONG_FORK_DIGEST_VERSION: &str = "errWrongForkDigestVersion";

pub fn encode_request(body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len() + 4);
    write_length_prefix(&mut out, body.len() as u64);
    out.extend_from_slice(body);
    out
}

pub fn decode_request(bytes: &[u8]) -> Result<&[u8], ReqRespError> {
    let (len, rest) = decode::u64(bytes)
        .map_err(|err| ReqRespError::InvalidData(format!("bad length prefix: {err}")))?;
    take_body(rest, len)
}

pub fn encode_response(code: ResponseCode, body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len() + 5);
    out.push(code.as_u8());
    write_length_prefix(&mut out, body.len() as u64);
    out.extend_from_slice(body);
    out
}

pub fn decode_response(bytes: &[u8]) -> Result<(ResponseCode, &[u8]), ReqRespError> {
    let (&code_byte, rest) = bytes.split_first().ok_or(ReqRespError::IncompleteStream)?;
    let (len, rest) = decode::u64(rest)
        .map_err(|err| ReqRespError::InvalidData(format!("bad length prefix: {err}")))?;
    let body = take_body(rest, len)?;
    Ok((ResponseCode::from(code_byte), body))
}

fn take_body(rest: &[u8], len: u64) -> Result<&[u8], ReqRespError> {
    let len = usize::try_from(len).map_err(|_| ReqRespError::InvalidData("length prefix overflow".into()))?;
    if rest.len() < len {
        return Err(ReqRespError::IncompleteStream);
    }
    Ok(&rest[..len])
}

fn write_length_prefix(out: &mut Vec<u8>, len: u64) {
    let mut buf = encode::u64_buffer();
    out.extend_from_slice(encode::u64(len, &mut buf));
}
