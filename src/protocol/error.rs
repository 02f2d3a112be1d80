//! Decode and validation failures.
//!
//! Every variant is fatal to the connection it occurred on. The handler
//! converts them into one best-effort general-error response; nothing here
//! is retried.

use thiserror::Error;

use crate::protocol::wire::MAX_NAME_LEN;

#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The stream errored or closed before the declared bytes arrived.
    #[error("connection read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid operation code: {0}")]
    InvalidOp(u8),

    #[error("invalid status code: {0}")]
    InvalidStatus(u16),

    #[error("filename must not be empty")]
    EmptyName,

    #[error("filename too long: {0} bytes (max {MAX_NAME_LEN})")]
    NameTooLong(usize),

    #[error("filename is not valid UTF-8")]
    NameNotUtf8,

    #[error("filename must not start with a space")]
    NameBadStart,

    #[error("filename must not end with a space or a dot")]
    NameBadEnd,

    #[error("illegal byte {byte:#04x} in filename at offset {offset}")]
    NameIllegalByte { byte: u8, offset: usize },

    #[error("payload too large: {0} bytes")]
    PayloadTooLarge(usize),
}
