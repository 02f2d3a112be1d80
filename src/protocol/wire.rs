//! Framing primitives: operation/status codes and the two framed field types.
//!
//! A `Filename` is framed as `len:u16 | bytes`, a `Payload` as
//! `len:u32 | bytes`. Both are validated on construction, so a value of
//! either type is always legal to put on the wire.

use bytes::{BufMut, BytesMut};
use std::fmt;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::protocol::error::ProtocolError;

/// Protocol version carried in every response.
pub const PROTOCOL_VERSION: u8 = 6;

/// Maximum filename length representable by the u16 length prefix.
pub const MAX_NAME_LEN: usize = u16::MAX as usize;

/// Maximum payload length representable by the u32 length prefix.
pub const MAX_PAYLOAD_LEN: usize = u32::MAX as usize;

// =============================================================================
// Operation and status codes
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Op {
    Save = 100,
    Restore = 200,
    Delete = 201,
    List = 202,
}

impl Op {
    pub fn from_u8(b: u8) -> Option<Self> {
        match b {
            100 => Some(Self::Save),
            200 => Some(Self::Restore),
            201 => Some(Self::Delete),
            202 => Some(Self::List),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum Status {
    SuccessRestore = 210,
    SuccessList = 211,
    /// Also returned for a successful delete; the wire contract has no
    /// separate delete-success code.
    SuccessSave = 212,
    ErrorNoFile = 1001,
    ErrorNoClient = 1002,
    ErrorGeneral = 1003,
}

impl Status {
    pub fn from_u16(v: u16) -> Option<Self> {
        match v {
            210 => Some(Self::SuccessRestore),
            211 => Some(Self::SuccessList),
            212 => Some(Self::SuccessSave),
            1001 => Some(Self::ErrorNoFile),
            1002 => Some(Self::ErrorNoClient),
            1003 => Some(Self::ErrorGeneral),
            _ => None,
        }
    }
}

// =============================================================================
// Filename
// =============================================================================

/// A validated filename: non-empty, at most [`MAX_NAME_LEN`] bytes, no
/// leading space, no trailing space or dot, and none of the reserved bytes
/// anywhere. Used only as a key into the content store and for display,
/// never as a local path fragment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Filename(String);

const FORBIDDEN_NAME_BYTES: &[u8] = b"\0/\\:*?\"<>|";

impl Filename {
    pub fn new(name: impl Into<String>) -> Result<Self, ProtocolError> {
        let name = name.into();
        Self::check_bytes(name.as_bytes())?;
        Ok(Self(name))
    }

    fn from_wire_bytes(bytes: Vec<u8>) -> Result<Self, ProtocolError> {
        Self::check_bytes(&bytes)?;
        let name = String::from_utf8(bytes).map_err(|_| ProtocolError::NameNotUtf8)?;
        Ok(Self(name))
    }

    fn check_bytes(bytes: &[u8]) -> Result<(), ProtocolError> {
        if bytes.is_empty() {
            return Err(ProtocolError::EmptyName);
        }
        if bytes.len() > MAX_NAME_LEN {
            return Err(ProtocolError::NameTooLong(bytes.len()));
        }
        if bytes[0] == b' ' {
            return Err(ProtocolError::NameBadStart);
        }
        let last = bytes[bytes.len() - 1];
        if last == b' ' || last == b'.' {
            return Err(ProtocolError::NameBadEnd);
        }
        if let Some(offset) = bytes.iter().position(|b| FORBIDDEN_NAME_BYTES.contains(b)) {
            return Err(ProtocolError::NameIllegalByte {
                byte: bytes[offset],
                offset,
            });
        }
        Ok(())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_u16_le(self.0.len() as u16);
        buf.put_slice(self.0.as_bytes());
    }

    /// Read one filename frame. Fails if the stream ends before the declared
    /// length arrives or the bytes violate the legality rules.
    pub async fn read_from<R: AsyncRead + Unpin>(r: &mut R) -> Result<Self, ProtocolError> {
        let name_len = r.read_u16_le().await?;
        if name_len == 0 {
            return Err(ProtocolError::EmptyName);
        }
        let mut bytes = vec![0u8; name_len as usize];
        r.read_exact(&mut bytes).await?;
        Self::from_wire_bytes(bytes)
    }
}

impl fmt::Display for Filename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Payload
// =============================================================================

/// An opaque byte blob, framed with a u32 length prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload(bytes::Bytes);

impl Payload {
    pub fn from_bytes(bytes: impl Into<bytes::Bytes>) -> Result<Self, ProtocolError> {
        let bytes = bytes.into();
        if bytes.len() > MAX_PAYLOAD_LEN {
            return Err(ProtocolError::PayloadTooLarge(bytes.len()));
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> bytes::Bytes {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_u32_le(self.0.len() as u32);
        buf.put_slice(&self.0);
    }

    /// Read one payload frame, allocating exactly the declared length.
    pub async fn read_from<R: AsyncRead + Unpin>(r: &mut R) -> Result<Self, ProtocolError> {
        let size = r.read_u32_le().await?;
        let mut content = vec![0u8; size as usize];
        r.read_exact(&mut content).await?;
        Ok(Self(bytes::Bytes::from(content)))
    }
}

// =============================================================================
// Tests
// =============================================================================
