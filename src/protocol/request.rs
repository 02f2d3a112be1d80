//! Request decoding and encoding.
//!
//! A request is read once off a connection's leading bytes, consumed once by
//! the dispatcher, and never outlives the connection.

use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::protocol::error::ProtocolError;
use crate::protocol::wire::{Filename, Op, Payload};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Save {
        client_id: u32,
        version: u8,
        filename: Filename,
        payload: Payload,
    },
    Restore {
        client_id: u32,
        version: u8,
        filename: Filename,
    },
    Delete {
        client_id: u32,
        version: u8,
        filename: Filename,
    },
    List {
        client_id: u32,
        version: u8,
    },
}

impl Request {
    pub fn client_id(&self) -> u32 {
        match self {
            Self::Save { client_id, .. }
            | Self::Restore { client_id, .. }
            | Self::Delete { client_id, .. }
            | Self::List { client_id, .. } => *client_id,
        }
    }

    pub fn version(&self) -> u8 {
        match self {
            Self::Save { version, .. }
            | Self::Restore { version, .. }
            | Self::Delete { version, .. }
            | Self::List { version, .. } => *version,
        }
    }

    pub fn op(&self) -> Op {
        match self {
            Self::Save { .. } => Op::Save,
            Self::Restore { .. } => Op::Restore,
            Self::Delete { .. } => Op::Delete,
            Self::List { .. } => Op::List,
        }
    }

    /// Read exactly one request off the stream.
    ///
    /// The fixed header (`client_id:u32 | version:u8 | op:u8`) is read first;
    /// an unknown op code fails the decode before any further bytes are
    /// consumed. Each branch then reads only the frames its grammar declares.
    pub async fn read_from<R: AsyncRead + Unpin>(r: &mut R) -> Result<Self, ProtocolError> {
        let client_id = r.read_u32_le().await?;
        let version = r.read_u8().await?;
        let op_byte = r.read_u8().await?;
        let op = Op::from_u8(op_byte).ok_or(ProtocolError::InvalidOp(op_byte))?;

        match op {
            Op::List => Ok(Self::List { client_id, version }),
            Op::Restore => {
                let filename = Filename::read_from(r).await?;
                Ok(Self::Restore {
                    client_id,
                    version,
                    filename,
                })
            }
            Op::Delete => {
                let filename = Filename::read_from(r).await?;
                Ok(Self::Delete {
                    client_id,
                    version,
                    filename,
                })
            }
            Op::Save => {
                let filename = Filename::read_from(r).await?;
                let payload = Payload::read_from(r).await?;
                Ok(Self::Save {
                    client_id,
                    version,
                    filename,
                    payload,
                })
            }
        }
    }

    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::new();
        buf.put_u32_le(self.client_id());
        buf.put_u8(self.version());
        buf.put_u8(self.op() as u8);

        match self {
            Self::List { .. } => {}
            Self::Restore { filename, .. } | Self::Delete { filename, .. } => {
                filename.encode(&mut buf);
            }
            Self::Save {
                filename, payload, ..
            } => {
                filename.encode(&mut buf);
                payload.encode(&mut buf);
            }
        }

        buf.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_roundtrip() {
        let request = Request::Save {
            client_id: 7,
            version: 6,
            filename: Filename::new("notes.txt").unwrap(),
            payload: Payload::from_bytes(&b"hello"[..]).unwrap(),
        };
        let encoded = request.encode();

        // Header: client_id=7 LE, version, op 100.
        assert_eq!(&encoded[..4], &7u32.to_le_bytes());
        assert_eq!(encoded[4], 6);
        assert_eq!(encoded[5], 100);

        let mut reader: &[u8] = &encoded;
        let decoded = Request::read_from(&mut reader).await.unwrap();
        assert_eq!(decoded, request);
        assert!(reader.is_empty());
    }

    #[tokio::test]
    async fn test_restore_and_delete_roundtrip() {
        for (make, op_byte) in [
            (Request::Restore {
                client_id: 42,
                version: 6,
                filename: Filename::new("a.bin").unwrap(),
            }, 200u8),
            (Request::Delete {
                client_id: 42,
                version: 6,
                filename: Filename::new("a.bin").unwrap(),
            }, 201u8),
        ] {
            let encoded = make.encode();
            assert_eq!(encoded[5], op_byte);
            let mut reader: &[u8] = &encoded;
            assert_eq!(Request::read_from(&mut reader).await.unwrap(), make);
        }
    }

    #[tokio::test]
    async fn test_list_is_header_only() {
        let request = Request::List {
            client_id: 1,
            version: 6,
        };
        let encoded = request.encode();
        // Header only: u32 client_id | u8 version | u8 op.
        assert_eq!(encoded.len(), 6);

        let mut reader: &[u8] = &encoded;
        let decoded = Request::read_from(&mut reader).await.unwrap();
        assert_eq!(decoded, request);
    }

    #[tokio::test]
    async fn test_invalid_op_consumes_nothing_further() {
        let mut stream = Vec::new();
        stream.extend_from_slice(&7u32.to_le_bytes());
        stream.push(6);
        stream.push(150); // not a known op
        stream.extend_from_slice(b"trailing bytes the decoder must not touch");

        let mut reader: &[u8] = &stream;
        let err = Request::read_from(&mut reader).await.unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidOp(150)));
        assert_eq!(reader, b"trailing bytes the decoder must not touch");
    }

    #[tokio::test]
    async fn test_truncated_header_fails() {
        let stream = [1u8, 2, 3]; // less than the 6-byte header
        let mut reader: &[u8] = &stream;
        assert!(matches!(
            Request::read_from(&mut reader).await,
            Err(ProtocolError::Io(_))
        ));
    }

    #[tokio::test]
    async fn test_save_with_illegal_filename_fails() {
        let mut stream = Vec::new();
        stream.extend_from_slice(&7u32.to_le_bytes());
        stream.push(6);
        stream.push(100);
        stream.extend_from_slice(&4u16.to_le_bytes());
        stream.extend_from_slice(b"a/.b");

        let mut reader: &[u8] = &stream;
        assert!(matches!(
            Request::read_from(&mut reader).await,
            Err(ProtocolError::NameIllegalByte { byte: b'/', .. })
        ));
    }

    #[tokio::test]
    async fn test_decoder_leaves_pipelined_bytes_unread() {
        let first = Request::List {
            client_id: 9,
            version: 6,
        };
        let mut stream = first.encode().to_vec();
        let second = Request::Restore {
            client_id: 9,
            version: 6,
            filename: Filename::new("x.dat").unwrap(),
        };
        stream.extend_from_slice(&second.encode());

        let mut reader: &[u8] = &stream;
        assert_eq!(Request::read_from(&mut reader).await.unwrap(), first);
        // The second request is still buffered; the handler drains it.
        assert_eq!(reader.len(), second.encode().len());
    }
}
