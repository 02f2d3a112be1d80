//! Response encoding and decoding.
//!
//! Responses always carry the fixed server protocol version. The decode path
//! exists for the client side of the wire.

use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::protocol::error::ProtocolError;
use crate::protocol::wire::{Filename, Payload, Status, PROTOCOL_VERSION};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Status 212. Also the success response for a delete.
    SaveOk { filename: Filename },
    /// Status 210.
    RestoreOk { filename: Filename, payload: Payload },
    /// Status 211. The filename is a synthetic listing name, the payload the
    /// newline-joined entry names.
    ListOk { filename: Filename, payload: Payload },
    /// Status 1001.
    NoSuchFile { filename: Filename },
    /// Status 1002. The client's namespace could not be resolved at all.
    NoSuchClient,
    /// Status 1003. Catch-all for I/O or internal failure.
    GeneralError,
}

impl Response {
    pub fn status(&self) -> Status {
        match self {
            Self::SaveOk { .. } => Status::SuccessSave,
            Self::RestoreOk { .. } => Status::SuccessRestore,
            Self::ListOk { .. } => Status::SuccessList,
            Self::NoSuchFile { .. } => Status::ErrorNoFile,
            Self::NoSuchClient => Status::ErrorNoClient,
            Self::GeneralError => Status::ErrorGeneral,
        }
    }

    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::new();
        buf.put_u8(PROTOCOL_VERSION);
        buf.put_u16_le(self.status() as u16);

        match self {
            Self::SaveOk { filename } | Self::NoSuchFile { filename } => {
                filename.encode(&mut buf);
            }
            Self::RestoreOk { filename, payload } | Self::ListOk { filename, payload } => {
                filename.encode(&mut buf);
                payload.encode(&mut buf);
            }
            Self::NoSuchClient | Self::GeneralError => {}
        }

        buf.freeze()
    }

    /// Read one response off the stream. Returns the server version alongside
    /// the decoded variant.
    pub async fn read_from<R: AsyncRead + Unpin>(r: &mut R) -> Result<(u8, Self), ProtocolError> {
        let version = r.read_u8().await?;
        let status_raw = r.read_u16_le().await?;
        let status = Status::from_u16(status_raw).ok_or(ProtocolError::InvalidStatus(status_raw))?;

        let response = match status {
            Status::SuccessSave => Self::SaveOk {
                filename: Filename::read_from(r).await?,
            },
            Status::ErrorNoFile => Self::NoSuchFile {
                filename: Filename::read_from(r).await?,
            },
            Status::SuccessRestore => Self::RestoreOk {
                filename: Filename::read_from(r).await?,
                payload: Payload::read_from(r).await?,
            },
            Status::SuccessList => Self::ListOk {
                filename: Filename::read_from(r).await?,
                payload: Payload::read_from(r).await?,
            },
            Status::ErrorNoClient => Self::NoSuchClient,
            Status::ErrorGeneral => Self::GeneralError,
        };

        Ok((version, response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_ok_roundtrip() {
        let response = Response::SaveOk {
            filename: Filename::new("notes.txt").unwrap(),
        };
        let encoded = response.encode();

        assert_eq!(encoded[0], PROTOCOL_VERSION);
        assert_eq!(&encoded[1..3], &212u16.to_le_bytes());

        let mut reader: &[u8] = &encoded;
        let (version, decoded) = Response::read_from(&mut reader).await.unwrap();
        assert_eq!(version, PROTOCOL_VERSION);
        assert_eq!(decoded, response);
    }

    #[tokio::test]
    async fn test_restore_ok_carries_payload() {
        let response = Response::RestoreOk {
            filename: Filename::new("notes.txt").unwrap(),
            payload: Payload::from_bytes(&b"hello"[..]).unwrap(),
        };
        let encoded = response.encode();
        assert_eq!(&encoded[1..3], &210u16.to_le_bytes());

        let mut reader: &[u8] = &encoded;
        let (_, decoded) = Response::read_from(&mut reader).await.unwrap();
        match decoded {
            Response::RestoreOk { payload, .. } => assert_eq!(payload.as_bytes(), b"hello"),
            other => panic!("expected RestoreOk, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_error_responses_are_header_only() {
        for (response, code) in [
            (Response::NoSuchClient, 1002u16),
            (Response::GeneralError, 1003u16),
        ] {
            let encoded = response.encode();
            assert_eq!(encoded.len(), 3);
            assert_eq!(&encoded[1..3], &code.to_le_bytes());

            let mut reader: &[u8] = &encoded;
            let (_, decoded) = Response::read_from(&mut reader).await.unwrap();
            assert_eq!(decoded, response);
        }
    }

    #[tokio::test]
    async fn test_unknown_status_fails() {
        let mut encoded = vec![PROTOCOL_VERSION];
        encoded.extend_from_slice(&999u16.to_le_bytes());
        let mut reader: &[u8] = &encoded;
        assert!(matches!(
            Response::read_from(&mut reader).await,
            Err(ProtocolError::InvalidStatus(999))
        ));
    }
}
