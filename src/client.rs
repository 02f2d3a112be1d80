//! Client side of the protocol: one connection per request.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::debug;

use crate::protocol::{Filename, Payload, Request, Response, PROTOCOL_VERSION};

pub struct BackupClient {
    addr: SocketAddr,
    client_id: u32,
    version: u8,
}

impl BackupClient {
    pub fn new(addr: SocketAddr, client_id: u32) -> Self {
        Self {
            addr,
            client_id,
            version: PROTOCOL_VERSION,
        }
    }

    pub fn client_id(&self) -> u32 {
        self.client_id
    }

    /// Send one request on a fresh connection and read the response.
    /// Returns the server's protocol version alongside the response.
    pub async fn request(&self, request: Request) -> Result<(u8, Response)> {
        let mut stream = TcpStream::connect(self.addr)
            .await
            .with_context(|| format!("failed to connect to {}", self.addr))?;

        stream
            .write_all(&request.encode())
            .await
            .context("failed to send request")?;
        stream.flush().await.context("failed to flush request")?;

        let (version, response) = Response::read_from(&mut stream)
            .await
            .context("failed to read response")?;
        debug!(status = ?response.status(), server_version = version, "response received");

        Ok((version, response))
    }

    pub async fn save(&self, filename: &str, content: impl Into<bytes::Bytes>) -> Result<Response> {
        let request = Request::Save {
            client_id: self.client_id,
            version: self.version,
            filename: Filename::new(filename)?,
            payload: Payload::from_bytes(content.into())?,
        };
        Ok(self.request(request).await?.1)
    }

    pub async fn restore(&self, filename: &str) -> Result<Response> {
        let request = Request::Restore {
            client_id: self.client_id,
            version: self.version,
            filename: Filename::new(filename)?,
        };
        Ok(self.request(request).await?.1)
    }

    pub async fn delete(&self, filename: &str) -> Result<Response> {
        let request = Request::Delete {
            client_id: self.client_id,
            version: self.version,
            filename: Filename::new(filename)?,
        };
        Ok(self.request(request).await?.1)
    }

    pub async fn list(&self) -> Result<Response> {
        let request = Request::List {
            client_id: self.client_id,
            version: self.version,
        };
        Ok(self.request(request).await?.1)
    }
}
