//! Per-connection handling: decode, drain excess bytes, dispatch, respond.
//!
//! One request is serviced per connection. Any failure along the way turns
//! into one best-effort general-error send; if that send also fails the
//! connection is simply dropped.

use anyhow::{Context, Result};
use std::io;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::debug;

use crate::protocol::{Request, Response};
use crate::server::dispatch::{dispatch, NameGenerator};
use crate::store::ContentStore;

pub async fn handle_connection<S, N>(mut stream: TcpStream, store: Arc<S>, names: Arc<N>)
where
    S: ContentStore,
    N: NameGenerator,
{
    if let Err(err) = serve_one(&mut stream, store.as_ref(), names.as_ref()).await {
        debug!("connection failed: {err:#}");
        send_general_error(&mut stream).await;
    }
}

async fn serve_one<S, N>(stream: &mut TcpStream, store: &S, names: &N) -> Result<()>
where
    S: ContentStore,
    N: NameGenerator,
{
    let request = match Request::read_from(stream).await {
        Ok(request) => request,
        Err(err) => {
            drain_available(stream);
            return Err(err).context("failed to decode request");
        }
    };
    debug!(
        client_id = request.client_id(),
        op = ?request.op(),
        version = request.version(),
        "request received"
    );

    // A client that pipelines a second request on the same connection gets it
    // discarded; the server services one request per connection.
    drain_available(stream);

    let response = dispatch(request, store, names).await;
    debug!(status = ?response.status(), "sending response");

    stream
        .write_all(&response.encode())
        .await
        .context("failed to write response")?;
    stream.flush().await.context("failed to flush response")?;

    Ok(())
}

/// Discard whatever bytes are immediately available on the connection.
/// Never blocks waiting for more data.
fn drain_available(stream: &mut TcpStream) {
    let mut discard = [0u8; 4096];
    let mut total = 0usize;
    loop {
        match stream.try_read(&mut discard) {
            Ok(0) => break, // peer closed
            Ok(n) => total += n,
            Err(ref err) if err.kind() == io::ErrorKind::WouldBlock => break,
            Err(_) => break,
        }
    }
    if total > 0 {
        debug!(bytes = total, "discarded excess bytes on connection");
    }
}

async fn send_general_error(stream: &mut TcpStream) {
    let frame = Response::GeneralError.encode();
    if let Err(err) = stream.write_all(&frame).await {
        debug!("failed to send general error response: {err}");
    } else {
        let _ = stream.flush().await;
    }
}
