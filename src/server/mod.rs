//! Connection acceptor: one detached task per accepted connection.
//!
//! The accept loop never waits on a connection's task, and a panic inside one
//! connection's task cannot take the loop down. There is no bound on
//! concurrently active connections and no shutdown protocol; the loop runs
//! until process termination.

pub mod dispatch;
pub mod handler;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, ToSocketAddrs};
use tracing::{debug, info};

use crate::server::dispatch::NameGenerator;
use crate::store::ContentStore;

pub use dispatch::{dispatch as dispatch_request, AlphanumericNames, LISTING_NAME_LEN};

pub struct Server<S, N> {
    listener: TcpListener,
    store: Arc<S>,
    names: Arc<N>,
}

impl<S, N> Server<S, N>
where
    S: ContentStore,
    N: NameGenerator,
{
    pub async fn bind(addr: impl ToSocketAddrs, store: S, names: N) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .context("failed to bind listening socket")?;
        Ok(Self {
            listener,
            store: Arc::new(store),
            names: Arc::new(names),
        })
    }

    /// The bound address, useful when binding port 0.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .context("failed to read local address")
    }

    pub async fn run(self) -> Result<()> {
        info!(addr = %self.local_addr()?, "listening for backup clients");
        loop {
            let (stream, peer) = self
                .listener
                .accept()
                .await
                .context("failed to accept connection")?;
            debug!(%peer, "accepted connection");

            let store = Arc::clone(&self.store);
            let names = Arc::clone(&self.names);
            tokio::spawn(handler::handle_connection(stream, store, names));
        }
    }
}
