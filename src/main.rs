use anyhow::{Context, Result};
use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use bakd::server::{AlphanumericNames, Server};
use bakd::store::FsStore;

/// Stateless multi-client file backup server.
#[derive(Parser, Debug)]
#[command(name = "bakd", version, about)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0")]
    bind: IpAddr,

    /// Port to listen on
    #[arg(long, short, default_value_t = 1256, env = "BAKD_PORT")]
    port: u16,

    /// Storage root; one subdirectory per client id
    #[arg(long, default_value = "my_server", env = "BAKD_ROOT")]
    root: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    tokio::fs::create_dir_all(&args.root)
        .await
        .with_context(|| format!("failed to create storage root {}", args.root.display()))?;

    let server = Server::bind(
        (args.bind, args.port),
        FsStore::new(args.root),
        AlphanumericNames,
    )
    .await?;

    server.run().await
}
