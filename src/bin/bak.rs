//! Command-line client for the backup server.
//!
//! Each invocation opens one connection, sends one request and prints the
//! server's answer.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use bakd::client::BackupClient;
use bakd::protocol::Response;

#[derive(Parser, Debug)]
#[command(name = "bak", version, about = "Backup server client")]
struct Args {
    /// Server address
    #[arg(long, short, default_value = "127.0.0.1:1256", env = "BAK_SERVER")]
    server: SocketAddr,

    /// Client id (namespace) to operate under
    #[arg(long, short, env = "BAK_CLIENT_ID")]
    client_id: u32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Back up a local file under the given name
    Save {
        /// Name to store the file under
        name: String,
        /// Local file to read; defaults to the stored name
        #[arg(long)]
        from: Option<PathBuf>,
    },
    /// Fetch a backed-up file
    Restore {
        name: String,
        /// Local path to write to; defaults to the stored name
        #[arg(long)]
        to: Option<PathBuf>,
    },
    /// Delete a backed-up file
    Delete { name: String },
    /// List all files backed up under the client id
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let client = BackupClient::new(args.server, args.client_id);

    match args.command {
        Command::Save { name, from } => {
            let path = from.unwrap_or_else(|| PathBuf::from(&name));
            let content = tokio::fs::read(&path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            match client.save(&name, content).await? {
                Response::SaveOk { filename } => println!("saved {filename}"),
                other => bail!("save failed: {other:?}"),
            }
        }
        Command::Restore { name, to } => match client.restore(&name).await? {
            Response::RestoreOk { filename, payload } => {
                let path = to.unwrap_or_else(|| PathBuf::from(filename.as_str()));
                tokio::fs::write(&path, payload.as_bytes())
                    .await
                    .with_context(|| format!("failed to write {}", path.display()))?;
                println!("restored {} ({} bytes)", path.display(), payload.len());
            }
            other => bail!("restore failed: {other:?}"),
        },
        Command::Delete { name } => match client.delete(&name).await? {
            Response::SaveOk { filename } => println!("deleted {filename}"),
            other => bail!("delete failed: {other:?}"),
        },
        Command::List => match client.list().await? {
            Response::ListOk { payload, .. } => {
                print!("{}", String::from_utf8_lossy(payload.as_bytes()));
            }
            other => bail!("list failed: {other:?}"),
        },
    }

    Ok(())
}
