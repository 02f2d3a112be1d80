//! bakd - stateless multi-client file backup server.
//!
//! Clients open a TCP connection, send one length-framed binary request
//! (save / restore / delete / list a file under a per-client namespace) and
//! receive one binary response. The server holds no cross-connection state;
//! the only shared resource is the content store.

pub mod client;
pub mod protocol;
pub mod server;
pub mod store;

pub use client::BackupClient;
pub use protocol::{Filename, Op, Payload, ProtocolError, Request, Response, Status,
    PROTOCOL_VERSION};
pub use server::{AlphanumericNames, Server};
pub use store::{ContentStore, FsStore, MemoryStore};
