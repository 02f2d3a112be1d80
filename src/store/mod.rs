//! Per-client content storage.
//!
//! The server core only needs put/get/remove/list keyed by client id and
//! filename; how the bytes persist is the store's business. Operations on
//! different client namespaces never interfere. Concurrent writes to the same
//! name in one namespace are last-write-wins.

pub mod fs;
pub mod memory;

use async_trait::async_trait;
use bytes::Bytes;
use std::io;

pub use fs::FsStore;
pub use memory::MemoryStore;

#[async_trait]
pub trait ContentStore: Send + Sync + 'static {
    /// Whether the client's namespace has ever been materialized.
    async fn namespace_exists(&self, client_id: u32) -> io::Result<bool>;

    /// Whether the namespace holds no entries. Only meaningful when it exists.
    async fn namespace_is_empty(&self, client_id: u32) -> io::Result<bool>;

    /// Create the namespace if absent. Only Save is allowed to call this.
    async fn ensure_namespace(&self, client_id: u32) -> io::Result<()>;

    /// Whether the named entry exists in the namespace.
    async fn contains(&self, client_id: u32, name: &str) -> io::Result<bool>;

    async fn put(&self, client_id: u32, name: &str, bytes: &[u8]) -> io::Result<()>;

    async fn get(&self, client_id: u32, name: &str) -> io::Result<Bytes>;

    async fn remove(&self, client_id: u32, name: &str) -> io::Result<()>;

    /// Entry names in the namespace, in implementation-defined order.
    async fn list_names(&self, client_id: u32) -> io::Result<Vec<String>>;
}
