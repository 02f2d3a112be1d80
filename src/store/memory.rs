//! In-memory content store, for tests and embedding.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::io;
use tokio::sync::Mutex;

use crate::store::ContentStore;

#[derive(Default)]
pub struct MemoryStore {
    namespaces: Mutex<HashMap<u32, HashMap<String, Bytes>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(what: &str) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, what.to_string())
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn namespace_exists(&self, client_id: u32) -> io::Result<bool> {
        Ok(self.namespaces.lock().await.contains_key(&client_id))
    }

    async fn namespace_is_empty(&self, client_id: u32) -> io::Result<bool> {
        let namespaces = self.namespaces.lock().await;
        let files = namespaces
            .get(&client_id)
            .ok_or_else(|| not_found("no such namespace"))?;
        Ok(files.is_empty())
    }

    async fn ensure_namespace(&self, client_id: u32) -> io::Result<()> {
        self.namespaces.lock().await.entry(client_id).or_default();
        Ok(())
    }

    async fn contains(&self, client_id: u32, name: &str) -> io::Result<bool> {
        let namespaces = self.namespaces.lock().await;
        Ok(namespaces
            .get(&client_id)
            .is_some_and(|files| files.contains_key(name)))
    }

    async fn put(&self, client_id: u32, name: &str, bytes: &[u8]) -> io::Result<()> {
        let mut namespaces = self.namespaces.lock().await;
        let files = namespaces
            .get_mut(&client_id)
            .ok_or_else(|| not_found("no such namespace"))?;
        files.insert(name.to_string(), Bytes::copy_from_slice(bytes));
        Ok(())
    }

    async fn get(&self, client_id: u32, name: &str) -> io::Result<Bytes> {
        let namespaces = self.namespaces.lock().await;
        namespaces
            .get(&client_id)
            .and_then(|files| files.get(name))
            .cloned()
            .ok_or_else(|| not_found("no such file"))
    }

    async fn remove(&self, client_id: u32, name: &str) -> io::Result<()> {
        let mut namespaces = self.namespaces.lock().await;
        let files = namespaces
            .get_mut(&client_id)
            .ok_or_else(|| not_found("no such namespace"))?;
        files
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| not_found("no such file"))
    }

    async fn list_names(&self, client_id: u32) -> io::Result<Vec<String>> {
        let namespaces = self.namespaces.lock().await;
        let files = namespaces
            .get(&client_id)
            .ok_or_else(|| not_found("no such namespace"))?;
        Ok(files.keys().cloned().collect())
    }
}
