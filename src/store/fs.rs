//! Filesystem-backed content store.
//!
//! Layout: `<root>/<client_id>/<filename>`, one directory per client id.

use async_trait::async_trait;
use bytes::Bytes;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::store::ContentStore;

pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn client_dir(&self, client_id: u32) -> PathBuf {
        self.root.join(client_id.to_string())
    }

    /// Resolve a stored name to a path under the client directory.
    ///
    /// Wire-level filename rules already forbid separators and `..`, but the
    /// store does not trust its callers to have applied them.
    fn file_path(&self, client_id: u32, name: &str) -> io::Result<PathBuf> {
        let rel = Path::new(name);
        if rel.is_absolute() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("absolute name not allowed: {name}"),
            ));
        }
        for component in rel.components() {
            match component {
                Component::Normal(_) => {}
                _ => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("name escapes client directory: {name}"),
                    ));
                }
            }
        }
        Ok(self.client_dir(client_id).join(rel))
    }
}

#[async_trait]
impl ContentStore for FsStore {
    async fn namespace_exists(&self, client_id: u32) -> io::Result<bool> {
        Ok(tokio::fs::try_exists(self.client_dir(client_id)).await?)
    }

    async fn namespace_is_empty(&self, client_id: u32) -> io::Result<bool> {
        let mut entries = tokio::fs::read_dir(self.client_dir(client_id)).await?;
        Ok(entries.next_entry().await?.is_none())
    }

    async fn ensure_namespace(&self, client_id: u32) -> io::Result<()> {
        tokio::fs::create_dir_all(self.client_dir(client_id)).await
    }

    async fn contains(&self, client_id: u32, name: &str) -> io::Result<bool> {
        let path = self.file_path(client_id, name)?;
        tokio::fs::try_exists(path).await
    }

    async fn put(&self, client_id: u32, name: &str, bytes: &[u8]) -> io::Result<()> {
        let path = self.file_path(client_id, name)?;
        tokio::fs::write(path, bytes).await
    }

    async fn get(&self, client_id: u32, name: &str) -> io::Result<Bytes> {
        let path = self.file_path(client_id, name)?;
        let content = tokio::fs::read(path).await?;
        Ok(Bytes::from(content))
    }

    async fn remove(&self, client_id: u32, name: &str) -> io::Result<()> {
        let path = self.file_path(client_id, name)?;
        tokio::fs::remove_file(path).await
    }

    async fn list_names(&self, client_id: u32) -> io::Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(self.client_dir(client_id)).await?;
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, FsStore) {
        let temp = TempDir::new().unwrap();
        let store = FsStore::new(temp.path());
        (temp, store)
    }

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let (_temp, store) = store();
        store.ensure_namespace(7).await.unwrap();
        store.put(7, "notes.txt", b"hello").await.unwrap();

        assert!(store.namespace_exists(7).await.unwrap());
        assert!(!store.namespace_is_empty(7).await.unwrap());
        assert!(store.contains(7, "notes.txt").await.unwrap());
        assert_eq!(store.get(7, "notes.txt").await.unwrap().as_ref(), b"hello");
    }

    #[tokio::test]
    async fn test_namespaces_are_disjoint() {
        let (_temp, store) = store();
        store.ensure_namespace(1).await.unwrap();
        store.put(1, "a.txt", b"one").await.unwrap();

        assert!(!store.namespace_exists(2).await.unwrap());
        assert!(!store.contains(2, "a.txt").await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_targets_one_file() {
        let (_temp, store) = store();
        store.ensure_namespace(7).await.unwrap();
        store.put(7, "a.txt", b"a").await.unwrap();
        store.put(7, "b.txt", b"b").await.unwrap();

        store.remove(7, "a.txt").await.unwrap();
        assert!(!store.contains(7, "a.txt").await.unwrap());
        assert!(store.contains(7, "b.txt").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_names() {
        let (_temp, store) = store();
        store.ensure_namespace(7).await.unwrap();
        store.put(7, "a.txt", b"a").await.unwrap();
        store.put(7, "b.txt", b"b").await.unwrap();

        let mut names = store.list_names(7).await.unwrap();
        names.sort();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[tokio::test]
    async fn test_traversal_names_rejected() {
        let (_temp, store) = store();
        store.ensure_namespace(7).await.unwrap();

        for name in ["../escape", "/etc/passwd", "a/../../b"] {
            let err = store.put(7, name, b"x").await.unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::InvalidInput, "{name}");
        }
    }
}
