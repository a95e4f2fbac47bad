use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

use crate::domain::errors::StoreError;
use crate::domain::ports::DocumentStore;

// Filesystem-backed document store.
//
// Blobs land under `root/<key>`; the returned URL assumes `root` is served
// at `<public_base_url>/uploads`.
#[derive(Clone)]
pub struct FilesystemDocumentStore {
    pub root: PathBuf,
    pub public_base_url: String,
}

impl FilesystemDocumentStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    // Every URL handed out by `put` starts with this.
    pub fn uploads_url(&self) -> String {
        format!("{}/uploads", self.public_base_url)
    }

    // Keys are generated server-side, but never let one escape the root.
    fn resolve(&self, key: &str) -> Result<PathBuf, StoreError> {
        let relative = Path::new(key);
        let is_plain = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if key.is_empty() || !is_plain {
            return Err(StoreError::Unavailable(format!("invalid document key: {key}")));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl DocumentStore for FilesystemDocumentStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<String, StoreError> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| StoreError::Unavailable(err.to_string()))?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|err| StoreError::Unavailable(err.to_string()))?;

        Ok(format!("{}/{}", self.uploads_url(), key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("registration-docs-{}", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn when_document_is_stored_then_file_exists_and_url_points_to_uploads() {
        let root = temp_root();
        let store = FilesystemDocumentStore::new(&root, "https://stay.example.com/");

        let url = store
            .put("booking-1/scan.png", vec![1, 2, 3])
            .await
            .expect("expected put to succeed");

        assert_eq!(url, "https://stay.example.com/uploads/booking-1/scan.png");
        let written = tokio::fs::read(root.join("booking-1/scan.png"))
            .await
            .expect("expected file on disk");
        assert_eq!(written, vec![1, 2, 3]);

        let _ = tokio::fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn when_key_escapes_root_then_put_is_refused() {
        let store = FilesystemDocumentStore::new(temp_root(), "http://localhost");

        for key in ["../outside.png", "/etc/passwd", ""] {
            let result = store.put(key, vec![0]).await;
            assert!(matches!(result, Err(StoreError::Unavailable(_))), "key {key:?}");
        }
    }
}
