use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

pub type Storage = Arc<dyn ObjectStorage + Send + Sync>;

/// Object-storage collaborator for message attachments. Uploads return the
/// public URL of the stored object.
#[async_trait]
pub trait ObjectStorage {
    async fn upload(&self, bytes: Bytes, path: &str) -> super::Result<String>;

    /// Idempotent: deleting an unknown object is not an error.
    async fn delete(&self, url: &str) -> super::Result<()>;
}

#[derive(Default)]
pub struct InMemoryObjectStorage {
    objects: RwLock<HashMap<String, Bytes>>,
}

impl InMemoryObjectStorage {
    pub fn new() -> Arc<Self> {
        Self::default().into()
    }

    pub async fn get(&self, url: &str) -> Option<Bytes> {
        self.objects.read().await.get(url).cloned()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl ObjectStorage for InMemoryObjectStorage {
    async fn upload(&self, bytes: Bytes, path: &str) -> super::Result<String> {
        let url = format!("mem://{path}");
        self.objects.write().await.insert(url.clone(), bytes);
        Ok(url)
    }

    async fn delete(&self, url: &str) -> super::Result<()> {
        self.objects.write().await.remove(url);
        Ok(())
    }
}
