use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

/// Contract of the external binary asset store (profile pictures).
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Stores the bytes under `path` and returns an opaque reference.
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> anyhow::Result<String>;

    /// Resolves a reference to a publicly servable URL.
    async fn get_url(&self, asset_ref: &str) -> anyhow::Result<String>;
}

/// In-memory asset store. References are the upload paths themselves.
#[derive(Debug, Default)]
pub struct MemoryAssets {
    objects: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn object_size(&self, path: &str) -> Option<usize> {
        self.objects.read().await.get(path).map(Vec::len)
    }
}

#[async_trait]
impl AssetStore for MemoryAssets {
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> anyhow::Result<String> {
        self.objects.write().await.insert(path.to_string(), bytes);
        Ok(path.to_string())
    }

    async fn get_url(&self, asset_ref: &str) -> anyhow::Result<String> {
        Ok(format!("memory://{asset_ref}"))
    }
}
