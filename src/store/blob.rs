use async_trait::async_trait;
use chrono::Utc;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, info};
use uuid::Uuid;

use super::{BlobStore, StoreError};
use crate::config::StorageConfig;

pub const HEADSHOT_DIR: &str = "instructor-headshots";

const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "png", "webp", "gif"];

/// File extension for an accepted image content type
pub fn image_extension(content_type: &str) -> Option<&'static str> {
    let essence = content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    match essence.as_str() {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}

/// Writes images under `<media_root>/instructor-headshots/` and serves them
/// from `public_base_url`
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
    public_base_url: String,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.media_root.clone(), config.public_base_url.clone())
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put_image(&self, owner: Uuid, content_type: &str, bytes: &[u8]) -> Result<String, StoreError> {
        let ext = image_extension(content_type)
            .ok_or_else(|| StoreError::Blob(format!("unsupported content type {}", content_type)))?;

        let dir = self.root.join(HEADSHOT_DIR);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| StoreError::Blob(format!("create {}: {}", dir.display(), e)))?;

        let file_name = format!("{}.{}", owner, ext);
        let path = dir.join(&file_name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| StoreError::Blob(format!("write {}: {}", path.display(), e)))?;

        info!("Stored headshot for {} ({} bytes)", owner, bytes.len());

        // version suffix so clients drop the cached image after a re-upload
        Ok(format!(
            "{}/{}/{}?v={}",
            self.public_base_url,
            HEADSHOT_DIR,
            file_name,
            Utc::now().timestamp_millis()
        ))
    }

    async fn prune_images(&self, owner: Uuid, keep_content_type: &str) -> Result<(), StoreError> {
        let keep = image_extension(keep_content_type);
        let dir = self.root.join(HEADSHOT_DIR);

        for ext in IMAGE_EXTENSIONS.into_iter().filter(|e| Some(*e) != keep) {
            let path = dir.join(format!("{}.{}", owner, ext));
            match tokio::fs::remove_file(&path).await {
                Ok(()) => debug!("Removed stale headshot {}", path.display()),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(StoreError::Blob(format!("remove {}: {}", path.display(), e))),
            }
        }
        Ok(())
    }
}
