pub mod cloudinary;
pub mod local;
pub mod multipart;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;

use crate::config::Config;
use crate::models::MediaKind;

pub use cloudinary::CloudinaryStorage;
pub use local::LocalStorage;

/// MIME types accepted by `POST /api/upload`.
pub const ALLOWED_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/webp",
    "image/gif",
    "video/mp4",
    "video/mov",
    "video/avi",
    "video/webm",
    "video/quicktime",
    "video/x-msvideo",
];

const MIB: usize = 1024 * 1024;

pub fn is_allowed(content_type: &str) -> bool {
    ALLOWED_TYPES.contains(&content_type)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    Cloudinary,
    Local,
}

impl StorageKind {
    /// Per-file ceiling. The CDN takes larger files than local disk.
    pub fn max_file_size(self) -> usize {
        match self {
            StorageKind::Cloudinary => 100 * MIB,
            StorageKind::Local => 50 * MIB,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StorageKind::Cloudinary => "cloudinary",
            StorageKind::Local => "local",
        }
    }
}

/// One file field read from an upload request.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub original_name: String,
    pub content_type: String,
    pub data: Bytes,
    /// Bytes seen on the wire; may exceed `data.len()` when `oversized`.
    pub size: usize,
    pub oversized: bool,
}

impl IncomingFile {
    pub fn kind(&self) -> MediaKind {
        MediaKind::from_mime(&self.content_type)
    }
}

#[derive(Debug, Clone)]
pub struct StoredFile {
    pub file_name: String,
    pub url: String,
    pub size: u64,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub duration: Option<f64>,
    pub public_id: Option<String>,
}

#[derive(Debug)]
pub struct StorageError {
    pub message: String,
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<String> for StorageError {
    fn from(s: String) -> Self {
        StorageError { message: s }
    }
}

impl From<&str> for StorageError {
    fn from(s: &str) -> Self {
        StorageError {
            message: s.to_string(),
        }
    }
}

#[async_trait]
pub trait MediaStorage: Send + Sync {
    fn kind(&self) -> StorageKind;

    fn max_file_size(&self) -> usize {
        self.kind().max_file_size()
    }

    async fn store(&self, file: &IncomingFile) -> Result<StoredFile, StorageError>;
}

/// Pick the CDN when credentials are configured, local disk otherwise.
pub fn from_config(config: &Config) -> Result<Arc<dyn MediaStorage>, String> {
    match &config.cloudinary {
        Some(cdn) => {
            tracing::info!("Uploads go to Cloudinary cloud {}", cdn.cloud_name);
            Ok(Arc::new(CloudinaryStorage::new(cdn.clone())?))
        }
        None => {
            tracing::warn!(
                "Cloudinary not configured, storing uploads in {}",
                config.upload_dir.display()
            );
            Ok(Arc::new(LocalStorage::new(config.upload_dir.clone())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_covers_images_and_videos() {
        assert!(is_allowed("image/png"));
        assert!(is_allowed("video/quicktime"));
        assert!(!is_allowed("application/pdf"));
        assert!(!is_allowed("image/svg+xml"));
    }

    #[test]
    fn cdn_ceiling_is_larger() {
        assert_eq!(StorageKind::Local.max_file_size(), 50 * 1024 * 1024);
        assert_eq!(StorageKind::Cloudinary.max_file_size(), 100 * 1024 * 1024);
    }
}
