use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rand::Rng;

use super::{IncomingFile, MediaStorage, StorageError, StorageKind, StoredFile};

/// Public URL prefix the upload directory is served under.
pub const PUBLIC_PREFIX: &str = "/uploads";

const NAME_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

pub struct LocalStorage {
    dir: PathBuf,
}

impl LocalStorage {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

#[async_trait]
impl MediaStorage for LocalStorage {
    fn kind(&self) -> StorageKind {
        StorageKind::Local
    }

    async fn store(&self, file: &IncomingFile) -> Result<StoredFile, StorageError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| format!("تعذر إنشاء مجلد الرفع: {e}"))?;

        let file_name = generate_file_name(&file.original_name);
        let path = self.dir.join(&file_name);
        tokio::fs::write(&path, &file.data)
            .await
            .map_err(|e| format!("تعذر حفظ الملف: {e}"))?;

        tracing::debug!("Stored {} as {}", file.original_name, path.display());

        Ok(StoredFile {
            url: format!("{PUBLIC_PREFIX}/{file_name}"),
            file_name,
            size: file.data.len() as u64,
            width: None,
            height: None,
            duration: None,
            public_id: None,
        })
    }
}

/// `<unix-millis>_<13 random chars><extension>`; the extension is kept only
/// when it is plain ASCII alphanumeric.
pub fn generate_file_name(original_name: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let mut rng = rand::rng();
    let suffix: String = (0..13)
        .map(|_| NAME_ALPHABET[rng.random_range(0..NAME_ALPHABET.len())] as char)
        .collect();
    let extension = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.len() <= 10 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    format!("{millis}_{suffix}{extension}")
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    #[test]
    fn file_name_keeps_extension() {
        let name = generate_file_name("حديقة.JPG");
        assert!(name.ends_with(".JPG"));
        let (millis, rest) = name.split_once('_').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(rest.len(), 13 + ".JPG".len());
    }

    #[test]
    fn file_name_drops_suspicious_extension() {
        let name = generate_file_name("../../etc/passwd");
        assert!(!name.contains('/'));
        assert!(!name.contains('.'));
        let name = generate_file_name("clip.mp4;rm");
        assert!(!name.contains(';'));
    }

    #[tokio::test]
    async fn store_writes_under_directory() {
        let dir = std::env::temp_dir().join(format!("aldeyar-local-{}", uuid::Uuid::now_v7()));
        let storage = LocalStorage::new(dir.clone());
        let file = IncomingFile {
            original_name: "photo.png".to_string(),
            content_type: "image/png".to_string(),
            data: Bytes::from_static(b"\x89PNG fake"),
            size: 9,
            oversized: false,
        };

        let stored = storage.store(&file).await.unwrap();
        assert!(stored.url.starts_with("/uploads/"));
        assert_eq!(stored.size, 9);
        let written = tokio::fs::read(dir.join(&stored.file_name)).await.unwrap();
        assert_eq!(written, b"\x89PNG fake");

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
