use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::config::CloudinaryConfig;
use crate::models::MediaKind;

use super::{IncomingFile, MediaStorage, StorageError, StorageKind, StoredFile};

const API_BASE: &str = "https://api.cloudinary.com/v1_1";
const CDN_HOST: &str = "https://res.cloudinary.com";

pub struct CloudinaryStorage {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: Option<String>,
    bytes: Option<u64>,
    width: Option<i64>,
    height: Option<i64>,
    duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl CloudinaryStorage {
    pub fn new(config: CloudinaryConfig) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| format!("Failed to build Cloudinary client: {e}"))?;
        Ok(Self { client, config })
    }

    fn upload_url(&self, kind: MediaKind) -> String {
        let resource = match kind {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        };
        format!("{API_BASE}/{}/{resource}/upload", self.config.cloud_name)
    }

    /// Parameters covered by the signature. `file`, `api_key` and
    /// `resource_type` never are.
    fn signed_params(&self, kind: MediaKind, timestamp: i64) -> Vec<(&'static str, String)> {
        let transformation = match kind {
            MediaKind::Image => "c_limit,w_1200,h_800,q_auto,fl_progressive",
            MediaKind::Video => "q_auto",
        };
        vec![
            ("folder", self.config.folder.clone()),
            ("invalidate", "true".to_string()),
            ("overwrite", "true".to_string()),
            ("timestamp", timestamp.to_string()),
            ("transformation", transformation.to_string()),
        ]
    }
}

#[async_trait]
impl MediaStorage for CloudinaryStorage {
    fn kind(&self) -> StorageKind {
        StorageKind::Cloudinary
    }

    async fn store(&self, file: &IncomingFile) -> Result<StoredFile, StorageError> {
        let kind = file.kind();
        let params = self.signed_params(kind, chrono::Utc::now().timestamp());
        let signature = sign(&params, &self.config.api_secret);

        let part = Part::bytes(file.data.to_vec())
            .file_name(file.original_name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| format!("نوع الملف غير صالح: {e}"))?;

        let mut form = Form::new()
            .part("file", part)
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        for (key, value) in params {
            form = form.text(key, value);
        }

        tracing::info!(
            "Uploading {} ({} bytes) to Cloudinary folder {}",
            file.original_name,
            file.data.len(),
            self.config.folder
        );

        let response = self
            .client
            .post(self.upload_url(kind))
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    StorageError::from("انتهت مهلة رفع الملف. جرب ملف أصغر")
                } else {
                    StorageError::from(format!("فشل الاتصال بـ Cloudinary: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("HTTP {status}"));
            tracing::error!("Cloudinary rejected {}: {message}", file.original_name);
            return Err(friendly_error(&message, kind).into());
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| format!("استجابة غير صالحة من Cloudinary: {e}"))?;

        let url = body
            .secure_url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| StorageError::from("لم يتم الحصول على رابط صحيح من Cloudinary"))?;

        Ok(StoredFile {
            file_name: body.public_id.clone(),
            url,
            size: body.bytes.unwrap_or(file.data.len() as u64),
            width: body.width,
            height: body.height,
            duration: body.duration,
            public_id: Some(body.public_id),
        })
    }
}

/// Hex SHA-256 over `k1=v1&k2=v2...` (keys sorted) followed by the secret.
pub fn sign(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<_> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

fn friendly_error(message: &str, kind: MediaKind) -> String {
    if message.contains("Invalid cloud_name") {
        "اسم Cloud غير صحيح في إعدادات Cloudinary".to_string()
    } else if message.contains("Invalid API key") {
        "API Key غير صحيح في إعدادات Cloudinary".to_string()
    } else if message.to_lowercase().contains("file size") {
        "حجم الملف كبير جداً. الحد الأقصى للفيديو 100MB".to_string()
    } else if kind == MediaKind::Video && message.contains("resource_type") {
        "نوع الفيديو غير مدعوم. جرب MP4".to_string()
    } else {
        message.to_string()
    }
}

/// Resize/format hints for CDN-hosted images. Videos and anything not served
/// from the CDN come back unchanged.
pub fn optimized_url(src: &str, width: u32, quality: Option<u32>) -> String {
    let is_video = [".mp4", ".webm", ".mov"].iter().any(|ext| src.contains(ext));
    if is_video || !src.starts_with(CDN_HOST) {
        return src.to_string();
    }
    let quality = quality
        .map(|q| q.to_string())
        .unwrap_or_else(|| "auto".to_string());
    src.replacen("/upload/", &format!("/upload/w_{width},q_{quality},f_auto/"), 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_sorts_parameters() {
        let a = sign(
            &[("timestamp", "1".to_string()), ("folder", "p".to_string())],
            "secret",
        );
        let b = sign(
            &[("folder", "p".to_string()), ("timestamp", "1".to_string())],
            "secret",
        );
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);

        let mut hasher = Sha256::new();
        hasher.update(b"folder=p&timestamp=1secret");
        assert_eq!(a, hex::encode(hasher.finalize()));
    }

    #[test]
    fn optimized_url_rewrites_cdn_images() {
        let src = "https://res.cloudinary.com/aldeyar/image/upload/v1/portfolio/a.jpg";
        assert_eq!(
            optimized_url(src, 640, None),
            "https://res.cloudinary.com/aldeyar/image/upload/w_640,q_auto,f_auto/v1/portfolio/a.jpg"
        );
        assert!(optimized_url(src, 640, Some(70)).contains("w_640,q_70,f_auto"));
    }

    #[test]
    fn optimized_url_leaves_videos_and_local_files() {
        let video = "https://res.cloudinary.com/aldeyar/video/upload/v1/clip.mp4";
        assert_eq!(optimized_url(video, 640, None), video);
        assert_eq!(optimized_url("/uploads/a.jpg", 640, None), "/uploads/a.jpg");
    }

    #[test]
    fn friendly_errors_translate_known_messages() {
        assert!(friendly_error("Invalid API key abc", MediaKind::Image).contains("API Key"));
        assert_eq!(friendly_error("something else", MediaKind::Image), "something else");
    }
}
