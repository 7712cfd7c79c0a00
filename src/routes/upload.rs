use axum::body::Body;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

use crate::auth::extractor::AdminAccess;
use crate::error::AppError;
use crate::models::MediaKind;
use crate::state::SharedState;
use crate::storage::{self, multipart, IncomingFile, StorageKind, StoredFile};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub original_name: String,
    pub file_name: String,
    pub src: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub size: u64,
    pub mime_type: String,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub duration: Option<f64>,
    pub public_id: Option<String>,
    pub storage_type: StorageKind,
}

impl UploadedFile {
    fn new(file: &IncomingFile, stored: StoredFile, storage_type: StorageKind) -> Self {
        UploadedFile {
            original_name: file.original_name.clone(),
            file_name: stored.file_name,
            src: stored.url.clone(),
            url: stored.url,
            kind: file.kind(),
            size: stored.size,
            mime_type: file.content_type.clone(),
            width: stored.width,
            height: stored.height,
            duration: stored.duration,
            public_id: stored.public_id,
            storage_type,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedFile {
    pub original_name: String,
    pub error: String,
}

pub async fn upload(
    _admin: AdminAccess,
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Body,
) -> Result<Json<Value>, AppError> {
    let backend = state.storage.kind();
    let max_size = state.storage.max_file_size();

    let files = multipart::read_files(&headers, body, max_size)
        .await
        .map_err(AppError::BadRequest)?;

    if files.is_empty() {
        return Err(AppError::BadRequest("لم يتم تحديد أي ملفات".to_string()));
    }

    let mut uploaded = Vec::new();
    let mut failed = Vec::new();

    for file in &files {
        if file.size == 0 {
            tracing::warn!("Skipping empty file {}", file.original_name);
            continue;
        }

        if !storage::is_allowed(&file.content_type) {
            tracing::warn!(
                "Rejected {}: unsupported type {}",
                file.original_name,
                file.content_type
            );
            failed.push(FailedFile {
                original_name: file.original_name.clone(),
                error: format!(
                    "نوع ملف غير مدعوم: {} ({})",
                    file.original_name, file.content_type
                ),
            });
            continue;
        }

        if file.oversized {
            tracing::warn!("Rejected {}: larger than {max_size} bytes", file.original_name);
            failed.push(FailedFile {
                original_name: file.original_name.clone(),
                error: format!(
                    "ملف كبير جداً: {} (الحد الأقصى {} ميجابايت)",
                    file.original_name,
                    max_size / (1024 * 1024)
                ),
            });
            continue;
        }

        match state.storage.store(file).await {
            Ok(stored) => uploaded.push(UploadedFile::new(file, stored, backend)),
            Err(e) => {
                tracing::error!("Upload of {} failed: {e}", file.original_name);
                failed.push(FailedFile {
                    original_name: file.original_name.clone(),
                    error: format!("فشل في رفع {}: {e}", file.original_name),
                });
            }
        }
    }

    tracing::info!(
        "Upload batch finished: {} stored, {} failed, backend {}",
        uploaded.len(),
        failed.len(),
        backend.as_str()
    );

    if uploaded.is_empty() {
        return Err(AppError::Validation(
            "لم يتم رفع أي ملفات بنجاح".to_string(),
            failed.into_iter().map(|f| f.error).collect(),
        ));
    }

    let count = uploaded.len();
    let mut body = json!({
        "success": true,
        "message": summary_message(count, failed.len()),
        "count": count,
        "files": uploaded,
        "storageType": backend,
    });
    if !failed.is_empty() {
        body["errors"] = json!(failed);
    }
    Ok(Json(body))
}

fn summary_message(succeeded: usize, failed: usize) -> String {
    if failed > 0 {
        format!("تم رفع {succeeded} ملف بنجاح و فشل {failed} ملف")
    } else {
        format!("تم رفع {succeeded} ملف بنجاح")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_mentions_failures_only_when_present() {
        assert_eq!(summary_message(2, 0), "تم رفع 2 ملف بنجاح");
        assert_eq!(summary_message(1, 3), "تم رفع 1 ملف بنجاح و فشل 3 ملف");
    }
}
