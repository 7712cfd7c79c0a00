use axum::body::Body;
use axum::http::HeaderMap;
use bytes::{Bytes, BytesMut};

use super::IncomingFile;

const INVALID_REQUEST: &str = "طلب رفع غير صالح";

const SINGLE_FIELD: &str = "file";
const MULTI_FIELD: &str = "files";

/// Read the upload fields of a multipart body.
///
/// A `file` field wins over any number of `files` fields. Each field is read
/// up to `max_file_size`; past that it is flagged `oversized` and the rest of
/// its data is skipped.
pub async fn read_files(
    headers: &HeaderMap,
    body: Body,
    max_file_size: usize,
) -> Result<Vec<IncomingFile>, String> {
    let boundary = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| multer::parse_boundary(ct).ok())
        .ok_or_else(|| {
            tracing::warn!("Upload rejected: missing multipart boundary");
            INVALID_REQUEST.to_string()
        })?;

    let mut multipart = multer::Multipart::new(body.into_data_stream(), boundary);

    let mut single = None;
    let mut multiple = Vec::new();
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| {
            tracing::warn!("Upload rejected: multipart error: {e}");
            INVALID_REQUEST.to_string()
        })?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name != SINGLE_FIELD && name != MULTI_FIELD {
            continue;
        }
        if name == SINGLE_FIELD && single.is_some() {
            continue;
        }

        let original_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .map(|m| m.essence_str().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let mut data = BytesMut::new();
        let mut size = 0usize;
        let mut oversized = false;
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| {
                tracing::warn!("Upload rejected: field read error: {e}");
                INVALID_REQUEST.to_string()
            })?
        {
            size += chunk.len();
            if size > max_file_size {
                oversized = true;
                break;
            }
            data.extend_from_slice(&chunk);
        }

        let file = IncomingFile {
            original_name,
            content_type,
            data: if oversized { Bytes::new() } else { data.freeze() },
            size,
            oversized,
        };

        if name == SINGLE_FIELD {
            single = Some(file);
        } else {
            multiple.push(file);
        }
    }

    Ok(match single {
        Some(file) => vec![file],
        None => multiple,
    })
}
