//! Multipart file uploads

use crate::server::error::ApiError;
use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;

/// Name of the multipart field carrying the file
pub const FILE_FIELD: &str = "file";

/// Accepted PDF extensions
pub const PDF_EXTENSIONS: &[&str] = &[".pdf"];

/// Accepted image extensions
pub const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg"];

/// Slack added to the request body limit for multipart framing
pub const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// An uploaded file
#[derive(Debug)]
pub struct Upload {
    pub filename: String,
    pub bytes: Bytes,
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge("File too large".to_string())
    } else {
        ApiError::BadRequest(e.body_text())
    }
}

/// Lowercased extension of `filename` including the dot
fn extension(filename: &str) -> Option<String> {
    let dot = filename.rfind('.')?;
    Some(filename[dot..].to_lowercase())
}

/// Read the `file` field, checking its extension and size
pub async fn read_upload(
    multipart: &mut Multipart,
    allowed: &[&str],
    max_size: usize,
) -> Result<Upload, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ApiError::BadRequest("No filename provided".to_string()))?;

        match extension(&filename) {
            Some(ext) if allowed.contains(&ext.as_str()) => {}
            _ => {
                return Err(ApiError::BadRequest(format!(
                    "Invalid file type. Allowed: {}",
                    allowed.join(", ")
                )))
            }
        }

        let bytes = field.bytes().await.map_err(multipart_error)?;
        if bytes.len() > max_size {
            return Err(ApiError::PayloadTooLarge(format!(
                "File too large. Maximum size: {max_size} bytes"
            )));
        }
        tracing::debug!(filename = %filename, size = bytes.len(), "Upload received");
        return Ok(Upload { filename, bytes });
    }

    Err(ApiError::BadRequest("No file uploaded".to_string()))
}

/// Name for the returned attachment, reduced to header-safe characters
pub fn attachment_name(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("anonymized_{cleaned}")
}
