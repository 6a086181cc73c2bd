//! Upload gate: validates a candidate resume file before any parsing happens.

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use bytes::Bytes;
use thiserror::Error;
use tracing::warn;

use crate::errors::AppError;

/// 5 MB, inclusive.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

pub const PDF_MIME: &str = "application/pdf";
pub const DOC_MIME: &str = "application/msword";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Multipart field names accepted for the file itself.
const FILE_FIELDS: &[&str] = &["resume", "file"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Doc,
    Docx,
}

impl DocumentKind {
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or(mime).trim();
        match essence.to_ascii_lowercase().as_str() {
            PDF_MIME => Some(DocumentKind::Pdf),
            DOC_MIME => Some(DocumentKind::Doc),
            DOCX_MIME => Some(DocumentKind::Docx),
            _ => None,
        }
    }

    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, ext) = file_name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "doc" => Some(DocumentKind::Doc),
            "docx" => Some(DocumentKind::Docx),
            _ => None,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => PDF_MIME,
            DocumentKind::Doc => DOC_MIME,
            DocumentKind::Docx => DOCX_MIME,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Doc => "doc",
            DocumentKind::Docx => "docx",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadRejection {
    /// `size` is unknown when the request body hit its limit mid-stream.
    #[error("File size should be less than 5MB")]
    TooLarge { size: Option<usize> },

    #[error("Please upload a PDF or Word document")]
    UnsupportedType { content_type: Option<String> },

    #[error("Please select a file first")]
    Missing,
}

impl From<UploadRejection> for AppError {
    fn from(rejection: UploadRejection) -> Self {
        AppError::Validation(rejection.to_string())
    }
}

/// A file that passed the gate, held until evaluation completes.
#[derive(Debug, Clone)]
pub struct AcceptedUpload {
    pub file_name: String,
    pub kind: DocumentKind,
    pub bytes: Bytes,
}

/// Size first, then type. A missing or generic content type falls back to
/// the file extension.
pub fn validate_upload(
    file_name: Option<&str>,
    content_type: Option<&str>,
    bytes: Bytes,
) -> Result<AcceptedUpload, UploadRejection> {
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(UploadRejection::TooLarge {
            size: Some(bytes.len()),
        });
    }

    let declared = content_type.filter(|ct| !ct.is_empty() && *ct != "application/octet-stream");
    let kind = match declared {
        Some(ct) => DocumentKind::from_mime(ct),
        None => file_name.and_then(DocumentKind::from_file_name),
    }
    .ok_or_else(|| UploadRejection::UnsupportedType {
        content_type: content_type.map(str::to_string),
    })?;

    Ok(AcceptedUpload {
        file_name: file_name
            .map(str::to_string)
            .unwrap_or_else(|| format!("resume.{}", kind.extension())),
        kind,
        bytes,
    })
}

/// Parsed multipart form: the gated file plus an optional display title.
#[derive(Debug)]
pub struct UploadForm {
    pub upload: AcceptedUpload,
    pub title: Option<String>,
}

/// A body cut off by the request size limit is an oversize file, not a
/// malformed form.
fn multipart_error(e: MultipartError, what: &str) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        warn!("Upload rejected: request body exceeded the size limit");
        UploadRejection::TooLarge { size: None }.into()
    } else {
        AppError::Validation(format!("{what}: {e}"))
    }
}

pub async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut upload = None;
    let mut title = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, "Invalid multipart body"))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if FILE_FIELDS.contains(&name.as_str()) {
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| multipart_error(e, "Invalid file"))?;
            let accepted = validate_upload(file_name.as_deref(), content_type.as_deref(), bytes)
                .inspect_err(|rejection| {
                    warn!(?file_name, ?content_type, "Upload rejected: {rejection}");
                })?;
            upload = Some(accepted);
        } else if name == "title" {
            let text = field
                .text()
                .await
                .map_err(|e| multipart_error(e, "Invalid title"))?;
            let text = text.trim();
            if !text.is_empty() {
                title = Some(text.to_string());
            }
        }
    }

    let upload = upload.ok_or(UploadRejection::Missing)?;
    Ok(UploadForm { upload, title })
}
