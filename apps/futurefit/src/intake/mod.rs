//! Resume intake — reads the uploaded file out of a multipart request and
//! checks that it is a PDF. No network calls and no parsing happen here.

use axum::extract::multipart::{Multipart, MultipartError};
use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, warn};

/// Multipart field carrying the resume.
pub const RESUME_FIELD: &str = "resume";
pub const PDF_MIME: &str = "application/pdf";
const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Please upload a PDF file.")]
    NotPdf,

    #[error("The selected file is empty.")]
    Empty,

    #[error("Please select a resume to upload.")]
    Missing,

    #[error("Please upload a single file.")]
    MultipleFiles,

    #[error("The upload could not be read.")]
    Malformed,
}

/// An accepted upload, held fully in memory until the analysis finishes.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

/// Checks a single file selection.
///
/// The declared type must be `application/pdf`. Browsers that send no type or
/// `application/octet-stream` pass only when the name ends in `.pdf` and the
/// content starts with the PDF magic bytes.
pub fn validate_upload(
    file_name: Option<&str>,
    content_type: Option<&str>,
    bytes: Bytes,
) -> Result<ResumeUpload, IntakeError> {
    let essence = content_type.map(mime_essence);

    let accepted = match essence.as_deref() {
        Some(PDF_MIME) => true,
        None | Some("application/octet-stream") => {
            let named_pdf = file_name
                .map(|n| n.trim().to_ascii_lowercase().ends_with(".pdf"))
                .unwrap_or(false);
            named_pdf && bytes.starts_with(PDF_MAGIC)
        }
        Some(_) => false,
    };

    if !accepted {
        return Err(IntakeError::NotPdf);
    }
    if bytes.is_empty() {
        return Err(IntakeError::Empty);
    }

    Ok(ResumeUpload {
        file_name: file_name.unwrap_or("resume.pdf").to_string(),
        mime_type: PDF_MIME.to_string(),
        bytes,
    })
}

/// Lower-cased type/subtype with parameters removed.
fn mime_essence(raw: &str) -> String {
    raw.split(';').next().unwrap_or("").trim().to_ascii_lowercase()
}

fn malformed(e: MultipartError) -> IntakeError {
    warn!("Unreadable multipart upload: {e}");
    IntakeError::Malformed
}

/// Reads exactly one `resume` file from the request and validates it.
/// Other fields are ignored.
pub async fn read_resume(multipart: &mut Multipart) -> Result<ResumeUpload, IntakeError> {
    let mut selected: Option<(Option<String>, Option<String>, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(malformed)?
    {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(String::from);
        let content_type = field.content_type().map(String::from);
        let data = field
            .bytes()
            .await
            .map_err(malformed)?;

        // An empty file input still submits a nameless, empty part.
        if data.is_empty() && file_name.as_deref().unwrap_or("").is_empty() {
            continue;
        }
        if selected.is_some() {
            return Err(IntakeError::MultipleFiles);
        }
        selected = Some((file_name, content_type, data));
    }

    let (file_name, content_type, data) = selected.ok_or(IntakeError::Missing)?;
    debug!(
        "Received upload {:?} ({:?}, {} bytes)",
        file_name,
        content_type,
        data.len()
    );

    validate_upload(file_name.as_deref(), content_type.as_deref(), data).map_err(|e| {
        warn!(
            "Rejected upload {:?} declared as {:?}: {e:?}",
            file_name, content_type
        );
        e
    })
}
