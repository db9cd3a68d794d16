//! Axum route handlers for the Upload API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::extraction::UploadKind;
use crate::state::AppState;

/// File name reported for job descriptions pasted as text.
const PASTED_TEXT_NAME: &str = "pasted_text";

#[derive(Debug, Serialize)]
pub struct ResumeUploadResponse {
    pub message: &'static str,
    pub filename: String,
    pub extracted_text: String,
}

#[derive(Debug, Serialize)]
pub struct JdUploadResponse {
    pub message: &'static str,
    pub content: String,
    pub filename: String,
}

/// The fields of an upload form this API cares about.
#[derive(Debug, Default)]
struct UploadForm {
    file: Option<(String, Bytes)>,
    text: Option<String>,
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read file data: {e}")))?;
                debug!("Received file field: filename='{filename}', {} bytes", data.len());
                form.file = Some((filename, data));
            }
            Some("text") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read text field: {e}")))?;
                form.text = Some(text);
            }
            _ => {}
        }
    }

    Ok(form)
}

/// POST /api/upload/resume
///
/// Accepts a PDF or DOCX resume in the multipart field `file` and returns its raw text.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ResumeUploadResponse>, AppError> {
    let form = read_form(multipart).await?;
    let (filename, data) = form
        .file
        .ok_or_else(|| AppError::BadRequest("No file part".to_string()))?;
    if filename.is_empty() {
        return Err(AppError::BadRequest("No selected file".to_string()));
    }

    let extracted_text = state
        .extractor
        .extract(UploadKind::Resume, &filename, data)
        .await?;
    info!("Extracted {} characters from resume {filename}", extracted_text.len());

    Ok(Json(ResumeUploadResponse {
        message: "Resume uploaded and text extracted successfully!",
        filename,
        extracted_text,
    }))
}

/// POST /api/upload/jd
///
/// Accepts a PDF/TXT job description in `file`, or pasted text in `text`.
/// A file wins when both are sent.
pub async fn handle_upload_jd(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<JdUploadResponse>, AppError> {
    let form = read_form(multipart).await?;

    let (content, filename) = match (form.file, form.text) {
        (Some((filename, data)), _) => {
            if filename.is_empty() {
                return Err(AppError::BadRequest("No selected file".to_string()));
            }
            let content = state
                .extractor
                .extract(UploadKind::JobDescription, &filename, data)
                .await?;
            (content, filename)
        }
        (None, Some(text)) => (text, PASTED_TEXT_NAME.to_string()),
        (None, None) => {
            return Err(AppError::BadRequest("No file or text provided".to_string()));
        }
    };

    if content.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Job description contains no text".to_string(),
        ));
    }
    info!("Accepted job description {filename} ({} characters)", content.len());

    Ok(Json(JdUploadResponse {
        message: "Job Description uploaded/pasted and processed successfully!",
        content,
        filename,
    }))
}
