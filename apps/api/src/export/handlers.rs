//! Axum route handler for the Export API.

use axum::{
    extract::rejection::JsonRejection,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::export::{export, ExportPayload, ExportRequest};

/// POST /api/export
///
/// Renders the approved resume as DOCX or PDF and returns it as a download.
/// The format is validated before any rendering starts.
pub async fn handle_export(
    payload: Result<Json<ExportPayload>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(payload) = payload?;
    let request = ExportRequest::try_from(payload)?;
    let format = request.format;

    // Rendering is CPU-bound.
    let file = tokio::task::spawn_blocking(move || export(&request))
        .await
        .map_err(|e| AppError::ExportFailed(format!("renderer crashed: {e}")))??;
    info!("Exported {:?} resume ({} bytes)", format, file.bytes.len());

    let headers = [
        (header::CONTENT_TYPE, file.mime.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file.filename),
        ),
    ];
    Ok((headers, file.bytes).into_response())
}
