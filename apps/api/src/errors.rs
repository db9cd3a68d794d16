use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    UnsupportedFormat(String),

    #[error("Unsupported export format: {0}")]
    UnsupportedExportFormat(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("LLM call failed: {0}")]
    LlmCallFailed(String),

    #[error("Structured extraction failed: {0}")]
    StructuredExtractionFailed(String),

    #[error("Export failed: {0}")]
    ExportFailed(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_)
            | AppError::UnsupportedFormat(_)
            | AppError::UnsupportedExportFormat(_) => StatusCode::BAD_REQUEST,
            AppError::Configuration(_)
            | AppError::ExtractionFailed(_)
            | AppError::LlmCallFailed(_)
            | AppError::StructuredExtractionFailed(_)
            | AppError::ExportFailed(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            AppError::UnsupportedExportFormat(_) => "UNSUPPORTED_EXPORT_FORMAT",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::ExtractionFailed(_) => "EXTRACTION_FAILED",
            AppError::LlmCallFailed(_) => "LLM_CALL_FAILED",
            AppError::StructuredExtractionFailed(_) => "STRUCTURED_EXTRACTION_FAILED",
            AppError::ExportFailed(_) => "EXPORT_FAILED",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::BadRequest(msg) | AppError::UnsupportedFormat(msg) => msg.clone(),
            AppError::UnsupportedExportFormat(_) => "Unsupported export format.".to_string(),
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {msg}");
                msg.clone()
            }
            AppError::ExtractionFailed(reason) => {
                tracing::error!("Error extracting text: {reason}");
                format!("Error processing file: {reason}")
            }
            AppError::LlmCallFailed(cause) => {
                tracing::error!("LLM call failed: {cause}");
                format!("AI processing failed: {cause}")
            }
            AppError::StructuredExtractionFailed(reason) => {
                tracing::error!("Structured extraction failed: {reason}");
                "AI failed to extract structured resume data correctly. \
                 Please try a different resume or provide clearer text."
                    .to_string()
            }
            AppError::ExportFailed(reason) => {
                tracing::error!("Export failed: {reason}");
                format!("Error generating document: {reason}")
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
        };

        let body = Json(json!({
            "error": message,
            "code": self.code(),
        }));

        (status, body).into_response()
    }
}
