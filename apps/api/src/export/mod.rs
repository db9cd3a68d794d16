//! Document Exporter: renders a tailored resume as DOCX or PDF.
//!
//! Both renderers consume the same [`plan::ResumeLayout`], so section
//! selection and ordering live in one place.

pub mod docx;
pub mod font_metrics;
pub mod handlers;
pub mod pdf;
pub mod plan;

use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::errors::AppError;
use crate::models::ResumeDocument;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("DOCX rendering failed: {0}")]
    Docx(String),

    #[error("PDF rendering failed: {0}")]
    Pdf(String),
}

impl From<ExportError> for AppError {
    fn from(e: ExportError) -> Self {
        AppError::ExportFailed(e.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Docx,
    Pdf,
}

impl ExportFormat {
    pub fn mime(self) -> &'static str {
        match self {
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ExportFormat::Pdf => "application/pdf",
        }
    }

    pub fn filename(self) -> &'static str {
        match self {
            ExportFormat::Docx => "tailored_resume.docx",
            ExportFormat::Pdf => "tailored_resume.pdf",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "docx" => Ok(ExportFormat::Docx),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(AppError::UnsupportedExportFormat(other.to_string())),
        }
    }
}

fn default_format() -> String {
    "docx".to_string()
}

/// Export request body as the client sends it. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExportPayload {
    #[serde(default = "default_format")]
    pub format: String,
    pub original_extracted_data: Value,
    pub improved_summary: Option<String>,
    pub improved_bullets: Option<Vec<String>>,
    pub suggested_skills: Option<Vec<String>>,
    /// Echoed back by clients; not rendered.
    #[allow(dead_code)]
    pub match_analysis: Option<String>,
}

/// A validated export request.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub format: ExportFormat,
    pub resume: ResumeDocument,
    pub improved_summary: String,
    pub improved_bullets: Vec<String>,
    pub suggested_skills: Vec<String>,
}

impl TryFrom<ExportPayload> for ExportRequest {
    type Error = AppError;

    fn try_from(payload: ExportPayload) -> Result<Self, Self::Error> {
        Ok(ExportRequest {
            format: payload.format.parse()?,
            resume: ResumeDocument::from_value(&payload.original_extracted_data),
            improved_summary: payload.improved_summary.unwrap_or_default(),
            improved_bullets: payload.improved_bullets.unwrap_or_default(),
            suggested_skills: payload.suggested_skills.unwrap_or_default(),
        })
    }
}

/// A rendered document ready to be sent as a download.
#[derive(Debug)]
pub struct ExportedFile {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
    pub filename: &'static str,
}

/// Renders `request` in its requested format.
pub fn export(request: &ExportRequest) -> Result<ExportedFile, ExportError> {
    let layout = plan::build_layout(request);
    debug!(
        "Rendering {:?} with sections {:?}",
        request.format,
        layout.section_titles()
    );
    let bytes = match request.format {
        ExportFormat::Docx => docx::render(&layout)?,
        ExportFormat::Pdf => pdf::render(&layout)?,
    };

    Ok(ExportedFile {
        bytes,
        mime: request.format.mime(),
        filename: request.format.filename(),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use serde_json::json;

    use super::*;

    pub(crate) fn sample_payload(format: &str) -> Value {
        json!({
            "format": format,
            "original_extracted_data": {
                "contact_info": {
                    "name": "Ada Lovelace",
                    "email": "ada@example.com",
                    "phone": "",
                    "linkedin": "linkedin.com/in/ada"
                },
                "summary": "Analyst.",
                "experience": [],
                "education": [
                    {"degree": "BSc Mathematics", "university": "University of London", "year": 1835}
                ],
                "skills": ["Rust", "Go"],
                "achievements": ["Published the first algorithm"]
            },
            "improved_summary": "Engineer who ships reliable analytical systems.",
            "improved_bullets": ["* Led team of 5", "*   Cut latency by 40%", "* "],
            "suggested_skills": ["Kubernetes", "Leadership"],
            "match_analysis": "Strong match."
        })
    }

    pub(crate) fn sample_request(format: &str) -> ExportRequest {
        let payload: ExportPayload = serde_json::from_value(sample_payload(format)).unwrap();
        ExportRequest::try_from(payload).unwrap()
    }

    #[test]
    fn test_format_is_case_insensitive() {
        assert_eq!("PDF".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert_eq!(" Docx ".parse::<ExportFormat>().unwrap(), ExportFormat::Docx);
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let err = "rtf".parse::<ExportFormat>().unwrap_err();
        assert_eq!(err.code(), "UNSUPPORTED_EXPORT_FORMAT");
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_missing_fields_default() {
        let payload: ExportPayload = serde_json::from_value(json!({})).unwrap();
        let request = ExportRequest::try_from(payload).unwrap();
        assert_eq!(request.format, ExportFormat::Docx);
        assert_eq!(request.resume, ResumeDocument::default());
        assert!(request.improved_summary.is_empty());
        assert!(request.improved_bullets.is_empty());
    }

    #[test]
    fn test_payload_normalizes_resume() {
        let request = sample_request("pdf");
        assert_eq!(request.resume.education[0].year, "1835");
        assert_eq!(request.resume.contact_info.name, "Ada Lovelace");
    }

    #[test]
    fn test_export_reports_mime_and_filename() {
        let docx = export(&sample_request("docx")).unwrap();
        assert_eq!(docx.filename, "tailored_resume.docx");
        assert!(docx.mime.ends_with("wordprocessingml.document"));
        assert!(docx.bytes.starts_with(b"PK"));

        let pdf = export(&sample_request("pdf")).unwrap();
        assert_eq!(pdf.filename, "tailored_resume.pdf");
        assert_eq!(pdf.mime, "application/pdf");
        assert!(pdf.bytes.starts_with(b"%PDF"));
    }
}
