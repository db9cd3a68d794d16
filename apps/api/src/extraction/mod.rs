//! Text Extractor: turns uploaded PDF/DOCX/TXT files into plain text.
//!
//! Each upload is written into its own scratch directory under the configured
//! scratch root, extracted from disk, and the directory is removed when the
//! extraction scope ends, whether it succeeded, failed, or panicked.
//! Decoding is CPU-bound and runs inside `tokio::task::spawn_blocking`.

pub mod handlers;

use std::path::{Path, PathBuf};

use bytes::Bytes;
use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use thiserror::Error;
use tracing::debug;

use crate::errors::AppError;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("{0}")]
    UnsupportedFormat(String),

    #[error("{0}")]
    Failed(String),
}

impl From<ExtractError> for AppError {
    fn from(e: ExtractError) -> Self {
        match e {
            ExtractError::UnsupportedFormat(msg) => AppError::UnsupportedFormat(msg),
            ExtractError::Failed(reason) => AppError::ExtractionFailed(reason),
        }
    }
}

impl From<std::io::Error> for ExtractError {
    fn from(e: std::io::Error) -> Self {
        ExtractError::Failed(format!("I/O error: {e}"))
    }
}

/// File formats the extractor can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Txt,
}

impl DocumentKind {
    fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            "txt" => Some(DocumentKind::Txt),
            _ => None,
        }
    }

    fn extension(self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Docx => "docx",
            DocumentKind::Txt => "txt",
        }
    }
}

/// What the upload is for; each purpose has its own allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Resume,
    JobDescription,
}

impl UploadKind {
    pub fn allowed(self) -> &'static [DocumentKind] {
        match self {
            UploadKind::Resume => &[DocumentKind::Pdf, DocumentKind::Docx],
            UploadKind::JobDescription => &[DocumentKind::Pdf, DocumentKind::Txt],
        }
    }

    fn unsupported_message(self) -> &'static str {
        match self {
            UploadKind::Resume => "Unsupported file type. Please upload PDF or DOCX.",
            UploadKind::JobDescription => "Unsupported file type for JD. Please upload PDF or TXT.",
        }
    }

    /// Maps a declared file name to an allowed document kind.
    pub fn resolve(self, filename: &str) -> Result<DocumentKind, ExtractError> {
        DocumentKind::from_extension(&file_extension(filename))
            .filter(|kind| self.allowed().contains(kind))
            .ok_or_else(|| ExtractError::UnsupportedFormat(self.unsupported_message().to_string()))
    }
}

/// Lower-cased text after the last `.`; the whole name when there is none.
pub fn file_extension(filename: &str) -> String {
    filename.rsplit('.').next().unwrap_or("").to_lowercase()
}

/// Extracts text from uploads using scoped scratch storage.
#[derive(Debug, Clone)]
pub struct TextExtractor {
    scratch_root: PathBuf,
}

impl TextExtractor {
    pub fn new(scratch_root: PathBuf) -> Self {
        Self { scratch_root }
    }

    /// Extracts plain text from `data`, whose format is declared by `filename`.
    pub async fn extract(
        &self,
        upload: UploadKind,
        filename: &str,
        data: Bytes,
    ) -> Result<String, ExtractError> {
        let kind = upload.resolve(filename)?;
        debug!("Extracting {} bytes from {filename} as {kind:?}", data.len());

        let scratch_root = self.scratch_root.clone();
        // A panic inside a decoder surfaces here as a JoinError.
        tokio::task::spawn_blocking(move || extract_scoped(&scratch_root, kind, &data))
            .await
            .map_err(|e| ExtractError::Failed(format!("decoder crashed: {e}")))?
    }
}

fn extract_scoped(scratch_root: &Path, kind: DocumentKind, data: &[u8]) -> Result<String, ExtractError> {
    let scratch = tempfile::Builder::new()
        .prefix("upload-")
        .tempdir_in(scratch_root)?;

    let path = scratch.path().join(format!("upload.{}", kind.extension()));
    std::fs::write(&path, data)?;

    match kind {
        DocumentKind::Pdf => extract_pdf(&path),
        DocumentKind::Docx => extract_docx(&path),
        DocumentKind::Txt => extract_txt(&path),
    }
    // `scratch` drops here and removes the directory.
}

fn extract_pdf(path: &Path) -> Result<String, ExtractError> {
    pdf_extract::extract_text(path).map_err(|e| ExtractError::Failed(format!("PDF error: {e}")))
}

fn extract_docx(path: &Path) -> Result<String, ExtractError> {
    let data = std::fs::read(path)?;
    docx_text(&data)
}

fn extract_txt(path: &Path) -> Result<String, ExtractError> {
    let data = std::fs::read(path)?;
    let text = String::from_utf8(data)
        .map_err(|_| ExtractError::Failed("text file is not valid UTF-8".to_string()))?;
    Ok(text.trim_start_matches('\u{feff}').to_string())
}

/// Paragraph text of a DOCX document in order, one paragraph per line.
/// Tables, headers and footers are not traversed.
pub fn docx_text(data: &[u8]) -> Result<String, ExtractError> {
    let docx =
        docx_rs::read_docx(data).map_err(|e| ExtractError::Failed(format!("DOCX error: {e}")))?;

    let mut text = String::new();
    for child in &docx.document.children {
        let DocumentChild::Paragraph(paragraph) = child else {
            continue;
        };
        for child in &paragraph.children {
            if let ParagraphChild::Run(run) = child {
                for child in &run.children {
                    match child {
                        RunChild::Text(t) => text.push_str(&t.text),
                        RunChild::Tab(_) => text.push('\t'),
                        RunChild::Break(_) => text.push('\n'),
                        _ => {}
                    }
                }
            }
        }
        text.push('\n');
    }

    Ok(text)
}
