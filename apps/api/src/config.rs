use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::errors::AppError;

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_STORAGE_URI: &str = "mongodb://localhost:27017/resume_improver_db";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables once at startup.
///
/// A missing `GEMINI_API_KEY` does not stop the server: only the improve
/// endpoint needs it, and it reports the gap as a configuration error.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    /// Reserved for persistence; no handler reads it yet.
    #[allow(dead_code)]
    pub storage_uri: String,
    pub port: u16,
    pub rust_log: String,
    /// Parent directory for the per-upload scratch directories.
    pub scratch_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_model: optional_env("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            storage_uri: optional_env("MONGO_URI")
                .unwrap_or_else(|| DEFAULT_STORAGE_URI.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            scratch_dir: optional_env("UPLOAD_SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir),
            max_upload_bytes: match optional_env("MAX_UPLOAD_BYTES") {
                Some(raw) => raw
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                None => DEFAULT_MAX_UPLOAD_BYTES,
            },
        })
    }

    /// Returns the LLM credential, or the configuration error the improve
    /// endpoint reports before any network call is attempted.
    pub fn require_api_key(&self) -> Result<&str, AppError> {
        self.gemini_api_key
            .as_deref()
            .ok_or_else(|| AppError::Configuration("Gemini API Key not configured.".to_string()))
    }
}

/// Reads an environment variable, treating unset and blank values alike.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
impl Config {
    /// Configuration for tests: no environment access, scratch in the OS temp dir.
    pub fn for_tests(api_key: Option<&str>) -> Self {
        Config {
            gemini_api_key: api_key.map(str::to_string),
            gemini_model: DEFAULT_MODEL.to_string(),
            storage_uri: DEFAULT_STORAGE_URI.to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            scratch_dir: std::env::temp_dir(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}
