//! Axum route handler for the Improve API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::ResumeDocument;
use crate::state::AppState;
use crate::tailoring::orchestrator::{tailor, TailoringResult};

#[derive(Debug, Deserialize)]
pub struct ImproveRequest {
    #[serde(default)]
    pub resume_text: Option<String>,
    #[serde(default)]
    pub jd_text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ImproveResponse {
    pub message: &'static str,
    pub extracted_resume_data: ResumeDocument,
    pub improved_summary: String,
    pub improved_bullets: Vec<String>,
    pub suggested_skills: Vec<String>,
    pub match_analysis: String,
}

impl From<TailoringResult> for ImproveResponse {
    fn from(result: TailoringResult) -> Self {
        Self {
            message: "Resume improvement generated successfully!",
            extracted_resume_data: result.extracted_resume_data,
            improved_summary: result.improved_summary,
            improved_bullets: result.improved_bullets,
            suggested_skills: result.suggested_skills,
            match_analysis: result.match_analysis,
        }
    }
}

/// POST /api/improve
///
/// Runs the tailoring pipeline over raw resume text and a job description.
/// Input is validated and the LLM credential checked before any LLM call.
pub async fn handle_improve(
    State(state): State<AppState>,
    request: Result<Json<ImproveRequest>, JsonRejection>,
) -> Result<Json<ImproveResponse>, AppError> {
    let Json(request) = request?;
    let resume_text = non_blank(request.resume_text);
    let jd_text = non_blank(request.jd_text);
    let (Some(resume_text), Some(jd_text)) = (resume_text, jd_text) else {
        return Err(AppError::BadRequest(
            "Resume and Job Description text are required".to_string(),
        ));
    };

    state.config.require_api_key()?;

    let result = tailor(state.llm.as_ref(), &resume_text, &jd_text).await?;
    Ok(Json(result.into()))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
