//! Resume tailoring: orchestrates the five-call LLM pipeline.
//!
//! Flow: structured extraction → summary rewrite → bullet rewrite →
//!       skill-gap suggestion → match analysis → `TailoringResult`.
//!
//! Calls run strictly in sequence. The first failure aborts the run and is
//! returned as-is; nothing is retried and no partial result escapes.

use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::{strip_json_fences, LanguageModel};
use crate::models::ResumeDocument;
use crate::tailoring::cleaner::clean;
use crate::tailoring::prompts::{
    bullet_block, fill, BULLETS_PROMPT, MATCH_ANALYSIS_PROMPT, RESUME_EXTRACTION_PROMPT,
    SKILLS_PROMPT, SUMMARY_PROMPT,
};

/// Marker the bullet prompt asks every rewritten bullet to start with.
const BULLET_MARKER: char = '*';

/// Output of one tailoring run. Lists may be empty; no field is optional.
#[derive(Debug, Clone, Serialize)]
pub struct TailoringResult {
    pub improved_summary: String,
    pub improved_bullets: Vec<String>,
    pub suggested_skills: Vec<String>,
    pub match_analysis: String,
    pub extracted_resume_data: ResumeDocument,
}

/// Runs the tailoring pipeline for one resume/JD pair.
pub async fn tailor(
    llm: &dyn LanguageModel,
    resume_text: &str,
    jd_text: &str,
) -> Result<TailoringResult, AppError> {
    let run_id = Uuid::new_v4();

    // Step 1: Structured extraction
    info!(%run_id, "Extracting structured resume data");
    let extracted = extract_resume(llm, resume_text).await?;
    let bullets = extracted.flattened_responsibilities();
    let skills = extracted.skills.join(", ");
    info!(
        %run_id,
        "Extracted {} experience entries, {} bullets, {} skills",
        extracted.experience.len(),
        bullets.len(),
        extracted.skills.len()
    );
    let bullets_text = bullet_block(&bullets);

    // Step 2: Summary rewrite
    info!(%run_id, "Rewriting summary");
    let summary_prompt = fill(
        SUMMARY_PROMPT,
        &[("summary", extracted.summary.as_str()), ("jd_text", jd_text)],
    );
    let improved_summary = clean(&llm.complete(&summary_prompt).await?);

    // Step 3: Bullet rewrite
    info!(%run_id, "Rewriting experience bullets");
    let bullets_prompt = fill(
        BULLETS_PROMPT,
        &[("bullets", bullets_text.as_str()), ("jd_text", jd_text)],
    );
    let improved_bullets = parse_bullets(&llm.complete(&bullets_prompt).await?);

    // Step 4: Skill-gap suggestion
    info!(%run_id, "Suggesting missing skills");
    let skills_prompt = fill(SKILLS_PROMPT, &[("skills", skills.as_str()), ("jd_text", jd_text)]);
    let suggested_skills = parse_skills(&llm.complete(&skills_prompt).await?);

    // Step 5: Match analysis
    info!(%run_id, "Analyzing resume/JD match");
    let analysis_prompt = fill(
        MATCH_ANALYSIS_PROMPT,
        &[
            ("summary", extracted.summary.as_str()),
            ("bullets", bullets_text.as_str()),
            ("skills", skills.as_str()),
            ("jd_text", jd_text),
        ],
    );
    let match_analysis = clean(&llm.complete(&analysis_prompt).await?);

    info!(
        %run_id,
        "Tailoring complete: {} bullets, {} suggested skills",
        improved_bullets.len(),
        suggested_skills.len()
    );

    Ok(TailoringResult {
        improved_summary,
        improved_bullets,
        suggested_skills,
        match_analysis,
        extracted_resume_data: extracted,
    })
}

/// Asks the LLM for the structured record and normalizes it.
async fn extract_resume(
    llm: &dyn LanguageModel,
    resume_text: &str,
) -> Result<ResumeDocument, AppError> {
    let prompt = fill(RESUME_EXTRACTION_PROMPT, &[("resume_text", resume_text)]);
    let raw = llm.complete(&prompt).await?;
    parse_structured_resume(&raw)
}

/// Parses the extraction response, tolerating a ```json fence.
pub fn parse_structured_resume(raw: &str) -> Result<ResumeDocument, AppError> {
    let value: Value = serde_json::from_str(strip_json_fences(raw)).map_err(|e| {
        error!("Failed to parse JSON from resume extraction: {e}. Raw response: {raw}");
        AppError::StructuredExtractionFailed(e.to_string())
    })?;

    if !value.is_object() {
        error!("Resume extraction returned non-object JSON. Raw response: {raw}");
        return Err(AppError::StructuredExtractionFailed(
            "expected a JSON object".to_string(),
        ));
    }

    Ok(ResumeDocument::from_value(&value))
}

/// Keeps lines that start with the bullet marker; when none do, every
/// non-blank line is taken as a bullet.
pub fn parse_bullets(response: &str) -> Vec<String> {
    let lines: Vec<&str> = response
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let marked: Vec<String> = lines
        .iter()
        .filter(|l| l.starts_with(BULLET_MARKER))
        .map(|l| l.to_string())
        .collect();

    if marked.is_empty() {
        lines.into_iter().map(String::from).collect()
    } else {
        marked
    }
}

/// Splits a comma-separated skill list, trimming and dropping empties.
pub fn parse_skills(response: &str) -> Vec<String> {
    response
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
