// All LLM prompt templates for the tailoring pipeline.
// Placeholders are `{name}` tokens filled by `fill` in a single pass, so user
// text that happens to contain a placeholder is never substituted again.

/// Structured extraction. Replace `{resume_text}`.
pub const RESUME_EXTRACTION_PROMPT: &str = r#"Extract the following information from the resume text below and format it as a JSON object.
If a section is not found, use an empty string or empty list as appropriate.

Resume Text:
{resume_text}

JSON Structure:
{
    "summary": "...",
    "experience": [
        {"title": "...", "company": "...", "duration": "...", "responsibilities": ["...", "..."]}
    ],
    "education": [
        {"degree": "...", "university": "...", "year": "..."}
    ],
    "skills": ["skill1", "skill2", "..."],
    "achievements": ["...", "..."],
    "contact_info": {"name": "...", "email": "...", "phone": "...", "linkedin": "..."}
}

Ensure the output is a valid JSON string."#;

/// Summary rewrite. Replace `{summary}`, `{jd_text}`.
pub const SUMMARY_PROMPT: &str = r#"You are an expert resume writer. Rewrite the following resume summary to be highly tailored for the provided job description.
Focus on aligning the summary with the key requirements, skills, and overall tone of the job description.

Current Resume Summary:
{summary}

Job Description:
{jd_text}

Rewrite the summary concisely and powerfully, focusing on relevant experience and skills mentioned in the JD."#;

/// Bullet rewrite. Replace `{bullets}`, `{jd_text}`.
pub const BULLETS_PROMPT: &str = r#"You are an expert resume writer. Given the following resume experience bullet points and job description,
rewrite *each* bullet point to better highlight achievements and skills relevant to the job description.
Use strong action verbs and quantifiable results where possible.
Return each rewritten bullet point on a new line, starting with an asterisk (*).

Current Resume Bullet Points:
{bullets}

Job Description:
{jd_text}"#;

/// Skill-gap suggestion. Replace `{skills}`, `{jd_text}`.
pub const SKILLS_PROMPT: &str = r#"You are an expert career coach. Based on the provided job description and the skills currently present in the resume,
identify any crucial technical or soft skills that are prominent in the job description but seem
missing or under-represented in the resume. Suggest 3-5 such skills that the applicant should consider adding
or highlighting.

Current Resume Skills:
{skills}

Job Description:
{jd_text}

List the suggested skills, separated by commas."#;

/// Match analysis. Replace `{summary}`, `{bullets}`, `{skills}`, `{jd_text}`.
pub const MATCH_ANALYSIS_PROMPT: &str = r#"Analyze the alignment between the provided resume and job description.
Identify 2-3 key areas where the resume strongly matches the JD, and 2-3 areas where there might be a "keyword gap" or where the resume could be strengthened to better align.

Resume Content (Summary, Experience, Skills):
Summary: {summary}
Experience:
{bullets}
Skills: {skills}

Job Description:
{jd_text}

Provide your analysis in two distinct sections: "Strong Matches:" and "Areas for Improvement:".
Do not list the changes you would make or explain why."#;

/// Substitutes `{key}` placeholders in `template`. Unknown braces are kept.
pub fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        let hit = vars
            .iter()
            .find(|(key, _)| tail.starts_with(key) && tail[key.len()..].starts_with('}'));
        match hit {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Renders bullets as `- ` prefixed lines for embedding in a prompt.
pub fn bullet_block(bullets: &[String]) -> String {
    bullets
        .iter()
        .map(|b| format!("- {b}"))
        .collect::<Vec<_>>()
        .join("\n")
}
