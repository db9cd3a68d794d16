//! Content plan shared by the DOCX and PDF renderers.
//!
//! Decides which sections appear and what they contain; the renderers only
//! decide how it looks. Sections come in a fixed order and a section with no
//! content is left out entirely.

use std::collections::HashSet;

use crate::export::ExportRequest;

/// Header name used when the extracted resume has none.
const FALLBACK_NAME: &str = "Applicant Name";

/// A run of text with a single weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Vec<Span>),
    Bullets(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// Title-case heading; the PDF renderer upper-cases it.
    pub title: &'static str,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResumeLayout {
    pub name: String,
    pub contact_line: Option<String>,
    pub sections: Vec<Section>,
}

impl ResumeLayout {
    pub fn section_titles(&self) -> Vec<&'static str> {
        self.sections.iter().map(|s| s.title).collect()
    }
}

/// Builds the content plan for an export request.
pub fn build_layout(request: &ExportRequest) -> ResumeLayout {
    let resume = &request.resume;
    let contact = &resume.contact_info;

    let name = match contact.name.trim() {
        "" => FALLBACK_NAME.to_string(),
        name => name.to_string(),
    };

    let contact_parts: Vec<&str> = [&contact.email, &contact.phone, &contact.linkedin]
        .into_iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    let contact_line = (!contact_parts.is_empty()).then(|| contact_parts.join(" | "));

    let mut sections = Vec::new();

    let summary = request.improved_summary.trim();
    if !summary.is_empty() {
        sections.push(Section {
            title: "Summary",
            blocks: vec![Block::Paragraph(vec![Span::plain(summary)])],
        });
    }

    let bullets: Vec<String> = request
        .improved_bullets
        .iter()
        .map(|b| strip_bullet_marker(b))
        .filter(|b| !b.is_empty())
        .map(String::from)
        .collect();
    if !bullets.is_empty() {
        sections.push(Section {
            title: "Experience",
            blocks: vec![Block::Bullets(bullets)],
        });
    }

    let education: Vec<Block> = resume
        .education
        .iter()
        .map(|edu| {
            let mut spans = vec![
                Span::bold(edu.degree.trim()),
                Span::plain(format!(", {}", edu.university.trim())),
            ];
            if !edu.year.trim().is_empty() {
                spans.push(Span::plain(format!(", {}", edu.year.trim())));
            }
            Block::Paragraph(spans)
        })
        .collect();
    if !education.is_empty() {
        sections.push(Section {
            title: "Education",
            blocks: education,
        });
    }

    let skills = merge_skills(&resume.skills, &request.suggested_skills);
    if !skills.is_empty() {
        sections.push(Section {
            title: "Skills",
            blocks: vec![Block::Paragraph(vec![Span::plain(skills.join(", "))])],
        });
    }

    let achievements: Vec<String> = resume
        .achievements
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .map(String::from)
        .collect();
    if !achievements.is_empty() {
        sections.push(Section {
            title: "Achievements",
            blocks: vec![Block::Bullets(achievements)],
        });
    }

    ResumeLayout {
        name,
        contact_line,
        sections,
    }
}

/// Drops leading `*` and space characters, then surrounding whitespace.
pub fn strip_bullet_marker(bullet: &str) -> &str {
    bullet.trim_start_matches(['*', ' ']).trim()
}

/// Union of original and suggested skills; the first occurrence keeps its place.
pub fn merge_skills(original: &[String], suggested: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    original
        .iter()
        .chain(suggested)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && seen.insert(s.to_string()))
        .map(String::from)
        .collect()
}
