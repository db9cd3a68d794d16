//! Structured resume record produced by LLM extraction.
//!
//! The LLM output is untrusted: any field may be missing, null, or of the
//! wrong JSON type. `ResumeDocument::from_value` normalizes field by field
//! and never fails; absent data becomes an empty string or list.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub duration: String,
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    pub university: String,
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeDocument {
    pub contact_info: ContactInfo,
    pub summary: String,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<String>,
    pub achievements: Vec<String>,
}

impl ResumeDocument {
    /// Builds a document from a loosely-shaped JSON value.
    pub fn from_value(value: &Value) -> Self {
        let Some(root) = value.as_object() else {
            return Self::default();
        };

        let contact = root.get("contact_info").and_then(Value::as_object);

        ResumeDocument {
            contact_info: ContactInfo {
                name: nested_string(contact, "name"),
                email: nested_string(contact, "email"),
                phone: nested_string(contact, "phone"),
                linkedin: nested_string(contact, "linkedin"),
            },
            summary: string_field(root, "summary"),
            experience: objects(root, "experience")
                .map(experience_from_object)
                .collect(),
            education: objects(root, "education")
                .map(|edu| EducationEntry {
                    degree: string_field(edu, "degree"),
                    university: string_field(edu, "university"),
                    year: string_field(edu, "year"),
                })
                .collect(),
            skills: string_list(root.get("skills")),
            achievements: string_list(root.get("achievements")),
        }
    }

    /// All responsibility bullets across every experience entry, in order.
    pub fn flattened_responsibilities(&self) -> Vec<String> {
        self.experience
            .iter()
            .flat_map(|exp| exp.responsibilities.iter().cloned())
            .collect()
    }
}

fn experience_from_object(exp: &Map<String, Value>) -> ExperienceEntry {
    // Some extractions return a single `description` string instead of a list.
    let responsibilities = match exp.get("responsibilities") {
        Some(Value::Array(_)) => string_list(exp.get("responsibilities")),
        _ => string_list(exp.get("description")),
    };

    ExperienceEntry {
        title: string_field(exp, "title"),
        company: string_field(exp, "company"),
        duration: string_field(exp, "duration"),
        responsibilities,
    }
}

fn objects<'a>(
    root: &'a Map<String, Value>,
    key: &str,
) -> impl Iterator<Item = &'a Map<String, Value>> {
    root.get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

fn nested_string(obj: Option<&Map<String, Value>>, key: &str) -> String {
    obj.map(|o| string_field(o, key)).unwrap_or_default()
}

fn string_field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key).and_then(scalar_text).unwrap_or_default()
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

/// Strings pass through; numbers and booleans use their JSON text.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_document_is_read_verbatim() {
        let value = json!({
            "summary": "Backend engineer",
            "experience": [{
                "title": "Engineer",
                "company": "Acme",
                "duration": "2019-2023",
                "responsibilities": ["Built APIs", "Led migrations"]
            }],
            "education": [{"degree": "BSc", "university": "MIT", "year": "2018"}],
            "skills": ["Rust", "SQL"],
            "achievements": ["Hackathon winner"],
            "contact_info": {"name": "Ada", "email": "ada@example.com", "phone": "555", "linkedin": "in/ada"}
        });

        let doc = ResumeDocument::from_value(&value);
        assert_eq!(doc.contact_info.name, "Ada");
        assert_eq!(doc.summary, "Backend engineer");
        assert_eq!(doc.experience[0].responsibilities.len(), 2);
        assert_eq!(doc.education[0].university, "MIT");
        assert_eq!(doc.skills, vec!["Rust", "SQL"]);
        assert_eq!(doc.achievements, vec!["Hackathon winner"]);
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let doc = ResumeDocument::from_value(&json!({"summary": "Only a summary"}));
        assert_eq!(doc.summary, "Only a summary");
        assert_eq!(doc.contact_info, ContactInfo::default());
        assert!(doc.experience.is_empty());
        assert!(doc.skills.is_empty());
    }

    #[test]
    fn test_wrong_types_are_normalized() {
        let value = json!({
            "summary": null,
            "skills": ["Go", 42, null, {"nested": true}],
            "achievements": "Single achievement",
            "education": [{"degree": "MSc", "university": "ETH", "year": 2020}, "not an object"],
            "contact_info": "not an object"
        });

        let doc = ResumeDocument::from_value(&value);
        assert_eq!(doc.summary, "");
        assert_eq!(doc.skills, vec!["Go", "42"]);
        assert_eq!(doc.achievements, vec!["Single achievement"]);
        assert_eq!(doc.education.len(), 1);
        assert_eq!(doc.education[0].year, "2020");
        assert_eq!(doc.contact_info.name, "");
    }

    #[test]
    fn test_description_stands_in_for_missing_responsibilities() {
        let value = json!({
            "experience": [
                {"title": "Analyst", "description": "Ran weekly reports"},
                {"title": "Lead", "responsibilities": ["Hired team"], "description": "ignored"}
            ]
        });

        let doc = ResumeDocument::from_value(&value);
        assert_eq!(doc.experience[0].responsibilities, vec!["Ran weekly reports"]);
        assert_eq!(doc.experience[1].responsibilities, vec!["Hired team"]);
        assert_eq!(
            doc.flattened_responsibilities(),
            vec!["Ran weekly reports", "Hired team"]
        );
    }

    #[test]
    fn test_non_object_root_yields_empty_document() {
        assert_eq!(
            ResumeDocument::from_value(&json!(["a", "b"])),
            ResumeDocument::default()
        );
    }
}
