use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    pub id: String,
    pub file_name: String,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default)]
    pub parsed_data: ParsedResume,
}

/// Structured fields extracted server-side. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedResume {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub summary: String,
    pub skills: Vec<String>,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub keywords: Vec<String>,
    /// Set by the backend when parsing failed; the other fields are then empty.
    #[serde(rename = "error", skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub duration: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub year: String,
}

/// Body of `POST /api/resume/upload`.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadReceipt {
    #[serde(default)]
    pub message: Option<String>,
    pub resume_id: String,
    #[serde(default)]
    pub parsed_data: ParsedResume,
}

/// Body of `PUT /api/resume/{id}`.
#[derive(Debug, Serialize)]
pub struct ResumeUpdate<'a> {
    pub parsed_data: &'a ParsedResume,
}

impl ParsedResume {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.email.is_empty()
            && self.summary.is_empty()
            && self.skills.is_empty()
            && self.experience.is_empty()
            && self.education.is_empty()
    }
}

/// Accepts `null` (no résumé uploaded yet) as well as an object.
pub fn resume_from_value(value: Value) -> Result<Option<Resume>, serde_json::Error> {
    if value.is_null() {
        return Ok(None);
    }
    serde_json::from_value(value).map(Some)
}
