use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ClientError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    pub description: String,
    pub requirements: String,
    #[serde(default)]
    pub added_at: Option<DateTime<Utc>>,
}

/// Form state for the "add job" screen.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewJob {
    pub title: String,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub description: String,
    pub requirements: String,
}

impl NewJob {
    /// Rejects the form when a required field is blank. Optional fields that are blank
    /// are dropped rather than sent as empty strings.
    pub fn validated(self) -> Result<Self, ClientError> {
        let required = [
            ("Title", &self.title),
            ("Company", &self.company),
            ("Description", &self.description),
            ("Requirements", &self.requirements),
        ];
        for (label, value) in required {
            if value.trim().is_empty() {
                return Err(ClientError::validation(format!("{label} is required")));
            }
        }

        Ok(NewJob {
            location: self.location.filter(|s| !s.trim().is_empty()),
            url: self.url.filter(|s| !s.trim().is_empty()),
            ..self
        })
    }
}
