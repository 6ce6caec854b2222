use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ClientError;

/// Lifecycle of an application. Closed set: the backend only assigns these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Applied,
    Interview,
    Accepted,
    Rejected,
}

/// Display tone for a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Info,
    Warning,
    Success,
    Danger,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 5] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Applied,
        ApplicationStatus::Interview,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            ApplicationStatus::Pending => Tone::Neutral,
            ApplicationStatus::Applied => Tone::Info,
            ApplicationStatus::Interview => Tone::Warning,
            ApplicationStatus::Accepted => Tone::Success,
            ApplicationStatus::Rejected => Tone::Danger,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "…",
            ApplicationStatus::Applied => "➜",
            ApplicationStatus::Interview => "☎",
            ApplicationStatus::Accepted => "✔",
            ApplicationStatus::Rejected => "✘",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| {
                ClientError::validation(format!(
                    "Unknown status '{s}'. Expected one of: pending, applied, interview, accepted, rejected"
                ))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: String,
    #[serde(default)]
    pub job_id: Option<String>,
    pub job_title: String,
    pub company: String,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Generated server-side; opaque text.
    #[serde(default)]
    pub tailored_resume: Option<String>,
    #[serde(default)]
    pub cover_letter: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusUpdate {
    pub status: ApplicationStatus,
}

/// Body of `POST /api/applications/{job_id}`.
#[derive(Debug, Deserialize)]
pub struct ApplyResponse {
    #[serde(default)]
    #[allow(dead_code)]
    pub message: Option<String>,
    pub application: Application,
}

/// Most recent first, truncated to `limit`.
pub fn most_recent(applications: &[Application], limit: usize) -> Vec<Application> {
    let mut sorted = applications.to_vec();
    sorted.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
    sorted.truncate(limit);
    sorted
}
