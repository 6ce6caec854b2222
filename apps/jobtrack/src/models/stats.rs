use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::application::ApplicationStatus;

/// Aggregate counts shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub total_jobs: u64,
    pub total_applications: u64,
    /// Keyed by raw status string as grouped by the backend.
    #[serde(default)]
    pub by_status: BTreeMap<String, u64>,
}

impl Stats {
    pub fn count(&self, status: ApplicationStatus) -> u64 {
        self.by_status.get(status.as_str()).copied().unwrap_or(0)
    }
}
