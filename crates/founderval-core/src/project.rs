//! Projects: one submission paired with its eventual analysis.
//!
//! Lifecycle: `processing -> completed` on a successful analysis,
//! `processing -> failed` otherwise. Both terminal states absorb.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AnalysisResult, IdeaSubmission};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Processing,
    Completed,
    Failed,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Processing)
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
    pub submission: IdeaSubmission,
    pub analysis: Option<AnalysisResult>,
    pub status: ProjectStatus,
}

impl Project {
    /// A fresh project in the `processing` state.
    pub fn new(submission: IdeaSubmission) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: chrono::Utc::now().timestamp_millis(),
            submission,
            analysis: None,
            status: ProjectStatus::Processing,
        }
    }

    /// Attach the analysis and move to `completed`.
    ///
    /// Returns `false` without touching the project if it is already terminal.
    pub fn complete(&mut self, analysis: AnalysisResult) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.analysis = Some(analysis);
        self.status = ProjectStatus::Completed;
        true
    }

    /// Move to `failed`, leaving the analysis absent.
    ///
    /// Returns `false` without touching the project if it is already terminal.
    pub fn fail(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = ProjectStatus::Failed;
        true
    }

    pub fn created_at_utc(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp_millis(self.created_at)
    }

    /// Dashboard score: mean of the five scores, only once completed.
    pub fn average_score(&self) -> Option<f64> {
        self.analysis.as_ref().map(|a| a.scores.average())
    }
}
