//! Idea submissions as entered on the new-idea form.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Budget used when the submitter leaves the field empty (first form option).
pub const DEFAULT_BUDGET: &str = "Bootstrapped (< $1k)";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("required field is empty: {0}")]
    MissingField(&'static str),
}

/// A prospective business idea plus the context the analyst needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeaSubmission {
    pub title: String,
    pub description: String,
    pub industry: String,
    pub target_market: String,
    pub budget: String,
    pub location: String,
}

impl IdeaSubmission {
    /// Check that every required field carries non-whitespace text.
    ///
    /// An empty budget is not an error: it is replaced with [`DEFAULT_BUDGET`]
    /// by [`normalized`](Self::normalized).
    pub fn validate(&self) -> Result<(), SubmissionError> {
        let required = [
            ("title", &self.title),
            ("industry", &self.industry),
            ("description", &self.description),
            ("targetMarket", &self.target_market),
            ("location", &self.location),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(SubmissionError::MissingField(name));
            }
        }
        Ok(())
    }

    /// Trim every field and fill in the default budget.
    pub fn normalized(&self) -> Self {
        let budget = self.budget.trim();
        Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            industry: self.industry.trim().to_string(),
            target_market: self.target_market.trim().to_string(),
            budget: if budget.is_empty() {
                DEFAULT_BUDGET.to_string()
            } else {
                budget.to_string()
            },
            location: self.location.trim().to_string(),
        }
    }
}
