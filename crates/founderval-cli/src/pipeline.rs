//! Submission pipeline: validate → create project → analyze → settle.

use std::time::Instant;

use founderval_ai::{AnalysisError, IdeaAnalyzer};
use founderval_core::{IdeaSubmission, Project, SubmissionError};
use founderval_store::{ProjectStore, StoreError};
use thiserror::Error;
use tracing::{error, info};

/// Shown to the user whenever the gateway fails, whatever the cause.
pub const ANALYSIS_FAILED_MESSAGE: &str = "Analysis failed. Please check your API key and try again.";

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("invalid submission: {0}")]
    Invalid(#[from] SubmissionError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The project exists and has been marked failed.
    #[error("analysis failed for project {project_id}: {source}")]
    Analysis {
        project_id: String,
        #[source]
        source: AnalysisError,
    },
}

/// Run one submission end to end.
///
/// The project is stored as `processing` before the model is called, then
/// settled exactly once: `completed` with the analysis, or `failed`.
pub async fn submit_idea(
    store: &ProjectStore,
    analyzer: &dyn IdeaAnalyzer,
    submission: IdeaSubmission,
) -> Result<Project, SubmitError> {
    submission.validate()?;
    let submission = submission.normalized();
    let start = Instant::now();

    let project = store.create_project(submission)?;

    match analyzer.analyze(&project.submission).await {
        Ok(analysis) => {
            store.complete_project(&project.id, analysis)?;
            info!(
                id = %project.id,
                elapsed_secs = start.elapsed().as_secs_f64(),
                "analysis complete"
            );
        }
        Err(source) => {
            error!(id = %project.id, error = %source, "analysis failed");
            store.fail_project(&project.id)?;
            return Err(SubmitError::Analysis {
                project_id: project.id,
                source,
            });
        }
    }

    store
        .get(&project.id)?
        .ok_or_else(|| StoreError::Other(format!("project {} vanished", project.id)).into())
}
