//! Idea analysis gateway: a fixed analyst prompt and response schema sent to
//! a hosted generative model, with the JSON reply parsed into an
//! [`AnalysisResult`](founderval_core::AnalysisResult).

mod error;
pub mod gemini;
pub mod prompt;
pub mod schema;

pub use error::AnalysisError;
pub use gemini::{GeminiClient, GeminiConfig, parse_analysis};

use async_trait::async_trait;
use founderval_core::{AnalysisResult, IdeaSubmission};

/// Anything that can turn a submission into an analysis.
///
/// [`GeminiClient`] is the production implementation. Implementations hold
/// no state between calls.
#[async_trait]
pub trait IdeaAnalyzer: Send + Sync {
    async fn analyze(&self, submission: &IdeaSubmission) -> Result<AnalysisResult, AnalysisError>;
}
