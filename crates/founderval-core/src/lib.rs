pub mod analysis;
pub mod idea;
pub mod project;
pub mod user;

pub use analysis::{
    AnalysisResult, ContractViolation, FinancialYear, LegalStep, Risk, Severity, StartupScores,
    Verdict, validate_analysis,
};
pub use idea::{IdeaSubmission, SubmissionError};
pub use project::{Project, ProjectStatus};
pub use user::User;
