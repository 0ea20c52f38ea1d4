//! Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use founderval_ai::GeminiConfig;
use founderval_core::IdeaSubmission;
use founderval_core::idea::DEFAULT_BUDGET;

/// Validate startup ideas with an AI analyst and read the investor report.
#[derive(Debug, Parser)]
#[command(name = "founderval", version)]
pub struct Cli {
    /// Directory holding projects, accounts and the current session.
    #[arg(long, global = true, env = "FOUNDERVAL_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log progress to stderr (`RUST_LOG` overrides).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Accounts and sessions.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// Submit an idea for analysis.
    Analyze(AnalyzeArgs),
    /// List projects, most recent first.
    List,
    /// Show a project's report (latest completed when no id is given).
    Report {
        id: Option<String>,
    },
    /// Write a project's report to a file, or stdout.
    Export {
        id: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Subcommand)]
pub enum AuthCommands {
    /// Create an account and sign in.
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "FOUNDERVAL_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign in with email and password.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "FOUNDERVAL_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign in with the demo Google identity.
    Google,
    /// Sign out.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Request a password reset link.
    ResetPassword {
        #[arg(long)]
        email: String,
    },
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub industry: String,
    /// Problem, solution and how it works.
    #[arg(long)]
    pub description: String,
    #[arg(long)]
    pub target_market: String,
    #[arg(long, default_value = DEFAULT_BUDGET)]
    pub budget: String,
    /// Country or region, e.g. "Pakistan" or "Global / Remote".
    #[arg(long)]
    pub location: String,

    #[command(flatten)]
    pub gateway: GatewayArgs,
}

impl AnalyzeArgs {
    pub fn submission(&self) -> IdeaSubmission {
        IdeaSubmission {
            title: self.title.clone(),
            description: self.description.clone(),
            industry: self.industry.clone(),
            target_market: self.target_market.clone(),
            budget: self.budget.clone(),
            location: self.location.clone(),
        }
    }
}

/// Settings for the outbound model call.
#[derive(Debug, Args)]
pub struct GatewayArgs {
    /// Gemini API key (`API_KEY` is also accepted).
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "FOUNDERVAL_MODEL", default_value = founderval_ai::gemini::DEFAULT_MODEL)]
    pub model: String,

    #[arg(long, env = "FOUNDERVAL_TEMPERATURE", default_value_t = founderval_ai::gemini::DEFAULT_TEMPERATURE)]
    pub temperature: f32,

    #[arg(long, env = "FOUNDERVAL_API_BASE", default_value = founderval_ai::gemini::DEFAULT_BASE_URL)]
    pub api_base: String,
}

impl GatewayArgs {
    /// Gateway settings. A missing key is left blank and surfaces when the
    /// analysis runs, so the submission is still recorded as failed.
    pub fn config(&self) -> GeminiConfig {
        let api_key = self
            .api_key
            .clone()
            .or_else(|| std::env::var("API_KEY").ok())
            .unwrap_or_default();
        GeminiConfig {
            api_key,
            model: self.model.clone(),
            temperature: self.temperature,
            base_url: self.api_base.clone(),
        }
    }
}

/// Data directory from the flag/env, else the platform data dir.
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| dirs::data_dir().map(|d| d.join("founderval")))
        .unwrap_or_else(|| PathBuf::from(".founderval"))
}
