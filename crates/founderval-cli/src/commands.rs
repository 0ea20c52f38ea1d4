//! Command handlers over an [`App`] opened on the data directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use founderval_ai::{AnalysisError, GeminiClient};
use founderval_auth::AuthService;
use founderval_core::{Project, User};
use founderval_store::{BlobStore, FileBlobStore, ProjectStore};
use tracing::info;

use crate::cli::{AnalyzeArgs, AuthCommands};
use crate::pipeline::{ANALYSIS_FAILED_MESSAGE, SubmitError, submit_idea};
use crate::report::{render_dashboard, render_report};

/// Shared handles over one data directory.
pub struct App {
    projects: ProjectStore,
    auth: AuthService,
}

impl App {
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        let blob: Arc<dyn BlobStore> = Arc::new(
            FileBlobStore::open(data_dir)
                .with_context(|| format!("failed to open data dir {}", data_dir.display()))?,
        );
        info!(dir = %data_dir.display(), "data directory opened");
        let projects = ProjectStore::open(blob.clone())?;
        let auth = AuthService::new(blob);
        Ok(Self { projects, auth })
    }

    fn require_user(&self) -> anyhow::Result<User> {
        match self.auth.current_user()? {
            Some(user) => Ok(user),
            None => bail!("not signed in: run `founderval auth login` or `founderval auth signup`"),
        }
    }

    fn project(&self, id: &str) -> anyhow::Result<Project> {
        self.projects
            .get(id)?
            .with_context(|| format!("no project with id {id}"))
    }
}

// ── Auth ──

pub fn auth(app: &App, action: &AuthCommands) -> anyhow::Result<()> {
    match action {
        AuthCommands::Signup {
            name,
            email,
            password,
        } => {
            let user = app.auth.signup(name, email, password)?;
            println!("Account created. Signed in as {} <{}>", user.name, user.email);
        }
        AuthCommands::Login { email, password } => {
            let user = app.auth.login(email, password)?;
            println!("Signed in as {} <{}>", user.name, user.email);
        }
        AuthCommands::Google => {
            let user = app.auth.login_with_google()?;
            println!("Signed in as {} <{}>", user.name, user.email);
        }
        AuthCommands::Logout => {
            app.auth.logout()?;
            println!("Signed out.");
        }
        AuthCommands::Whoami => match app.auth.current_user()? {
            Some(user) => {
                println!("{} <{}>", user.name, user.email);
                println!("id: {}", user.id);
            }
            None => println!("Not signed in."),
        },
        AuthCommands::ResetPassword { email } => {
            app.auth.reset_password(email)?;
            println!("If an account exists for {email}, a reset link has been sent.");
        }
    }
    Ok(())
}

// ── Projects ──

pub async fn analyze(app: &App, args: &AnalyzeArgs) -> anyhow::Result<()> {
    app.require_user()?;
    let client = GeminiClient::new(args.gateway.config());
    eprintln!(
        "Analyzing \"{}\" with {}...",
        args.title.trim(),
        client.model()
    );

    match submit_idea(&app.projects, &client, args.submission()).await {
        Ok(project) => {
            print!("{}", render_report(&project));
            Ok(())
        }
        Err(SubmitError::Analysis { project_id, source }) => {
            eprintln!("{ANALYSIS_FAILED_MESSAGE}");
            let hint = match source {
                AnalysisError::MissingApiKey => " (pass --api-key or set GEMINI_API_KEY)",
                _ => "",
            };
            Err(anyhow::Error::new(source)
                .context(format!("project {project_id} marked failed{hint}")))
        }
        Err(e) => Err(e.into()),
    }
}

pub fn list(app: &App) -> anyhow::Result<()> {
    let user = app.auth.current_user()?;
    let projects = app.projects.list()?;
    print!("{}", render_dashboard(user.as_ref(), &projects));
    Ok(())
}

pub fn report(app: &App, id: Option<&str>) -> anyhow::Result<()> {
    let project = match id {
        Some(id) => app.project(id)?,
        None => app
            .projects
            .latest_completed()?
            .context("no completed projects yet")?,
    };
    print!("{}", render_report(&project));
    Ok(())
}

pub fn export(app: &App, id: &str, output: Option<&PathBuf>) -> anyhow::Result<()> {
    let text = render_report(&app.project(id)?);
    match output {
        Some(path) => {
            std::fs::write(path, &text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Report written to {}", path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}
