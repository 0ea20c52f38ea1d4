mod cli;
mod commands;
mod pipeline;
mod report;

use clap::Parser;

use crate::cli::{Cli, Commands, resolve_data_dir};
use crate::commands::App;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("founderval: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;
    tracing::debug!("founderval v{}", env!("CARGO_PKG_VERSION"));

    let data_dir = resolve_data_dir(cli.data_dir);
    let app = App::open(&data_dir)?;

    match &cli.command {
        Commands::Auth { action } => commands::auth(&app, action),
        Commands::Analyze(args) => commands::analyze(&app, args).await,
        Commands::List => commands::list(&app),
        Commands::Report { id } => commands::report(&app, id.as_deref()),
        Commands::Export { id, output } => commands::export(&app, id, output.as_ref()),
    }
}

/// Log to stderr so reports on stdout stay clean. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { "info" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;
    Ok(())
}
