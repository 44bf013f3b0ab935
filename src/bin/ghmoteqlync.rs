//! ghmoteqlync
//!
//! Downloads backup files from a GitHub repository directory and restores the most recent one.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

use psqlsync::config::{AppConfig, RawConfig};
use psqlsync::sync::{GitHubSource, resolve_token, run_sync_flow, token_env_var};
use psqlsync::utils::prompt_secret;
use psqlsync::utils::tools::PgClientTools;
use psqlsync::SyncError;

#[derive(Parser, Debug)]
#[command(name = "ghmoteqlync", version)]
#[command(about = "Download and restore test database.")]
struct Cli {
    /// Owner of the repository holding the backups
    #[arg(long)]
    owner: String,

    /// Repository holding the backups
    #[arg(long)]
    repo: String,

    /// Directory inside the repository holding the backups
    #[arg(long = "repo-dir")]
    repo_dir: String,

    /// Application name, used to name the token environment variable
    #[arg(long = "app-name", default_value = "psqlsync")]
    app_name: String,

    /// User authentication token, OAuth or personal access token. Only use this when running automated scripts.
    #[arg(short = 't', long)]
    token: Option<String>,

    /// Prompt for the token when neither --token nor the environment variable provide it.
    #[arg(long = "ask-token")]
    ask_token: bool,

    /// Database configuration file path (.toml)
    #[arg(long)]
    config: PathBuf,

    /// Keep the target directory instead of overwriting it.
    #[arg(short = 'N', long = "no-overwrite")]
    no_overwrite: bool,

    /// Output directory. Defaults to backups/<repo>
    #[arg(short = 'o', long)]
    target: Option<PathBuf>,

    /// Verbose output
    #[arg(long)]
    verbose: bool,
}

impl Cli {
    fn target_dir(&self) -> PathBuf {
        self.target
            .clone()
            .unwrap_or_else(|| PathBuf::from("backups").join(&self.repo))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    psqlsync::init_tracing();

    let cli = Cli::parse();
    match run_app(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(e.downcast_ref::<SyncError>().map_or(2, SyncError::exit_code))
        }
    }
}

async fn run_app(cli: Cli) -> Result<()> {
    let env_var = token_env_var(&cli.app_name);
    let token = resolve_token(
        cli.token.clone(),
        &env_var,
        |name| std::env::var(name).ok(),
        cli.ask_token,
        || prompt_secret("Input your token: "),
    )?;

    let raw_config = RawConfig::load(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    let app_config = AppConfig::from_raw(raw_config, None)?;

    let source = GitHubSource::new(&cli.owner, &cli.repo, &cli.repo_dir, token);
    let target_dir = cli.target_dir();
    info!(
        "Syncing {}/{}/{} into {}",
        cli.owner,
        cli.repo,
        source.repo_dir,
        target_dir.display()
    );

    run_sync_flow(
        &app_config,
        &source,
        &PgClientTools,
        &target_dir,
        !cli.no_overwrite,
        cli.verbose,
    )
    .await
    .context("Sync process failed")?;
    Ok(())
}
