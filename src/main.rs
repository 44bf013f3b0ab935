//! psqlsync
//!
//! Provides CLI interface for database backup, listing and restore operations

// psqlsync/src/main.rs
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

use psqlsync::config::{AppConfig, RawConfig};
use psqlsync::utils::prompt_secret;
use psqlsync::utils::tools::PgClientTools;
use psqlsync::{SyncError, backup, list, restore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Action {
    /// List stored backups
    List,
    /// List databases available on the server
    #[value(name = "list_dbs")]
    ListDbs,
    /// Restore a backup (requires --time)
    Restore,
    /// Take a backup
    Backup,
}

#[derive(Parser, Debug)]
#[command(name = "psqlsync", version)]
#[command(about = "Back up, list and restore PostgreSQL databases")]
struct Cli {
    #[arg(long, value_enum)]
    action: Option<Action>,

    /// Time to use for restore (show with --action list). A unique prefix such as YYYYMM is enough.
    #[arg(long, value_name = "YYYYMMdd-HHmmss")]
    time: Option<String>,

    /// Name of the new restored database
    #[arg(long = "dest-db", value_name = "dest_db")]
    dest_db: Option<String>,

    /// Verbose output
    #[arg(long)]
    verbose: bool,

    /// Database configuration file path (.toml)
    #[arg(long)]
    config: PathBuf,

    /// Show a password prompt instead of the password defined in the config.
    #[arg(long = "prompt-pass")]
    prompt_pass: bool,
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
            ExitCode::from(exit_code_for(&e))
        }
    }
}

fn exit_code_for(e: &anyhow::Error) -> u8 {
    e.downcast_ref::<SyncError>().map_or(2, SyncError::exit_code)
}

async fn run_app(cli: Cli) -> Result<()> {
    info!("Running psqlsync...");
    let Some(action) = cli.action else {
        warn!("No valid argument was given. Choose one of --action list|list_dbs|restore|backup");
        return Ok(());
    };
    let raw_config = RawConfig::load(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    let password = if cli.prompt_pass {
        Some(prompt_secret("Password for database: ")?)
    } else {
        None
    };
    let app_config = AppConfig::from_raw(raw_config, password)?;
    let tools = PgClientTools;

    match action {
        Action::List => {
            list::run_list_flow(&app_config)?;
        }
        Action::ListDbs => {
            list::run_list_databases_flow(&app_config, &tools, cli.verbose)?;
        }
        Action::Backup => {
            backup::run_backup_flow(&app_config, &tools, cli.verbose).context("Backup process failed")?;
        }
        Action::Restore => {
            restore::run_restore_flow(
                &app_config,
                &tools,
                cli.time.as_deref(),
                cli.dest_db.as_deref(),
                cli.verbose,
            )
            .await
            .context("Restore process failed")?;
        }
    }
    Ok(())
}
