// psqlsync/src/sync/mod.rs
pub(crate) mod logic;
pub mod github;

pub use github::{GitHubSource, RemoteSource};
pub use logic::{find_latest, perform_sync_orchestration, resolve_token, token_env_var};

use std::path::Path;

use crate::config::AppConfig;
use crate::errors::Result;
use crate::restore::RestoreOutcome;
use crate::restore::admin::PgAdmin;
use crate::utils::tools::PgTools;

/// Public entry point for the remote sync process.
///
/// The configured storage engine is ignored: downloads always land in the local `target_dir`.
#[tracing::instrument(name = "sync", skip_all, fields(target = %target_dir.display()))]
pub async fn run_sync_flow(
    app_config: &AppConfig,
    source: &impl RemoteSource,
    tools: &impl PgTools,
    target_dir: &Path,
    overwrite: bool,
    verbose: bool,
) -> Result<RestoreOutcome> {
    perform_sync_orchestration(
        source,
        target_dir,
        overwrite,
        tools,
        || PgAdmin::connect(&app_config.connection),
        &app_config.connection,
        &app_config.work_paths,
        verbose,
    )
    .await
}
