mod logic;
pub mod admin;

pub use logic::{
    PreparedRestore, RestoreOutcome, load_and_promote, perform_restore_orchestration,
    prepare_restore_file, select_backup,
};

use tracing::{info, warn};

use crate::config::{AppConfig, ConnectionConfig, WorkPaths};
use crate::errors::Result;
use crate::storage::LocalStorage;
use crate::utils::tools::PgTools;
use admin::PgAdmin;

/// Public entry point for the restore process.
///
/// Without a time nothing is restored; the caller is only warned.
#[tracing::instrument(name = "restore", skip_all, fields(db = %app_config.connection.database))]
pub async fn run_restore_flow(
    app_config: &AppConfig,
    tools: &impl PgTools,
    time: Option<&str>,
    dest_db: Option<&str>,
    verbose: bool,
) -> Result<Option<RestoreOutcome>> {
    let Some(time) = time else {
        warn!(
            "No date was chosen for restore. Run again with the \"list\" action to see available restore dates"
        );
        return Ok(None);
    };

    let storage = LocalStorage::from_config(app_config)?;
    let outcome = restore_from(
        tools,
        &app_config.connection,
        &storage,
        &app_config.work_paths,
        time,
        dest_db,
        verbose,
    )
    .await?;
    Ok(Some(outcome))
}

/// Restores `time` from `storage` using a real connection to the server.
pub async fn restore_from(
    tools: &impl PgTools,
    connection: &ConnectionConfig,
    storage: &LocalStorage,
    work_paths: &WorkPaths,
    time: &str,
    dest_db: Option<&str>,
    verbose: bool,
) -> Result<RestoreOutcome> {
    let outcome = perform_restore_orchestration(
        tools,
        || PgAdmin::connect(connection),
        connection,
        storage,
        work_paths,
        time,
        dest_db,
        verbose,
    )
    .await?;
    info!(
        "Restore of {} at {}:{}/{} successful.",
        outcome.artifact, connection.host, connection.port, outcome.database
    );
    Ok(outcome)
}
