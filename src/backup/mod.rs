mod logic;
pub(crate) mod archive;

pub use logic::perform_backup_orchestration;

use std::path::PathBuf;
use tracing::info;

use crate::config::AppConfig;
use crate::errors::Result;
use crate::storage::LocalStorage;
use crate::storage::artifact::BackupArtifact;
use crate::utils::tools::PgTools;

/// Public entry point for the backup process.
///
/// The artifact timestamp is captured here, before the storage backend is even resolved.
#[tracing::instrument(name = "backup", skip_all, fields(db = %app_config.connection.database))]
pub fn run_backup_flow(app_config: &AppConfig, tools: &impl PgTools, verbose: bool) -> Result<PathBuf> {
    let artifact = BackupArtifact::now(&app_config.connection.database);
    let storage = LocalStorage::from_config(app_config)?;

    let stored = perform_backup_orchestration(
        tools,
        &app_config.connection,
        &storage,
        &app_config.work_paths,
        &artifact,
        verbose,
    )?;
    info!(
        "Backup {} of {}:{}/{} successful.",
        artifact.file_name(),
        app_config.connection.host,
        app_config.connection.port,
        app_config.connection.database
    );
    Ok(stored)
}
