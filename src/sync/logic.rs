// psqlsync/src/sync/logic.rs
use std::future::Future;
use std::path::Path;
use tracing::info;
use walkdir::WalkDir;

use super::github::RemoteSource;
use crate::config::{ConnectionConfig, WorkPaths};
use crate::errors::{Result, SyncError};
use crate::restore::admin::DatabaseAdmin;
use crate::restore::{RestoreOutcome, perform_restore_orchestration};
use crate::storage::LocalStorage;
use crate::storage::artifact::BackupArtifact;
use crate::utils::tools::PgTools;

/// Environment variable consulted for the GitHub token of `app_name`.
pub fn token_env_var(app_name: &str) -> String {
    format!(
        "GHMOTEQLYNC_{}_GH_TOKEN",
        app_name.to_uppercase().replace('-', "_")
    )
}

/// Token precedence: explicit flag, then the environment, then a prompt when asked for.
pub fn resolve_token(
    flag: Option<String>,
    env_var: &str,
    lookup_env: impl Fn(&str) -> Option<String>,
    ask: bool,
    prompt: impl FnOnce() -> Result<String>,
) -> Result<String> {
    if let Some(token) = flag.filter(|t| !t.is_empty()) {
        return Ok(token);
    }
    if let Some(token) = lookup_env(env_var).filter(|t| !t.is_empty()) {
        return Ok(token);
    }
    if ask {
        return prompt();
    }
    Err(SyncError::MissingCredential(format!(
        "Please supply a token with --token, set the {} environment variable or use --ask-token",
        env_var
    )))
}

/// Timestamp (`YYYYMMdd-HHmmss`) of the most recent backup file in `dir`.
pub fn find_latest(dir: &Path) -> Result<String> {
    if !dir.is_dir() {
        return Err(SyncError::StorageNotFound(dir.to_path_buf()));
    }

    let mut backup_times = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !name.contains("backup") || !name.ends_with("gz") {
            continue;
        }
        // Names outside the artifact scheme fall back to their all-digit dash segments.
        let backup_time = match BackupArtifact::parse(&name) {
            Some(artifact) => artifact.time_key(),
            None => name
                .split('-')
                .filter(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
                .collect::<Vec<_>>()
                .join("-"),
        };
        if !backup_time.is_empty() {
            backup_times.push(backup_time);
        }
    }

    backup_times
        .into_iter()
        .max()
        .ok_or_else(|| SyncError::NoBackupsFound(dir.to_path_buf()))
}

/// Download, pick the latest backup, restore it over the configured database.
pub async fn perform_sync_orchestration<A, C, Fut>(
    source: &impl RemoteSource,
    target_dir: &Path,
    overwrite: bool,
    tools: &impl PgTools,
    connect_admin: C,
    connection: &ConnectionConfig,
    work_paths: &WorkPaths,
    verbose: bool,
) -> Result<RestoreOutcome>
where
    A: DatabaseAdmin,
    C: FnOnce() -> Fut,
    Fut: Future<Output = Result<A>>,
{
    info!("Downloading backup files...");
    let downloaded = source.fetch_all(target_dir, overwrite).await?;
    info!("Downloaded {} file(s) to {}", downloaded.len(), target_dir.display());

    let latest_save = find_latest(target_dir)?;
    info!("Latest backup: {}", latest_save);

    let storage = LocalStorage::new(target_dir);
    let outcome = perform_restore_orchestration(
        tools,
        connect_admin,
        connection,
        &storage,
        work_paths,
        &latest_save,
        None,
        verbose,
    )
    .await?;
    info!("Sync finished successfully.");
    Ok(outcome)
}
