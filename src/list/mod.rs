// psqlsync/src/list/mod.rs
use tracing::info;

use crate::config::AppConfig;
use crate::errors::Result;
use crate::storage::LocalStorage;
use crate::utils::tools::PgTools;

/// Stored artifact names, newest first.
#[tracing::instrument(name = "list", skip_all)]
pub fn run_list_flow(app_config: &AppConfig) -> Result<Vec<String>> {
    let storage = LocalStorage::from_config(app_config)?;
    let mut backup_objects = storage.list()?;
    backup_objects.sort_by(|a, b| b.cmp(a));
    for key in &backup_objects {
        info!("Key : {}", key);
    }
    Ok(backup_objects)
}

/// Databases on the configured server, as printed by `psql --list`.
#[tracing::instrument(name = "list_dbs", skip_all)]
pub fn run_list_databases_flow(
    app_config: &AppConfig,
    tools: &impl PgTools,
    verbose: bool,
) -> Result<Vec<String>> {
    let db_url = app_config.connection.url()?;
    if verbose {
        info!("DB url: {}", db_url);
    }
    let output = tools.list_databases(&db_url)?;
    let lines: Vec<String> = output.lines().map(str::to_string).collect();
    for line in &lines {
        info!("{}", line);
    }
    Ok(lines)
}
