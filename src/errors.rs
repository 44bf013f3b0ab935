use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("{tool} failed with exit code {}: {output}", describe_code(.code))]
    ProcessFailure {
        tool: String,
        code: Option<i32>,
        output: String,
    },

    #[error("{0} executable not found in PATH. Please ensure PostgreSQL client tools are installed and in your PATH.")]
    ToolNotFound(String),

    #[error("Could not find {} when searching for backups. Check your config file settings", .0.display())]
    StorageNotFound(PathBuf),

    #[error("Only 'LOCAL' storage engine is supported, got '{0}'")]
    UnsupportedStorageEngine(String),

    #[error("No match found for backups with date: {time}. Available keys: {available:?}")]
    NoBackupMatch { time: String, available: Vec<String> },

    #[error("No backup files could be found in {}, did the download succeed?", .0.display())]
    NoBackupsFound(PathBuf),

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serde JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl SyncError {
    /// Process exit status reported by the command-line entry points.
    pub fn exit_code(&self) -> u8 {
        match self {
            SyncError::NoBackupMatch { .. } | SyncError::UnsupportedStorageEngine(_) => 1,
            _ => 2,
        }
    }
}

fn describe_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "none (terminated by signal)".to_string(), |c| c.to_string())
}

pub type Result<T> = std::result::Result<T, SyncError>;
