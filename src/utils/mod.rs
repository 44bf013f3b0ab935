pub mod tools;

use std::io;
use std::path::PathBuf;
use which::which;

use crate::errors::{Result, SyncError};

/// Finds a PostgreSQL client executable in the system PATH.
pub fn find_executable(tool: &str) -> Result<PathBuf> {
    which(tool).map_err(|_| SyncError::ToolNotFound(tool.to_string()))
}

/// Prompts on the terminal and reads one line without echoing it.
pub fn prompt_secret(prompt: &str) -> Result<String> {
    read_secret(prompt, |p| rpassword::prompt_password(p))
}

fn read_secret(prompt: &str, read: impl FnOnce(&str) -> io::Result<String>) -> Result<String> {
    let line = read(prompt)?;
    let secret = line.trim_end_matches(['\r', '\n']).to_string();
    if secret.is_empty() {
        return Err(SyncError::MissingCredential(format!(
            "nothing was entered at prompt '{}'",
            prompt.trim()
        )));
    }
    Ok(secret)
}
