// psqlsync/src/utils/tools.rs
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use tracing::{debug, info};

use super::find_executable;
use crate::errors::{Result, SyncError};

/// The PostgreSQL client programs the pipelines drive.
///
/// Every call blocks until the program exits; its output is returned so callers
/// can log it in verbose mode.
pub trait PgTools {
    /// `pg_dump` in custom format to a single file.
    fn dump(&self, db_url: &str, dest_file: &Path, verbose: bool) -> Result<String>;

    /// `pg_restore --no-owner` of `backup_file` into the database behind `db_url`.
    fn restore(&self, db_url: &str, backup_file: &Path, verbose: bool) -> Result<String>;

    /// `psql --list`.
    fn list_databases(&self, db_url: &str) -> Result<String>;
}

pub fn dump_args(db_url: &str, dest_file: &Path, verbose: bool) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        format!("--dbname={}", db_url).into(),
        "-Fc".into(),
        "-f".into(),
        dest_file.as_os_str().to_owned(),
    ];
    if verbose {
        args.push("-v".into());
    }
    args
}

pub fn restore_args(db_url: &str, backup_file: &Path, verbose: bool) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["--no-owner".into(), format!("--dbname={}", db_url).into()];
    if verbose {
        args.push("-v".into());
    }
    args.push(backup_file.as_os_str().to_owned());
    args
}

pub fn list_databases_args(db_url: &str) -> Vec<OsString> {
    vec![format!("--dbname={}", db_url).into(), "--list".into()]
}

/// Runs the client programs found on `PATH`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PgClientTools;

impl PgClientTools {
    fn run(&self, tool: &str, args: Vec<OsString>) -> Result<String> {
        let executable = find_executable(tool)?;
        debug!(tool, path = %executable.display(), "running PostgreSQL client tool");

        let output = Command::new(&executable).args(&args).output()?;

        // Verbose progress of pg_dump/pg_restore goes to stderr, keep both streams.
        let mut captured = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.is_empty() {
            if !captured.is_empty() && !captured.ends_with('\n') {
                captured.push('\n');
            }
            captured.push_str(&stderr);
        }

        if !output.status.success() {
            return Err(SyncError::ProcessFailure {
                tool: tool.to_string(),
                code: output.status.code(),
                output: captured,
            });
        }
        info!(tool, "finished successfully");
        Ok(captured)
    }
}

impl PgTools for PgClientTools {
    fn dump(&self, db_url: &str, dest_file: &Path, verbose: bool) -> Result<String> {
        self.run("pg_dump", dump_args(db_url, dest_file, verbose))
    }

    fn restore(&self, db_url: &str, backup_file: &Path, verbose: bool) -> Result<String> {
        self.run("pg_restore", restore_args(db_url, backup_file, verbose))
    }

    fn list_databases(&self, db_url: &str) -> Result<String> {
        self.run("psql", list_databases_args(db_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_dump_args() {
        let dest = PathBuf::from("/tmp/backup-20240301-101530-sales.dump");
        assert_eq!(
            strings(dump_args("postgresql://u:p@h:5432/sales", &dest, false)),
            vec![
                "--dbname=postgresql://u:p@h:5432/sales",
                "-Fc",
                "-f",
                "/tmp/backup-20240301-101530-sales.dump",
            ]
        );
        assert_eq!(strings(dump_args("url", &dest, true)).last().unwrap(), "-v");
    }

    #[test]
    fn test_restore_args_put_file_last() {
        let file = PathBuf::from("/tmp/restore.dump");
        assert_eq!(
            strings(restore_args("url", &file, true)),
            vec!["--no-owner", "--dbname=url", "-v", "/tmp/restore.dump"]
        );
        assert_eq!(
            strings(restore_args("url", &file, false)),
            vec!["--no-owner", "--dbname=url", "/tmp/restore.dump"]
        );
    }

    #[test]
    fn test_list_databases_args() {
        assert_eq!(strings(list_databases_args("url")), vec!["--dbname=url", "--list"]);
    }
}
