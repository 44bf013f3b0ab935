// psqlsync/src/storage/artifact.rs
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Timelike};
use regex::Regex;
use std::sync::OnceLock;

pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

fn artifact_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^backup-(\d{8}-\d{6})-(.+)\.dump\.gz$").expect("artifact pattern is valid")
    })
}

/// A stored, compressed dump: `backup-<YYYYMMdd-HHmmss>-<dbname>.dump.gz`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupArtifact {
    pub timestamp: NaiveDateTime,
    pub database: String,
}

impl BackupArtifact {
    pub fn new<Tz: TimeZone>(taken_at: &DateTime<Tz>, database: &str) -> Self {
        let timestamp = taken_at.naive_local();
        // Names only carry whole seconds.
        let timestamp = timestamp.with_nanosecond(0).unwrap_or(timestamp);
        Self {
            timestamp,
            database: database.to_string(),
        }
    }

    pub fn now(database: &str) -> Self {
        Self::new(&Local::now(), database)
    }

    pub fn parse(file_name: &str) -> Option<Self> {
        let captures = artifact_pattern().captures(file_name)?;
        let timestamp = NaiveDateTime::parse_from_str(&captures[1], TIMESTAMP_FORMAT).ok()?;
        Some(Self {
            timestamp,
            database: captures[2].to_string(),
        })
    }

    pub fn time_key(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Name of the uncompressed dump written by `pg_dump`.
    pub fn dump_file_name(&self) -> String {
        format!("backup-{}-{}.dump", self.time_key(), self.database)
    }

    pub fn file_name(&self) -> String {
        format!("{}.gz", self.dump_file_name())
    }
}
