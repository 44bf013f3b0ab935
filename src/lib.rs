//! PostgreSQL backup and restore automation.
//!
//! Dumps a database with `pg_dump`, keeps gzipped artifacts in a local directory,
//! and restores a chosen artifact into a temporary database before renaming it
//! over the active one.

pub mod backup;
pub mod config;
pub mod errors;
pub mod list;
pub mod restore;
pub mod storage;
pub mod sync;
pub mod utils;

pub use errors::{Result, SyncError};

/// Installs the process-wide `tracing` subscriber. `RUST_LOG` overrides the default `info` level.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();
}
