// psqlsync/src/restore/admin.rs
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;
use tracing::{debug, info};

use crate::config::ConnectionConfig;
use crate::errors::{Result, SyncError};

pub const MAINTENANCE_DATABASE: &str = "postgres";

/// Cluster-level DDL issued from the maintenance database.
///
/// Every statement runs on its own, outside any transaction block: `CREATE DATABASE`
/// and `DROP DATABASE` refuse to run inside one. Nothing is rolled back when a later
/// step fails after an earlier one succeeded.
#[async_trait]
pub trait DatabaseAdmin: Send {
    /// Terminates every backend attached to `database` except our own session.
    /// Returns how many were signalled.
    async fn terminate_connections(&mut self, database: &str) -> Result<usize>;

    async fn drop_if_exists(&mut self, database: &str) -> Result<()>;

    async fn create(&mut self, database: &str) -> Result<()>;

    async fn grant_all(&mut self, database: &str, user: &str) -> Result<()>;

    async fn rename(&mut self, from: &str, to: &str) -> Result<()>;
}

/// Quotes an identifier, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn ensure_not_maintenance(database: &str) -> Result<()> {
    if database == MAINTENANCE_DATABASE {
        return Err(SyncError::Config(format!(
            "Refusing to drop or replace '{}', it is the maintenance database.",
            database
        )));
    }
    Ok(())
}

/// Drops and recreates the temporary restore database, then grants `user` full privileges on it.
pub async fn provision_temp_database(
    admin: &mut impl DatabaseAdmin,
    temp_database: &str,
    user: &str,
) -> Result<()> {
    ensure_not_maintenance(temp_database)?;
    let terminated = admin.terminate_connections(temp_database).await?;
    debug!(database = temp_database, terminated, "terminated backends");
    admin.drop_if_exists(temp_database).await?;
    admin.create(temp_database).await?;
    admin.grant_all(temp_database, user).await?;
    Ok(())
}

/// Replaces whatever lives at `final_database` with `temp_database`.
///
/// The rename is the only atomic step: afterwards either the old or the new
/// database is gone, never both halves.
pub async fn promote_database(
    admin: &mut impl DatabaseAdmin,
    temp_database: &str,
    final_database: &str,
) -> Result<()> {
    ensure_not_maintenance(final_database)?;
    if final_database == temp_database {
        return Err(SyncError::Config(format!(
            "Cannot promote '{}' onto itself.",
            temp_database
        )));
    }
    let terminated = admin.terminate_connections(final_database).await?;
    debug!(database = final_database, terminated, "terminated backends");
    admin.drop_if_exists(final_database).await?;
    admin.rename(temp_database, final_database).await?;
    Ok(())
}

/// One autocommit connection to the server's maintenance database.
pub struct PgAdmin {
    conn: PgConnection,
}

impl PgAdmin {
    pub async fn connect(connection: &ConnectionConfig) -> Result<Self> {
        let options = PgConnectOptions::new()
            .host(&connection.host)
            .port(connection.port)
            .username(&connection.user)
            .password(&connection.password)
            .database(MAINTENANCE_DATABASE);
        let conn = PgConnection::connect_with(&options).await?;
        info!(
            "Connected to '{}' on {}:{}",
            MAINTENANCE_DATABASE, connection.host, connection.port
        );
        Ok(Self { conn })
    }

    async fn execute_ddl(&mut self, sql: &str) -> Result<()> {
        debug!(sql, "executing");
        sqlx::query(sql).execute(&mut self.conn).await?;
        Ok(())
    }
}

#[async_trait]
impl DatabaseAdmin for PgAdmin {
    async fn terminate_connections(&mut self, database: &str) -> Result<usize> {
        let rows = sqlx::query(
            "SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE pid <> pg_backend_pid() AND datname = $1",
        )
        .bind(database)
        .fetch_all(&mut self.conn)
        .await?;
        Ok(rows.len())
    }

    async fn drop_if_exists(&mut self, database: &str) -> Result<()> {
        self.execute_ddl(&format!("DROP DATABASE IF EXISTS {}", quote_ident(database)))
            .await
    }

    async fn create(&mut self, database: &str) -> Result<()> {
        self.execute_ddl(&format!("CREATE DATABASE {}", quote_ident(database)))
            .await
    }

    async fn grant_all(&mut self, database: &str, user: &str) -> Result<()> {
        self.execute_ddl(&format!(
            "GRANT ALL PRIVILEGES ON DATABASE {} TO {}",
            quote_ident(database),
            quote_ident(user)
        ))
        .await
    }

    async fn rename(&mut self, from: &str, to: &str) -> Result<()> {
        self.execute_ddl(&format!(
            "ALTER DATABASE {} RENAME TO {}",
            quote_ident(from),
            quote_ident(to)
        ))
        .await
    }
}
