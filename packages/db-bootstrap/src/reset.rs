use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sea_orm::{
    ConnectionTrait, DatabaseBackend, DatabaseConnection, DbErr, RuntimeErr, Statement,
};
use sqlx::pool::PoolConnection;
use sqlx::{MySql, Sqlite};
use tracing::{debug, info, warn};

use crate::error::BootstrapError;

/// Schema-management seam used by database resets.
#[async_trait]
pub trait SchemaReset: Send + Sync {
    /// Remove every table from the target database.
    async fn drop_all_tables(&self) -> Result<(), DbErr>;
}

#[async_trait]
impl SchemaReset for DatabaseConnection {
    async fn drop_all_tables(&self) -> Result<(), DbErr> {
        let backend = self.get_database_backend();
        let tables = list_tables(self, backend).await?;
        debug!(backend = ?backend, tables = tables.len(), "drop_all_tables=start");

        // Foreign key toggles are per session: the toggle, the drops and the
        // restore must share one pooled connection.
        match backend {
            DatabaseBackend::Sqlite => {
                let mut session = self
                    .get_sqlite_connection_pool()
                    .acquire()
                    .await
                    .map_err(acquire_err)?;
                drop_on_session(&mut session, backend, &tables).await
            }
            DatabaseBackend::MySql => {
                let mut session = self
                    .get_mysql_connection_pool()
                    .acquire()
                    .await
                    .map_err(acquire_err)?;
                drop_on_session(&mut session, backend, &tables).await
            }
            DatabaseBackend::Postgres => {
                drop_on_session(&mut AnySession(self), backend, &tables).await
            }
        }
    }
}

/// A database session able to run standalone statements.
#[async_trait]
trait Session: Send {
    async fn exec(&mut self, sql: &str) -> Result<(), DbErr>;
}

#[async_trait]
impl Session for PoolConnection<Sqlite> {
    async fn exec(&mut self, sql: &str) -> Result<(), DbErr> {
        sqlx::query(sql)
            .execute(&mut **self)
            .await
            .map(|_| ())
            .map_err(|e| exec_err(sql, e))
    }
}

#[async_trait]
impl Session for PoolConnection<MySql> {
    async fn exec(&mut self, sql: &str) -> Result<(), DbErr> {
        sqlx::query(sql)
            .execute(&mut **self)
            .await
            .map(|_| ())
            .map_err(|e| exec_err(sql, e))
    }
}

/// Statements go to whichever pooled connection is free.
struct AnySession<'a>(&'a DatabaseConnection);

#[async_trait]
impl Session for AnySession<'_> {
    async fn exec(&mut self, sql: &str) -> Result<(), DbErr> {
        let backend = self.0.get_database_backend();
        self.0
            .execute(Statement::from_string(backend, sql))
            .await
            .map(|_| ())
    }
}

fn acquire_err(e: sqlx::Error) -> DbErr {
    DbErr::Conn(RuntimeErr::Internal(format!(
        "failed to acquire a pooled connection: {e}"
    )))
}

fn exec_err(sql: &str, e: sqlx::Error) -> DbErr {
    DbErr::Exec(RuntimeErr::Internal(format!("{sql}: {e}")))
}

/// Disable foreign key checks, drop `tables`, then restore the checks.
///
/// The restore runs even after a failed drop; the drop error wins over a
/// failed restore.
async fn drop_on_session<S: Session>(
    session: &mut S,
    backend: DatabaseBackend,
    tables: &[String],
) -> Result<(), DbErr> {
    let (before, after) = foreign_key_toggles(backend);
    if let Some(stmt) = before {
        session.exec(stmt).await?;
    }

    let mut result = Ok(());
    for table in tables {
        if let Err(e) = session.exec(&drop_table_sql(backend, table)).await {
            result = Err(e);
            break;
        }
    }

    if let Some(stmt) = after {
        if let Err(restore) = session.exec(stmt).await {
            if result.is_ok() {
                result = Err(restore);
            } else {
                warn!("drop_all_tables=restore_failed err={}", restore);
            }
        }
    }
    result
}

async fn list_tables(
    conn: &DatabaseConnection,
    backend: DatabaseBackend,
) -> Result<Vec<String>, DbErr> {
    let sql = match backend {
        DatabaseBackend::Sqlite => {
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'"
        }
        DatabaseBackend::Postgres => {
            "SELECT tablename AS name FROM pg_tables WHERE schemaname = current_schema()"
        }
        DatabaseBackend::MySql => {
            "SELECT CAST(table_name AS CHAR) AS name FROM information_schema.tables \
             WHERE table_schema = DATABASE() AND table_type = 'BASE TABLE'"
        }
    };

    let rows = conn.query_all(Statement::from_string(backend, sql)).await?;
    rows.iter()
        .map(|row| row.try_get::<String>("", "name"))
        .collect()
}

fn foreign_key_toggles(backend: DatabaseBackend) -> (Option<&'static str>, Option<&'static str>) {
    match backend {
        DatabaseBackend::Sqlite => (
            Some("PRAGMA foreign_keys = OFF;"),
            Some("PRAGMA foreign_keys = ON;"),
        ),
        DatabaseBackend::MySql => (
            Some("SET FOREIGN_KEY_CHECKS = 0;"),
            Some("SET FOREIGN_KEY_CHECKS = 1;"),
        ),
        // CASCADE on each drop covers dependent constraints.
        DatabaseBackend::Postgres => (None, None),
    }
}

fn drop_table_sql(backend: DatabaseBackend, table: &str) -> String {
    match backend {
        DatabaseBackend::Postgres => {
            format!("DROP TABLE IF EXISTS {} CASCADE;", quote_ident(backend, table))
        }
        DatabaseBackend::MySql | DatabaseBackend::Sqlite => {
            format!("DROP TABLE IF EXISTS {};", quote_ident(backend, table))
        }
    }
}

fn quote_ident(backend: DatabaseBackend, name: &str) -> String {
    match backend {
        DatabaseBackend::MySql => format!("`{}`", name.replace('`', "``")),
        DatabaseBackend::Postgres | DatabaseBackend::Sqlite => {
            format!("\"{}\"", name.replace('"', "\"\""))
        }
    }
}

/// What a reset removed from the storage directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetReport {
    pub removed: Vec<PathBuf>,
}

/// Drop every table, then delete the regular files in `directory`.
///
/// A failed drop is returned immediately and no files are touched. A
/// directory that cannot be listed or is empty counts as nothing to clean.
/// Subdirectories are left alone.
pub async fn clear_database<D>(db: &D, directory: &Path) -> Result<ResetReport, BootstrapError>
where
    D: SchemaReset + ?Sized,
{
    info!("reset=start directory={}", directory.display());

    db.drop_all_tables()
        .await
        .map_err(BootstrapError::DropTables)?;

    let removed = remove_files(directory)?;
    info!(
        "reset=done directory={} removed={}",
        directory.display(),
        removed.len()
    );
    Ok(ResetReport { removed })
}

/// [`clear_database`] with a completion callback.
///
/// `on_complete` runs exactly once, after both the drop and the file cleanup
/// finished. It does not run when either step fails.
pub async fn clear_database_then<D, F>(
    db: &D,
    directory: &Path,
    on_complete: Option<F>,
) -> Result<ResetReport, BootstrapError>
where
    D: SchemaReset + ?Sized,
    F: FnOnce(&ResetReport),
{
    let report = clear_database(db, directory).await?;
    if let Some(callback) = on_complete {
        callback(&report);
    }
    Ok(report)
}

fn remove_files(directory: &Path) -> Result<Vec<PathBuf>, BootstrapError> {
    // TODO: a missing directory is treated like an empty one; decide whether
    // a configured-but-absent directory should be reported.
    let entries = match fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(
                "reset=skip_files directory={} reason={}",
                directory.display(),
                e
            );
            return Ok(Vec::new());
        }
    };

    let mut removed = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("reset=unreadable_entry directory={} err={}", directory.display(), e);
                continue;
            }
        };

        let path = entry.path();
        let metadata = fs::metadata(&path).map_err(|source| BootstrapError::Io {
            path: path.clone(),
            source,
        })?;
        if !metadata.is_file() {
            continue;
        }

        fs::remove_file(&path).map_err(|source| BootstrapError::Io {
            path: path.clone(),
            source,
        })?;
        debug!("reset=removed path={}", path.display());
        removed.push(path);
    }

    removed.sort();
    Ok(removed)
}
