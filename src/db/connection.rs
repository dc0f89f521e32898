use rusqlite::Connection;
use std::cell::RefCell;
use std::fs;

use crate::domain::ports::Transactional;
use crate::errors::ServerError;

// Thread-local connection slot, remembering which file it was opened for.
thread_local! {
    static DB_CONN: RefCell<Option<(String, Connection)>> = const { RefCell::new(None) };
}

#[derive(Clone, Debug)]
pub struct Database {
    path: String,
}

impl Database {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Provides a mutable connection to the closure.
    /// The slot is reopened when this worker last talked to a different file.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, ServerError>
    where
        F: FnOnce(&mut Connection) -> Result<T, ServerError>,
    {
        DB_CONN
            .try_with(|cell| {
                let mut slot = cell.borrow_mut();
                let stale = slot.as_ref().map_or(true, |(path, _)| *path != self.path);
                if stale {
                    let conn = Connection::open(&self.path)
                        .map_err(|e| ServerError::DbError(format!("Open DB failed: {e}")))?;
                    tracing::debug!(path = %self.path, "opened sqlite connection");
                    *slot = Some((self.path.clone(), conn));
                }
                match slot.as_mut() {
                    Some((_, conn)) => f(conn),
                    None => Err(ServerError::InternalError),
                }
            })
            .map_err(|_| ServerError::InternalError)?
    }
}

// Store calls made inside `f` reuse this worker's connection, so they share the
// transaction opened here.
impl Transactional for Database {
    fn in_transaction<T, F>(&self, f: F) -> Result<T, ServerError>
    where
        F: FnOnce() -> Result<T, ServerError>,
    {
        self.with_conn(|conn| {
            if !conn.is_autocommit() {
                tracing::warn!(path = %self.path, "rolling back a transaction left open");
                conn.execute_batch("ROLLBACK")
                    .map_err(|e| ServerError::DbError(format!("rollback failed: {e}")))?;
            }
            conn.execute_batch("BEGIN IMMEDIATE")
                .map_err(|e| ServerError::DbError(format!("begin tx failed: {e}")))
        })?;

        let result = f();
        let finish = if result.is_ok() { "COMMIT" } else { "ROLLBACK" };
        self.with_conn(|conn| {
            // SQLite may already have rolled back on its own.
            if conn.is_autocommit() {
                return Ok(());
            }
            conn.execute_batch(finish)
                .map_err(|e| ServerError::DbError(format!("{finish} failed: {e}")))
        })?;
        if let Err(e) = &result {
            tracing::warn!(error = %e, "transaction rolled back");
        }
        result
    }
}

/// Initialize database from a SQL schema file
pub fn init_db(db: &Database, schema_path: &str) -> Result<(), ServerError> {
    let schema_sql = fs::read_to_string(schema_path)
        .map_err(|e| ServerError::DbError(format!("Failed to read schema file: {e}")))?;

    db.with_conn(|conn| {
        conn.execute_batch(&schema_sql)
            .map_err(|e| ServerError::DbError(format!("Failed to apply schema: {e}")))?;
        Ok(())
    })?;

    tracing::info!(schema = schema_path, db = db.path(), "database initialized");
    Ok(())
}
