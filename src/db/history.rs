// src/db/history.rs
use crate::db::connection::Database;
use crate::domain::client::{ClientId, OwnerId};
use crate::domain::history::{HistoryAction, HistoryEntry, NewHistoryEntry};
use crate::domain::ports::HistoryStore;
use crate::errors::ServerError;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<HistoryEntry> {
    let action_raw: String = row.get(2)?;
    let action = HistoryAction::parse(&action_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            Type::Text,
            Box::new(ServerError::DbError(format!("unknown action '{action_raw}'"))),
        )
    })?;

    Ok(HistoryEntry {
        id: row.get(0)?,
        client_id: ClientId(row.get(1)?),
        action,
        timestamp: row.get(3)?,
        details: row.get(4)?,
    })
}

/// Appends one audit record. Entries are never updated afterwards.
pub fn append_history(
    conn: &Connection,
    owner: OwnerId,
    entry: &NewHistoryEntry,
    now: DateTime<Utc>,
) -> Result<i64, ServerError> {
    conn.execute(
        r#"
        INSERT INTO history (owner_id, client_id, action, timestamp, details)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
        params![
            owner.0,
            entry.client_id.0,
            entry.action.as_str(),
            now.to_rfc3339_opts(SecondsFormat::Millis, true),
            &entry.details,
        ],
    )
    .map_err(|e| ServerError::DbError(format!("insert history failed: {e}")))?;

    Ok(conn.last_insert_rowid())
}

/// Newest first. Entries written within the same millisecond keep insertion order
/// through the id tiebreak.
pub fn list_history(
    conn: &Connection,
    owner: OwnerId,
    limit: Option<usize>,
) -> Result<Vec<HistoryEntry>, ServerError> {
    // SQLite treats a negative LIMIT as "no limit".
    let limit = limit.map_or(-1, |n| i64::try_from(n).unwrap_or(i64::MAX));

    let mut stmt = conn.prepare(
        r#"
        SELECT id, client_id, action, timestamp, details
        FROM history
        WHERE owner_id = ?1
        ORDER BY timestamp DESC, id DESC
        LIMIT ?2
        "#,
    )?;
    let rows = stmt.query_map(params![owner.0, limit], entry_from_row)?;

    let mut entries = Vec::new();
    for row in rows {
        entries.push(row?);
    }
    Ok(entries)
}

pub fn clear_history(conn: &Connection, owner: OwnerId) -> Result<usize, ServerError> {
    conn.execute("DELETE FROM history WHERE owner_id = ?1", params![owner.0])
        .map_err(|e| ServerError::DbError(format!("clear history failed: {e}")))
}

impl HistoryStore for Database {
    fn append_history(
        &self,
        owner: OwnerId,
        entry: &NewHistoryEntry,
        now: DateTime<Utc>,
    ) -> Result<i64, ServerError> {
        self.with_conn(|conn| append_history(conn, owner, entry, now))
    }

    fn list_history(
        &self,
        owner: OwnerId,
        limit: Option<usize>,
    ) -> Result<Vec<HistoryEntry>, ServerError> {
        self.with_conn(|conn| list_history(conn, owner, limit))
    }

    fn clear_history(&self, owner: OwnerId) -> Result<usize, ServerError> {
        self.with_conn(|conn| clear_history(conn, owner))
    }
}
