// src/db/clients.rs
use crate::db::connection::Database;
use crate::domain::client::{Client, ClientId, ClientUpdate, MeetingStatus, NewClient, OwnerId};
use crate::domain::ports::ClientStore;
use crate::errors::ServerError;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const CLIENT_COLUMNS: &str =
    "id, full_name, phone, address, meeting_date, status, property_photos, created_at";

fn client_from_row(row: &Row<'_>) -> rusqlite::Result<Client> {
    let status_raw: String = row.get(5)?;
    let status = MeetingStatus::parse(&status_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            5,
            Type::Text,
            Box::new(ServerError::DbError(format!("unknown status '{status_raw}'"))),
        )
    })?;

    let photos_raw: String = row.get(6)?;
    let property_photos: Vec<String> = serde_json::from_str(&photos_raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?;

    Ok(Client {
        id: ClientId(row.get(0)?),
        full_name: row.get(1)?,
        phone: row.get(2)?,
        address: row.get(3)?,
        meeting_date: row.get(4)?,
        status,
        property_photos,
        created_at: row.get(7)?,
    })
}

/// Inserts a client for `owner`. `meeting_date` must already be canonical.
pub fn insert_client(
    conn: &Connection,
    owner: OwnerId,
    client: &NewClient,
    now: DateTime<Utc>,
) -> Result<ClientId, ServerError> {
    let photos = serde_json::to_string(&client.property_photos)?;
    conn.execute(
        r#"
        INSERT INTO clients (
            owner_id, full_name, phone, address, meeting_date, status, property_photos, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
        params![
            owner.0,
            &client.full_name,
            &client.phone,
            &client.address,
            &client.meeting_date,
            client.status.as_str(),
            photos,
            now.to_rfc3339_opts(SecondsFormat::Millis, true),
        ],
    )
    .map_err(|e| ServerError::DbError(format!("insert client failed: {e}")))?;

    Ok(ClientId(conn.last_insert_rowid()))
}

/// Merges the given fields into an owned client. Untouched fields keep their values.
pub fn update_client(
    conn: &Connection,
    owner: OwnerId,
    id: ClientId,
    update: &ClientUpdate,
) -> Result<(), ServerError> {
    let mut sets: Vec<&str> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(v) = &update.full_name {
        sets.push("full_name = ?");
        values.push(Value::Text(v.clone()));
    }
    if let Some(v) = &update.phone {
        sets.push("phone = ?");
        values.push(Value::Text(v.clone()));
    }
    if let Some(v) = &update.address {
        sets.push("address = ?");
        values.push(Value::Text(v.clone()));
    }
    if let Some(v) = &update.meeting_date {
        sets.push("meeting_date = ?");
        values.push(Value::Text(v.clone()));
    }
    if let Some(v) = update.status {
        sets.push("status = ?");
        values.push(Value::Text(v.as_str().to_string()));
    }
    if let Some(v) = &update.property_photos {
        sets.push("property_photos = ?");
        values.push(Value::Text(serde_json::to_string(v)?));
    }

    if sets.is_empty() {
        // Nothing to merge; still report unknown ids.
        return match get_client(conn, owner, id)? {
            Some(_) => Ok(()),
            None => Err(ServerError::NotFound),
        };
    }

    values.push(Value::Integer(id.0));
    values.push(Value::Integer(owner.0));
    let sql = format!(
        "UPDATE clients SET {} WHERE id = ? AND owner_id = ?",
        sets.join(", ")
    );

    let updated = conn
        .execute(&sql, params_from_iter(values.iter()))
        .map_err(|e| ServerError::DbError(format!("update client failed: {e}")))?;

    if updated == 0 {
        return Err(ServerError::NotFound);
    }
    Ok(())
}

pub fn delete_client(conn: &Connection, owner: OwnerId, id: ClientId) -> Result<(), ServerError> {
    let deleted = conn
        .execute(
            "DELETE FROM clients WHERE id = ?1 AND owner_id = ?2",
            params![id.0, owner.0],
        )
        .map_err(|e| ServerError::DbError(format!("delete client failed: {e}")))?;

    if deleted == 0 {
        return Err(ServerError::NotFound);
    }
    Ok(())
}

pub fn get_client(
    conn: &Connection,
    owner: OwnerId,
    id: ClientId,
) -> Result<Option<Client>, ServerError> {
    conn.query_row(
        &format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?1 AND owner_id = ?2"),
        params![id.0, owner.0],
        client_from_row,
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("select client failed: {e}")))
}

/// All clients of an owner, newest first.
pub fn list_clients(conn: &Connection, owner: OwnerId) -> Result<Vec<Client>, ServerError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CLIENT_COLUMNS} FROM clients WHERE owner_id = ?1 ORDER BY created_at DESC, id DESC"
    ))?;
    let rows = stmt.query_map(params![owner.0], client_from_row)?;

    let mut clients = Vec::new();
    for row in rows {
        clients.push(row?);
    }
    Ok(clients)
}

/// Clients whose meeting falls in `[start, end]`, compared as text, earliest first.
pub fn meetings_between(
    conn: &Connection,
    owner: OwnerId,
    start: &str,
    end: &str,
) -> Result<Vec<Client>, ServerError> {
    let mut stmt = conn.prepare(&format!(
        r#"
        SELECT {CLIENT_COLUMNS}
        FROM clients
        WHERE owner_id = ?1
          AND meeting_date >= ?2
          AND meeting_date <= ?3
        ORDER BY meeting_date ASC, id ASC
        "#
    ))?;
    let rows = stmt.query_map(params![owner.0, start, end], client_from_row)?;

    let mut clients = Vec::new();
    for row in rows {
        clients.push(row?);
    }
    Ok(clients)
}

pub fn delete_all_clients(conn: &Connection, owner: OwnerId) -> Result<usize, ServerError> {
    conn.execute("DELETE FROM clients WHERE owner_id = ?1", params![owner.0])
        .map_err(|e| ServerError::DbError(format!("delete clients failed: {e}")))
}

impl ClientStore for Database {
    fn insert_client(
        &self,
        owner: OwnerId,
        client: &NewClient,
        now: DateTime<Utc>,
    ) -> Result<ClientId, ServerError> {
        self.with_conn(|conn| insert_client(conn, owner, client, now))
    }

    fn update_client(
        &self,
        owner: OwnerId,
        id: ClientId,
        update: &ClientUpdate,
    ) -> Result<(), ServerError> {
        self.with_conn(|conn| update_client(conn, owner, id, update))
    }

    fn delete_client(&self, owner: OwnerId, id: ClientId) -> Result<(), ServerError> {
        self.with_conn(|conn| delete_client(conn, owner, id))
    }

    fn get_client(&self, owner: OwnerId, id: ClientId) -> Result<Option<Client>, ServerError> {
        self.with_conn(|conn| get_client(conn, owner, id))
    }

    fn list_clients(&self, owner: OwnerId) -> Result<Vec<Client>, ServerError> {
        self.with_conn(|conn| list_clients(conn, owner))
    }

    fn meetings_between(
        &self,
        owner: OwnerId,
        start: &str,
        end: &str,
    ) -> Result<Vec<Client>, ServerError> {
        self.with_conn(|conn| meetings_between(conn, owner, start, end))
    }

    fn delete_all_clients(&self, owner: OwnerId) -> Result<usize, ServerError> {
        self.with_conn(|conn| delete_all_clients(conn, owner))
    }
}
