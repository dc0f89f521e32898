// src/auth/sessions.rs
use crate::auth::token::{hash_token, new_secret};
use crate::domain::client::OwnerId;
use crate::domain::ports::Identity;
use crate::errors::ServerError;
use rusqlite::{params, Connection, OptionalExtension};

pub const SESSION_COOKIE: &str = "session";

/// Start a session for `owner` and return the raw cookie value.
pub fn create_session(
    conn: &Connection,
    owner: OwnerId,
    now: i64,
    ttl_secs: i64,
) -> Result<String, ServerError> {
    let raw_token = new_secret();
    let hash = hash_token(&raw_token);

    conn.execute(
        r#"
        insert into sessions (user_id, token_hash, created_at, expires_at)
        values (?, ?, ?, ?)
        "#,
        params![owner.0, hash.as_slice(), now, now + ttl_secs],
    )
    .map_err(|e| ServerError::DbError(format!("create session failed: {e}")))?;

    Ok(raw_token)
}

/// The identity behind a live (unexpired, unrevoked) session, or `Anonymous`.
pub fn load_identity(conn: &Connection, raw_token: &str, now: i64) -> Result<Identity, ServerError> {
    let hash = hash_token(raw_token);

    let row: Option<(i64, String)> = conn
        .query_row(
            r#"
            select u.id, u.email
            from sessions s
            join users u on u.id = s.user_id
            where s.token_hash = ?
              and s.expires_at > ?
              and s.revoked_at is null
            "#,
            params![hash.as_slice(), now],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()
        .map_err(|e| ServerError::DbError(format!("session lookup failed: {e}")))?;

    Ok(match row {
        Some((id, email)) => Identity::Owner {
            owner: OwnerId(id),
            email,
        },
        None => Identity::Anonymous,
    })
}

/// Revoke a session. Returns the owner it belonged to, if it was live.
pub fn revoke_session(
    conn: &Connection,
    raw_token: &str,
    now: i64,
) -> Result<Option<OwnerId>, ServerError> {
    let hash = hash_token(raw_token);

    let owner: Option<i64> = conn
        .query_row(
            "select user_id from sessions where token_hash = ? and revoked_at is null",
            params![hash.as_slice()],
            |r| r.get(0),
        )
        .optional()
        .map_err(|e| ServerError::DbError(format!("session lookup failed: {e}")))?;

    conn.execute(
        "update sessions set revoked_at = ? where token_hash = ? and revoked_at is null",
        params![now, hash.as_slice()],
    )
    .map_err(|e| ServerError::DbError(format!("revoke session failed: {e}")))?;

    Ok(owner.map(OwnerId))
}

/// Pull the session token out of a `Cookie` header value.
pub fn session_token_from_cookie(header: &str) -> Option<&str> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE && !value.is_empty()).then_some(value)
    })
}

pub fn session_cookie(token: &str, ttl_secs: i64) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={ttl_secs}")
}

pub fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
