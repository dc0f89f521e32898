// src/auth/magic.rs
use crate::errors::ServerError;
use rusqlite::Connection;

use crate::auth::token::{hash_token, new_secret};
use crate::db::auth as db_auth;
use crate::domain::client::OwnerId;

#[derive(Debug, Clone)]
pub struct MagicLinkConfig {
    /// TTL for magic links in seconds.
    pub ttl_secs: i64,
    /// Relative path used when building links, e.g. "/auth/magic".
    pub magic_path: String,
}

impl Default for MagicLinkConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 15 * 60,
            magic_path: "/auth/magic".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IssuedMagicLink {
    pub email: String,
    pub owner: OwnerId,
    /// Raw token (never store this in DB).
    pub token: String,
    pub expires_at: i64,
    /// Relative URL like "/auth/magic?token=..."
    pub link: String,
}

#[derive(Debug, Clone)]
pub struct RedeemedMagicLink {
    pub owner: OwnerId,
    pub email: String,
}

pub struct MagicLinkService {
    cfg: MagicLinkConfig,
}

impl MagicLinkService {
    pub fn new(cfg: MagicLinkConfig) -> Self {
        Self { cfg }
    }

    /// Trim + lowercase, minimal sanity check.
    pub fn normalize_email(email: &str) -> Result<String, ServerError> {
        let e = email.trim().to_lowercase();
        if e.is_empty() || !e.contains('@') || e.starts_with('@') || e.ends_with('@') {
            return Err(ServerError::BadRequest("invalid email".into()));
        }
        Ok(e)
    }

    fn build_link(&self, token: &str) -> String {
        format!("{}?token={}", self.cfg.magic_path, token)
    }

    /// Sign-up and sign-in are the same step: the account is created on first request
    /// and a single-use link is stored as a hash.
    pub fn request_link(
        &self,
        conn: &Connection,
        email: &str,
        now: i64,
    ) -> Result<IssuedMagicLink, ServerError> {
        let email = Self::normalize_email(email)?;
        let owner = db_auth::get_or_create_user(conn, &email, now)?;

        let token = new_secret();
        let expires_at = now + self.cfg.ttl_secs;
        db_auth::insert_magic_link(conn, owner, &hash_token(&token), now, expires_at)?;

        Ok(IssuedMagicLink {
            link: self.build_link(&token),
            email,
            owner,
            token,
            expires_at,
        })
    }

    /// Redeem a link once and record the login time.
    pub fn redeem(
        &self,
        conn: &mut Connection,
        token: &str,
        now: i64,
    ) -> Result<RedeemedMagicLink, ServerError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ServerError::BadRequest("missing token".into()));
        }

        let Some(owner) = db_auth::consume_magic_link(conn, &hash_token(token), now)? else {
            return Err(ServerError::Unauthorized("invalid or expired link".into()));
        };

        db_auth::touch_last_login(conn, owner, now)?;
        let email = db_auth::user_email(conn, owner)?
            .ok_or_else(|| ServerError::DbError("user vanished during sign-in".into()))?;

        Ok(RedeemedMagicLink { owner, email })
    }
}
