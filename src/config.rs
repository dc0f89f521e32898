// src/config.rs
use crate::errors::ServerError;
use chrono::Duration;
use std::net::SocketAddr;

const DEFAULT_DB_PATH: &str = "realtor_crm.sqlite3";
const DEFAULT_SCHEMA_PATH: &str = "sql/schema.sql";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_MAX_WORKERS: usize = 8;
const DEFAULT_SESSION_TTL_SECS: i64 = 60 * 60 * 24 * 7;
const DEFAULT_MAGIC_LINK_TTL_SECS: i64 = 15 * 60;
const DEFAULT_REMINDER_LEAD_MINUTES: i64 = 15;
/// Upper bound for the reminder lead: one day.
const MAX_REMINDER_LEAD_MINUTES: i64 = 24 * 60;

/// Runtime settings, read from the process environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: String,
    pub schema_path: String,
    pub bind_addr: SocketAddr,
    pub max_workers: usize,
    pub session_ttl_secs: i64,
    pub magic_link_ttl_secs: i64,
    /// How far ahead the reminder poll looks for planned meetings.
    pub reminder_lead: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.to_string(),
            schema_path: DEFAULT_SCHEMA_PATH.to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            max_workers: DEFAULT_MAX_WORKERS,
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            magic_link_ttl_secs: DEFAULT_MAGIC_LINK_TTL_SECS,
            reminder_lead: Duration::minutes(DEFAULT_REMINDER_LEAD_MINUTES),
        }
    }
}

impl AppConfig {
    /// Load `.env` (if any) and then read `CRM_*` variables.
    pub fn load() -> Result<Self, ServerError> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), ".env loaded"),
            Err(e) => tracing::debug!("no .env loaded ({e}); using process environment"),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Unset keys fall back to defaults,
    /// set-but-invalid keys are an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_raw = lookup("CRM_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|e| ServerError::BadRequest(format!("CRM_BIND_ADDR '{bind_raw}': {e}")))?;

        let max_workers = parse_or(&lookup, "CRM_MAX_WORKERS", DEFAULT_MAX_WORKERS)?;
        if max_workers == 0 {
            return Err(ServerError::BadRequest(
                "CRM_MAX_WORKERS must be at least 1".into(),
            ));
        }

        let reminder_minutes = parse_or(
            &lookup,
            "CRM_REMINDER_LEAD_MINUTES",
            DEFAULT_REMINDER_LEAD_MINUTES,
        )?;
        if !(0..=MAX_REMINDER_LEAD_MINUTES).contains(&reminder_minutes) {
            return Err(ServerError::BadRequest(format!(
                "CRM_REMINDER_LEAD_MINUTES must be between 0 and {MAX_REMINDER_LEAD_MINUTES}"
            )));
        }

        Ok(Self {
            db_path: lookup("CRM_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string()),
            schema_path: lookup("CRM_SCHEMA_PATH")
                .unwrap_or_else(|| DEFAULT_SCHEMA_PATH.to_string()),
            bind_addr,
            max_workers,
            session_ttl_secs: parse_or(&lookup, "CRM_SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?,
            magic_link_ttl_secs: parse_or(
                &lookup,
                "CRM_MAGIC_LINK_TTL_SECS",
                DEFAULT_MAGIC_LINK_TTL_SECS,
            )?,
            reminder_lead: Duration::minutes(reminder_minutes),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ServerError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ServerError::BadRequest(format!("{key} '{raw}': {e}"))),
    }
}
