// src/auth/identity.rs
use crate::auth::sessions::{load_identity, session_token_from_cookie};
use crate::db::connection::Database;
use crate::domain::client::OwnerId;
use crate::domain::ports::Identity;
use crate::errors::ServerError;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};

/// Sign-in state transitions, pushed to every subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthChange {
    SignedIn { owner: OwnerId },
    SignedOut { owner: OwnerId },
}

/// Fan-out of `AuthChange` notifications. Cloning shares the subscriber list.
#[derive(Clone, Default)]
pub struct AuthEvents {
    subscribers: Arc<Mutex<Vec<Sender<AuthChange>>>>,
}

impl AuthEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Receiver<AuthChange> {
        let (tx, rx) = channel();
        match self.subscribers.lock() {
            Ok(mut subs) => subs.push(tx),
            Err(poisoned) => poisoned.into_inner().push(tx),
        }
        rx
    }

    /// Deliver to every live subscriber; dropped receivers are pruned.
    pub fn publish(&self, change: AuthChange) {
        let mut subs = match self.subscribers.lock() {
            Ok(subs) => subs,
            Err(poisoned) => poisoned.into_inner(),
        };
        subs.retain(|tx| tx.send(change).is_ok());
        tracing::debug!(?change, subscribers = subs.len(), "auth change published");
    }
}

/// Who the request is acting for, from its `Cookie` header.
pub fn resolve_identity(
    db: &Database,
    cookie_header: Option<&str>,
    now: i64,
) -> Result<Identity, ServerError> {
    let Some(token) = cookie_header.and_then(session_token_from_cookie) else {
        return Ok(Identity::Anonymous);
    };
    db.with_conn(|conn| load_identity(conn, token, now))
}
