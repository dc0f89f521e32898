// src/domain/ports.rs
//
// The storage and identity collaborators the core talks to. The SQLite adapters live
// in `crate::db`; tests use in-memory doubles.

use crate::domain::client::{Client, ClientId, ClientUpdate, NewClient, OwnerId};
use crate::domain::history::{HistoryEntry, NewHistoryEntry};
use crate::errors::ServerError;
use chrono::{DateTime, Utc};

/// Who the current request acts for. Passed explicitly into every core operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Identity {
    #[default]
    Anonymous,
    Owner { owner: OwnerId, email: String },
}

impl Identity {
    pub fn owner(&self) -> Option<OwnerId> {
        match self {
            Identity::Anonymous => None,
            Identity::Owner { owner, .. } => Some(*owner),
        }
    }

    pub fn email(&self) -> Option<&str> {
        match self {
            Identity::Anonymous => None,
            Identity::Owner { email, .. } => Some(email),
        }
    }

    /// Route guard: anonymous callers are sent to sign in.
    pub fn require_owner(&self) -> Result<OwnerId, ServerError> {
        self.owner()
            .ok_or_else(|| ServerError::Unauthorized("sign in required".into()))
    }
}

/// Owner-scoped client documents.
pub trait ClientStore {
    fn insert_client(
        &self,
        owner: OwnerId,
        client: &NewClient,
        now: DateTime<Utc>,
    ) -> Result<ClientId, ServerError>;

    /// Partial merge. `NotFound` when the id does not exist for this owner.
    fn update_client(
        &self,
        owner: OwnerId,
        id: ClientId,
        update: &ClientUpdate,
    ) -> Result<(), ServerError>;

    /// `NotFound` when the id does not exist for this owner.
    fn delete_client(&self, owner: OwnerId, id: ClientId) -> Result<(), ServerError>;

    fn get_client(&self, owner: OwnerId, id: ClientId) -> Result<Option<Client>, ServerError>;

    /// Newest first by `created_at`.
    fn list_clients(&self, owner: OwnerId) -> Result<Vec<Client>, ServerError>;

    /// `start <= meeting_date <= end` by text comparison, ascending by `meeting_date`.
    fn meetings_between(
        &self,
        owner: OwnerId,
        start: &str,
        end: &str,
    ) -> Result<Vec<Client>, ServerError>;

    fn delete_all_clients(&self, owner: OwnerId) -> Result<usize, ServerError>;
}

/// Owner-scoped, append-only audit log.
pub trait HistoryStore {
    fn append_history(
        &self,
        owner: OwnerId,
        entry: &NewHistoryEntry,
        now: DateTime<Utc>,
    ) -> Result<i64, ServerError>;

    /// Newest first. `limit = None` returns everything.
    fn list_history(
        &self,
        owner: OwnerId,
        limit: Option<usize>,
    ) -> Result<Vec<HistoryEntry>, ServerError>;

    fn clear_history(&self, owner: OwnerId) -> Result<usize, ServerError>;
}

/// Groups several store calls into one unit: either all of them land or none do.
pub trait Transactional {
    fn in_transaction<T, F>(&self, f: F) -> Result<T, ServerError>
    where
        F: FnOnce() -> Result<T, ServerError>;
}
