// src/domain/history.rs

use crate::domain::client::{ClientId, MeetingStatus};

/// How many recent entries the profile statistics are computed over.
pub const PROFILE_FEED_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryAction {
    Created,
    Updated,
    Deleted,
    MeetingCompleted,
    MeetingCancelled,
}

impl HistoryAction {
    pub fn as_str(self) -> &'static str {
        match self {
            HistoryAction::Created => "created",
            HistoryAction::Updated => "updated",
            HistoryAction::Deleted => "deleted",
            HistoryAction::MeetingCompleted => "meeting_completed",
            HistoryAction::MeetingCancelled => "meeting_cancelled",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "created" => Some(HistoryAction::Created),
            "updated" => Some(HistoryAction::Updated),
            "deleted" => Some(HistoryAction::Deleted),
            "meeting_completed" => Some(HistoryAction::MeetingCompleted),
            "meeting_cancelled" => Some(HistoryAction::MeetingCancelled),
            _ => None,
        }
    }

    /// Journal action for a status change. Going back to planned is a plain update.
    pub fn for_status(status: MeetingStatus) -> Self {
        match status {
            MeetingStatus::Completed => HistoryAction::MeetingCompleted,
            MeetingStatus::Cancelled => HistoryAction::MeetingCancelled,
            MeetingStatus::Planned => HistoryAction::Updated,
        }
    }

    /// Feed text.
    pub fn label(self) -> &'static str {
        match self {
            HistoryAction::Created => "добавлен",
            HistoryAction::Updated => "обновлён",
            HistoryAction::Deleted => "удалён",
            HistoryAction::MeetingCompleted => "встреча состоялась",
            HistoryAction::MeetingCancelled => "встреча отменена",
        }
    }
}

/// A stored audit record. Never mutated once written.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: i64,
    pub client_id: ClientId,
    pub action: HistoryAction,
    /// RFC 3339 UTC, the only sort key (newest first).
    pub timestamp: String,
    pub details: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewHistoryEntry {
    pub client_id: ClientId,
    pub action: HistoryAction,
    pub details: Option<String>,
}

impl NewHistoryEntry {
    pub fn new(client_id: ClientId, action: HistoryAction, details: impl Into<String>) -> Self {
        Self {
            client_id,
            action,
            details: Some(details.into()),
        }
    }
}

/// CRUD counters shown on the profile page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryStats {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
}

/// Count created/updated/deleted actions. Meeting status changes are feed-only and
/// do not land in any counter. The result does not depend on input order.
pub fn aggregate<'a, I>(entries: I) -> HistoryStats
where
    I: IntoIterator<Item = &'a HistoryEntry>,
{
    entries
        .into_iter()
        .fold(HistoryStats::default(), |mut acc, entry| {
            match entry.action {
                HistoryAction::Created => acc.created += 1,
                HistoryAction::Updated => acc.updated += 1,
                HistoryAction::Deleted => acc.deleted += 1,
                HistoryAction::MeetingCompleted | HistoryAction::MeetingCancelled => {}
            }
            acc
        })
}
