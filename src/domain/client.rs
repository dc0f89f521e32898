// src/domain/client.rs

use crate::errors::ServerError;
use std::fmt;

/// The identity a record belongs to. Every read and write is scoped by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId(pub i64);

/// Storage-assigned client id. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(pub i64);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ClientId {
    type Err = ServerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>()
            .map(ClientId)
            .map_err(|_| ServerError::NotFound)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeetingStatus {
    #[default]
    Planned,
    Completed,
    Cancelled,
}

impl MeetingStatus {
    pub const ALL: [MeetingStatus; 3] = [
        MeetingStatus::Planned,
        MeetingStatus::Completed,
        MeetingStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MeetingStatus::Planned => "planned",
            MeetingStatus::Completed => "completed",
            MeetingStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "planned" => Some(MeetingStatus::Planned),
            "completed" => Some(MeetingStatus::Completed),
            "cancelled" => Some(MeetingStatus::Cancelled),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MeetingStatus::Planned => "Запланирована",
            MeetingStatus::Completed => "Состоялась",
            MeetingStatus::Cancelled => "Отменена",
        }
    }
}

/// A client record as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    pub id: ClientId,
    pub full_name: String,
    pub phone: String,
    pub address: String,
    /// Canonical `YYYY-MM-DDTHH:MM:SS`, see `meeting_time`.
    pub meeting_date: String,
    pub status: MeetingStatus,
    /// Inlined image data, in display order. The first one is the card thumbnail.
    pub property_photos: Vec<String>,
    pub created_at: String,
}

impl Client {
    pub fn thumbnail(&self) -> Option<&str> {
        self.property_photos.first().map(String::as_str)
    }

    /// Case-insensitive match on name or address, plain substring match on phone.
    /// An empty term matches everything.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim();
        if term.is_empty() {
            return true;
        }
        let needle = term.to_lowercase();
        self.full_name.to_lowercase().contains(&needle)
            || self.phone.contains(term)
            || self.address.to_lowercase().contains(&needle)
    }
}

/// Insert payload. `meeting_date` must already be canonical.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewClient {
    pub full_name: String,
    pub phone: String,
    pub address: String,
    pub meeting_date: String,
    pub status: MeetingStatus,
    pub property_photos: Vec<String>,
}

/// Partial update. `None` leaves the stored field as it is.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClientUpdate {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub meeting_date: Option<String>,
    pub status: Option<MeetingStatus>,
    pub property_photos: Option<Vec<String>>,
}

impl ClientUpdate {
    pub fn status(status: MeetingStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge into an existing record.
    #[cfg(test)]
    pub fn apply(&self, client: &mut Client) {
        if let Some(v) = &self.full_name {
            client.full_name = v.clone();
        }
        if let Some(v) = &self.phone {
            client.phone = v.clone();
        }
        if let Some(v) = &self.address {
            client.address = v.clone();
        }
        if let Some(v) = &self.meeting_date {
            client.meeting_date = v.clone();
        }
        if let Some(v) = self.status {
            client.status = v;
        }
        if let Some(v) = &self.property_photos {
            client.property_photos = v.clone();
        }
    }
}
