// src/domain/records.rs
//
// Client mutations and the audit entries that go with them. Every write here lands
// one history record; reads are owner-scoped and empty for anonymous callers.

use crate::domain::client::{Client, ClientId, ClientUpdate, MeetingStatus, NewClient};
use crate::domain::history::{
    aggregate, HistoryAction, HistoryEntry, HistoryStats, NewHistoryEntry, PROFILE_FEED_LEN,
};
use crate::domain::meeting_time::normalize_meeting_date;
use crate::domain::ports::{ClientStore, HistoryStore, Identity, Transactional};
use crate::errors::ServerError;
use chrono::{DateTime, Utc};

fn require_name(name: &str) -> Result<(), ServerError> {
    if name.trim().is_empty() {
        return Err(ServerError::BadRequest("full name is required".into()));
    }
    Ok(())
}

pub fn create_client<S>(
    store: &S,
    identity: &Identity,
    mut client: NewClient,
    now: DateTime<Utc>,
) -> Result<ClientId, ServerError>
where
    S: ClientStore + HistoryStore + Transactional + ?Sized,
{
    let owner = identity.require_owner()?;
    require_name(&client.full_name)?;
    client.full_name = client.full_name.trim().to_string();
    client.meeting_date = normalize_meeting_date(&client.meeting_date)?;

    let id = store.in_transaction(|| {
        let id = store.insert_client(owner, &client, now)?;
        store.append_history(
            owner,
            &NewHistoryEntry::new(
                id,
                HistoryAction::Created,
                format!("Создан новый клиент: {}", client.full_name),
            ),
            now,
        )?;
        Ok(id)
    })?;

    tracing::info!(owner = owner.0, client = id.0, "client created");
    Ok(id)
}

pub fn update_client<S>(
    store: &S,
    identity: &Identity,
    id: ClientId,
    mut update: ClientUpdate,
    now: DateTime<Utc>,
) -> Result<(), ServerError>
where
    S: ClientStore + HistoryStore + Transactional + ?Sized,
{
    let owner = identity.require_owner()?;
    if let Some(name) = update.full_name.as_mut() {
        require_name(name)?;
        *name = name.trim().to_string();
    }
    if let Some(raw) = update.meeting_date.as_deref() {
        update.meeting_date = Some(normalize_meeting_date(raw)?);
    }

    store.in_transaction(|| {
        store.update_client(owner, id, &update)?;
        let name = match &update.full_name {
            Some(name) => name.clone(),
            None => store
                .get_client(owner, id)?
                .map(|c| c.full_name)
                .unwrap_or_default(),
        };
        store.append_history(
            owner,
            &NewHistoryEntry::new(id, HistoryAction::Updated, format!("Обновлены данные: {name}")),
            now,
        )
    })?;

    tracing::info!(owner = owner.0, client = id.0, "client updated");
    Ok(())
}

/// Status changes are journaled as meeting outcomes; going back to planned counts
/// as an ordinary update.
pub fn set_status<S>(
    store: &S,
    identity: &Identity,
    id: ClientId,
    status: MeetingStatus,
    now: DateTime<Utc>,
) -> Result<(), ServerError>
where
    S: ClientStore + HistoryStore + Transactional + ?Sized,
{
    let owner = identity.require_owner()?;
    store.in_transaction(|| {
        store.update_client(owner, id, &ClientUpdate::status(status))?;
        store.append_history(
            owner,
            &NewHistoryEntry::new(
                id,
                HistoryAction::for_status(status),
                format!("Статус встречи изменён на: {}", status.as_str()),
            ),
            now,
        )
    })?;

    tracing::info!(owner = owner.0, client = id.0, status = status.as_str(), "status changed");
    Ok(())
}

pub fn delete_client<S>(
    store: &S,
    identity: &Identity,
    id: ClientId,
    now: DateTime<Utc>,
) -> Result<(), ServerError>
where
    S: ClientStore + HistoryStore + Transactional + ?Sized,
{
    let owner = identity.require_owner()?;
    store.in_transaction(|| {
        let client = store.get_client(owner, id)?.ok_or(ServerError::NotFound)?;
        store.delete_client(owner, id)?;
        store.append_history(
            owner,
            &NewHistoryEntry::new(
                id,
                HistoryAction::Deleted,
                format!("Удалён клиент: {}", client.full_name),
            ),
            now,
        )
    })?;

    tracing::info!(owner = owner.0, client = id.0, "client deleted");
    Ok(())
}

/// Wipe every client and history record of the owner. Returns both counts.
pub fn clear_all<S>(store: &S, identity: &Identity) -> Result<(usize, usize), ServerError>
where
    S: ClientStore + HistoryStore + Transactional + ?Sized,
{
    let owner = identity.require_owner()?;
    let (clients, entries) = store.in_transaction(|| {
        Ok((store.delete_all_clients(owner)?, store.clear_history(owner)?))
    })?;
    tracing::warn!(owner = owner.0, clients, entries, "all data cleared");
    Ok((clients, entries))
}

pub fn search_clients<S>(store: &S, identity: &Identity, term: &str) -> Result<Vec<Client>, ServerError>
where
    S: ClientStore + ?Sized,
{
    let Some(owner) = identity.owner() else {
        return Ok(Vec::new());
    };
    let mut clients = store.list_clients(owner)?;
    clients.retain(|c| c.matches_search(term));
    Ok(clients)
}

pub fn history_feed<S>(store: &S, identity: &Identity) -> Result<Vec<HistoryEntry>, ServerError>
where
    S: HistoryStore + ?Sized,
{
    match identity.owner() {
        Some(owner) => store.list_history(owner, None),
        None => Ok(Vec::new()),
    }
}

/// Counters over the most recent activity, plus that activity itself.
pub fn recent_activity<S>(
    store: &S,
    identity: &Identity,
) -> Result<(HistoryStats, Vec<HistoryEntry>), ServerError>
where
    S: HistoryStore + ?Sized,
{
    let Some(owner) = identity.owner() else {
        return Ok((HistoryStats::default(), Vec::new()));
    };
    let recent = store.list_history(owner, Some(PROFILE_FEED_LEN))?;
    Ok((aggregate(&recent), recent))
}
