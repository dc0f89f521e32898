// src/domain/meetings.rs

use crate::domain::client::{Client, MeetingStatus};
use crate::domain::meeting_time::{day_bounds, format_stamp};
use crate::domain::ports::{ClientStore, Identity};
use crate::errors::ServerError;
use chrono::{Duration, NaiveDate, NaiveDateTime};

/// All meetings on the given calendar day for the signed-in owner, earliest first.
///
/// Anonymous callers get an empty list rather than an error; the page route guard is
/// what decides about access. Both day bounds are inclusive and compared as text
/// against the stored canonical strings. Storage errors are passed through unchanged.
pub fn meetings_on<S>(store: &S, identity: &Identity, day: NaiveDate) -> Result<Vec<Client>, ServerError>
where
    S: ClientStore + ?Sized,
{
    let Some(owner) = identity.owner() else {
        return Ok(Vec::new());
    };

    let (start, end) = day_bounds(day);
    let meetings = store.meetings_between(owner, &start, &end)?;

    tracing::debug!(owner = owner.0, %day, count = meetings.len(), "meetings for day");
    Ok(meetings)
}

/// Planned meetings starting within `[now, now + lead]`, earliest first. Used by the
/// reminder poll; a window that crosses midnight queries both days.
pub fn upcoming_meetings<S>(
    store: &S,
    identity: &Identity,
    now: NaiveDateTime,
    lead: Duration,
) -> Result<Vec<Client>, ServerError>
where
    S: ClientStore + ?Sized,
{
    if identity.owner().is_none() {
        return Ok(Vec::new());
    }

    let until = now + lead.max(Duration::zero());
    let (from_stamp, until_stamp) = (format_stamp(now), format_stamp(until));

    let mut upcoming = Vec::new();
    let mut day = now.date();
    while day <= until.date() {
        upcoming.extend(
            meetings_on(store, identity, day)?
                .into_iter()
                .filter(|c| c.status == MeetingStatus::Planned)
                .filter(|c| {
                    c.meeting_date.as_str() >= from_stamp.as_str()
                        && c.meeting_date.as_str() <= until_stamp.as_str()
                }),
        );
        let Some(next) = day.succ_opt() else {
            break;
        };
        day = next;
    }

    Ok(upcoming)
}
