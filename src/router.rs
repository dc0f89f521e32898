use crate::auth::identity::{resolve_identity, AuthChange, AuthEvents};
use crate::auth::magic::{MagicLinkConfig, MagicLinkService};
use crate::auth::sessions::{
    create_session, expired_session_cookie, revoke_session, session_cookie,
    session_token_from_cookie,
};
use crate::config::AppConfig;
use crate::db::connection::Database;
use crate::domain::client::{ClientId, ClientUpdate, MeetingStatus, NewClient};
use crate::domain::gallery::GalleryCursor;
use crate::domain::meeting_time::parse_calendar_date;
use crate::domain::meetings::{meetings_on, upcoming_meetings};
use crate::domain::ports::{ClientStore, HistoryStore, Identity};
use crate::domain::records;
use crate::domain::voice::{parse_transcript, ContactFields};
use crate::errors::ServerError;
use crate::responses::{html_response, redirect, redirect_with_cookie, ResultResp};
use crate::spreadsheets::export_history_xlsx;
use crate::templates::components::contact_fields;
use crate::templates::pages;
use astra::Request;
use chrono::{Local, Utc};
use std::io::Read;
use url::form_urlencoded;

/// Upper bound for a form body; photos travel inline as data URLs.
const MAX_FORM_BYTES: u64 = 32 * 1024 * 1024;

/// Pages a form may send the agent back to.
const REDIRECT_PAGES: [&str; 2] = ["/calendar", "/clients"];

/// Everything a request handler needs, shared by all workers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub events: AuthEvents,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(db: Database, config: AppConfig) -> Self {
        Self {
            db,
            events: AuthEvents::new(),
            config,
        }
    }

    fn magic_links(&self) -> MagicLinkService {
        MagicLinkService::new(MagicLinkConfig {
            ttl_secs: self.config.magic_link_ttl_secs,
            ..MagicLinkConfig::default()
        })
    }
}

/// Decoded `application/x-www-form-urlencoded` pairs, in submission order.
#[derive(Debug, Default)]
struct Form(Vec<(String, String)>);

impl Form {
    fn parse(raw: &[u8]) -> Self {
        Form(form_urlencoded::parse(raw).into_owned().collect())
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn text(&self, name: &str) -> String {
        self.get(name).unwrap_or_default().trim().to_string()
    }

    fn all(&self, name: &str) -> Vec<String> {
        self.0
            .iter()
            .filter(|(k, v)| k == name && !v.is_empty())
            .map(|(_, v)| v.clone())
            .collect()
    }

    fn has(&self, name: &str) -> bool {
        self.0.iter().any(|(k, _)| k == name)
    }
}

fn read_form(req: Request) -> Result<Form, ServerError> {
    let mut body = req.into_body();
    let raw = read_capped(body.reader(), MAX_FORM_BYTES)?;
    Ok(Form::parse(&raw))
}

/// Reads at most `limit` bytes; a longer body is rejected rather than cut short.
fn read_capped(reader: impl Read, limit: u64) -> Result<Vec<u8>, ServerError> {
    let mut raw = Vec::new();
    reader
        .take(limit + 1)
        .read_to_end(&mut raw)
        .map_err(|e| ServerError::BadRequest(format!("unreadable form body: {e}")))?;
    if raw.len() as u64 > limit {
        tracing::warn!(limit, "form body over the size limit");
        return Err(ServerError::BadRequest("form too large".into()));
    }
    Ok(raw)
}

fn parse_status(raw: &str) -> Result<MeetingStatus, ServerError> {
    MeetingStatus::parse(raw).ok_or_else(|| ServerError::BadRequest(format!("unknown status '{raw}'")))
}

/// Only known pages (with an optional query) are followed after a post.
fn local_redirect_target(raw: Option<&str>, fallback: &str) -> String {
    let allowed = |target: &str| {
        let page = target.split('?').next().unwrap_or(target);
        REDIRECT_PAGES.contains(&page) && !target.chars().any(|c| c == '\\' || c.is_control())
    };
    match raw {
        Some(target) if allowed(target) => target.to_string(),
        _ => fallback.to_string(),
    }
}

pub fn handle(req: Request, state: &AppState) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    let query = Form::parse(req.uri().query().unwrap_or_default().as_bytes());
    let cookie = req
        .headers()
        .get("Cookie")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let now = Utc::now();
    let identity = resolve_identity(&state.db, cookie.as_deref(), now.timestamp())?;
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    tracing::debug!(%method, %path, signed_in = identity.owner().is_some(), "request");

    // Public routes
    match (method.as_str(), segments.as_slice()) {
        ("GET", []) => {
            return match identity {
                Identity::Anonymous => html_response(pages::login_page()),
                Identity::Owner { .. } => redirect("/clients"),
            };
        }
        ("GET", ["login"]) => return html_response(pages::login_page()),
        ("POST", ["auth", "request-link"]) => {
            let form = read_form(req)?;
            let issued = state.db.with_conn(|conn| {
                state
                    .magic_links()
                    .request_link(conn, &form.text("email"), now.timestamp())
            })?;
            // Delivery stands in for a mail transport.
            tracing::info!(
                owner = issued.owner.0,
                email = %issued.email,
                expires_at = issued.expires_at,
                link = %issued.link,
                "magic link issued"
            );
            return html_response(pages::check_email_content(&issued.email));
        }
        ("GET", ["auth", "magic"]) => {
            let token = query.text("token");
            let ts = now.timestamp();
            let (owner, session) = state.db.with_conn(|conn| {
                let redeemed = state.magic_links().redeem(conn, &token, ts)?;
                tracing::debug!(owner = redeemed.owner.0, email = %redeemed.email, "magic link redeemed");
                let session =
                    create_session(conn, redeemed.owner, ts, state.config.session_ttl_secs)?;
                Ok((redeemed.owner, session))
            })?;
            state.events.publish(AuthChange::SignedIn { owner });
            return redirect_with_cookie(
                "/clients",
                Some(&session_cookie(&session, state.config.session_ttl_secs)),
            );
        }
        ("POST", ["logout"]) => {
            if let Some(token) = cookie.as_deref().and_then(session_token_from_cookie) {
                let revoked = state
                    .db
                    .with_conn(|conn| revoke_session(conn, token, now.timestamp()))?;
                if let Some(owner) = revoked {
                    state.events.publish(AuthChange::SignedOut { owner });
                }
            }
            return redirect_with_cookie("/login", Some(&expired_session_cookie()));
        }
        _ => {}
    }

    // Everything below needs a signed-in agent.
    let Some(email) = identity.email() else {
        return redirect("/login");
    };
    let db = &state.db;

    match (method.as_str(), segments.as_slice()) {
        ("GET", ["clients"]) => {
            let search = query.text("q");
            let clients = records::search_clients(db, &identity, &search)?;
            html_response(pages::clients_page(&pages::ClientsVm {
                email,
                search: &search,
                clients: &clients,
            }))
        }

        ("POST", ["clients"]) => {
            let form = read_form(req)?;
            let status = match form.get("status") {
                Some(raw) => parse_status(raw)?,
                None => MeetingStatus::default(),
            };
            let client = NewClient {
                full_name: form.text("full_name"),
                phone: form.text("phone"),
                address: form.text("address"),
                meeting_date: form.text("meeting_date"),
                status,
                property_photos: form.all("photo"),
            };
            records::create_client(db, &identity, client, now)?;
            redirect("/clients")
        }

        ("GET", ["clients", id, "edit"]) => {
            let id: ClientId = id.parse()?;
            let owner = identity.require_owner()?;
            let client = db.get_client(owner, id)?.ok_or(ServerError::NotFound)?;
            html_response(pages::edit_client_page(email, &client))
        }

        ("POST", ["clients", id]) => {
            let id: ClientId = id.parse()?;
            let form = read_form(req)?;
            let update = ClientUpdate {
                full_name: form.get("full_name").map(|v| v.trim().to_string()),
                phone: form.get("phone").map(|v| v.trim().to_string()),
                address: form.get("address").map(|v| v.trim().to_string()),
                meeting_date: form.get("meeting_date").map(str::to_string),
                status: form.get("status").map(parse_status).transpose()?,
                property_photos: (form.has("photos_submitted") || form.has("photo"))
                    .then(|| form.all("photo")),
            };
            records::update_client(db, &identity, id, update, now)?;
            redirect("/clients")
        }

        ("POST", ["clients", id, "status"]) => {
            let id: ClientId = id.parse()?;
            let form = read_form(req)?;
            let status = parse_status(form.get("status").unwrap_or_default())?;
            records::set_status(db, &identity, id, status, now)?;
            redirect(&local_redirect_target(form.get("back"), "/calendar"))
        }

        ("POST", ["clients", id, "delete"]) => {
            let id: ClientId = id.parse()?;
            records::delete_client(db, &identity, id, now)?;
            redirect("/clients")
        }

        ("GET", ["clients", id, "photos"]) => {
            let id: ClientId = id.parse()?;
            let owner = identity.require_owner()?;
            let client = db.get_client(owner, id)?.ok_or(ServerError::NotFound)?;
            let index = query.get("i").and_then(|i| i.parse().ok()).unwrap_or(0);
            let cursor = GalleryCursor::new(index, client.property_photos.len());
            html_response(pages::gallery_page(email, &client, cursor))
        }

        ("POST", ["voice", "parse"]) => {
            let form = read_form(req)?;
            let typed = ContactFields {
                full_name: form.text("full_name"),
                phone: form.text("phone"),
                address: form.text("address"),
            };
            let parsed = parse_transcript(form.get("transcript").unwrap_or_default());
            html_response(contact_fields(&parsed.merged_over(&typed)))
        }

        ("GET", ["calendar"]) => {
            let day = match query.get("date").map(str::trim).filter(|d| !d.is_empty()) {
                Some(raw) => parse_calendar_date(raw)
                    .ok_or_else(|| ServerError::BadRequest(format!("invalid date '{raw}'")))?,
                None => Local::now().date_naive(),
            };
            let meetings = meetings_on(db, &identity, day)?;
            html_response(pages::calendar_page(email, day, &meetings))
        }

        ("GET", ["meetings", "upcoming"]) => {
            let local_now = Local::now().naive_local();
            let soon = upcoming_meetings(db, &identity, local_now, state.config.reminder_lead)?;
            html_response(pages::reminders_partial(&soon, local_now))
        }

        ("GET", ["history"]) => {
            let entries = records::history_feed(db, &identity)?;
            html_response(pages::history_page(email, &entries))
        }

        ("POST", ["history", "clear"]) => {
            let owner = identity.require_owner()?;
            let removed = db.clear_history(owner)?;
            tracing::info!(owner = owner.0, removed, "history cleared");
            redirect("/history")
        }

        ("GET", ["history", "export"]) => {
            let entries = records::history_feed(db, &identity)?;
            export_history_xlsx(&entries, &Local::now().format("%Y-%m-%d").to_string())
        }

        ("GET", ["profile"]) => {
            let (stats, recent) = records::recent_activity(db, &identity)?;
            html_response(pages::profile_page(email, &stats, &recent))
        }

        ("POST", ["profile", "clear-all"]) => {
            records::clear_all(db, &identity)?;
            redirect("/profile")
        }

        _ => Err(ServerError::NotFound),
    }
}
