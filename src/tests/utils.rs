use crate::auth::magic::{MagicLinkConfig, MagicLinkService};
use crate::auth::sessions::create_session;
use crate::config::AppConfig;
use crate::db::connection::{init_db, Database};
use crate::router::{handle, AppState};
use astra::{Body, Response};
use http::{Method, Request};
use std::io::Read;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static NEXT_DB: AtomicUsize = AtomicUsize::new(0);

pub fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

/// Fresh file-backed database with the production schema, one per test.
pub fn init_test_db() -> Database {
    let path = std::env::temp_dir().join(format!(
        "realtor_crm_test_{}_{}_{}.sqlite3",
        std::process::id(),
        NEXT_DB.fetch_add(1, Ordering::SeqCst),
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ));
    let db = Database::new(path.to_string_lossy().into_owned());

    init_db(&db, "sql/schema.sql")
        .unwrap_or_else(|e| panic!("Database initialization failed: {e}"));

    db
}

pub fn test_state() -> AppState {
    AppState::new(init_test_db(), AppConfig::default())
}

/// Sign `email` in through the magic-link flow and return the session token.
pub fn sign_in(state: &AppState, email: &str) -> String {
    let now = now_unix();
    let svc = MagicLinkService::new(MagicLinkConfig::default());
    state
        .db
        .with_conn(|conn| {
            let issued = svc.request_link(conn, email, now)?;
            let redeemed = svc.redeem(conn, &issued.token, now)?;
            create_session(conn, redeemed.owner, now, 3600)
        })
        .expect("sign in failed")
}

pub fn get(state: &AppState, uri: &str, session: Option<&str>) -> Response {
    send(state, Method::GET, uri, session, Body::empty())
}

pub fn post_form(state: &AppState, uri: &str, form: &str, session: Option<&str>) -> Response {
    send(
        state,
        Method::POST,
        uri,
        session,
        Body::from(form.as_bytes().to_vec()),
    )
}

fn send(state: &AppState, method: Method, uri: &str, session: Option<&str>, body: Body) -> Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded");
    if let Some(token) = session {
        builder = builder.header("Cookie", format!("session={token}"));
    }
    let req = builder.body(body).unwrap();
    handle(req, state).unwrap_or_else(|e| panic!("{uri} failed: {e}"))
}

/// Like `post_form`, but hands back the handler error instead of panicking.
pub fn try_post_form(
    state: &AppState,
    uri: &str,
    form: &str,
    session: &str,
) -> Result<Response, crate::errors::ServerError> {
    let req = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .header("Cookie", format!("session={session}"))
        .body(Body::from(form.as_bytes().to_vec()))
        .unwrap();
    handle(req, state)
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

pub fn location(resp: &Response) -> &str {
    resp.headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

/// Percent-encode a single form value.
pub fn enc(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
