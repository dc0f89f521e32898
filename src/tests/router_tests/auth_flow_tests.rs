use crate::auth::identity::AuthChange;
use crate::auth::magic::{MagicLinkConfig, MagicLinkService};
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{get, location, now_unix, post_form, sign_in, test_state};
use astra::Body;
use http::{Method, Request};

#[test]
fn magic_link_signs_in_sets_cookie_and_notifies() {
    let state = test_state();
    let changes = state.events.subscribe();

    let issued = state
        .db
        .with_conn(|conn| {
            MagicLinkService::new(MagicLinkConfig::default()).request_link(
                conn,
                "c@d.com",
                now_unix(),
            )
        })
        .unwrap();

    let resp = get(&state, &issued.link, None);
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/clients");

    let cookie = resp
        .headers()
        .get("Set-Cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    assert!(cookie.starts_with("session="));
    assert!(cookie.contains("HttpOnly"));

    assert_eq!(
        changes.try_recv().unwrap(),
        AuthChange::SignedIn {
            owner: issued.owner
        }
    );

    // The cookie works.
    let token = cookie
        .trim_start_matches("session=")
        .split(';')
        .next()
        .unwrap_or("")
        .to_string();
    assert_eq!(get(&state, "/clients", Some(&token)).status(), 200);
}

#[test]
fn magic_link_cannot_be_reused() {
    let state = test_state();
    let issued = state
        .db
        .with_conn(|conn| {
            MagicLinkService::new(MagicLinkConfig::default()).request_link(
                conn,
                "c@d.com",
                now_unix(),
            )
        })
        .unwrap();

    assert_eq!(get(&state, &issued.link, None).status(), 302);

    let req = Request::builder()
        .method(Method::GET)
        .uri(issued.link.as_str())
        .body(Body::empty())
        .unwrap();
    match handle(req, &state) {
        Err(ServerError::Unauthorized(_)) => {}
        other => panic!("expected Unauthorized, got status {:?}", other.map(|r| r.status())),
    }
}

#[test]
fn logout_revokes_session_and_notifies() {
    let state = test_state();
    let session = sign_in(&state, "agent@example.com");
    let changes = state.events.subscribe();

    let resp = post_form(&state, "/logout", "", Some(&session));
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/login");
    let cookie = resp
        .headers()
        .get("Set-Cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    assert!(cookie.contains("Max-Age=0"));

    assert!(matches!(
        changes.try_recv().unwrap(),
        AuthChange::SignedOut { .. }
    ));

    let after = get(&state, "/clients", Some(&session));
    assert_eq!(location(&after), "/login");
}
