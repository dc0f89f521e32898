use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{body_string, enc, get, post_form, sign_in, test_state};
use astra::Body;
use chrono::{Duration, Local};
use http::{Method, Request};

fn add(state: &crate::router::AppState, session: &str, name: &str, meeting: &str) {
    let form = format!("full_name={}&meeting_date={}", enc(name), enc(meeting));
    assert_eq!(post_form(state, "/clients", &form, Some(session)).status(), 302);
}

#[test]
fn calendar_lists_only_that_days_meetings_in_order() {
    let state = test_state();
    let session = sign_in(&state, "agent@example.com");
    add(&state, &session, "Вечер", "2025-09-24T23:59");
    add(&state, &session, "Утро", "2025-09-24T00:00");
    add(&state, &session, "Вчера", "2025-09-23T23:59");
    add(&state, &session, "Завтра", "2025-09-25T00:00");

    let body = body_string(get(&state, "/calendar?date=2025-09-24", Some(&session)));
    assert!(body.contains("24.09.2025"));

    let morning = body.find("Утро").expect("morning meeting listed");
    let evening = body.find("Вечер").expect("evening meeting listed");
    assert!(morning < evening);
    assert!(!body.contains("Вчера"));
    assert!(!body.contains("Завтра"));
}

#[test]
fn empty_day_renders_a_notice() {
    let state = test_state();
    let session = sign_in(&state, "agent@example.com");

    let resp = get(&state, "/calendar?date=2030-01-01", Some(&session));
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("На этот день встреч нет."));
}

#[test]
fn calendar_defaults_to_today() {
    let state = test_state();
    let session = sign_in(&state, "agent@example.com");

    let body = body_string(get(&state, "/calendar", Some(&session)));
    assert!(body.contains(&Local::now().date_naive().format("%d.%m.%Y").to_string()));
}

#[test]
fn malformed_date_is_a_bad_request() {
    let state = test_state();
    let session = sign_in(&state, "agent@example.com");

    let req = Request::builder()
        .method(Method::GET)
        .uri("/calendar?date=24.09.2025")
        .header("Cookie", format!("session={session}"))
        .body(Body::empty())
        .unwrap();
    assert!(matches!(handle(req, &state), Err(ServerError::BadRequest(_))));
}

#[test]
fn upcoming_poll_lists_planned_meetings_within_the_lead_time() {
    let state = test_state();
    let session = sign_in(&state, "agent@example.com");
    let now = Local::now().naive_local();
    let stamp = |d: Duration| (now + d).format("%Y-%m-%dT%H:%M:%S").to_string();

    add(&state, &session, "Скоро", &stamp(Duration::minutes(5)));
    add(&state, &session, "Позже", &stamp(Duration::minutes(90)));

    let body = body_string(get(&state, "/meetings/upcoming", Some(&session)));
    assert!(body.contains("Скоро"));
    assert!(!body.contains("Позже"));
}

#[test]
fn upcoming_poll_is_empty_without_meetings() {
    let state = test_state();
    let session = sign_in(&state, "agent@example.com");

    let resp = get(&state, "/meetings/upcoming", Some(&session));
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).is_empty());
}
