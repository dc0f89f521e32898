use crate::tests::utils::{body_string, enc, get, location, post_form, sign_in, test_state};

fn add(state: &crate::router::AppState, session: &str, name: &str) {
    let form = format!("full_name={}&meeting_date=2025-09-24T10%3A00", enc(name));
    assert_eq!(post_form(state, "/clients", &form, Some(session)).status(), 302);
}

fn stat(body: &str, id: &str) -> String {
    let marker = format!("id=\"{id}\">");
    let start = body.find(&marker).map(|i| i + marker.len()).unwrap_or(0);
    body[start..].chars().take_while(|c| c.is_ascii_digit()).collect()
}

#[test]
fn history_page_shows_newest_first() {
    let state = test_state();
    let session = sign_in(&state, "agent@example.com");
    add(&state, &session, "Первый");
    add(&state, &session, "Второй");

    let body = body_string(get(&state, "/history", Some(&session)));
    let second = body.find("Создан новый клиент: Второй").expect("second entry");
    let first = body.find("Создан новый клиент: Первый").expect("first entry");
    assert!(second < first);
}

#[test]
fn profile_counts_recent_actions() {
    let state = test_state();
    let session = sign_in(&state, "agent@example.com");
    add(&state, &session, "Первый");
    add(&state, &session, "Второй");

    let body = body_string(get(&state, "/profile", Some(&session)));
    assert!(body.contains("agent@example.com"));
    assert_eq!(stat(&body, "stat-created"), "2");
    assert_eq!(stat(&body, "stat-updated"), "0");
    assert_eq!(stat(&body, "stat-deleted"), "0");
}

#[test]
fn history_export_is_a_workbook_download() {
    let state = test_state();
    let session = sign_in(&state, "agent@example.com");
    add(&state, &session, "Первый");

    let resp = get(&state, "/history/export", Some(&session));
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    let disposition = resp
        .headers()
        .get("Content-Disposition")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"history_"));
}

#[test]
fn clearing_history_keeps_clients() {
    let state = test_state();
    let session = sign_in(&state, "agent@example.com");
    add(&state, &session, "Первый");

    let resp = post_form(&state, "/history/clear", "", Some(&session));
    assert_eq!(location(&resp), "/history");

    assert!(body_string(get(&state, "/history", Some(&session))).contains("История пуста."));
    assert!(body_string(get(&state, "/clients", Some(&session))).contains("Первый"));
}

#[test]
fn clear_all_wipes_clients_and_history() {
    let state = test_state();
    let session = sign_in(&state, "agent@example.com");
    add(&state, &session, "Первый");

    let resp = post_form(&state, "/profile/clear-all", "", Some(&session));
    assert_eq!(location(&resp), "/profile");

    assert!(!body_string(get(&state, "/clients", Some(&session))).contains("Первый"));
    let profile = body_string(get(&state, "/profile", Some(&session)));
    assert_eq!(stat(&profile, "stat-created"), "0");
}
