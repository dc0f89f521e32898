use crate::domain::client::{ClientId, MeetingStatus, OwnerId};
use crate::domain::history::HistoryAction;
use crate::domain::ports::{ClientStore, HistoryStore};
use crate::errors::ServerError;
use crate::router::AppState;
use crate::tests::utils::{
    body_string, enc, get, location, post_form, sign_in, test_state, try_post_form,
};
use rusqlite::params;

fn owner_of(state: &AppState, email: &str) -> OwnerId {
    state
        .db
        .with_conn(|conn| {
            Ok(OwnerId(conn.query_row(
                "select id from users where email = ?",
                params![email],
                |r| r.get(0),
            )?))
        })
        .unwrap()
}

fn add_client(state: &AppState, session: &str, name: &str, meeting: &str, extra: &str) -> ClientId {
    let form = format!(
        "full_name={}&phone={}&address={}&meeting_date={}{}",
        enc(name),
        enc("+7 915 515-15-15"),
        enc("ул. Ленина, 10"),
        enc(meeting),
        extra
    );
    let resp = post_form(state, "/clients", &form, Some(session));
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/clients");

    state
        .db
        .with_conn(|conn| {
            Ok(ClientId(conn.query_row(
                "select id from clients where full_name = ? order by id desc limit 1",
                params![name],
                |r| r.get(0),
            )?))
        })
        .unwrap()
}

#[test]
fn created_client_is_listed_and_journaled() {
    let state = test_state();
    let session = sign_in(&state, "agent@example.com");
    let owner = owner_of(&state, "agent@example.com");

    let id = add_client(&state, &session, "Щемелев Алексей", "2025-09-24T19:00", "");

    let client = state.db.get_client(owner, id).unwrap().unwrap();
    assert_eq!(client.meeting_date, "2025-09-24T19:00:00");
    assert_eq!(client.status, MeetingStatus::Planned);

    let body = body_string(get(&state, "/clients", Some(&session)));
    assert!(body.contains("Щемелев Алексей"));
    assert!(body.contains("24.09.2025 19:00"));

    let history = state.db.list_history(owner, None).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].action, HistoryAction::Created);
    assert_eq!(
        history[0].details.as_deref(),
        Some("Создан новый клиент: Щемелев Алексей")
    );
}

#[test]
fn invalid_meeting_date_is_rejected() {
    let state = test_state();
    let session = sign_in(&state, "agent@example.com");

    let result = try_post_form(
        &state,
        "/clients",
        "full_name=X&meeting_date=tomorrow",
        &session,
    );
    assert!(matches!(result, Err(ServerError::BadRequest(_))));
}

#[test]
fn search_filters_the_list() {
    let state = test_state();
    let session = sign_in(&state, "agent@example.com");
    add_client(&state, &session, "Иванов Иван", "2025-09-24T10:00", "");
    add_client(&state, &session, "Петрова Анна", "2025-09-24T11:00", "");

    let body = body_string(get(
        &state,
        &format!("/clients?q={}", enc("петрова")),
        Some(&session),
    ));
    assert!(body.contains("Петрова Анна"));
    assert!(!body.contains("Иванов Иван"));
}

#[test]
fn edit_updates_fields_and_keeps_photos_when_none_sent() {
    let state = test_state();
    let session = sign_in(&state, "agent@example.com");
    let owner = owner_of(&state, "agent@example.com");
    let photo = "data:image/png;base64,AAAA";
    let id = add_client(
        &state,
        &session,
        "Иванов Иван",
        "2025-09-24T10:00",
        &format!("&photo={}", enc(photo)),
    );

    let edit = body_string(get(&state, &format!("/clients/{id}/edit"), Some(&session)));
    assert!(edit.contains("value=\"2025-09-24T10:00\""));
    assert!(edit.contains(photo));

    let resp = post_form(
        &state,
        &format!("/clients/{id}"),
        &format!("full_name={}&phone=8800&status=cancelled", enc("Иванов И.")),
        Some(&session),
    );
    assert_eq!(resp.status(), 302);

    let client = state.db.get_client(owner, id).unwrap().unwrap();
    assert_eq!(client.full_name, "Иванов И.");
    assert_eq!(client.phone, "8800");
    assert_eq!(client.address, "ул. Ленина, 10");
    assert_eq!(client.status, MeetingStatus::Cancelled);
    assert_eq!(client.property_photos, vec![photo.to_string()]);

    let history = state.db.list_history(owner, None).unwrap();
    assert_eq!(history[0].action, HistoryAction::Updated);
    assert_eq!(history[0].details.as_deref(), Some("Обновлены данные: Иванов И."));
}

#[test]
fn edit_with_empty_photo_list_removes_photos() {
    let state = test_state();
    let session = sign_in(&state, "agent@example.com");
    let owner = owner_of(&state, "agent@example.com");
    let id = add_client(&state, &session, "Иванов Иван", "2025-09-24T10:00", "&photo=a&photo=b");

    post_form(
        &state,
        &format!("/clients/{id}"),
        "photos_submitted=1&photo=b",
        Some(&session),
    );
    assert_eq!(
        state.db.get_client(owner, id).unwrap().unwrap().property_photos,
        vec!["b".to_string()]
    );

    post_form(&state, &format!("/clients/{id}"), "photos_submitted=1", Some(&session));
    assert!(state
        .db
        .get_client(owner, id)
        .unwrap()
        .unwrap()
        .property_photos
        .is_empty());
}

#[test]
fn status_change_redirects_back_and_is_journaled() {
    let state = test_state();
    let session = sign_in(&state, "agent@example.com");
    let owner = owner_of(&state, "agent@example.com");
    let id = add_client(&state, &session, "Иванов Иван", "2025-09-24T10:00", "");

    let resp = post_form(
        &state,
        &format!("/clients/{id}/status"),
        &format!("status=completed&back={}", enc("/calendar?date=2025-09-24")),
        Some(&session),
    );
    assert_eq!(resp.status(), 302);
    assert_eq!(location(&resp), "/calendar?date=2025-09-24");

    let history = state.db.list_history(owner, None).unwrap();
    assert_eq!(history[0].action, HistoryAction::MeetingCompleted);
    assert_eq!(
        history[0].details.as_deref(),
        Some("Статус встречи изменён на: completed")
    );

    let bad = try_post_form(&state, &format!("/clients/{id}/status"), "status=done", &session);
    assert!(matches!(bad, Err(ServerError::BadRequest(_))));
}

#[test]
fn delete_removes_client_but_keeps_history() {
    let state = test_state();
    let session = sign_in(&state, "agent@example.com");
    let owner = owner_of(&state, "agent@example.com");
    let id = add_client(&state, &session, "Иванов Иван", "2025-09-24T10:00", "");

    let resp = post_form(&state, &format!("/clients/{id}/delete"), "", Some(&session));
    assert_eq!(resp.status(), 302);
    assert!(state.db.get_client(owner, id).unwrap().is_none());

    let actions: Vec<_> = state
        .db
        .list_history(owner, None)
        .unwrap()
        .into_iter()
        .map(|e| e.action)
        .collect();
    assert_eq!(actions, vec![HistoryAction::Deleted, HistoryAction::Created]);
}

#[test]
fn other_agents_clients_are_invisible() {
    let state = test_state();
    let alice = sign_in(&state, "alice@example.com");
    let bob = sign_in(&state, "bob@example.com");
    let id = add_client(&state, &alice, "Клиент Алисы", "2025-09-24T10:00", "");

    assert!(!body_string(get(&state, "/clients", Some(&bob))).contains("Клиент Алисы"));

    let edit = try_post_form(&state, &format!("/clients/{id}"), "phone=1", &bob);
    assert!(matches!(edit, Err(ServerError::NotFound)));
    let delete = try_post_form(&state, &format!("/clients/{id}/delete"), "", &bob);
    assert!(matches!(delete, Err(ServerError::NotFound)));
}

#[test]
fn gallery_navigation_wraps_around() {
    let state = test_state();
    let session = sign_in(&state, "agent@example.com");
    let id = add_client(
        &state,
        &session,
        "Иванов Иван",
        "2025-09-24T10:00",
        "&photo=p0&photo=p1&photo=p2",
    );

    let first = body_string(get(&state, &format!("/clients/{id}/photos"), Some(&session)));
    assert!(first.contains("src=\"p0\""));
    assert!(first.contains("1 / 3"));
    assert!(first.contains(&format!("/clients/{id}/photos?i=2")));
    assert!(first.contains(&format!("/clients/{id}/photos?i=1")));

    let last = body_string(get(&state, &format!("/clients/{id}/photos?i=2"), Some(&session)));
    assert!(last.contains("src=\"p2\""));
    assert!(last.contains(&format!("/clients/{id}/photos?i=0")));
}

#[test]
fn voice_parse_fills_only_dictated_fields() {
    let state = test_state();
    let session = sign_in(&state, "agent@example.com");

    let form = format!(
        "transcript={}&full_name={}&phone=&address={}",
        enc("ФИО — Щемелев Алексей. Телефон — 9155151"),
        enc("Старое имя"),
        enc("ул. Мира, 1"),
    );
    let resp = post_form(&state, "/voice/parse", &form, Some(&session));
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("value=\"Щемелев Алексей\""));
    assert!(body.contains("value=\"9155151\""));
    assert!(body.contains("value=\"ул. Мира, 1\""));
    assert!(!body.contains("<html"));
}

#[test]
fn oversized_form_is_rejected_without_storing_anything() {
    let state = test_state();
    let session = sign_in(&state, "agent@example.com");
    let owner = owner_of(&state, "agent@example.com");

    let form = format!(
        "full_name=Big&meeting_date={}&photo=data:{}&status=cancelled",
        enc("2025-09-24T10:00"),
        "x".repeat(32 * 1024 * 1024)
    );
    let result = try_post_form(&state, "/clients", &form, &session);

    assert!(matches!(result, Err(ServerError::BadRequest(msg)) if msg == "form too large"));
    assert!(state.db.list_clients(owner).unwrap().is_empty());
    assert!(state.db.list_history(owner, None).unwrap().is_empty());
}

#[test]
fn status_change_ignores_off_site_back_targets() {
    let state = test_state();
    let session = sign_in(&state, "agent@example.com");
    let id = add_client(&state, &session, "Иванов Иван", "2025-09-24T10:00", "");

    for back in ["/\\evil.example", "//evil.example", "https://evil.example"] {
        let resp = post_form(
            &state,
            &format!("/clients/{id}/status"),
            &format!("status=cancelled&back={}", enc(back)),
            Some(&session),
        );
        assert_eq!(location(&resp), "/calendar", "{back}");
    }
}

#[test]
fn client_write_is_undone_when_the_history_insert_fails() {
    let state = test_state();
    let session = sign_in(&state, "agent@example.com");
    let owner = owner_of(&state, "agent@example.com");
    let id = add_client(&state, &session, "Иванов Иван", "2025-09-24T10:00", "");

    state
        .db
        .with_conn(|conn| Ok(conn.execute_batch("drop table history")?))
        .unwrap();

    let created = try_post_form(
        &state,
        "/clients",
        &format!("full_name=Petrov&meeting_date={}", enc("2025-09-25T10:00")),
        &session,
    );
    assert!(matches!(created, Err(ServerError::DbError(_))));

    let status = try_post_form(&state, &format!("/clients/{id}/status"), "status=completed", &session);
    assert!(matches!(status, Err(ServerError::DbError(_))));

    let clients = state.db.list_clients(owner).unwrap();
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0].status, MeetingStatus::Planned);
}
