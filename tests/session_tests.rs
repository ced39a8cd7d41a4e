// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::FakeBackend;
use finpulse::commands::auth;
use finpulse::db;
use finpulse::session::{Session, SessionStore};
use rusqlite::Connection;

fn conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn asha() -> Session {
    Session {
        token: "tok-abc".into(),
        user_id: "u42".into(),
        name: "Asha".into(),
        email: "asha@example.com".into(),
    }
}

#[test]
fn empty_store_has_no_session() {
    let conn = conn();
    let store = SessionStore::new(&conn);
    assert_eq!(store.token().unwrap(), None);
    assert_eq!(store.current().unwrap(), None);
}

#[test]
fn login_then_logout() {
    let conn = conn();
    let store = SessionStore::new(&conn);
    store.login(&asha()).unwrap();
    assert_eq!(store.current().unwrap(), Some(asha()));
    assert_eq!(store.token().unwrap().as_deref(), Some("tok-abc"));

    store.logout().unwrap();
    assert_eq!(store.current().unwrap(), None);
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM session", [], |r| r.get(0))
        .unwrap();
    assert_eq!(rows, 0);
}

#[test]
fn second_login_replaces_first() {
    let conn = conn();
    let store = SessionStore::new(&conn);
    store.login(&asha()).unwrap();
    let other = Session {
        token: "tok-xyz".into(),
        user_id: "u7".into(),
        name: "Ravi".into(),
        email: "ravi@example.com".into(),
    };
    store.login(&other).unwrap();
    assert_eq!(store.current().unwrap(), Some(other));
}

#[test]
fn token_never_serialized() {
    let json = serde_json::to_value(asha()).unwrap();
    assert!(json.get("token").is_none());
    assert_eq!(json["userId"], "u42");
}

#[test]
fn auth_login_persists_backend_session() {
    let conn = conn();
    let store = SessionStore::new(&conn);
    let api = FakeBackend::new();
    let s = auth::login(&api, &store, "asha@example.com", "secret").unwrap();
    assert_eq!(s.token, "tok-123");
    assert_eq!(store.token().unwrap().as_deref(), Some("tok-123"));
    assert_eq!(store.current().unwrap().unwrap().email, "asha@example.com");
    assert_eq!(api.calls(), vec!["POST auth/login"]);
}

#[test]
fn failed_login_leaves_store_untouched() {
    let conn = conn();
    let store = SessionStore::new(&conn);
    let api = FakeBackend::new();
    api.fail_next(401, "Invalid email or password");
    let err = auth::login(&api, &store, "asha@example.com", "wrong").unwrap_err();
    assert_eq!(format!("{:#}", err), "Login failed: Invalid email or password");
    assert_eq!(store.current().unwrap(), None);
}

#[test]
fn register_signs_in() {
    let conn = conn();
    let store = SessionStore::new(&conn);
    let api = FakeBackend::new();
    let s = auth::register(&api, &store, "Ravi", "ravi@example.com", "pw").unwrap();
    assert_eq!(s.name, "Ravi");
    assert_eq!(store.current().unwrap().unwrap().name, "Ravi");
}

#[test]
fn interrupted_login_keeps_previous_session_whole() {
    let conn = conn();
    let store = SessionStore::new(&conn);
    store.login(&asha()).unwrap();
    conn.execute_batch(
        "CREATE TRIGGER no_email_insert BEFORE INSERT ON session WHEN NEW.key = 'email'
             BEGIN SELECT RAISE(ABORT, 'write refused'); END;
         CREATE TRIGGER no_email_update BEFORE UPDATE ON session WHEN NEW.key = 'email'
             BEGIN SELECT RAISE(ABORT, 'write refused'); END;",
    )
    .unwrap();

    let other = Session {
        token: "tok-xyz".into(),
        user_id: "u7".into(),
        name: "Ravi".into(),
        email: "ravi@example.com".into(),
    };
    assert!(store.login(&other).is_err());
    assert_eq!(store.current().unwrap(), Some(asha()));

    store.logout().unwrap();
    assert!(store.login(&other).is_err());
    assert_eq!(store.token().unwrap(), None);
}
