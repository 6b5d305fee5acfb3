// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User and session persistence tests.

use folio_domain::{Page, timestamp_now};
use time::Duration;

use super::{create_test_persistence, create_test_user};
use crate::{NewUser, Persistence};
use crate::error::PersistenceError;

#[test]
fn test_create_user_creates_profile() {
    let mut persistence = create_test_persistence();

    let (user, profile) = create_test_user(&mut persistence, "alice");

    assert_eq!(user.username, "alice");
    assert_eq!(user.role, "Member");
    assert_eq!(profile.user_id, user.user_id);
    assert_eq!(profile.username, "alice");
    assert_eq!(profile.headline, None);
    assert_eq!(
        persistence.get_profile_by_user(user.user_id).unwrap(),
        profile
    );
}

#[test]
fn test_password_is_hashed() {
    let mut persistence = create_test_persistence();
    let (user, _) = create_test_user(&mut persistence, "alice");

    assert_ne!(user.password_hash, "correct horse battery staple");
    assert!(
        Persistence::verify_password("correct horse battery staple", &user.password_hash).unwrap()
    );
    assert!(!Persistence::verify_password("wrong", &user.password_hash).unwrap());
}

#[test]
fn test_duplicate_username_rejected_and_nothing_kept() {
    let mut persistence = create_test_persistence();
    create_test_user(&mut persistence, "alice");

    let result = persistence.create_user(NewUser {
        username: "alice",
        email: "other@example.com",
        display_name: "Other Alice",
        password: "correct horse battery staple",
        role: "Member",
    });

    match result {
        Err(PersistenceError::UniqueViolation { constraint }) => {
            assert!(constraint.contains("users.username"), "{constraint}");
        }
        other => panic!("expected unique violation, got {other:?}"),
    }
    assert_eq!(persistence.count_users().unwrap(), 1);
}

#[test]
fn test_duplicate_email_rejected() {
    let mut persistence = create_test_persistence();
    create_test_user(&mut persistence, "alice");

    let result = persistence.create_user(NewUser {
        username: "alice2",
        email: "alice@example.com",
        display_name: "Alice Two",
        password: "correct horse battery staple",
        role: "Member",
    });

    assert!(matches!(
        result,
        Err(PersistenceError::UniqueViolation { ref constraint }) if constraint.contains("users.email")
    ));
}

#[test]
fn test_lookup_users() {
    let mut persistence = create_test_persistence();
    let (bob, _) = create_test_user(&mut persistence, "bob");
    create_test_user(&mut persistence, "alice");

    assert_eq!(
        persistence.get_user_by_username("bob").unwrap(),
        Some(bob.clone())
    );
    assert_eq!(persistence.get_user_by_id(bob.user_id).unwrap(), Some(bob));
    assert_eq!(persistence.get_user_by_username("nobody").unwrap(), None);

    let usernames: Vec<String> = persistence
        .list_users(Page::default())
        .unwrap()
        .into_iter()
        .map(|u| u.username)
        .collect();
    assert_eq!(usernames, vec!["alice", "bob"]);
    assert_eq!(persistence.count_users().unwrap(), 2);
}

#[test]
fn test_update_last_login() {
    let mut persistence = create_test_persistence();
    let (user, _) = create_test_user(&mut persistence, "alice");
    assert!(user.last_login_at.is_none());

    persistence.update_last_login(user.user_id).unwrap();

    let user = persistence.get_user_by_id(user.user_id).unwrap().unwrap();
    assert!(user.last_login_at.is_some());
}

#[test]
fn test_session_lifecycle() {
    let mut persistence = create_test_persistence();
    let (user, _) = create_test_user(&mut persistence, "alice");
    let expires_at = timestamp_now() + Duration::days(30);

    let session = persistence
        .create_session("token-1", user.user_id, expires_at)
        .unwrap();
    assert_eq!(session.user_id, user.user_id);
    assert_eq!(session.expires_at, expires_at);

    persistence
        .update_session_activity(session.session_id)
        .unwrap();
    assert_eq!(
        persistence
            .get_session_by_token("token-1")
            .unwrap()
            .map(|s| s.session_id),
        Some(session.session_id)
    );

    assert!(persistence.delete_session("token-1").unwrap());
    assert!(!persistence.delete_session("token-1").unwrap());
    assert_eq!(persistence.get_session_by_token("token-1").unwrap(), None);
}

#[test]
fn test_delete_expired_sessions() {
    let mut persistence = create_test_persistence();
    let (user, _) = create_test_user(&mut persistence, "alice");
    let now = timestamp_now();

    persistence
        .create_session("expired", user.user_id, now - Duration::hours(1))
        .unwrap();
    persistence
        .create_session("live", user.user_id, now + Duration::hours(1))
        .unwrap();

    assert_eq!(persistence.delete_expired_sessions(now).unwrap(), 1);
    assert!(
        persistence
            .get_session_by_token("expired")
            .unwrap()
            .is_none()
    );
    assert!(persistence.get_session_by_token("live").unwrap().is_some());
}
