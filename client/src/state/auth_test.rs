use super::*;
use serde_json::json;

fn user(role: &str) -> User {
    serde_json::from_value(json!({ "id": "u1", "username": "alice", "name": "Alice", "role": role })).unwrap()
}

// =============================================================
// AuthState defaults
// =============================================================

#[test]
fn auth_state_default_is_signed_out() {
    let state = AuthState::default();
    assert!(state.token.is_none());
    assert!(state.user.is_none());
    assert!(!state.loading);
    assert!(state.error.is_none());
    assert!(!state.is_authenticated());
}

// =============================================================
// is_authenticated
// =============================================================

#[test]
fn is_authenticated_requires_token_and_user() {
    for token in [None, Some("t".to_owned())] {
        for user in [None, Some(user("student"))] {
            for loading in [false, true] {
                let expected = token.is_some() && user.is_some();
                let state = AuthState { token: token.clone(), user: user.clone(), loading, error: None };
                assert_eq!(state.is_authenticated(), expected, "{state:?}");
            }
        }
    }
}

#[test]
fn token_without_user_is_not_authenticated() {
    let state = AuthState { token: Some("pending".to_owned()), ..AuthState::default() };
    assert!(!state.is_authenticated());
    assert_eq!(state.role(), None);
}

#[test]
fn role_reads_resolved_user() {
    let state = AuthState { token: Some("t".to_owned()), user: Some(user("teacher")), ..AuthState::default() };
    assert_eq!(state.role(), Some(Role::Teacher));
}
