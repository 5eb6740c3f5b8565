//! REST endpoints consumed by the session layer.
//!
//! Each helper is a thin typed wrapper over [`ApiClient`]; authentication
//! headers are already on the client, so nothing here touches tokens.
//!
//! ERROR HANDLING
//! ==============
//! Callers receive [`ApiError`] unchanged. Turning it into user-facing text is
//! the session store's job.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde_json::{Map, Value};

use super::http::{ApiClient, ApiError};
use super::types::{AuthResponse, LoginRequest, PasswordChangeRequest, RegisterRequest, User};

pub(crate) const CURRENT_USER_PATH: &str = "/auth/me";
pub(crate) const LOGIN_PATH: &str = "/auth/login";
pub(crate) const REGISTER_PATH: &str = "/auth/register";
pub(crate) const PASSWORD_PATH: &str = "/auth/password";

pub(crate) fn user_endpoint(user_id: &str) -> String {
    format!("/users/{user_id}")
}

/// Resolve the bearer token against `GET /auth/me`.
///
/// # Errors
///
/// Returns an error if the token is rejected or the request fails.
pub async fn fetch_current_user(client: &ApiClient) -> Result<User, ApiError> {
    client.get(CURRENT_USER_PATH).await
}

/// Exchange credentials for a token via `POST /auth/login`.
///
/// # Errors
///
/// Returns an error on bad credentials or transport failure.
pub async fn login(client: &ApiClient, username: &str, password: &str) -> Result<AuthResponse, ApiError> {
    client.post(LOGIN_PATH, &LoginRequest { username, password }).await
}

/// Create an account via `POST /auth/register`.
///
/// # Errors
///
/// Returns an error on validation failure, duplicate username, or transport
/// failure.
pub async fn register(client: &ApiClient, profile: &RegisterRequest) -> Result<AuthResponse, ApiError> {
    client.post(REGISTER_PATH, profile).await
}

/// Update profile fields via `PUT /users/{id}`.
///
/// Returns the updated fields as the backend echoed them. A response wrapped
/// as `{ "user": { ... } }` is unwrapped.
///
/// # Errors
///
/// Returns an error if the update is rejected, or the body is not an object.
pub async fn update_profile(
    client: &ApiClient,
    user_id: &str,
    patch: &Map<String, Value>,
) -> Result<Map<String, Value>, ApiError> {
    let body: Value = client.put(&user_endpoint(user_id), patch).await?;
    profile_fields(body)
}

/// Change the password via `PUT /auth/password`.
///
/// # Errors
///
/// Returns an error if the current password is wrong or the request fails.
pub async fn change_password(client: &ApiClient, current_password: &str, new_password: &str) -> Result<Value, ApiError> {
    client.put(PASSWORD_PATH, &PasswordChangeRequest { current_password, new_password }).await
}

fn profile_fields(body: Value) -> Result<Map<String, Value>, ApiError> {
    match body {
        Value::Object(mut fields) => match fields.remove("user") {
            Some(Value::Object(user)) if fields.is_empty() => Ok(user),
            Some(other) => {
                fields.insert("user".to_owned(), other);
                Ok(fields)
            }
            None => Ok(fields),
        },
        other => Err(ApiError::Decode(format!("expected profile object, got {other}"))),
    }
}
