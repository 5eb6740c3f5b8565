//! Generic JSON-over-HTTP client shared by every REST caller.
//!
//! SYSTEM CONTEXT
//! ==============
//! `ApiClient` owns the default outgoing header set. It never decides what the
//! auth token is: it registers as a [`TokenObserver`] on the session store and
//! mirrors whatever token the store publishes into `Authorization`.
//!
//! Client-side (hydrate): requests go through `gloo-net`.
//! Server-side (SSR) and native tests: the transport is swapped out, since the
//! REST backend is only reachable from the browser.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses become [`ApiError::Status`] carrying the backend's
//! `message` when it sent one, so callers can show it verbatim.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::types::ErrorBody;

/// Header carrying the bearer token.
pub const AUTH_HEADER: &str = "Authorization";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
}

/// A fully-resolved outgoing request.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Value>,
}

impl ApiRequest {
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

/// Raw response as seen by the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    #[must_use]
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Backend-provided `message`, if the body is a JSON error object.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        serde_json::from_str::<ErrorBody>(&self.body)
            .ok()
            .and_then(|body| body.message)
            .filter(|message| !message.trim().is_empty())
    }
}

/// Failures surfaced by [`ApiClient`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (offline, CORS, DNS, ...).
    #[error("request failed: {0}")]
    Transport(String),

    /// The backend answered with a non-2xx status.
    #[error("request failed with status {status}")]
    Status { status: u16, message: Option<String> },

    /// A 2xx response body did not match the expected shape.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Message the backend attached to a non-2xx response.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message: Some(message), .. } => Some(message),
            _ => None,
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Moves an [`ApiRequest`] over the wire.
///
/// Futures are not required to be `Send`: the browser runtime is
/// single-threaded and `gloo-net` futures are `!Send`.
#[async_trait(?Send)]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// Receives every change of the session token.
pub trait TokenObserver: Send + Sync {
    fn token_changed(&self, token: Option<&str>);
}

/// JSON REST client with a mutable default header set.
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    default_headers: Mutex<BTreeMap<String, String>>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            transport,
            default_headers: Mutex::new(BTreeMap::new()),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve an endpoint path against the base URL.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Snapshot of the headers attached to every request.
    #[must_use]
    pub fn default_headers(&self) -> BTreeMap<String, String> {
        self.headers().clone()
    }

    /// Current `Authorization` header value, if any.
    #[must_use]
    pub fn auth_header(&self) -> Option<String> {
        self.headers().get(AUTH_HEADER).cloned()
    }

    /// `GET` `path` and decode the JSON body.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure, non-2xx status, or an
    /// undecodable body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.execute(Method::Get, path, None).await?;
        decode(&response)
    }

    /// `POST` a JSON body to `path` and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get`], plus body serialization failures.
    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let body = encode(body)?;
        let response = self.execute(Method::Post, path, Some(body)).await?;
        decode(&response)
    }

    /// `PUT` a JSON body to `path` and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::post`].
    pub async fn put<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let body = encode(body)?;
        let response = self.execute(Method::Put, path, Some(body)).await?;
        decode(&response)
    }

    async fn execute(&self, method: Method, path: &str, body: Option<Value>) -> Result<ApiResponse, ApiError> {
        let mut headers = self.default_headers();
        if body.is_some() {
            headers.insert("Content-Type".to_owned(), "application/json".to_owned());
        }
        let request = ApiRequest { method, url: self.url(path), headers, body };
        let response = self.transport.send(request).await?;
        if !response.ok() {
            return Err(ApiError::Status { status: response.status, message: response.error_message() });
        }
        Ok(response)
    }

    fn headers(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.default_headers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TokenObserver for ApiClient {
    fn token_changed(&self, token: Option<&str>) {
        let mut headers = self.headers();
        match token {
            Some(token) => {
                headers.insert(AUTH_HEADER.to_owned(), bearer(token));
            }
            None => {
                headers.remove(AUTH_HEADER);
            }
        }
    }
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

fn encode<B: Serialize>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}

fn decode<T: DeserializeOwned>(response: &ApiResponse) -> Result<T, ApiError> {
    // Some endpoints answer 204 / empty bodies; treat those as JSON null.
    let raw = if response.body.trim().is_empty() { "null" } else { response.body.as_str() };
    serde_json::from_str(raw).map_err(|e| ApiError::Decode(e.to_string()))
}

/// `gloo-net` transport used in the browser.
#[cfg(feature = "hydrate")]
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooTransport;

#[cfg(feature = "hydrate")]
#[async_trait(?Send)]
impl HttpTransport for GlooTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        use gloo_net::http::Request;

        let mut builder = match request.method {
            Method::Get => Request::get(&request.url),
            Method::Post => Request::post(&request.url),
            Method::Put => Request::put(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        let sent = match &request.body {
            Some(body) => {
                builder
                    .json(body)
                    .map_err(|e| ApiError::Transport(e.to_string()))?
                    .send()
                    .await
            }
            None => builder.send().await,
        };
        let resp = sent.map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = resp.status();
        let body = resp.text().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(ApiResponse { status, body })
    }
}

/// Transport for environments with no browser, e.g. SSR rendering.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnavailableTransport;

#[async_trait(?Send)]
impl HttpTransport for UnavailableTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let _ = request;
        Err(ApiError::Transport("not available on server".to_owned()))
    }
}

/// Transport appropriate for the current build target.
#[must_use]
pub fn default_transport() -> Arc<dyn HttpTransport> {
    #[cfg(feature = "hydrate")]
    {
        Arc::new(GlooTransport)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Arc::new(UnavailableTransport)
    }
}
