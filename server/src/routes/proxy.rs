//! Same-origin reverse proxy for the REST backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser bundle calls `/api/*` on its own origin. When `API_UPSTREAM`
//! is configured this server forwards those calls verbatim, so the client
//! never needs CORS or a baked-in backend host.
//!
//! DESIGN
//! ======
//! Only the headers the session client sends are forwarded
//! (`Authorization`, `Content-Type`, `Accept`). Status and body come back
//! unchanged, including backend error bodies, so `{ message }` errors reach
//! the client as the backend wrote them.
//!
//! ERROR HANDLING
//! ==============
//! Failing to reach the backend yields `502` with a `{ message }` body in
//! the backend's own error shape.

#[cfg(test)]
#[path = "proxy_test.rs"]
mod proxy_test;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderName, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use tower_http::cors::{Any, CorsLayer};

pub(crate) const FORWARDED_HEADERS: [HeaderName; 3] = [AUTHORIZATION, CONTENT_TYPE, ACCEPT];
pub(crate) const BACKEND_UNAVAILABLE_MESSAGE: &str = "Backend unavailable. Please try again later.";

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("proxy client build failed: {0}")]
    Build(reqwest::Error),
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "api proxy failure");
        let body = serde_json::json!({ "message": BACKEND_UNAVAILABLE_MESSAGE });
        (StatusCode::BAD_GATEWAY, axum::Json(body)).into_response()
    }
}

/// Shared proxy state: one pooled HTTP client and the upstream base URL.
#[derive(Clone)]
pub struct ProxyState {
    client: reqwest::Client,
    upstream: Arc<str>,
}

impl ProxyState {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(upstream: &str, timeout: Duration) -> Result<Self, ProxyError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ProxyError::Build)?;
        Ok(Self { client, upstream: Arc::from(upstream.trim_end_matches('/')) })
    }

    pub fn upstream(&self) -> &str {
        &self.upstream
    }
}

/// `/api/{*path}` forwarded to the upstream for every method.
pub fn routes(state: ProxyState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/{*path}", any(forward))
        .layer(cors)
        .with_state(state)
}

/// Join the upstream base with the captured path and the original query.
pub(crate) fn upstream_url(upstream: &str, path: &str, query: Option<&str>) -> String {
    let mut url = format!("{}/{}", upstream.trim_end_matches('/'), path.trim_start_matches('/'));
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        url.push('?');
        url.push_str(query);
    }
    url
}

/// Copy the allow-listed request headers.
pub(crate) fn forwarded_headers(incoming: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for name in &FORWARDED_HEADERS {
        if let Some(value) = incoming.get(name) {
            headers.insert(name.clone(), value.clone());
        }
    }
    headers
}

async fn forward(
    State(proxy): State<ProxyState>,
    method: Method,
    Path(path): Path<String>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ProxyError> {
    let url = upstream_url(&proxy.upstream, &path, uri.query());
    tracing::debug!(%method, %url, "forwarding api request");

    let mut request = proxy.client.request(method, &url).headers(forwarded_headers(&headers));
    if !body.is_empty() {
        request = request.body(body);
    }
    let upstream = request.send().await?;

    let status = upstream.status();
    let content_type = upstream.headers().get(CONTENT_TYPE).cloned();
    let bytes = upstream.bytes().await?;

    let mut response = (status, bytes).into_response();
    if let Some(content_type) = content_type {
        response.headers_mut().insert(CONTENT_TYPE, content_type);
    }
    Ok(response)
}
