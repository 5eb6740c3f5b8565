//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module stitches the health check, the optional `/api` proxy, and
//! Leptos SSR rendering under a single Axum router. Compiled client assets
//! are served from `/pkg`.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

pub mod proxy;

use std::path::PathBuf;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use leptos::prelude::*;
use leptos_axum::{LeptosRoutes, generate_route_list};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use proxy::{ProxyError, ProxyState};

#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("leptos configuration: {0}")]
    Leptos(String),
    #[error(transparent)]
    Proxy(#[from] ProxyError),
}

/// Non-UI routes: health check plus `/api` forwarding when configured.
///
/// # Errors
///
/// Returns an error if the proxy client cannot be built.
pub fn service_routes(config: &ServerConfig) -> Result<Router, ProxyError> {
    let router = Router::new().route("/healthz", get(healthz));
    let Some(upstream) = config.api_upstream.as_deref() else {
        tracing::info!("API_UPSTREAM not set; /api is expected to be served by the fronting proxy");
        return Ok(router);
    };
    let proxy = ProxyState::new(upstream, Duration::from_secs(config.proxy_timeout_secs))?;
    tracing::info!(upstream = proxy.upstream(), "forwarding /api requests");
    Ok(router.merge(proxy::routes(proxy)))
}

/// Full application: service routes + Leptos SSR + static assets.
///
/// # Errors
///
/// Returns an error if the Leptos configuration cannot be loaded (missing or
/// malformed `[workspace.metadata.leptos]` section) or the proxy cannot be
/// built.
pub fn app(config: &ServerConfig) -> Result<Router, RouterError> {
    let conf = get_configuration(None).map_err(|e| RouterError::Leptos(e.to_string()))?;
    let leptos_options = conf.leptos_options;
    let routes = generate_route_list(credits_client::app::App);

    let leptos_router = Router::new()
        .leptos_routes(&leptos_options, routes, {
            let opts = leptos_options.clone();
            move || credits_client::app::shell(opts.clone())
        })
        .with_state(leptos_options.clone());

    let site_root_path = PathBuf::from(leptos_options.site_root.as_ref());

    Ok(service_routes(config)?
        .merge(leptos_router)
        .nest_service("/pkg", ServeDir::new(site_root_path.join("pkg")))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http()))
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
