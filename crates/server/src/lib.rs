// ABOUTME: HTTP transport for the OFD receipt extractor: router, shared state and layer wiring.
// ABOUTME: Serves an open health probe and a Basic-auth protected POST /extract-text.

//! `ofd-server` wraps [`ofd_extract::Extractor`] in an axum service.
//!
//! The extractor is immutable and shared through an `Arc`; every request
//! runs the pipeline on the blocking pool. Body size is capped by
//! `RequestBodyLimitLayer` before any JSON parsing happens.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{middleware, Router};
use ofd_extract::Extractor;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

pub use crate::auth::Credentials;
pub use crate::config::ServerConfig;
pub use crate::error::ApiError;

/// State shared by all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub extractor: Arc<Extractor>,
    pub credentials: Arc<Credentials>,
}

impl AppState {
    pub fn new(extractor: Extractor, credentials: Credentials) -> Self {
        Self {
            extractor: Arc::new(extractor),
            credentials: Arc::new(credentials),
        }
    }
}

/// Build the application router.
pub fn app(state: AppState, max_body_bytes: usize) -> Router {
    let protected = Router::new()
        .route("/extract-text", post(routes::extract_text))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_basic_auth,
        ));

    Router::new()
        .route("/health", get(routes::health))
        .merge(protected)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
