//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes under `/api/v1`
//! - Token validation and role checks
//! - JSON error responses

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use zakat_core::{FinanceRepository, FinanceService};
use zakat_shared::JwtService;

/// Application state shared across handlers.
pub struct AppState<R: FinanceRepository> {
    /// Finance service over the configured repository.
    pub finance: FinanceService<R>,
    /// JWT service for token validation.
    pub jwt_service: Arc<JwtService>,
}

impl<R: FinanceRepository> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            finance: self.finance.clone(),
            jwt_service: Arc::clone(&self.jwt_service),
        }
    }
}

/// Creates the main application router.
pub fn create_router<R: FinanceRepository + 'static>(state: AppState<R>) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(&state))
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
