//! API route definitions.

use std::sync::Arc;

use axum::{Router, middleware};
use zakat_core::FinanceRepository;

use crate::{AppState, middleware::auth::auth_middleware};

pub mod account;
pub mod beneficiaries;
pub mod conversions;
pub mod disbursements;
pub mod expenses;
pub mod health;
pub mod registry;

/// Creates the API router; everything except health checks sits behind
/// token validation.
pub fn api_routes_with_state<R: FinanceRepository + 'static>(
    state: &AppState<R>,
) -> Router<AppState<R>> {
    let protected_routes = Router::new()
        .merge(account::routes())
        .merge(beneficiaries::routes())
        .merge(conversions::routes())
        .merge(disbursements::routes())
        .merge(expenses::routes())
        .merge(registry::routes())
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state.jwt_service),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(protected_routes)
}
