//! Manual disbursement cycle trigger.

use axum::{Json, Router, extract::State, routing::post};
use tracing::info;
use zakat_core::{FinanceRepository, disbursement::CycleReport};
use zakat_shared::Role;

use crate::{AppState, error::ApiError, middleware::AuthUser};

/// Creates the disbursement routes.
pub fn routes<R: FinanceRepository + 'static>() -> Router<AppState<R>> {
    Router::new().route("/disbursements/run", post(run_cycle::<R>))
}

/// POST `/disbursements/run` - runs one cycle now; periods already paid are skipped.
async fn run_cycle<R: FinanceRepository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
) -> Result<Json<CycleReport>, ApiError> {
    auth.require(Role::Admin)?;
    info!(user_id = %auth.user_id(), "Manual disbursement cycle requested");
    Ok(Json(state.finance.run_disbursement_cycle().await?))
}
