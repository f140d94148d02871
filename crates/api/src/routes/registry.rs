//! Extra expenditure and donor routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tracing::info;
use zakat_core::{
    FinanceRepository,
    registry::{Donor, ExtraExpenditure, NewDonor, NewExtraExpenditure},
};
use zakat_shared::Role;

use crate::{AppState, error::ApiError, extractors::ApiJson, middleware::AuthUser};

/// Creates the registry routes.
pub fn routes<R: FinanceRepository + 'static>() -> Router<AppState<R>> {
    Router::new()
        .route("/extraexpenditures", get(list_extra_expenditures::<R>))
        .route("/extraexpenditures/add", post(add_extra_expenditure::<R>))
        .route("/donors", get(list_donors::<R>))
        .route("/donors/add", post(add_donor::<R>))
}

async fn list_extra_expenditures<R: FinanceRepository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
) -> Result<Json<Vec<ExtraExpenditure>>, ApiError> {
    auth.require(Role::Viewer)?;
    Ok(Json(state.finance.list_extra_expenditures().await?))
}

async fn add_extra_expenditure<R: FinanceRepository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
    ApiJson(body): ApiJson<NewExtraExpenditure>,
) -> Result<(StatusCode, Json<ExtraExpenditure>), ApiError> {
    auth.require(Role::Admin)?;
    let expenditure = state.finance.add_extra_expenditure(body).await?;
    info!(user_id = %auth.user_id(), expenditure_id = %expenditure.id, "Extra expenditure added");
    Ok((StatusCode::CREATED, Json(expenditure)))
}

async fn list_donors<R: FinanceRepository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
) -> Result<Json<Vec<Donor>>, ApiError> {
    auth.require(Role::Viewer)?;
    Ok(Json(state.finance.list_donors().await?))
}

async fn add_donor<R: FinanceRepository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
    ApiJson(body): ApiJson<NewDonor>,
) -> Result<(StatusCode, Json<Donor>), ApiError> {
    auth.require(Role::Admin)?;
    let donor = state.finance.add_donor(body).await?;
    Ok((StatusCode::CREATED, Json(donor)))
}
