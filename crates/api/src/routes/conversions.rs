//! Conversion history routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use zakat_core::{
    FinanceRepository,
    conversion::{ConversionRecord, ConversionRequest},
};
use zakat_shared::Role;

use crate::{AppState, error::ApiError, extractors::ApiJson, middleware::AuthUser};

/// Creates the conversion routes.
pub fn routes<R: FinanceRepository + 'static>() -> Router<AppState<R>> {
    Router::new().route(
        "/conversion-history",
        get(list_conversions::<R>).post(create_conversion::<R>),
    )
}

async fn list_conversions<R: FinanceRepository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
) -> Result<Json<Vec<ConversionRecord>>, ApiError> {
    auth.require(Role::Viewer)?;
    Ok(Json(state.finance.list_conversions().await?))
}

/// POST `/conversion-history` - records a `Convert` or `Receive`.
async fn create_conversion<R: FinanceRepository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
    ApiJson(body): ApiJson<ConversionRequest>,
) -> Result<(StatusCode, Json<ConversionRecord>), ApiError> {
    auth.require(Role::Editor)?;
    let record = state.finance.convert(body).await?;
    Ok((StatusCode::CREATED, Json(record)))
}
