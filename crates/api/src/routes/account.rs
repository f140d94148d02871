//! Account totals and the transaction log.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use zakat_core::{
    FinanceRepository, ledger::TransactionLogEntry, service::AccountSummary,
};
use zakat_shared::Role;

use crate::{AppState, error::ApiError, extractors::ApiJson, middleware::AuthUser};

/// Creates the account routes.
pub fn routes<R: FinanceRepository + 'static>() -> Router<AppState<R>> {
    Router::new()
        .route("/account", get(get_account::<R>))
        .route(
            "/account/transactions",
            get(list_transactions::<R>).post(log_transaction::<R>),
        )
}

/// Request body for a manual ledger adjustment.
#[derive(Debug, Deserialize)]
pub struct LogTransactionRequest {
    /// Signed amount.
    pub amount: Decimal,
    /// `PKR` or `USD`.
    pub currency: String,
    /// Short title.
    pub title: String,
    /// Free text.
    #[serde(default)]
    pub details: String,
}

/// GET `/account`
async fn get_account<R: FinanceRepository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
) -> Result<Json<AccountSummary>, ApiError> {
    auth.require(Role::Viewer)?;
    Ok(Json(state.finance.account().await?))
}

/// GET `/account/transactions` - newest first.
async fn list_transactions<R: FinanceRepository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
) -> Result<Json<Vec<TransactionLogEntry>>, ApiError> {
    auth.require(Role::Viewer)?;
    Ok(Json(state.finance.transaction_logs().await?))
}

/// POST `/account/transactions`
async fn log_transaction<R: FinanceRepository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
    ApiJson(body): ApiJson<LogTransactionRequest>,
) -> Result<(StatusCode, Json<TransactionLogEntry>), ApiError> {
    auth.require(Role::Admin)?;
    let entry = state
        .finance
        .log_transaction(body.amount, &body.currency, &body.title, &body.details)
        .await?;
    info!(user_id = %auth.user_id(), amount = %body.amount, currency = %body.currency, "Manual transaction logged");
    Ok((StatusCode::CREATED, Json(entry)))
}
