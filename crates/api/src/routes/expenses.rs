//! Dashboard and expense history routes.

use axum::{Json, Router, extract::State, routing::get};
use zakat_core::{
    FinanceRepository,
    expense::{DashboardSummary, MonthAmount, MonthHistory},
};
use zakat_shared::Role;

use crate::{AppState, error::ApiError, extractors::ApiPath, middleware::AuthUser};

/// Creates the expense routes.
pub fn routes<R: FinanceRepository + 'static>() -> Router<AppState<R>> {
    Router::new()
        .route("/summary", get(summary::<R>))
        .route("/expenses-summary", get(expenses_summary::<R>))
        .route("/expense-history/{year}/{month}", get(expense_history::<R>))
}

async fn summary<R: FinanceRepository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
) -> Result<Json<DashboardSummary>, ApiError> {
    auth.require(Role::Viewer)?;
    Ok(Json(state.finance.summary().await?))
}

async fn expenses_summary<R: FinanceRepository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
) -> Result<Json<Vec<MonthAmount>>, ApiError> {
    auth.require(Role::Viewer)?;
    Ok(Json(state.finance.expenses_summary().await?))
}

/// GET `/expense-history/{year}/{month}` - `month` is a short name like `Aug`, any case.
async fn expense_history<R: FinanceRepository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
    ApiPath((year, month)): ApiPath<(i32, String)>,
) -> Result<Json<MonthHistory>, ApiError> {
    auth.require(Role::Editor)?;
    Ok(Json(state.finance.expense_history(year, &month).await?))
}
