//! Beneficiary registry and term lifecycle routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;
use zakat_core::{
    FinanceRepository,
    beneficiary::{
        AmountTermInput, Beneficiary, BeneficiarySummary, ExtraFaInput, NewBeneficiary, NewTerm,
    },
    service::{MonthlyExpense, PaymentReceipt},
};
use zakat_shared::{Role, types::BeneficiaryId};

use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiJson, ApiPath},
    middleware::AuthUser,
};

/// Creates the beneficiary routes (requires auth middleware to be applied externally).
pub fn routes<R: FinanceRepository + 'static>() -> Router<AppState<R>> {
    Router::new()
        .route("/beneficiaries", get(list_beneficiaries::<R>))
        .route("/beneficiaries/{id}", get(get_beneficiary::<R>))
        .route("/beneficiaries/add", post(add_beneficiary::<R>))
        .route("/beneficiaries/amountterm/add/{id}", post(add_amount_term::<R>))
        .route("/beneficiaries/term/close/{id}", post(close_term::<R>))
        .route("/beneficiaries/term/add/{id}", post(add_term::<R>))
        .route("/beneficiaries/extraFA/{id}", post(add_extra_fa::<R>))
        .route("/beneficiaries/death/{id}", post(mark_deceased::<R>))
        .route("/beneficiaries/pay", post(pay::<R>))
        .route("/monthly-expenses", get(monthly_expenses::<R>))
}

/// Body of a term closure. The body itself may be omitted.
#[derive(Debug, Default, Deserialize)]
pub struct CloseTermRequest {
    /// Optional closure reason.
    #[serde(default)]
    pub closure_reason: Option<String>,
}

/// Body of a death registration. The body itself may be omitted.
#[derive(Debug, Default, Deserialize)]
pub struct DeathRequest {
    /// Date of death; defaults to today.
    #[serde(default)]
    pub death_date: Option<NaiveDate>,
}

/// Body of a manual payment.
#[derive(Debug, Deserialize)]
pub struct PayRequest {
    /// Beneficiary to pay.
    pub id: BeneficiaryId,
}

async fn list_beneficiaries<R: FinanceRepository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
) -> Result<Json<Vec<BeneficiarySummary>>, ApiError> {
    auth.require(Role::Viewer)?;
    Ok(Json(state.finance.list_beneficiaries().await?))
}

async fn get_beneficiary<R: FinanceRepository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
    ApiPath(id): ApiPath<BeneficiaryId>,
) -> Result<Json<Beneficiary>, ApiError> {
    auth.require(Role::Viewer)?;
    Ok(Json(state.finance.get_beneficiary(id).await?))
}

/// POST `/beneficiaries/add` - registers and pays the first amount.
async fn add_beneficiary<R: FinanceRepository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
    ApiJson(body): ApiJson<NewBeneficiary>,
) -> Result<(StatusCode, Json<Beneficiary>), ApiError> {
    auth.require(Role::Editor)?;
    let beneficiary = state.finance.add_beneficiary(body).await?;
    info!(user_id = %auth.user_id(), beneficiary_id = %beneficiary.id, "Beneficiary added");
    Ok((StatusCode::CREATED, Json(beneficiary)))
}

async fn add_amount_term<R: FinanceRepository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
    ApiPath(id): ApiPath<BeneficiaryId>,
    ApiJson(body): ApiJson<AmountTermInput>,
) -> Result<Json<Beneficiary>, ApiError> {
    auth.require(Role::Editor)?;
    Ok(Json(state.finance.add_amount_term(id, body).await?))
}

async fn close_term<R: FinanceRepository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
    ApiPath(id): ApiPath<BeneficiaryId>,
    body: Option<ApiJson<CloseTermRequest>>,
) -> Result<Json<Beneficiary>, ApiError> {
    auth.require(Role::Editor)?;
    let body = body.map(|ApiJson(body)| body).unwrap_or_default();
    Ok(Json(
        state
            .finance
            .close_term(id, body.closure_reason.as_deref())
            .await?,
    ))
}

async fn add_term<R: FinanceRepository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
    ApiPath(id): ApiPath<BeneficiaryId>,
    ApiJson(body): ApiJson<NewTerm>,
) -> Result<(StatusCode, Json<Beneficiary>), ApiError> {
    auth.require(Role::Editor)?;
    let beneficiary = state.finance.add_term(id, body).await?;
    Ok((StatusCode::CREATED, Json(beneficiary)))
}

async fn add_extra_fa<R: FinanceRepository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
    ApiPath(id): ApiPath<BeneficiaryId>,
    ApiJson(body): ApiJson<ExtraFaInput>,
) -> Result<(StatusCode, Json<Beneficiary>), ApiError> {
    auth.require(Role::Editor)?;
    let beneficiary = state.finance.add_extra_fa(id, body).await?;
    Ok((StatusCode::CREATED, Json(beneficiary)))
}

async fn mark_deceased<R: FinanceRepository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
    ApiPath(id): ApiPath<BeneficiaryId>,
    body: Option<ApiJson<DeathRequest>>,
) -> Result<Json<Beneficiary>, ApiError> {
    auth.require(Role::Editor)?;
    let body = body.map(|ApiJson(body)| body).unwrap_or_default();
    let beneficiary = state.finance.mark_deceased(id, body.death_date).await?;
    info!(user_id = %auth.user_id(), beneficiary_id = %id, "Death registered");
    Ok(Json(beneficiary))
}

/// POST `/beneficiaries/pay` - manual payment for the current period.
async fn pay<R: FinanceRepository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
    ApiJson(body): ApiJson<PayRequest>,
) -> Result<Json<PaymentReceipt>, ApiError> {
    auth.require(Role::Editor)?;
    let receipt = state.finance.pay(body.id).await?;
    info!(user_id = %auth.user_id(), beneficiary_id = %body.id, period = %receipt.period, "Manual payment");
    Ok(Json(receipt))
}

async fn monthly_expenses<R: FinanceRepository>(
    State(state): State<AppState<R>>,
    auth: AuthUser,
) -> Result<Json<Vec<MonthlyExpense>>, ApiError> {
    auth.require(Role::Viewer)?;
    Ok(Json(state.finance.monthly_expenses().await?))
}
