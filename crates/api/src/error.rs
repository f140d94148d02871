//! API error responses.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, warn};
use zakat_core::FinanceError;
use zakat_shared::AppError;

/// Error returned by handlers.
///
/// Rendered as `{ "error": "<machine_code>", "message": "<human text>" }`.
#[derive(Debug)]
pub enum ApiError {
    /// Domain failure.
    Finance(FinanceError),
    /// Authentication, authorization or request-shape failure.
    App(AppError),
}

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        let code = match self {
            Self::Finance(e) => e.http_status_code(),
            Self::App(e) => e.status_code(),
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Finance(e) => e.error_code(),
            Self::App(e) => e.error_code(),
        }
    }
}

impl From<FinanceError> for ApiError {
    fn from(err: FinanceError) -> Self {
        Self::Finance(err)
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::App(AppError::Validation(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::App(AppError::Validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let message = if status.is_server_error() {
            match &self {
                Self::Finance(e) => error!(error = %e, code, "Request failed"),
                Self::App(e) => error!(error = %e, code, "Request failed"),
            }
            "An internal error occurred".to_string()
        } else {
            let message = match &self {
                Self::Finance(e) => e.to_string(),
                Self::App(e) => e.to_string(),
            };
            warn!(status = status.as_u16(), code, message = %message, "Request rejected");
            message
        };

        (status, Json(json!({ "error": code, "message": message }))).into_response()
    }
}
