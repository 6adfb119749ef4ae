use analytics::AnalyticsError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Errors of the non-paginated routes. Paginated routes answer with outcomes instead.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Analytics(analytics_err) => {
                tracing::warn!(error = %analytics_err, "Rejected dashboard request.");
                (StatusCode::NOT_FOUND, analytics_err.to_string())
            }
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
