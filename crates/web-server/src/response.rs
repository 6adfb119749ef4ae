use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use core_types::QueryOutcome;
use serde::Serialize;

/// Sends a `QueryOutcome` as the response body. Failures keep their wire shape and pick
/// the status code from their kind.
#[derive(Debug)]
pub struct OutcomeResponse<T>(pub QueryOutcome<T>);

impl<T: Serialize> IntoResponse for OutcomeResponse<T> {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            QueryOutcome::Success(_) => StatusCode::OK,
            QueryOutcome::Failure(failure) => StatusCode::from_u16(failure.kind.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        };
        (status, Json(self.0)).into_response()
    }
}

impl<T> From<QueryOutcome<T>> for OutcomeResponse<T> {
    fn from(outcome: QueryOutcome<T>) -> Self {
        Self(outcome)
    }
}
