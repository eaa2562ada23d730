use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("No such trip_id found!")]
    NoSuchTrip,

    #[error("Trip already completed.")]
    TripCompleted,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("upstream failure: {0}")]
    Upstream(String),

    #[error("store inconsistency: {0}")]
    DataConsistency(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            // Fixed plain-text bodies clients match on.
            AppError::NoSuchTrip => {
                return (StatusCode::NOT_FOUND, "No such trip_id found!").into_response();
            }
            AppError::TripCompleted => {
                return (StatusCode::CONFLICT, "Trip already completed.").into_response();
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            AppError::DataConsistency(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
