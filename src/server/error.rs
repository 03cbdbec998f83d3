//! Mapping of service errors onto HTTP responses

use crate::Error;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde_json::json;

/// Error returned by every handler. The body is always `{"error": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Parameters that could not be parsed or describe an impossible image
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Render(#[from] Error),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Render(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Render(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("Render task failed: {}", err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_400() {
        let err = ApiError::from(Error::InvalidDimensions("too wide".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn everything_else_maps_to_500() {
        let err = ApiError::from(Error::EncodeError("disk full".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "PNG encoding failed: disk full");

        let err = ApiError::from(Error::FontNotFound(vec!["a.ttf".into()]));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
