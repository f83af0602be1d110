use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;

use crate::domains::complaints::ComplaintError;

/// Everything a route can fail with. Rendered as `{"error": "..."}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid JSON body: {0}")]
    MalformedPayload(String),

    #[error("Invalid query string: {0}")]
    MalformedQuery(String),

    #[error(transparent)]
    Complaint(#[from] ComplaintError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedPayload(_) | ApiError::MalformedQuery(_) => StatusCode::BAD_REQUEST,
            ApiError::Complaint(err) => match err {
                ComplaintError::InvalidArgument(_) | ComplaintError::InvalidState(_) => {
                    StatusCode::BAD_REQUEST
                }
                ComplaintError::NotFound(_) => StatusCode::NOT_FOUND,
                ComplaintError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
                ComplaintError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedPayload(rejection.body_text())
    }
}

/// Decode a JSON request body whatever its `Content-Type`.
pub fn parse_json_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::MalformedPayload(e.to_string()))
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::MalformedQuery(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, status = %status, "Request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complaint_errors_map_to_statuses() {
        let cases = [
            (ComplaintError::invalid_argument("x"), StatusCode::BAD_REQUEST),
            (ComplaintError::InvalidState("x".into()), StatusCode::BAD_REQUEST),
            (ComplaintError::not_found("x"), StatusCode::NOT_FOUND),
            (ComplaintError::RateLimited, StatusCode::TOO_MANY_REQUESTS),
            (ComplaintError::upstream("x"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn message_is_passed_through_unchanged() {
        let err = ApiError::from(ComplaintError::RateLimited);
        assert_eq!(err.to_string(), "Rate limit exceeded. Please try again later.");
    }
}
