//! Record errors as HTTP responses

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::{error, warn};
use serde_json::json;

use crate::services::records::RecordError;

/// A failed request: the classified error plus the generic message
/// returned when the failure came from upstream
#[derive(Debug)]
pub struct ApiError {
    error: RecordError,
    upstream_message: &'static str,
}

impl ApiError {
    pub fn new(error: RecordError, upstream_message: &'static str) -> Self {
        Self {
            error,
            upstream_message,
        }
    }

    pub fn status(&self) -> StatusCode {
        match &self.error {
            RecordError::MissingFields(_) => StatusCode::BAD_REQUEST,
            RecordError::RecordNotFound(_)
            | RecordError::KeyNotFound(_)
            | RecordError::TabNotFound(_) => StatusCode::NOT_FOUND,
            RecordError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self.error {
            RecordError::Upstream(err) => {
                error!("{}: {:#}", self.upstream_message, err);
                self.upstream_message.to_string()
            }
            other => other.to_string(),
        };
        error_response(status, message)
    }
}

/// Rejection for bodies that cannot be parsed
#[derive(Debug)]
pub struct BadRequest(pub String);

impl IntoResponse for BadRequest {
    fn into_response(self) -> Response {
        warn!("Rejected request body: {}", self.0);
        error_response(StatusCode::BAD_REQUEST, self.0)
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (RecordError::MissingFields(vec!["NAME"]), StatusCode::BAD_REQUEST),
            (RecordError::RecordNotFound("x".into()), StatusCode::NOT_FOUND),
            (RecordError::KeyNotFound("x".into()), StatusCode::NOT_FOUND),
            (RecordError::TabNotFound("Users".into()), StatusCode::NOT_FOUND),
            (
                RecordError::Upstream(anyhow::anyhow!("boom")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(ApiError::new(error, "failed").status(), status);
        }
    }

    #[tokio::test]
    async fn test_upstream_detail_is_not_leaked() {
        let response = ApiError::new(
            RecordError::Upstream(anyhow::anyhow!("invalid_grant: secret detail")),
            "Failed to add intern",
        )
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, json!({ "error": "Failed to add intern" }));
    }
}
