//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use skyhub_domain::error::SkyHubError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`SkyHubError`] to an HTTP response with an appropriate status code.
pub struct ApiError(SkyHubError);

impl From<SkyHubError> for ApiError {
    fn from(err: SkyHubError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            SkyHubError::Conflict(err) => (StatusCode::CONFLICT, err.to_string()),
            SkyHubError::Driver(err) => {
                tracing::error!(error = %err, "driver error");
                (StatusCode::BAD_GATEWAY, err.to_string())
            }
            SkyHubError::Timeout(err) => (StatusCode::GATEWAY_TIMEOUT, err.to_string()),
            SkyHubError::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
