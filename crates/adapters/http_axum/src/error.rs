//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use clinicflow_domain::error::{ClinicFlowError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`ClinicFlowError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(ClinicFlowError);

impl ApiError {
    /// A path parameter was not a valid identifier.
    pub(crate) fn invalid_id(raw: &str) -> Self {
        Self(ValidationError::InvalidId(raw.to_string()).into())
    }
}

impl From<ClinicFlowError> for ApiError {
    fn from(err: ClinicFlowError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            ClinicFlowError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ClinicFlowError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            ClinicFlowError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
