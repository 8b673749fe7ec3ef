use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use domain::DomainError;
use serde_json::json;
use tracing::{debug, error};

/// Error returned by every handler
#[derive(Debug)]
pub enum ApiError {
    /// Request carried no account identity header
    MissingAccount,
    Domain(DomainError),
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        Self::Domain(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingAccount => StatusCode::UNAUTHORIZED,
            Self::Domain(e) if e.is_bad_input() => StatusCode::BAD_REQUEST,
            Self::Domain(DomainError::UnsupportedProduct(_)) => StatusCode::NOT_FOUND,
            Self::Domain(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::MissingAccount => format!("Missing {} header", crate::api::ACCOUNT_HEADER),
            Self::Domain(e) => e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        if status.is_server_error() {
            error!(status = %status, error = %message, "Request failed");
        } else {
            debug!(status = %status, error = %message, "Request rejected");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}
