//! Shared HTTP response types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::shared::DirectoryError;

/// Error envelope: `{"success": false, "error": "..."}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    /// Error description
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

/// HTTP status for a failed listing.
pub fn status_for(error: &DirectoryError) -> StatusCode {
    match error {
        DirectoryError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
        DirectoryError::StoreTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        DirectoryError::Projection(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for DirectoryError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        if self.is_store_failure() {
            warn!(status = status.as_u16(), error = %self, "User store failed");
        } else {
            error!(status = status.as_u16(), error = %self, "Directory listing failed");
        }
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}
