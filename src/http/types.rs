use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::domain::error::TodoError;

pub const INVALID_ID_MESSAGE: &str = "Invalid todo ID";
pub const NOT_FOUND_MESSAGE: &str = "Todo not found";

/// The one error body every endpoint returns: `{"error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self { status, error: error.into() }
    }

    /// Maps a domain error to its HTTP form. Storage failures are logged and
    /// reported with `storage_message`, hiding backend details from clients.
    pub fn from_todo(err: TodoError, storage_message: &str) -> Self {
        match err {
            TodoError::Validation(msg) => Self::new(StatusCode::BAD_REQUEST, msg),
            TodoError::InvalidId(_) => Self::new(StatusCode::BAD_REQUEST, INVALID_ID_MESSAGE),
            TodoError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE),
            err @ (TodoError::Storage(_) | TodoError::Timeout(_)) => {
                tracing::error!(error = %err, "{storage_message}");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, storage_message)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response { (self.status, axum::Json(self)).into_response() }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToggleResponse {
    pub success: bool,
    pub completed: bool,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteResponse {
    pub success: bool,
}
