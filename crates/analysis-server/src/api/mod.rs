//! API handlers for the analysis server.

pub mod analyze;
pub mod health;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Renders `detail` as `{"detail": ...}` with the given status.
pub(crate) fn error_response(status: StatusCode, detail: String) -> Response {
    (status, Json(ErrorBody { detail })).into_response()
}
