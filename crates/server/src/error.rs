//! Unified error handling for the server.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use stockline_core::FunctionError;
use thiserror::Error;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// A function call failed.
    #[error(transparent)]
    Function(#[from] FunctionError),

    /// Request body was not valid JSON.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: &'static str,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Function(err) => match err {
                FunctionError::Validation { .. } | FunctionError::TypeInput(_) => {
                    StatusCode::BAD_REQUEST
                }
                FunctionError::NotConfigured { .. } => StatusCode::CONFLICT,
                FunctionError::NotFound(_) | FunctionError::UnknownFunction(_) => {
                    StatusCode::NOT_FOUND
                }
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    const fn kind(&self) -> &'static str {
        match self {
            Self::Function(err) => err.kind(),
            Self::BadRequest(_) => "bad_request",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Client errors only; they are breadcrumbs, not Sentry events
        tracing::info!(error = %self, kind = self.kind(), "function call rejected");

        (
            self.status(),
            Json(ErrorBody {
                error: self.to_string(),
                kind: self.kind(),
            }),
        )
            .into_response()
    }
}
