//! Unified API error type: every 4xx/5xx response is JSON with a consistent shape.
//!
//! ```json
//! { "code": "upstream_error", "message": "upstream: model not found" }
//! ```
//!
//! Caller mistakes are 400; anything the prediction service did wrong is 5xx.

use crate::ride::ParamError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fare_adapter::PredictError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "bad_request",
            message: msg.into(),
        }
    }

    /// The prediction service answered, but with an error.
    pub fn upstream_error(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            code: "upstream_error",
            message: msg.into(),
        }
    }

    /// The prediction service could not be reached or answered garbage.
    pub fn upstream_unavailable(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            code: "upstream_unavailable",
            message: msg.into(),
        }
    }

    pub fn upstream_timeout(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::GATEWAY_TIMEOUT,
            code: "upstream_timeout",
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "internal_error",
            message: msg.into(),
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status.is_client_error()
    }
}

impl From<ParamError> for AppError {
    fn from(e: ParamError) -> Self {
        Self::bad_request(e.to_string())
    }
}

impl From<PredictError> for AppError {
    fn from(e: PredictError) -> Self {
        let msg = e.to_string();
        if e.is_timeout() {
            Self::upstream_timeout(msg)
        } else if e.is_reported() {
            Self::upstream_error(msg)
        } else {
            Self::upstream_unavailable(msg)
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            code: self.code,
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.status.as_u16(), self.code, self.message)
    }
}

impl std::error::Error for AppError {}
