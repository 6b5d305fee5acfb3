// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! HTTP error mapping.

use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use folio_api::ApiError;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `true`.
    pub error: bool,
    /// Machine-readable error class, e.g. `not_found` or `conflict`.
    pub kind: String,
    /// The request field the error refers to, when there is one.
    pub field: Option<String>,
    /// Human-readable description.
    pub message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
pub struct HttpError {
    /// The HTTP status code.
    pub status: StatusCode,
    /// Machine-readable error class.
    pub kind: &'static str,
    /// The request field the error refers to.
    pub field: Option<String>,
    /// The error message.
    pub message: String,
}

impl HttpError {
    /// A 401 raised before the API layer is reached.
    #[must_use]
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            kind: "authentication_failed",
            field: None,
            message: message.into(),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            kind: self.kind.to_string(),
            field: self.field,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let (status, kind): (StatusCode, &'static str) = match &err {
            ApiError::AuthenticationFailed { .. } => {
                (StatusCode::UNAUTHORIZED, "authentication_failed")
            }
            ApiError::Unauthorized { .. } => (StatusCode::FORBIDDEN, "forbidden"),
            ApiError::InvalidInput { .. } => (StatusCode::BAD_REQUEST, "invalid_input"),
            ApiError::PasswordPolicyViolation { .. } => {
                (StatusCode::BAD_REQUEST, "password_policy_violation")
            }
            ApiError::ResourceNotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Conflict { .. } => (StatusCode::CONFLICT, "conflict"),
            ApiError::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        };

        if status.is_server_error() {
            error!(error = %err, "Request failed");
        } else {
            debug!(error = %err, status = status.as_u16(), "Request rejected");
        }

        Self {
            status,
            kind,
            field: err.field().map(str::to_string),
            message: err.to_string(),
        }
    }
}

impl From<QueryRejection> for HttpError {
    fn from(rejection: QueryRejection) -> Self {
        debug!(error = %rejection.body_text(), "Query string rejected");
        Self {
            status: rejection.status(),
            kind: "invalid_input",
            field: None,
            message: rejection.body_text(),
        }
    }
}
