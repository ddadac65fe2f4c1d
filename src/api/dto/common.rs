//! Common API DTOs

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ServiceError;

/// Standard response envelope
///
/// Success: `{"success": true, "data": {...}}`.
/// Failure: `{"success": false, "error": "...", "error_kind": "STABLE_CODE"}`.
/// Callers branch on `error_kind`, never on message text.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` if the request succeeded
    pub success: bool,
    /// Payload; `null` on failure
    pub data: Option<T>,
    /// Human-readable description; `null` on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Stable machine-readable failure code; `null` on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            error_kind: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            error_kind: None,
        }
    }

    pub fn failure(kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            error_kind: Some(kind.to_string()),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let body = Json(ApiResponse::<()>::failure(self.kind(), self.to_string()));
        (self.status_code(), body).into_response()
    }
}

/// Empty response for operations without return data
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EmptyData {}

/// Issued-token response shared by the login operations and the
/// default-token probe
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token. Send it as `Authorization: Bearer <token>`
    pub token: String,
    /// Token type (always `Bearer`)
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

impl TokenResponse {
    pub fn bearer(token: String, expires_in: i64) -> Self {
        Self {
            token,
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }
}

/// Boolean outcome of the credential-check operations
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthenticateResponse {
    pub valid: bool,
}
