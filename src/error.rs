/*
 * Responsibility
 * - AppError: the one error type handlers/middleware return
 * - IntoResponse (HTTP status + {"error":{"code","message"}})
 * - Conversions from AuthError / AuthStateError / StoreError
 * - No bound identity is 401, the same as a rejected token
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::StoreError;
use crate::services::auth::{AuthError, AuthStateError};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error("unauthorized: {0}")]
    Unauthorized(#[source] AuthError),
    #[error("unauthenticated: {0}")]
    Unauthenticated(#[source] AuthStateError),
    #[error("insufficient scope")]
    InsufficientScope,
    #[error("not found: {resource}")]
    NotFound { resource: &'static str },
    #[error("{code}: {message}")]
    Conflict { code: &'static str, message: String },
    #[error("not implemented")]
    NotImplemented,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn conflict(code: &'static str, message: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) | AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::InsufficientScope => StatusCode::FORBIDDEN,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::NotImplemented => StatusCode::NOT_IMPLEMENTED,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match self {
            AppError::BadRequest { code, message } => (code, message),
            // The cause is logged where it happened; clients only learn "invalid jwt".
            AppError::Unauthorized(_) | AppError::Unauthenticated(_) => {
                ("UNAUTHORIZED", "invalid jwt".into())
            }
            AppError::InsufficientScope => ("FORBIDDEN", "insufficient scope".into()),
            AppError::NotFound { resource } => ("NOT_FOUND", format!("{resource} not found.")),
            AppError::Conflict { code, message } => (code, message),
            AppError::NotImplemented => ("NOT_IMPLEMENTED", "not implemented".into()),
            AppError::Internal => ("INTERNAL_SERVER_ERROR", "internal server error".into()),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::TokenMissingOrMalformed => {
                AppError::bad_request("TOKEN_MISSING_OR_MALFORMED", "missing or malformed jwt")
            }
            other => AppError::Unauthorized(other),
        }
    }
}

impl From<AuthStateError> for AppError {
    fn from(e: AuthStateError) -> Self {
        // The access layer always binds both attributes; an unguarded route lands here.
        tracing::error!(error = %e, "request auth state unavailable");
        match e {
            AuthStateError::IdentityNotFound | AuthStateError::ScopesNotFound => {
                AppError::Unauthenticated(e)
            }
            AuthStateError::IdentityTypeMismatch | AuthStateError::ScopesTypeMismatch => {
                AppError::Internal
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { resource } => AppError::not_found(resource),
            StoreError::Conflict { resource, name } => {
                AppError::conflict("CONFLICT", format!("{resource} {name} already exists."))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn missing_token_is_bad_request() {
        let (status, body) = render(AuthError::TokenMissingOrMalformed.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "TOKEN_MISSING_OR_MALFORMED");
    }

    #[tokio::test]
    async fn other_auth_failures_are_generic_401() {
        for err in [
            AuthError::TokenNotSigned,
            AuthError::MultipleSignaturesUnsupported,
            AuthError::malformed("bad base64"),
            AuthError::InternalPayloadMismatch,
            AuthError::VerificationCancelled(std::time::Duration::from_secs(1)),
        ] {
            let (status, body) = render(err.into()).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body["error"]["message"], "invalid jwt");
        }
    }

    #[tokio::test]
    async fn insufficient_scope_is_forbidden() {
        let (status, body) = render(AppError::InsufficientScope).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"]["code"], "FORBIDDEN");
    }

    #[tokio::test]
    async fn store_errors_map_to_404_and_409() {
        let (status, _) = render(StoreError::not_found("project").into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = render(
            StoreError::Conflict {
                resource: "customer",
                name: "acme".to_string(),
            }
            .into(),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["message"], "customer acme already exists.");
    }

    #[tokio::test]
    async fn missing_auth_state_is_unauthorized() {
        for err in [
            AuthStateError::IdentityNotFound,
            AuthStateError::ScopesNotFound,
        ] {
            let (status, body) = render(err.into()).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body["error"]["code"], "UNAUTHORIZED");
        }
    }

    #[tokio::test]
    async fn mistyped_auth_state_is_internal() {
        let (status, _) = render(AuthStateError::IdentityTypeMismatch.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
