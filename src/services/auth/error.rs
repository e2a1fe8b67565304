/*
 * Responsibility
 * - Errors of the access-token pipeline (extract → envelope → claims → provider → consistency)
 * - One variant per failure so handlers/tests can match the exact cause
 * - HTTP mapping lives in crate::error (AppError), not here
 */
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::services::auth::provider::ProviderError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing or malformed jwt")]
    TokenMissingOrMalformed,

    #[error("malformed jwt: {0}")]
    MalformedToken(String),

    #[error("jwt not signed")]
    TokenNotSigned,

    #[error("multiple signatures on jwt not supported")]
    MultipleSignaturesUnsupported,

    #[error("jwt signed with unsupported algorithm, expected {allowed:?} got {actual:?}")]
    UnsupportedAlgorithm {
        allowed: Vec<String>,
        actual: String,
    },

    #[error("failed to match issuer expected: {expected} actual: {actual}")]
    IssuerMismatch { expected: String, actual: String },

    #[error("token expired current: {now} actual: {expires_at}")]
    TokenExpired {
        now: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    },

    #[error("failed to match client id expected: {expected} actual: {actual}")]
    ClientIdMismatch { expected: String, actual: String },

    #[error("signature verification failed: {0}")]
    SignatureVerificationFailed(#[source] ProviderError),

    #[error("signature verification cancelled after {0:?}")]
    VerificationCancelled(std::time::Duration),

    #[error("internal error, verified payload did not match parsed payload")]
    InternalPayloadMismatch,
}

impl AuthError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedToken(message.into())
    }

    /// Short, stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TokenMissingOrMalformed => "token_missing_or_malformed",
            Self::MalformedToken(_) => "malformed_token",
            Self::TokenNotSigned => "token_not_signed",
            Self::MultipleSignaturesUnsupported => "multiple_signatures_unsupported",
            Self::UnsupportedAlgorithm { .. } => "unsupported_algorithm",
            Self::IssuerMismatch { .. } => "issuer_mismatch",
            Self::TokenExpired { .. } => "token_expired",
            Self::ClientIdMismatch { .. } => "client_id_mismatch",
            Self::SignatureVerificationFailed(_) => "signature_verification_failed",
            Self::VerificationCancelled(_) => "verification_cancelled",
            Self::InternalPayloadMismatch => "internal_payload_mismatch",
        }
    }
}

/// Errors of the request-scoped accessors (see `identity::RequestAuthState`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthStateError {
    #[error("user not found in request state")]
    IdentityNotFound,

    #[error("failed to retrieve user, type mismatch")]
    IdentityTypeMismatch,

    #[error("scopes not found in request state")]
    ScopesNotFound,

    #[error("failed to retrieve scopes, type mismatch")]
    ScopesTypeMismatch,
}
