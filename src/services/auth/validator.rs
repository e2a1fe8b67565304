use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};

use crate::services::auth::{
    claims::{ClaimsPolicy, TokenPayload},
    envelope::{self, SignedEnvelope},
    error::AuthError,
    provider::IdentityProvider,
};

/// Access-token settings fixed at startup.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    pub issuer: String,
    /// `Some` when the `client_id` claim must match.
    pub client_id: Option<String>,
    pub algorithms: Vec<String>,
    pub verify_timeout: Duration,
}

/// Access-token verifier.
///
/// Runs, in order: envelope (signature count, algorithm) → payload decode →
/// iss/exp/client_id → provider signature check → payload consistency.
/// Everything before the provider call is local, so doomed tokens never reach it.
#[derive(Clone)]
pub struct TokenValidator {
    provider: Arc<dyn IdentityProvider>,
    claims: ClaimsPolicy,
    algorithms: Vec<String>,
    verify_timeout: Duration,
}

impl std::fmt::Debug for TokenValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenValidator")
            .field("issuer", &self.claims.issuer)
            .field("algorithms", &self.algorithms)
            .field("verify_timeout", &self.verify_timeout)
            .finish()
    }
}

impl TokenValidator {
    pub fn new(provider: Arc<dyn IdentityProvider>, config: ValidatorConfig) -> Self {
        Self {
            provider,
            claims: ClaimsPolicy {
                issuer: config.issuer,
                client_id: config.client_id,
            },
            algorithms: config.algorithms,
            verify_timeout: config.verify_timeout,
        }
    }

    pub async fn validate(&self, token: &str) -> Result<TokenPayload, AuthError> {
        self.validate_at(token, Utc::now()).await
    }

    pub async fn validate_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenPayload, AuthError> {
        let envelope = SignedEnvelope::parse(token)?;
        let signature = envelope.single_signature()?;
        envelope::check_algorithm(signature, &self.algorithms)?;

        // Cheap checks first; the provider call may hit the network.
        let payload_bytes = envelope::decode_payload(token)?;
        let payload = TokenPayload::from_slice(&payload_bytes)?;
        self.claims.validate(&payload, now)?;

        let verified = tokio::time::timeout(
            self.verify_timeout,
            self.provider.verify_signature(token),
        )
        .await
        .map_err(|_| AuthError::VerificationCancelled(self.verify_timeout))?
        .map_err(AuthError::SignatureVerificationFailed)?;

        if verified != payload_bytes {
            tracing::error!(
                issuer = %self.claims.issuer,
                provider = %self.provider.issuer(),
                "verified payload differs from parsed payload"
            );
            return Err(AuthError::InternalPayloadMismatch);
        }

        Ok(payload)
    }
}
