//! Identity-provider collaborator.
//!
//! Responsibility:
//! - `IdentityProvider`: the narrow contract the token pipeline depends on
//!   ("verify this token, give me the payload bytes you verified").
//! - `OidcProvider`: OIDC discovery + JWKS fetched once at startup, RS256 checks
//!   against that key set.
//!
//! Notes:
//! - No key refresh and no retries here. A stale key set shows up as a failed
//!   verification and the caller decides what to do.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{
    Algorithm, DecodingKey,
    jwk::{Jwk, JwkSet},
};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider discovery failed: {0}")]
    Discovery(String),

    #[error("provider http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider issuer mismatch expected: {expected} actual: {actual}")]
    IssuerMismatch { expected: String, actual: String },

    #[error("provider published no signing keys")]
    NoKeys,

    #[error("token kid is required when the provider publishes several keys")]
    MissingKid,

    #[error("no provider key for kid {0}")]
    KeyNotFound(String),

    #[error("unsupported token: {0}")]
    UnsupportedToken(String),

    #[error("jwt error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("signature does not match")]
    SignatureMismatch,
}

/// Verifies a token's signature and returns the payload bytes it verified.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn issuer(&self) -> &str;

    async fn verify_signature(&self, token: &str) -> Result<Vec<u8>, ProviderError>;
}

#[derive(Debug, Deserialize)]
struct DiscoveryDocument {
    issuer: String,
    jwks_uri: String,
}

/// OIDC provider backed by the key set published at discovery time.
#[derive(Clone)]
pub struct OidcProvider {
    issuer: String,
    jwks: Arc<JwkSet>,
}

impl std::fmt::Debug for OidcProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OidcProvider")
            .field("issuer", &self.issuer)
            .field("keys", &self.jwks.keys.len())
            .finish()
    }
}

impl OidcProvider {
    /// Fetches `<issuer>/.well-known/openid-configuration` and then the JWKS it points to.
    pub async fn discover(issuer: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .user_agent(concat!("tracker-api/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        let url = format!(
            "{}/.well-known/openid-configuration",
            issuer.trim_end_matches('/')
        );

        let resp = http.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(ProviderError::Discovery(format!(
                "GET {} returned {}",
                url,
                resp.status()
            )));
        }
        let doc = resp.json::<DiscoveryDocument>().await?;

        if doc.issuer != issuer {
            return Err(ProviderError::IssuerMismatch {
                expected: issuer.to_string(),
                actual: doc.issuer,
            });
        }
        if doc.jwks_uri.trim().is_empty() {
            return Err(ProviderError::Discovery(
                "discovery jwks_uri is empty".to_string(),
            ));
        }

        let resp = http.get(&doc.jwks_uri).send().await?;
        if !resp.status().is_success() {
            return Err(ProviderError::Discovery(format!(
                "GET {} returned {}",
                doc.jwks_uri,
                resp.status()
            )));
        }
        let jwks = resp.json::<JwkSet>().await?;

        if jwks.keys.is_empty() {
            return Err(ProviderError::NoKeys);
        }

        tracing::info!(
            issuer = %issuer,
            jwks_uri = %doc.jwks_uri,
            keys = jwks.keys.len(),
            "identity provider discovered"
        );

        Ok(Self::from_jwks(issuer, jwks))
    }

    pub fn from_jwks(issuer: impl Into<String>, jwks: JwkSet) -> Self {
        Self {
            issuer: issuer.into(),
            jwks: Arc::new(jwks),
        }
    }

    fn select_key(&self, kid: Option<&str>) -> Result<&Jwk, ProviderError> {
        match (kid, self.jwks.keys.as_slice()) {
            (_, []) => Err(ProviderError::NoKeys),
            (Some(kid), keys) => keys
                .iter()
                .find(|k| k.common.key_id.as_deref() == Some(kid))
                .ok_or_else(|| ProviderError::KeyNotFound(kid.to_string())),
            (None, [only]) => Ok(only),
            (None, _) => Err(ProviderError::MissingKid),
        }
    }
}

#[async_trait]
impl IdentityProvider for OidcProvider {
    fn issuer(&self) -> &str {
        &self.issuer
    }

    async fn verify_signature(&self, token: &str) -> Result<Vec<u8>, ProviderError> {
        let mut parts = token.split('.');
        let (header, payload, signature) =
            match (parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some(h), Some(p), Some(s), None) => (h, p, s),
                _ => {
                    return Err(ProviderError::UnsupportedToken(
                        "expected compact jws".to_string(),
                    ));
                }
            };

        let jws_header = jsonwebtoken::decode_header(token)?;
        if jws_header.alg != Algorithm::RS256 {
            return Err(ProviderError::UnsupportedToken(format!(
                "algorithm {:?}",
                jws_header.alg
            )));
        }

        let jwk = self.select_key(jws_header.kid.as_deref())?;
        let key = DecodingKey::from_jwk(jwk)?;

        // Signing input is `<header>.<payload>` exactly as transmitted.
        let signing_input = &token[..header.len() + 1 + payload.len()];
        let valid = jsonwebtoken::crypto::verify(
            signature,
            signing_input.as_bytes(),
            &key,
            jws_header.alg,
        )?;
        if !valid {
            return Err(ProviderError::SignatureMismatch);
        }

        URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|e| ProviderError::UnsupportedToken(format!("payload encoding: {e}")))
    }
}
