/*
 * Responsibility
 * - Structural parsing of a JWS before anything is trusted
 *   - signature list (compact / flattened JSON / general JSON)
 *   - algorithm allow-list
 *   - unverified payload bytes (2nd compact segment, base64url without padding)
 * - Nothing here checks a signature; that is the provider's job
 */
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::Deserialize;

use crate::services::auth::error::AuthError;

/// Algorithms this service is able to accept at all.
/// The configured allow-list must be a subset of this.
pub const SUPPORTED_ALGORITHMS: &[&str] = &["RS256"];

/// One signature entry of the envelope, as declared by its headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureEntry {
    pub algorithm: Option<String>,
    pub key_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SignedEnvelope {
    signatures: Vec<SignatureEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct JoseHeader {
    #[serde(default)]
    alg: Option<String>,
    #[serde(default)]
    kid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JsonSignature {
    #[serde(default)]
    protected: Option<String>,
    #[serde(default)]
    header: Option<JoseHeader>,
}

// General: `signatures` is set. Flattened: `signature` (+ protected/header) at the top level.
#[derive(Debug, Deserialize)]
struct JsonEnvelope {
    #[serde(default)]
    signatures: Option<Vec<JsonSignature>>,
    #[serde(default)]
    protected: Option<String>,
    #[serde(default)]
    header: Option<JoseHeader>,
    #[serde(default)]
    signature: Option<String>,
}

impl SignedEnvelope {
    pub fn parse(token: &str) -> Result<Self, AuthError> {
        if token.trim_start().starts_with('{') {
            Self::parse_json(token)
        } else {
            Self::parse_compact(token)
        }
    }

    fn parse_compact(token: &str) -> Result<Self, AuthError> {
        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() != 3 {
            return Err(AuthError::malformed(format!(
                "compact jws must have 3 parts, got {}",
                parts.len()
            )));
        }

        // An empty signature segment is an unsecured JWS: treat as no signature at all.
        if parts[2].is_empty() {
            return Ok(Self {
                signatures: Vec::new(),
            });
        }

        let header = decode_header(parts[0])?;

        Ok(Self {
            signatures: vec![SignatureEntry {
                algorithm: header.alg,
                key_id: header.kid,
            }],
        })
    }

    fn parse_json(token: &str) -> Result<Self, AuthError> {
        let envelope: JsonEnvelope = serde_json::from_str(token)
            .map_err(|e| AuthError::malformed(format!("invalid json jws: {e}")))?;

        let signatures = match (envelope.signatures, envelope.signature) {
            (Some(_), Some(_)) => {
                return Err(AuthError::malformed(
                    "json jws mixes general and flattened syntax",
                ));
            }
            (Some(list), None) => list
                .into_iter()
                .map(|s| entry_from_parts(s.protected.as_deref(), s.header))
                .collect::<Result<Vec<_>, _>>()?,
            (None, Some(_)) => vec![entry_from_parts(
                envelope.protected.as_deref(),
                envelope.header,
            )?],
            (None, None) => Vec::new(),
        };

        Ok(Self { signatures })
    }

    pub fn signatures(&self) -> &[SignatureEntry] {
        &self.signatures
    }

    /// Exactly one signature is accepted; JWS-general tokens with several are refused.
    pub fn single_signature(&self) -> Result<&SignatureEntry, AuthError> {
        match self.signatures.as_slice() {
            [] => Err(AuthError::TokenNotSigned),
            [only] => Ok(only),
            _ => Err(AuthError::MultipleSignaturesUnsupported),
        }
    }
}

fn entry_from_parts(
    protected: Option<&str>,
    unprotected: Option<JoseHeader>,
) -> Result<SignatureEntry, AuthError> {
    let protected = match protected {
        Some(segment) => decode_header(segment)?,
        None => JoseHeader::default(),
    };
    let unprotected = unprotected.unwrap_or_default();

    Ok(SignatureEntry {
        algorithm: protected.alg.or(unprotected.alg),
        key_id: protected.kid.or(unprotected.kid),
    })
}

fn decode_header(segment: &str) -> Result<JoseHeader, AuthError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| AuthError::malformed(format!("malformed jws header: {e}")))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| AuthError::malformed(format!("invalid jws header: {e}")))
}

/// Checks the signature's declared algorithm against the allow-list.
pub fn check_algorithm(entry: &SignatureEntry, allowed: &[String]) -> Result<(), AuthError> {
    match entry.algorithm.as_deref() {
        Some(alg) if allowed.iter().any(|a| a == alg) => Ok(()),
        other => Err(AuthError::UnsupportedAlgorithm {
            allowed: allowed.to_vec(),
            actual: other.unwrap_or_default().to_string(),
        }),
    }
}

/// Unverified payload bytes: the second `.` segment, base64url decoded (no padding).
pub fn decode_payload(token: &str) -> Result<Vec<u8>, AuthError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() < 2 {
        return Err(AuthError::malformed(format!(
            "expected 3 parts got {}",
            parts.len()
        )));
    }

    URL_SAFE_NO_PAD
        .decode(parts[1])
        .map_err(|e| AuthError::malformed(format!("malformed jwt payload: {e}")))
}
