/*
 * Responsibility
 * - Access-token payload type (unverified at parse time)
 * - Epoch timestamps that may be JSON integers or floats
 * - Cheap claim checks run before the provider round trip: iss → exp → client_id
 */
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, de};

use crate::services::auth::error::AuthError;

/// A `NumericDate` claim. Integer and fractional encodings of the same second decode
/// to the same instant; fractions are truncated toward zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct EpochTimestamp(DateTime<Utc>);

impl EpochTimestamp {
    pub fn from_unix(secs: i64) -> Option<Self> {
        DateTime::<Utc>::from_timestamp(secs, 0).map(Self)
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    pub fn unix(&self) -> i64 {
        self.0.timestamp()
    }
}

impl<'de> Deserialize<'de> for EpochTimestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let n = serde_json::Number::deserialize(deserializer)?;

        let secs = if let Some(i) = n.as_i64() {
            i
        } else {
            let f = n
                .as_f64()
                .ok_or_else(|| de::Error::custom(format!("invalid epoch timestamp {n}")))?;
            // Out of i64 range would silently saturate with `as`.
            if !f.is_finite() || f >= i64::MAX as f64 || f <= i64::MIN as f64 {
                return Err(de::Error::custom(format!("epoch timestamp out of range {n}")));
            }
            f.trunc() as i64
        };

        Self::from_unix(secs)
            .ok_or_else(|| de::Error::custom(format!("epoch timestamp out of range {n}")))
    }
}

impl fmt::Display for EpochTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

/// Access token claims as issued by the identity provider.
///
/// Only `exp` is mandatory for decoding; the remaining claims default to empty so
/// a missing `iss` surfaces as an issuer mismatch rather than a decode error.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPayload {
    #[serde(default)]
    pub sub: String,
    #[serde(default)]
    pub token_use: String,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub auth_time: Option<EpochTimestamp>,
    #[serde(default, rename = "iss")]
    pub issuer: String,
    #[serde(rename = "exp")]
    pub expires: EpochTimestamp,
    #[serde(default, rename = "iat")]
    pub issued_at: Option<EpochTimestamp>,
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub jti: String,
    #[serde(default)]
    pub client_id: String,
}

impl TokenPayload {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AuthError> {
        serde_json::from_slice(bytes)
            .map_err(|e| AuthError::malformed(format!("failed to parse jwt payload: {e}")))
    }
}

/// Claim expectations fixed at startup.
#[derive(Debug, Clone)]
pub struct ClaimsPolicy {
    pub issuer: String,
    /// `Some` when the `client_id` claim must match.
    pub client_id: Option<String>,
}

impl ClaimsPolicy {
    /// Runs the local checks in order. `now` is injected so callers (and tests) own the clock.
    pub fn validate(&self, payload: &TokenPayload, now: DateTime<Utc>) -> Result<(), AuthError> {
        if payload.issuer != self.issuer {
            return Err(AuthError::IssuerMismatch {
                expected: self.issuer.clone(),
                actual: payload.issuer.clone(),
            });
        }

        let expires_at = payload.expires.as_datetime();
        if expires_at <= now {
            return Err(AuthError::TokenExpired { now, expires_at });
        }

        if let Some(expected) = &self.client_id
            && payload.client_id != *expected
        {
            return Err(AuthError::ClientIdMismatch {
                expected: expected.clone(),
                actual: payload.client_id.clone(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    const ISSUER: &str = "https://idp.example";

    fn policy() -> ClaimsPolicy {
        ClaimsPolicy {
            issuer: ISSUER.to_string(),
            client_id: None,
        }
    }

    fn payload(value: serde_json::Value) -> TokenPayload {
        TokenPayload::from_slice(value.to_string().as_bytes()).unwrap()
    }

    #[test]
    fn integer_and_float_expiry_decode_to_same_instant() {
        for secs in [0_i64, 1, 1_700_000_000, 4_102_444_800] {
            let as_int: EpochTimestamp = serde_json::from_value(json!(secs)).unwrap();
            let as_float: EpochTimestamp = serde_json::from_value(json!(secs as f64)).unwrap();
            let with_fraction: EpochTimestamp =
                serde_json::from_str(&format!("{secs}.75")).unwrap();

            assert_eq!(as_int, as_float);
            assert_eq!(as_int, with_fraction);
            assert_eq!(as_int.unix(), secs);
        }
    }

    #[test]
    fn exponent_notation_is_accepted() {
        let ts: EpochTimestamp = serde_json::from_str("1.7e9").unwrap();
        assert_eq!(ts.unix(), 1_700_000_000);
    }

    #[test]
    fn non_numeric_timestamp_is_an_error() {
        for raw in [r#""1700000000""#, "true", "null", "{}", "1e300"] {
            let res: Result<EpochTimestamp, _> = serde_json::from_str(raw);
            assert!(res.is_err(), "{raw} should not decode");
        }
    }

    #[test]
    fn payload_decodes_all_claims() {
        let p = payload(json!({
            "sub": "u1",
            "token_use": "access",
            "scope": "read write",
            "auth_time": 1_700_000_000,
            "iss": ISSUER,
            "exp": 1_700_003_600.5,
            "iat": 1_700_000_000,
            "version": 2,
            "jti": "id-1",
            "client_id": "client-1"
        }));

        assert_eq!(p.sub, "u1");
        assert_eq!(p.token_use, "access");
        assert_eq!(p.scope, "read write");
        assert_eq!(p.expires.unix(), 1_700_003_600);
        assert_eq!(p.issued_at.map(|t| t.unix()), Some(1_700_000_000));
        assert_eq!(p.version, 2);
        assert_eq!(p.client_id, "client-1");
    }

    #[test]
    fn payload_without_exp_is_malformed() {
        let err = TokenPayload::from_slice(br#"{"sub":"u1"}"#).unwrap_err();
        assert!(matches!(err, AuthError::MalformedToken(_)));
    }

    #[test]
    fn issuer_is_checked_before_expiry() {
        let now = Utc::now();
        let p = payload(json!({
            "iss": "https://evil.example",
            "exp": (now - Duration::hours(1)).timestamp()
        }));

        match policy().validate(&p, now) {
            Err(AuthError::IssuerMismatch { expected, actual }) => {
                assert_eq!(expected, ISSUER);
                assert_eq!(actual, "https://evil.example");
            }
            other => panic!("expected IssuerMismatch, got {other:?}"),
        }
    }

    #[test]
    fn expired_token_records_both_instants() {
        let now = Utc::now();
        let exp = (now - Duration::seconds(5)).timestamp();
        let p = payload(json!({"iss": ISSUER, "exp": exp}));

        match policy().validate(&p, now) {
            Err(AuthError::TokenExpired {
                now: seen,
                expires_at,
            }) => {
                assert_eq!(seen, now);
                assert_eq!(expires_at.timestamp(), exp);
            }
            other => panic!("expected TokenExpired, got {other:?}"),
        }
    }

    #[test]
    fn expiry_equal_to_now_is_expired() {
        let now = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap();
        let p = payload(json!({"iss": ISSUER, "exp": 1_700_000_000}));
        assert!(matches!(
            policy().validate(&p, now),
            Err(AuthError::TokenExpired { .. })
        ));
    }

    #[test]
    fn client_id_is_enforced_only_when_configured() {
        let now = Utc::now();
        let p = payload(json!({
            "iss": ISSUER,
            "exp": (now + Duration::hours(1)).timestamp(),
            "client_id": "other"
        }));

        policy().validate(&p, now).unwrap();

        let strict = ClaimsPolicy {
            client_id: Some("client-1".to_string()),
            ..policy()
        };
        assert!(matches!(
            strict.validate(&p, now),
            Err(AuthError::ClientIdMismatch { .. })
        ));
    }
}
