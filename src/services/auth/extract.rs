//! Authorization header → credential.

use crate::services::auth::error::AuthError;

pub const DEFAULT_AUTH_SCHEME: &str = "Bearer";

/// Returns the credential after `"<scheme> "`.
///
/// Fails with `TokenMissingOrMalformed` when the header is absent, uses another
/// scheme, or carries nothing after the scheme and its separating space.
pub fn extract_credential<'a>(header: Option<&'a str>, scheme: &str) -> Result<&'a str, AuthError> {
    let header = header.ok_or(AuthError::TokenMissingOrMalformed)?;

    let credential = header
        .strip_prefix(scheme)
        .and_then(|rest| rest.strip_prefix(' '))
        .ok_or(AuthError::TokenMissingOrMalformed)?;

    if credential.is_empty() {
        return Err(AuthError::TokenMissingOrMalformed);
    }

    Ok(credential)
}
