use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::{AuthStateError, RequestAuthState};

use super::AuthCtx;

/// Reads the RequestAuthState the access middleware stored in the extensions.
/// Missing means the route was not guarded; the request is answered 401.
impl<S> FromRequestParts<S> for AuthCtx
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestAuthState>()
            .cloned()
            .map(AuthCtx::new)
            .ok_or_else(|| AuthStateError::IdentityNotFound.into())
    }
}
