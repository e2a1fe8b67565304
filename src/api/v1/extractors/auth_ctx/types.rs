/*
 * Responsibility
 * - The authenticated context a handler sees
 * - The middleware validates and binds; handlers only read through this type
 *
 * Notes
 * - Token validation lives in services::auth, not here
 */
use crate::error::AppError;
use crate::services::auth::{AuthenticatedIdentity, RequestAuthState, authorize};

#[derive(Debug, Clone)]
pub struct AuthCtx {
    state: RequestAuthState,
}

impl AuthCtx {
    pub fn new(state: RequestAuthState) -> Self {
        Self { state }
    }

    pub fn identity(&self) -> Result<&AuthenticatedIdentity, AppError> {
        Ok(self.state.identity()?)
    }

    /// Subject id of the token, e.g. the issue reporter.
    pub fn subject(&self) -> Result<&str, AppError> {
        Ok(&self.identity()?.subject)
    }

    /// 403 unless a granted scope is one the operation accepts.
    /// Call before touching any store.
    pub fn require_scope(&self) -> Result<(), AppError> {
        if authorize(&self.state) {
            return Ok(());
        }

        tracing::warn!(
            subject = self.state.identity().map(|i| i.subject.as_str()).unwrap_or("-"),
            "insufficient scope"
        );
        Err(AppError::InsufficientScope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::OperationScopeRequirement;

    fn ctx(scopes: &[&str], required: &'static [&'static str]) -> AuthCtx {
        AuthCtx::new(RequestAuthState::bind(
            AuthenticatedIdentity {
                subject: "u1".to_string(),
                scopes: scopes.iter().map(|s| s.to_string()).collect(),
            },
            OperationScopeRequirement::any_of(required),
        ))
    }

    #[test]
    fn matching_scope_passes() {
        let ctx = ctx(&["read", "write"], &["write"]);
        assert!(ctx.require_scope().is_ok());
        assert_eq!(ctx.subject().unwrap(), "u1");
    }

    #[test]
    fn missing_scope_is_forbidden() {
        let err = ctx(&["read"], &["write"]).require_scope().unwrap_err();
        assert!(matches!(err, AppError::InsufficientScope));
    }

    #[test]
    fn unbound_state_is_forbidden() {
        let ctx = AuthCtx::new(RequestAuthState::default());
        assert!(matches!(
            ctx.require_scope(),
            Err(AppError::InsufficientScope)
        ));
        assert!(matches!(ctx.subject(), Err(AppError::Unauthenticated(_))));
    }
}
