/*
 * Responsibility
 * - AuthenticatedIdentity: who the verified token speaks for (sub + scopes)
 * - OperationScopeRequirement: static "any of these scopes" per route
 * - RequestAuthState: request-scoped attribute bag carrying both
 * - authorize(): the scope check every handler runs before touching data
 *
 * Notes
 * - RequestAuthState is created per request by the access middleware and lives in
 *   the request's extensions. Nothing here is global or shared between requests.
 */
use std::collections::HashMap;

use serde::Serialize;

use crate::services::auth::claims::TokenPayload;
use crate::services::auth::error::AuthStateError;

pub const IDENTITY_KEY: &str = "auth.identity";
pub const REQUIRED_SCOPES_KEY: &str = "openid.scopes";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedIdentity {
    pub subject: String,
    pub scopes: Vec<String>,
}

impl AuthenticatedIdentity {
    pub fn from_payload(payload: &TokenPayload) -> Self {
        Self {
            subject: payload.sub.clone(),
            scopes: split_scopes(&payload.scope),
        }
    }

    /// True when any granted scope is one of `allowed`.
    /// An empty `allowed` list never matches.
    pub fn has_scope(&self, allowed: &[String]) -> bool {
        if allowed.is_empty() {
            return false;
        }

        // O(n^2), both lists are a handful of entries.
        for granted in &self.scopes {
            for acceptable in allowed {
                if granted == acceptable {
                    return true;
                }
            }
        }

        false
    }
}

/// Space-delimited `scope` claim → list, order preserved.
pub fn split_scopes(scope: &str) -> Vec<String> {
    scope.split(' ').map(str::to_string).collect()
}

/// Scopes an operation accepts (any one is enough). Declared once per route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationScopeRequirement(&'static [&'static str]);

impl OperationScopeRequirement {
    pub const fn any_of(scopes: &'static [&'static str]) -> Self {
        Self(scopes)
    }

    pub fn scopes(&self) -> &'static [&'static str] {
        self.0
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().map(|s| s.to_string()).collect()
    }
}

#[derive(Debug, Clone)]
pub enum AuthAttribute {
    Identity(AuthenticatedIdentity),
    RequiredScopes(Vec<String>),
}

#[derive(Debug, Clone, Default)]
pub struct RequestAuthState {
    attributes: HashMap<&'static str, AuthAttribute>,
}

impl RequestAuthState {
    /// Binds the identity and a snapshot of the operation's required scopes.
    pub fn bind(identity: AuthenticatedIdentity, required: OperationScopeRequirement) -> Self {
        let mut state = Self::default();
        state.insert(IDENTITY_KEY, AuthAttribute::Identity(identity));
        state.insert(
            REQUIRED_SCOPES_KEY,
            AuthAttribute::RequiredScopes(required.to_vec()),
        );
        state
    }

    pub fn insert(&mut self, key: &'static str, value: AuthAttribute) {
        self.attributes.insert(key, value);
    }

    pub fn identity(&self) -> Result<&AuthenticatedIdentity, AuthStateError> {
        match self.attributes.get(IDENTITY_KEY) {
            None => Err(AuthStateError::IdentityNotFound),
            Some(AuthAttribute::Identity(identity)) => Ok(identity),
            Some(_) => Err(AuthStateError::IdentityTypeMismatch),
        }
    }

    pub fn required_scopes(&self) -> Result<&[String], AuthStateError> {
        match self.attributes.get(REQUIRED_SCOPES_KEY) {
            None => Err(AuthStateError::ScopesNotFound),
            Some(AuthAttribute::RequiredScopes(scopes)) => Ok(scopes),
            Some(_) => Err(AuthStateError::ScopesTypeMismatch),
        }
    }
}

/// Scope check for the current request. Never fails: anything missing means `false`.
pub fn authorize(state: &RequestAuthState) -> bool {
    let identity = match state.identity() {
        Ok(identity) => identity,
        Err(err) => {
            tracing::error!(error = %err, "failed to load user from request state");
            return false;
        }
    };

    let required = match state.required_scopes() {
        Ok(required) => required,
        Err(err) => {
            tracing::error!(error = %err, "failed to load scopes from request state");
            return false;
        }
    };

    tracing::debug!(
        subject = %identity.subject,
        scopes = ?identity.scopes,
        required = ?required,
        "scopes check"
    );

    identity.has_scope(required)
}
