pub mod claims;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod factory;
pub mod identity;
pub mod provider;
pub mod validator;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{AuthError, AuthStateError};
pub use factory::build_token_validator;
pub use identity::{AuthenticatedIdentity, OperationScopeRequirement, RequestAuthState, authorize};
pub use provider::{IdentityProvider, OidcProvider, ProviderError};
pub use validator::{TokenValidator, ValidatorConfig};
