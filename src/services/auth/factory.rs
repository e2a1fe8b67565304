/// Factory: build the `TokenValidator` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{
    provider::{OidcProvider, ProviderError},
    validator::{TokenValidator, ValidatorConfig},
};

pub fn validator_config(config: &Config) -> ValidatorConfig {
    ValidatorConfig {
        issuer: config.provider_url.clone(),
        client_id: config
            .enforce_client_id
            .then(|| config.client_id.clone()),
        algorithms: config.auth_algorithms.clone(),
        verify_timeout: config.verify_timeout,
    }
}

/// Runs OIDC discovery once. Any failure here is fatal to startup.
pub async fn build_token_validator(config: &Config) -> Result<Arc<TokenValidator>, ProviderError> {
    let provider =
        OidcProvider::discover(&config.provider_url, config.provider_http_timeout).await?;

    Ok(Arc::new(TokenValidator::new(
        Arc::new(provider),
        validator_config(config),
    )))
}
