/*
 * Responsibility
 * - Load settings from the environment (.env via dotenvy)
 * - Validate them (missing/invalid values fail startup)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use url::Url;
use uuid::Uuid;

use crate::services::auth::{envelope::SUPPORTED_ALGORITHMS, extract::DEFAULT_AUTH_SCHEME};

pub const DEFAULT_TENANT_CUSTOMER_ID: &str = "a4a777ff-fd47-42ab-84b4-1cca19a51f8f";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<&str>) -> Self {
        match value
            .unwrap_or("development")
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    /// Issuer URL; also where discovery starts.
    pub provider_url: String,
    pub client_id: String,
    pub enforce_client_id: bool,
    pub auth_scheme: String,
    pub auth_algorithms: Vec<String>,
    pub verify_timeout: Duration,
    pub provider_http_timeout: Duration,

    pub tenant_customer_id: Uuid,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key → value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 8080,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV").as_deref());

        let cors_allowed_origins = split_list(&lookup("CORS_ALLOWED_ORIGINS").unwrap_or_default());

        let provider_url =
            lookup("OPENID_PROVIDER_URL").ok_or(ConfigError::Missing("OPENID_PROVIDER_URL"))?;
        Url::parse(&provider_url).map_err(|_| ConfigError::Invalid("OPENID_PROVIDER_URL"))?;

        let client_id = lookup("OAUTH_CLIENT_ID").ok_or(ConfigError::Missing("OAUTH_CLIENT_ID"))?;

        let enforce_client_id = match lookup("AUTH_ENFORCE_CLIENT_ID").as_deref() {
            None => false,
            Some(v) => parse_bool(v).ok_or(ConfigError::Invalid("AUTH_ENFORCE_CLIENT_ID"))?,
        };

        let auth_scheme = lookup("AUTH_SCHEME")
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| DEFAULT_AUTH_SCHEME.to_string());
        if auth_scheme.is_empty() || auth_scheme.contains(' ') {
            return Err(ConfigError::Invalid("AUTH_SCHEME"));
        }

        let auth_algorithms = match lookup("AUTH_ALGORITHMS") {
            Some(v) => split_list(&v),
            None => SUPPORTED_ALGORITHMS.iter().map(|s| s.to_string()).collect(),
        };
        if auth_algorithms.is_empty()
            || auth_algorithms
                .iter()
                .any(|alg| !SUPPORTED_ALGORITHMS.contains(&alg.as_str()))
        {
            return Err(ConfigError::Invalid("AUTH_ALGORITHMS"));
        }

        let verify_timeout = Duration::from_millis(parse_or(
            &lookup,
            "AUTH_VERIFY_TIMEOUT_MS",
            5000,
        )?);

        let provider_http_timeout = Duration::from_secs(parse_or(
            &lookup,
            "PROVIDER_HTTP_TIMEOUT_SECS",
            10,
        )?);

        let tenant_customer_id = lookup("TENANT_CUSTOMER_ID")
            .unwrap_or_else(|| DEFAULT_TENANT_CUSTOMER_ID.to_string());
        let tenant_customer_id = Uuid::parse_str(&tenant_customer_id)
            .map_err(|_| ConfigError::Invalid("TENANT_CUSTOMER_ID"))?;

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            provider_url,
            client_id,
            enforce_client_id,
            auth_scheme,
            auth_algorithms,
            verify_timeout,
            provider_http_timeout,
            tenant_customer_id,
        })
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Positive integer or the default when unset.
fn parse_or<F>(lookup: &F, key: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(v) => match v.trim().parse::<u64>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(ConfigError::Invalid(key)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("OPENID_PROVIDER_URL", "https://idp.example"),
        ("OAUTH_CLIENT_ID", "tracker-web"),
    ];

    fn with(extra: &[(&'static str, &'static str)]) -> Vec<(&'static str, &'static str)> {
        REQUIRED.iter().chain(extra.iter()).copied().collect()
    }

    #[test]
    fn defaults_apply() {
        let config = load(&REQUIRED).unwrap();

        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.auth_scheme, "Bearer");
        assert_eq!(config.auth_algorithms, vec!["RS256".to_string()]);
        assert!(!config.enforce_client_id);
        assert_eq!(config.verify_timeout, Duration::from_secs(5));
        assert_eq!(config.provider_http_timeout, Duration::from_secs(10));
        assert_eq!(
            config.tenant_customer_id.to_string(),
            DEFAULT_TENANT_CUSTOMER_ID
        );
        assert!(config.cors_allowed_origins.is_empty());
    }

    #[test]
    fn provider_url_and_client_id_are_required() {
        assert_eq!(
            load(&[("OAUTH_CLIENT_ID", "x")]).unwrap_err(),
            ConfigError::Missing("OPENID_PROVIDER_URL")
        );
        assert_eq!(
            load(&[("OPENID_PROVIDER_URL", "https://idp.example")]).unwrap_err(),
            ConfigError::Missing("OAUTH_CLIENT_ID")
        );
    }

    #[test]
    fn provider_url_must_be_a_url() {
        let err = load(&[
            ("OPENID_PROVIDER_URL", "not a url"),
            ("OAUTH_CLIENT_ID", "x"),
        ])
        .unwrap_err();
        assert_eq!(err, ConfigError::Invalid("OPENID_PROVIDER_URL"));
    }

    #[test]
    fn algorithms_outside_rs256_are_rejected() {
        let err = load(&with(&[("AUTH_ALGORITHMS", "RS256,HS256")])).unwrap_err();
        assert_eq!(err, ConfigError::Invalid("AUTH_ALGORITHMS"));

        let err = load(&with(&[("AUTH_ALGORITHMS", " , ")])).unwrap_err();
        assert_eq!(err, ConfigError::Invalid("AUTH_ALGORITHMS"));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = load(&with(&[
            ("PORT", "9090"),
            ("APP_ENV", "Production"),
            ("AUTH_ENFORCE_CLIENT_ID", "true"),
            ("AUTH_SCHEME", "Token"),
            ("AUTH_VERIFY_TIMEOUT_MS", "1500"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, https://b.example"),
        ]))
        .unwrap();

        assert_eq!(config.addr.port(), 9090);
        assert!(config.app_env.is_production());
        assert!(config.enforce_client_id);
        assert_eq!(config.auth_scheme, "Token");
        assert_eq!(config.verify_timeout, Duration::from_millis(1500));
        assert_eq!(
            config.cors_allowed_origins,
            vec![
                "https://a.example".to_string(),
                "https://b.example".to_string()
            ]
        );
    }

    #[test]
    fn bad_numbers_are_invalid() {
        assert_eq!(
            load(&with(&[("PORT", "http")])).unwrap_err(),
            ConfigError::Invalid("PORT")
        );
        assert_eq!(
            load(&with(&[("AUTH_VERIFY_TIMEOUT_MS", "0")])).unwrap_err(),
            ConfigError::Invalid("AUTH_VERIFY_TIMEOUT_MS")
        );
        assert_eq!(
            load(&with(&[("TENANT_CUSTOMER_ID", "acme")])).unwrap_err(),
            ConfigError::Invalid("TENANT_CUSTOMER_ID")
        );
        assert_eq!(
            load(&with(&[("AUTH_ENFORCE_CLIENT_ID", "maybe")])).unwrap_err(),
            ConfigError::Invalid("AUTH_ENFORCE_CLIENT_ID")
        );
    }
}
