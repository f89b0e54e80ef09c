//! Environment-driven process settings.
//!
//! All variables are read through [`mockable::Env`] so parsing is testable
//! with `MockEnv`. Required values fail fast with a typed [`SettingsError`].

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use mockable::Env;
use url::Url;

use crate::outbound::identity::DEFAULT_IDENTITY_VERIFIER_URL;
use crate::outbound::persistence::PoolConfig;

const PORT_ENV: &str = "PORT";
const BIND_HOST_ENV: &str = "BIND_HOST";
const DATABASE_URL_ENV: &str = "DATABASE_URL";
const DATABASE_URL_FALLBACK_ENV: &str = "URI";
const POOL_MAX_SIZE_ENV: &str = "DB_POOL_MAX_SIZE";
const STRIPE_SECRET_KEY_ENV: &str = "STRIPE_SECRET_KEY";
const STRIPE_API_BASE_ENV: &str = "STRIPE_API_BASE";
const CLIENT_URL_ENV: &str = "CLIENT_URL";
const IDENTITY_CREDENTIALS_FILE_ENV: &str = "IDENTITY_CREDENTIALS_FILE";
const IDENTITY_VERIFIER_URL_ENV: &str = "IDENTITY_VERIFIER_URL";
const HTTP_CLIENT_TIMEOUT_ENV: &str = "HTTP_CLIENT_TIMEOUT_SECS";

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_BIND_HOST: &str = "0.0.0.0";
const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com";
const DEFAULT_IDENTITY_CREDENTIALS_FILE: &str = "./service-account.json";
const DEFAULT_HTTP_CLIENT_TIMEOUT_SECS: u64 = 10;

/// Errors raised while reading settings.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SettingsError {
    /// A required environment variable is missing or blank.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Validated process settings.
#[derive(Clone)]
pub struct Settings {
    pub bind_host: String,
    pub port: u16,
    pub database_url: String,
    pub pool_max_size: u32,
    pub stripe_secret_key: String,
    pub stripe_api_base: Url,
    /// Front-end origin used to build checkout redirect URLs.
    pub client_url: Url,
    pub identity_credentials_file: PathBuf,
    pub identity_verifier_url: Url,
    /// Timeout applied to outbound provider calls.
    pub http_client_timeout: Duration,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("bind_host", &self.bind_host)
            .field("port", &self.port)
            .field("database_url", &"<redacted>")
            .field("pool_max_size", &self.pool_max_size)
            .field("stripe_secret_key", &"<redacted>")
            .field("stripe_api_base", &self.stripe_api_base.as_str())
            .field("client_url", &self.client_url.as_str())
            .field("identity_credentials_file", &self.identity_credentials_file)
            .field("identity_verifier_url", &self.identity_verifier_url.as_str())
            .field("http_client_timeout", &self.http_client_timeout)
            .finish()
    }
}

impl Settings {
    /// Read settings from `env`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mockable::MockEnv;
    /// use scholarlink::settings::Settings;
    ///
    /// let mut env = MockEnv::new();
    /// env.expect_string().returning(|name| match name {
    ///     "DATABASE_URL" => Some("postgres://localhost/scholarlink".to_owned()),
    ///     "STRIPE_SECRET_KEY" => Some("sk_test_123".to_owned()),
    ///     "CLIENT_URL" => Some("https://app.example.com".to_owned()),
    ///     _ => None,
    /// });
    ///
    /// let settings = Settings::from_env(&env).expect("valid settings");
    /// assert_eq!(settings.port, 5000);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when a required variable is missing or a
    /// value fails to parse.
    pub fn from_env<E: Env>(env: &E) -> Result<Self, SettingsError> {
        let database_url = non_blank(env, DATABASE_URL_ENV)
            .or_else(|| non_blank(env, DATABASE_URL_FALLBACK_ENV))
            .ok_or(SettingsError::MissingEnv {
                name: DATABASE_URL_ENV,
            })?;
        Ok(Self {
            bind_host: non_blank(env, BIND_HOST_ENV)
                .unwrap_or_else(|| DEFAULT_BIND_HOST.to_owned()),
            port: parse_or(env, PORT_ENV, DEFAULT_PORT, "a TCP port number")?,
            database_url,
            pool_max_size: positive_pool_size(env)?,
            stripe_secret_key: required(env, STRIPE_SECRET_KEY_ENV)?,
            stripe_api_base: url_or(env, STRIPE_API_BASE_ENV, DEFAULT_STRIPE_API_BASE)?,
            client_url: absolute_url(CLIENT_URL_ENV, &required(env, CLIENT_URL_ENV)?)?,
            identity_credentials_file: non_blank(env, IDENTITY_CREDENTIALS_FILE_ENV)
                .map_or_else(|| PathBuf::from(DEFAULT_IDENTITY_CREDENTIALS_FILE), PathBuf::from),
            identity_verifier_url: url_or(
                env,
                IDENTITY_VERIFIER_URL_ENV,
                DEFAULT_IDENTITY_VERIFIER_URL,
            )?,
            http_client_timeout: Duration::from_secs(parse_or(
                env,
                HTTP_CLIENT_TIMEOUT_ENV,
                DEFAULT_HTTP_CLIENT_TIMEOUT_SECS,
                "a whole number of seconds",
            )?),
        })
    }

    /// Pool configuration derived from the database settings.
    #[must_use]
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::new(self.database_url.clone()).with_max_size(self.pool_max_size)
    }
}

fn non_blank<E: Env>(env: &E, name: &str) -> Option<String> {
    env.string(name)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn required<E: Env>(env: &E, name: &'static str) -> Result<String, SettingsError> {
    non_blank(env, name).ok_or(SettingsError::MissingEnv { name })
}

fn parse_or<E, T>(
    env: &E,
    name: &'static str,
    default: T,
    expected: &'static str,
) -> Result<T, SettingsError>
where
    E: Env,
    T: std::str::FromStr,
{
    match non_blank(env, name) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| SettingsError::InvalidEnv {
            name,
            value,
            expected,
        }),
    }
}

fn positive_pool_size<E: Env>(env: &E) -> Result<u32, SettingsError> {
    let expected = "a positive integer";
    let size = parse_or(
        env,
        POOL_MAX_SIZE_ENV,
        PoolConfig::DEFAULT_MAX_SIZE,
        expected,
    )?;
    if size == 0 {
        return Err(SettingsError::InvalidEnv {
            name: POOL_MAX_SIZE_ENV,
            value: size.to_string(),
            expected,
        });
    }
    Ok(size)
}

fn absolute_url(env_name: &'static str, value: &str) -> Result<Url, SettingsError> {
    Url::parse(value)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .ok_or_else(|| SettingsError::InvalidEnv {
            name: env_name,
            value: value.to_owned(),
            expected: "an absolute http(s) URL",
        })
}

fn url_or<E: Env>(env: &E, name: &'static str, default: &str) -> Result<Url, SettingsError> {
    let value = non_blank(env, name).unwrap_or_else(|| default.to_owned());
    absolute_url(name, &value)
}
