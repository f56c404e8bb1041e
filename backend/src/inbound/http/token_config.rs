//! Startup configuration for token signing and the HTTP listener.
//!
//! Settings come from the environment through [`mockable::Env`] so they can
//! be validated in isolation. Release builds refuse secrets shorter than
//! [`SECRET_MIN_LEN`]; debug builds accept them with a warning.

use std::net::SocketAddr;
use std::path::PathBuf;

use mockable::Env;
use tracing::warn;
use zeroize::Zeroizing;

use crate::domain::{SigningSecret, SigningSecretError};

pub mod fingerprint;

pub(crate) const SECRET_ENV: &str = "JWT_SECRET";
pub(crate) const SECRET_FILE_ENV: &str = "JWT_SECRET_FILE";
pub(crate) const DATABASE_URL_ENV: &str = "DATABASE_URL";
pub(crate) const BIND_ADDR_ENV: &str = "BIND_ADDR";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const BIND_ADDR_EXPECTED: &str = "host:port socket address";

/// Minimum secret length accepted by release builds.
pub const SECRET_MIN_LEN: usize = 32;

/// Build mode for configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate short secrets and log a warning.
    Debug,
    /// Release builds enforce [`SECRET_MIN_LEN`].
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use focus_backend::inbound::http::token_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Validated process settings.
#[derive(Debug)]
pub struct AppSettings {
    /// Key used to sign and verify bearer tokens.
    pub secret: SigningSecret,
    /// PostgreSQL URL; `None` selects the in-memory adapters.
    pub database_url: Option<String>,
    /// Listener address.
    pub bind_addr: SocketAddr,
}

/// Errors raised while validating startup configuration.
#[derive(thiserror::Error, Debug)]
pub enum TokenConfigError {
    /// Neither `JWT_SECRET` nor `JWT_SECRET_FILE` is set.
    #[error("missing required environment variable: JWT_SECRET or JWT_SECRET_FILE")]
    MissingSecret,
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Reading the secret file failed.
    #[error("failed to read signing secret at {path}: {source}")]
    SecretRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The secret is too short for release builds.
    #[error("signing secret too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort { length: usize, min_len: usize },
    /// The secret is empty.
    #[error(transparent)]
    Secret(#[from] SigningSecretError),
}

/// Load all startup settings.
///
/// # Examples
///
/// ```rust
/// use focus_backend::inbound::http::token_config::{BuildMode, settings_from_env};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "JWT_SECRET" => Some("0123456789abcdef0123456789abcdef".to_owned()),
///     _ => None,
/// });
///
/// let settings = settings_from_env(&env, BuildMode::Release).expect("valid settings");
/// assert_eq!(settings.bind_addr.port(), 8080);
/// assert!(settings.database_url.is_none());
/// ```
pub fn settings_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<AppSettings, TokenConfigError> {
    Ok(AppSettings {
        secret: signing_secret_from_env(env, mode)?,
        database_url: database_url_from_env(env),
        bind_addr: bind_addr_from_env(env)?,
    })
}

/// Load the token signing secret.
///
/// `JWT_SECRET_FILE` wins over `JWT_SECRET`; trailing whitespace in the
/// file is ignored.
pub fn signing_secret_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SigningSecret, TokenConfigError> {
    let bytes = match env.string(SECRET_FILE_ENV) {
        Some(path) => read_secret_file(PathBuf::from(path))?,
        None => env
            .string(SECRET_ENV)
            .map(|value| Zeroizing::new(value.into_bytes()))
            .ok_or(TokenConfigError::MissingSecret)?,
    };

    let length = bytes.len();
    if length < SECRET_MIN_LEN {
        if !mode.is_debug() {
            return Err(TokenConfigError::SecretTooShort {
                length,
                min_len: SECRET_MIN_LEN,
            });
        }
        warn!(
            length,
            min_len = SECRET_MIN_LEN,
            "signing secret shorter than the release minimum (dev only)"
        );
    }

    Ok(SigningSecret::new(bytes.to_vec())?)
}

fn read_secret_file(path: PathBuf) -> Result<Zeroizing<Vec<u8>>, TokenConfigError> {
    let mut bytes = match std::fs::read(&path) {
        Ok(bytes) => Zeroizing::new(bytes),
        Err(source) => return Err(TokenConfigError::SecretRead { path, source }),
    };
    let trimmed = bytes
        .iter()
        .rposition(|byte| !byte.is_ascii_whitespace())
        .map_or(0, |last| last + 1);
    bytes.truncate(trimmed);
    Ok(bytes)
}

fn database_url_from_env<E: Env>(env: &E) -> Option<String> {
    env.string(DATABASE_URL_ENV)
        .filter(|url| !url.trim().is_empty())
}

fn bind_addr_from_env<E: Env>(env: &E) -> Result<SocketAddr, TokenConfigError> {
    let value = env
        .string(BIND_ADDR_ENV)
        .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
    value
        .parse()
        .map_err(|_| TokenConfigError::InvalidEnv {
            name: BIND_ADDR_ENV,
            value,
            expected: BIND_ADDR_EXPECTED,
        })
}
