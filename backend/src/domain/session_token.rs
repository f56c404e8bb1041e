//! Signed, time-limited session tokens.
//!
//! [`SessionTokenIssuer`] turns a [`User`] and its roles into an HS256 JWT
//! carrying the subject, a random nonce, and one entry per role. Tokens are
//! stateless; nothing is persisted on issue or verify.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use uuid::Uuid;
use zeroize::Zeroizing;

use super::{Error, RoleName, User, UserId};

/// Lifetime of an issued session token.
pub const SESSION_TOKEN_LIFETIME_DAYS: i64 = 15;

const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Errors raised when building a [`SigningSecret`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SigningSecretError {
    /// The secret carried no bytes.
    #[error("signing secret must not be empty")]
    Empty,
}

/// Symmetric HMAC secret, zeroised on drop.
///
/// # Examples
/// ```
/// use focus_backend::domain::SigningSecret;
///
/// assert!(SigningSecret::new(b"".to_vec()).is_err());
/// assert!(SigningSecret::new(b"a-long-enough-secret".to_vec()).is_ok());
/// ```
#[derive(Clone)]
pub struct SigningSecret(Zeroizing<Vec<u8>>);

impl SigningSecret {
    /// Wrap raw secret bytes, rejecting empty input.
    pub fn new(bytes: Vec<u8>) -> Result<Self, SigningSecretError> {
        let bytes = Zeroizing::new(bytes);
        if bytes.is_empty() {
            return Err(SigningSecretError::Empty);
        }
        Ok(Self(bytes))
    }

    /// Secret length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; emptiness is rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn expose(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SigningSecret").field(&"<redacted>").finish()
    }
}

/// Claims embedded in every session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the user identifier.
    pub sub: String,
    /// Random per-token nonce (UUID v4).
    pub jti: String,
    /// Role names held by the subject at issue time.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Issued-at, Unix seconds.
    pub iat: i64,
    /// Expiry, Unix seconds.
    pub exp: i64,
}

/// Encoded session token plus the metadata returned to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    token: String,
    expiration: DateTime<Utc>,
    roles: BTreeSet<RoleName>,
    subject: UserId,
}

impl SessionToken {
    /// Encoded JWT.
    pub fn token(&self) -> &str {
        self.token.as_str()
    }

    /// Instant after which the token is rejected.
    pub fn expiration(&self) -> DateTime<Utc> {
        self.expiration
    }

    /// Roles embedded in the token.
    pub fn roles(&self) -> &BTreeSet<RoleName> {
        &self.roles
    }

    /// Subject identifier.
    pub fn subject(&self) -> &UserId {
        &self.subject
    }
}

/// Caller identity recovered from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    id: UserId,
    roles: BTreeSet<RoleName>,
}

impl AuthenticatedUser {
    /// Build an identity from verified parts.
    pub fn new(id: UserId, roles: BTreeSet<RoleName>) -> Self {
        Self { id, roles }
    }

    /// Caller's user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Roles asserted by the token.
    pub fn roles(&self) -> &BTreeSet<RoleName> {
        &self.roles
    }
}

/// Issues and verifies HS256 session tokens.
///
/// The secret is fixed at construction; issuing is pure apart from the
/// clock and the nonce source.
#[derive(Clone)]
pub struct SessionTokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    clock: Arc<dyn Clock>,
}

impl SessionTokenIssuer {
    /// Build an issuer from a validated secret.
    pub fn new(secret: &SigningSecret, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.expose()),
            decoding_key: DecodingKey::from_secret(secret.expose()),
            clock,
        }
    }

    /// Mint a token for `user`.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use focus_backend::domain::{SessionTokenIssuer, SigningSecret, User};
    /// use mockable::DefaultClock;
    ///
    /// let secret = SigningSecret::new(b"0123456789abcdef0123456789abcdef".to_vec()).unwrap();
    /// let issuer = SessionTokenIssuer::new(&secret, Arc::new(DefaultClock));
    /// let user = User::try_from_strings("u-1", "ada", None).unwrap();
    /// let token = issuer.issue(&user).unwrap();
    /// assert_eq!(token.subject().as_ref(), "u-1");
    /// ```
    pub fn issue(&self, user: &User) -> Result<SessionToken, Error> {
        let issued_at = self.clock.utc();
        let expiration = issued_at + Duration::days(SESSION_TOKEN_LIFETIME_DAYS);
        let claims = TokenClaims {
            sub: user.id().to_string(),
            jti: Uuid::new_v4().to_string(),
            roles: user.roles().iter().map(ToString::to_string).collect(),
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
        };

        let token = jsonwebtoken::encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|err| {
                error!(error = %err, "session token encoding failed");
                Error::internal("failed to issue session token")
            })?;

        Ok(SessionToken {
            token,
            expiration: truncate_to_seconds(expiration),
            roles: user.roles().clone(),
            subject: user.id().clone(),
        })
    }

    /// Check a bearer token's signature and expiry.
    ///
    /// Every failure maps to [`ErrorCode::Unauthorized`](super::ErrorCode).
    pub fn verify(&self, token: &str) -> Result<TokenClaims, Error> {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        // Expiry is checked against the injected clock below.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["sub", "exp"]);

        let claims = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|err| {
                debug!(error = %err, "session token rejected");
                match err.kind() {
                    ErrorKind::InvalidSignature => Error::unauthorized("invalid token signature"),
                    _ => Error::unauthorized("malformed session token"),
                }
            })?;

        if claims.exp <= self.clock.utc().timestamp() {
            return Err(Error::unauthorized("session token expired"));
        }
        Ok(claims)
    }

    /// Verify a token and convert its claims into a caller identity.
    pub fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, Error> {
        let claims = self.verify(token)?;
        let id = UserId::new(claims.sub)
            .map_err(|_| Error::unauthorized("session token subject is invalid"))?;
        let roles = claims
            .roles
            .iter()
            .map(RoleName::new)
            .collect::<Result<BTreeSet<_>, _>>()
            .map_err(|_| Error::unauthorized("session token roles are invalid"))?;
        Ok(AuthenticatedUser::new(id, roles))
    }
}

fn truncate_to_seconds(instant: DateTime<Utc>) -> DateTime<Utc> {
    Utc.timestamp_opt(instant.timestamp(), 0)
        .single()
        .unwrap_or(instant)
}
