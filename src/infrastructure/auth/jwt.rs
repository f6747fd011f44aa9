//! JWT token issuance and verification

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tracing::debug;

use super::error::TokenError;
use crate::domain::user::User;

/// Lifetime of every issued token. Not configurable.
pub const TOKEN_TTL_SECONDS: i64 = 60;

/// Secret used when none is configured
pub const DEFAULT_JWT_SECRET: &str = "tu_secreta_clave";

/// Identity carried inside a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityClaim {
    pub user_id: String,
    pub username: String,
}

impl IdentityClaim {
    pub fn new(user_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
        }
    }

    /// Claim for a user already confirmed against the store
    pub fn from_user(user: &User) -> Self {
        Self::new(user.id().as_str(), user.username())
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    #[serde(flatten)]
    pub identity: IdentityClaim,
    /// Issued at timestamp (Unix epoch)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
}

impl JwtClaims {
    /// Create claims for an identity issued at `now`
    pub fn new(identity: IdentityClaim, now: DateTime<Utc>) -> Self {
        let exp = now + Duration::seconds(TOKEN_TTL_SECONDS);

        Self {
            identity,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }

    /// A token is expired from its `exp` second onwards
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

/// Configuration for JWT service
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self::new(DEFAULT_JWT_SECRET)
    }
}

/// Issues and verifies session tokens
pub trait TokenAuthority: Send + Sync + Debug {
    /// Sign a token for an identity that has already been authenticated
    fn issue(&self, identity: &IdentityClaim) -> Result<String, TokenError>;

    /// Verify a presented token and return the identity it carries
    fn verify(&self, token: &str) -> Result<IdentityClaim, TokenError>;
}

/// HS256 token authority keyed by a shared secret
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("algorithm", &Algorithm::HS256)
            .field("ttl_seconds", &TOKEN_TTL_SECONDS)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Create a new JWT service, rejecting an unusable secret
    pub fn new(config: &JwtConfig) -> Result<Self, TokenError> {
        if config.secret.is_empty() {
            return Err(TokenError::Signing("signing secret is empty".to_string()));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
        })
    }

    /// Sign a token as if issued at `now`
    pub fn issue_at(
        &self,
        identity: &IdentityClaim,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = JwtClaims::new(identity.clone(), now);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify a token against the clock reading `now`
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenError> {
        // Expiry is checked below against `now`, without leeway.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let token_data = decode::<JwtClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                debug!(error = %e, "Token rejected");
                TokenError::InvalidToken
            })?;

        if token_data.claims.is_expired_at(now) {
            debug!(exp = token_data.claims.exp, "Token expired");
            return Err(TokenError::InvalidToken);
        }

        Ok(token_data.claims)
    }
}

impl TokenAuthority for JwtService {
    fn issue(&self, identity: &IdentityClaim) -> Result<String, TokenError> {
        self.issue_at(identity, Utc::now())
    }

    fn verify(&self, token: &str) -> Result<IdentityClaim, TokenError> {
        self.verify_at(token, Utc::now()).map(|claims| claims.identity)
    }
}
