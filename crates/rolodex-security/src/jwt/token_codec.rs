//! Signing and verification of bearer tokens.

use super::Claims;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rolodex_config::SecurityConfig;
use rolodex_core::{RolodexError, RolodexResult};
use std::str::FromStr;
use tracing::{debug, warn};

/// Lifetime of email confirmation tokens: seven days.
pub const CONFIRMATION_TOKEN_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Issues and verifies signed, expiring tokens carrying a subject claim.
///
/// Keys and algorithm are fixed at construction.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    access_ttl_secs: u64,
    validation: Validation,
}

impl TokenCodec {
    /// Creates a codec from the security configuration.
    ///
    /// Fails on an empty secret or a non-HMAC algorithm.
    pub fn new(config: &SecurityConfig) -> RolodexResult<Self> {
        if config.jwt_secret.is_empty() {
            return Err(RolodexError::Configuration("JWT secret is not set".to_string()));
        }

        let algorithm = Algorithm::from_str(&config.jwt_algorithm).map_err(|_| {
            RolodexError::Configuration(format!("Unknown JWT algorithm: {}", config.jwt_algorithm))
        })?;
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(RolodexError::Configuration(format!(
                "JWT algorithm {} needs a key pair; only HS256, HS384 and HS512 are supported",
                config.jwt_algorithm
            )));
        }

        let mut validation = Validation::new(algorithm);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            algorithm,
            access_ttl_secs: config.access_token_expiration_secs,
            validation,
        })
    }

    /// Issues a token for `subject` expiring `ttl_secs` from now.
    pub fn issue(&self, subject: &str, ttl_secs: u64) -> RolodexResult<String> {
        self.sign(subject, ttl_secs, Utc::now(), false)
    }

    /// Issues an access token with the configured lifetime.
    pub fn issue_access(&self, subject: &str) -> RolodexResult<String> {
        self.issue(subject, self.access_ttl_secs)
    }

    /// Issues a seven-day email confirmation token with an issued-at claim.
    pub fn issue_confirmation(&self, subject: &str) -> RolodexResult<String> {
        self.sign(subject, CONFIRMATION_TOKEN_TTL_SECS, Utc::now(), true)
    }

    /// Verifies signature and expiry and returns the subject.
    ///
    /// Every signature, format or expiry failure is
    /// [`RolodexError::InvalidToken`]; a token without a subject is
    /// [`RolodexError::MissingSubject`].
    pub fn decode(&self, token: &str) -> RolodexResult<String> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            debug!("Token rejected: {:?}", e.kind());
            RolodexError::InvalidToken
        })?;

        match data.claims.subject() {
            Some(subject) => Ok(subject.to_string()),
            None => {
                warn!("Token verified but carries no subject");
                Err(RolodexError::MissingSubject)
            }
        }
    }

    /// Returns the access token lifetime in seconds.
    #[must_use]
    pub const fn access_ttl_secs(&self) -> u64 {
        self.access_ttl_secs
    }

    fn sign(
        &self,
        subject: &str,
        ttl_secs: u64,
        issued_at: DateTime<Utc>,
        with_iat: bool,
    ) -> RolodexResult<String> {
        let ttl = i64::try_from(ttl_secs)
            .map_err(|_| RolodexError::Internal(format!("Token lifetime too large: {ttl_secs}")))?;
        let claims = Claims {
            sub: Some(subject.to_string()),
            exp: (issued_at + Duration::seconds(ttl)).timestamp(),
            iat: with_iat.then(|| issued_at.timestamp()),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| RolodexError::Internal(format!("Failed to sign token: {}", e)))
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &self.algorithm)
            .field("access_ttl_secs", &self.access_ttl_secs)
            .finish_non_exhaustive()
    }
}
