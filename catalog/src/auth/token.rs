//! Issuing and verifying signed identity tokens.
//!
//! Tokens are HS256 JWTs carrying `{sub, iat, exp}`. The issuer and every
//! verifier derive their keys from the same [`SecretProvider`], which is the
//! only thing the services have in common.

use super::error::AuthError;
use super::models::{IdentityClaims, SignedToken, Subject};
use super::password::{burn_verification, verify_credential};
use super::repository::CredentialRepository;
use super::secret::SecretProvider;
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Default validity window of an issued token
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(3600);

/// Signing and verification keys derived from the shared secret
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    pub fn from_provider(provider: &dyn SecretProvider) -> Self {
        let secret = provider.shared_secret();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    pub(crate) fn sign(&self, claims: &IdentityClaims) -> Result<String, AuthError> {
        jsonwebtoken::encode(&Header::new(ALGORITHM), claims, &self.encoding)
            .map_err(AuthError::TokenEncodingError)
    }
}

/// Checks credentials and issues tokens. Keeps no per-token state.
pub struct TokenService {
    credentials: Arc<dyn CredentialRepository>,
    keys: TokenKeys,
    ttl: Duration,
}

impl TokenService {
    pub fn new(credentials: Arc<dyn CredentialRepository>, keys: TokenKeys, ttl: Duration) -> Self {
        Self {
            credentials,
            keys,
            ttl,
        }
    }

    /// Verify `credential` for `subject` and issue a token valid for the
    /// configured window.
    ///
    /// Unknown subjects and wrong credentials both yield
    /// [`AuthError::InvalidCredentials`].
    pub async fn issue(&self, subject: &str, credential: &str) -> Result<SignedToken, AuthError> {
        let stored = match self.credentials.find_by_subject(subject).await? {
            Some(stored) => stored,
            None => {
                burn_verification(credential);
                warn!(subject, "token request rejected");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !verify_credential(credential, &stored.password_hash)? {
            warn!(subject, "token request rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let now = Utc::now();
        let ttl_secs = self.ttl.as_secs();
        let claims = IdentityClaims {
            sub: stored.subject,
            iat: now.timestamp(),
            exp: now.timestamp() + ttl_secs as i64,
        };

        let token = self.keys.sign(&claims)?;
        info!(subject, "token issued");

        Ok(SignedToken {
            token,
            expires_at: claims.expires_at().unwrap_or(now),
            expires_in_secs: ttl_secs,
        })
    }
}

/// Validates presented tokens. Every resource-serving service uses this type.
#[derive(Clone)]
pub struct TokenVerifier {
    keys: TokenKeys,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(keys: TokenKeys) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        Self { keys, validation }
    }

    /// Verify a presented token and return the subject it was issued to
    pub fn verify(&self, token: Option<&str>) -> Result<Subject, AuthError> {
        let token = match token.map(str::trim) {
            Some(token) if !token.is_empty() => token,
            _ => return Err(AuthError::MissingToken),
        };

        let data = jsonwebtoken::decode::<IdentityClaims>(token, &self.keys.decoding, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidToken
                | ErrorKind::Base64(_)
                | ErrorKind::Json(_)
                | ErrorKind::Utf8(_)
                | ErrorKind::MissingRequiredClaim(_) => AuthError::MalformedToken,
                _ => AuthError::InvalidOrExpiredToken,
            })?;

        if data.claims.sub.is_empty() {
            return Err(AuthError::MalformedToken);
        }

        Ok(Subject::new(data.claims.sub))
    }
}
