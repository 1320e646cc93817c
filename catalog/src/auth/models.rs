use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A stored login credential. Only the Argon2 hash is kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub subject: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Credential {
    pub fn new(subject: String, password_hash: String) -> Self {
        Self {
            subject,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

/// Claims carried inside every signed token. Times are Unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

impl IdentityClaims {
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// Verified caller identity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subject(String);

impl Subject {
    pub fn new(subject: impl Into<String>) -> Self {
        Self(subject.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An encoded token handed back to a client
#[derive(Debug, Clone)]
pub struct SignedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub expires_in_secs: u64,
}
