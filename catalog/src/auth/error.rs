use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing token")]
    MissingToken,

    #[error("Malformed token")]
    MalformedToken,

    #[error("Invalid or expired token")]
    InvalidOrExpiredToken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Subject already exists")]
    SubjectAlreadyExists,

    #[error("Password does not meet strength requirements")]
    WeakPassword,

    #[error("Storage error")]
    StorageError(#[from] sled::Error),

    #[error("Serialization error")]
    SerializationError(#[from] serde_json::Error),

    #[error("Password hashing error: {0}")]
    PasswordHashError(String),

    #[error("Token encoding error")]
    TokenEncodingError(#[source] jsonwebtoken::errors::Error),
}

impl AuthError {
    /// True for failures caused by what the caller presented, as opposed to
    /// failures inside the identity backend
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            AuthError::MissingToken
                | AuthError::MalformedToken
                | AuthError::InvalidOrExpiredToken
                | AuthError::InvalidCredentials
        )
    }
}
