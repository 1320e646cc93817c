// Public API
pub mod defaults;
pub mod error;
pub mod models;
pub mod password;
pub mod repository;
pub mod secret;
pub mod sled_repository;
pub mod token;

// Re-export commonly used types
pub use error::AuthError;
pub use models::{Credential, IdentityClaims, SignedToken, Subject};
pub use repository::CredentialRepository;
pub use secret::{SecretProvider, StaticSecret};
pub use sled_repository::SledCredentialRepository;
pub use token::{DEFAULT_TOKEN_TTL, TokenKeys, TokenService, TokenVerifier};
