use super::error::AuthError;
use super::models::Credential;
use async_trait::async_trait;

#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Store a new credential; fails if the subject is taken
    async fn create(&self, credential: Credential) -> Result<Credential, AuthError>;

    /// Find the credential for a subject
    async fn find_by_subject(&self, subject: &str) -> Result<Option<Credential>, AuthError>;

    /// Check if a subject exists
    async fn subject_exists(&self, subject: &str) -> Result<bool, AuthError>;
}
