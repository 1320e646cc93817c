use super::error::AuthError;
use super::models::Credential;
use super::repository::CredentialRepository;
use async_trait::async_trait;
use sled::Db;
use std::path::Path;

const CREDENTIALS_TREE: &str = "credentials";

#[derive(Clone)]
pub struct SledCredentialRepository {
    db: Db,
}

impl SledCredentialRepository {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, AuthError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    pub fn temporary() -> Result<Self, AuthError> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db })
    }

    fn credentials_tree(&self) -> Result<sled::Tree, AuthError> {
        Ok(self.db.open_tree(CREDENTIALS_TREE)?)
    }
}

#[async_trait]
impl CredentialRepository for SledCredentialRepository {
    async fn create(&self, credential: Credential) -> Result<Credential, AuthError> {
        let tree = self.credentials_tree()?;
        let value = serde_json::to_vec(&credential)?;

        // Insert only if absent, so two concurrent registrations cannot both win
        let swapped = tree.compare_and_swap(
            credential.subject.as_bytes(),
            None as Option<&[u8]>,
            Some(value),
        )?;
        if swapped.is_err() {
            return Err(AuthError::SubjectAlreadyExists);
        }

        tree.flush_async().await?;
        Ok(credential)
    }

    async fn find_by_subject(&self, subject: &str) -> Result<Option<Credential>, AuthError> {
        let tree = self.credentials_tree()?;

        match tree.get(subject.as_bytes())? {
            Some(value) => Ok(Some(serde_json::from_slice(&value)?)),
            None => Ok(None),
        }
    }

    async fn subject_exists(&self, subject: &str) -> Result<bool, AuthError> {
        let tree = self.credentials_tree()?;
        Ok(tree.contains_key(subject.as_bytes())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_find() {
        let temp_dir = tempfile::tempdir().unwrap();
        let repo = SledCredentialRepository::new(temp_dir.path().join("credentials.sled")).unwrap();

        repo.create(Credential::new("alice".to_string(), "$argon2id$stub".to_string()))
            .await
            .unwrap();

        let found = repo.find_by_subject("alice").await.unwrap().unwrap();
        assert_eq!(found.subject, "alice");
        assert_eq!(found.password_hash, "$argon2id$stub");
        assert!(repo.subject_exists("alice").await.unwrap());
        assert!(repo.find_by_subject("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_subject_rejected() {
        let repo = SledCredentialRepository::temporary().unwrap();

        repo.create(Credential::new("alice".to_string(), "h1".to_string()))
            .await
            .unwrap();
        let second = repo
            .create(Credential::new("alice".to_string(), "h2".to_string()))
            .await;

        assert!(matches!(second, Err(AuthError::SubjectAlreadyExists)));
        let found = repo.find_by_subject("alice").await.unwrap().unwrap();
        assert_eq!(found.password_hash, "h1");
    }
}
