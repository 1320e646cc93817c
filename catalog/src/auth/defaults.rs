use super::error::AuthError;
use super::models::Credential;
use super::password::hash_credential;
use super::repository::CredentialRepository;
use tracing::info;

/// Register `subject` with `password` unless the subject already exists.
///
/// Returns `true` when a credential was created.
pub async fn seed_credential(
    repo: &dyn CredentialRepository,
    subject: &str,
    password: &str,
) -> Result<bool, AuthError> {
    if repo.subject_exists(subject).await? {
        info!(subject, "credential already present, not seeding");
        return Ok(false);
    }

    let hash = hash_credential(password)?;
    match repo.create(Credential::new(subject.to_string(), hash)).await {
        Ok(_) => {
            info!(subject, "seeded credential");
            Ok(true)
        }
        // Lost a race with another seeder
        Err(AuthError::SubjectAlreadyExists) => Ok(false),
        Err(e) => Err(e),
    }
}
