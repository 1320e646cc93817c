use catalog::auth::defaults::seed_credential;
use catalog::auth::{AuthError, SledCredentialRepository, StaticSecret, TokenKeys, TokenService};
use shared::config::Config;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

/// Server state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub token_service: Arc<TokenService>,
}

impl AppState {
    pub fn new(token_service: Arc<TokenService>) -> Self {
        Self { token_service }
    }

    /// Open the credential store, seed the configured credential and build
    /// the token service
    pub async fn from_config(config: &Config) -> Result<Self, AuthError> {
        let data_dir = Path::new(&config.data_dir);

        // Create the data directory if it doesn't exist
        if let Err(e) = std::fs::create_dir_all(data_dir) {
            warn!("Failed to create data directory: {}", e);
        }

        let credentials = Arc::new(SledCredentialRepository::new(
            data_dir.join("credentials.sled"),
        )?);
        seed_credential(
            credentials.as_ref(),
            &config.seed_username,
            &config.seed_password,
        )
        .await?;

        let keys = TokenKeys::from_provider(&StaticSecret::new(config.jwt_secret.clone()));

        Ok(Self::new(Arc::new(TokenService::new(
            credentials,
            keys,
            config.token_ttl,
        ))))
    }
}
