/// Source of the symmetric secret shared by the token issuer and every verifier.
///
/// Services never share process state, only this secret, so every service
/// must be configured with a provider that yields the same bytes.
pub trait SecretProvider: Send + Sync {
    fn shared_secret(&self) -> &[u8];
}

/// Secret supplied once at startup, typically from configuration
#[derive(Clone)]
pub struct StaticSecret(Vec<u8>);

impl StaticSecret {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self(secret.into())
    }
}

impl SecretProvider for StaticSecret {
    fn shared_secret(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for StaticSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("StaticSecret").field(&"<redacted>").finish()
    }
}
