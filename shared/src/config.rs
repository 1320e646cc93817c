use std::time::Duration;
use tracing::warn;

pub struct Config {
    pub host: String,
    pub user_service_port: u16,
    pub product_service_port: u16,
    pub data_dir: String,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub seed_username: String,
    pub seed_password: String,
    pub cache_key: String,
    pub cache_ttl: Option<Duration>,
    pub store_timeout: Option<Duration>,
    pub allowed_origins: Vec<String>,
}

impl Config {
    const DEFAULT_HOST: &str = "0.0.0.0";
    const DEFAULT_USER_SERVICE_PORT: u16 = 5001;
    const DEFAULT_PRODUCT_SERVICE_PORT: u16 = 5002;
    const DEFAULT_DATA_DIR: &str = "./data";
    const DEFAULT_JWT_SECRET: &str = "dev-only-shared-secret";
    const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;
    const DEFAULT_SEED_USERNAME: &str = "testuser";
    const DEFAULT_SEED_PASSWORD: &str = "password123";
    const DEFAULT_CACHE_KEY: &str = "products";

    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = |name: &str, default: u16| {
            lookup(name)
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(default)
        };
        let secs = |name: &str| {
            lookup(name)
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|v| *v > 0)
        };

        Self {
            host: lookup("CATALOG_HOST").unwrap_or_else(|| Self::DEFAULT_HOST.to_string()),
            user_service_port: port("CATALOG_USER_SERVICE_PORT", Self::DEFAULT_USER_SERVICE_PORT),
            product_service_port: port(
                "CATALOG_PRODUCT_SERVICE_PORT",
                Self::DEFAULT_PRODUCT_SERVICE_PORT,
            ),
            data_dir: lookup("CATALOG_DATA_DIR")
                .unwrap_or_else(|| Self::DEFAULT_DATA_DIR.to_string()),
            jwt_secret: lookup("CATALOG_JWT_SECRET")
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| {
                    warn!("CATALOG_JWT_SECRET not set, using the development secret");
                    warn!("Tokens signed with it are forgeable; set a real secret outside development");
                    Self::DEFAULT_JWT_SECRET.to_string()
                }),
            token_ttl: Duration::from_secs(
                secs("CATALOG_TOKEN_TTL_SECS").unwrap_or(Self::DEFAULT_TOKEN_TTL_SECS),
            ),
            seed_username: lookup("CATALOG_SEED_USERNAME")
                .unwrap_or_else(|| Self::DEFAULT_SEED_USERNAME.to_string()),
            seed_password: lookup("CATALOG_SEED_PASSWORD").unwrap_or_else(|| {
                warn!("CATALOG_SEED_PASSWORD not set, seeding the default password");
                Self::DEFAULT_SEED_PASSWORD.to_string()
            }),
            cache_key: lookup("CATALOG_CACHE_KEY")
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| Self::DEFAULT_CACHE_KEY.to_string()),
            cache_ttl: secs("CATALOG_CACHE_TTL_SECS").map(Duration::from_secs),
            store_timeout: lookup("CATALOG_STORE_TIMEOUT_MS")
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|v| *v > 0)
                .map(Duration::from_millis),
            allowed_origins: lookup("CATALOG_ALLOWED_ORIGINS")
                .unwrap_or_else(|| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    pub fn user_service_addr(&self) -> String {
        format!("{}:{}", self.host, self.user_service_port)
    }

    pub fn product_service_addr(&self) -> String {
        format!("{}:{}", self.host, self.product_service_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config.user_service_addr(), "0.0.0.0:5001");
        assert_eq!(config.product_service_addr(), "0.0.0.0:5002");
        assert_eq!(config.token_ttl, Duration::from_secs(3600));
        assert_eq!(config.cache_key, "products");
        assert!(config.cache_ttl.is_none());
        assert!(config.store_timeout.is_none());
        assert_eq!(config.allowed_origins, vec!["*".to_string()]);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("CATALOG_PRODUCT_SERVICE_PORT", "9000"),
            ("CATALOG_JWT_SECRET", "s3cret"),
            ("CATALOG_CACHE_TTL_SECS", "30"),
            ("CATALOG_STORE_TIMEOUT_MS", "500"),
            ("CATALOG_ALLOWED_ORIGINS", "http://a.test, http://b.test"),
        ]));
        assert_eq!(config.product_service_port, 9000);
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.cache_ttl, Some(Duration::from_secs(30)));
        assert_eq!(config.store_timeout, Some(Duration::from_millis(500)));
        assert_eq!(config.allowed_origins.len(), 2);
    }

    #[test]
    fn test_unparseable_values_fall_back() {
        let config = Config::from_lookup(lookup(&[
            ("CATALOG_USER_SERVICE_PORT", "not-a-port"),
            ("CATALOG_TOKEN_TTL_SECS", "0"),
        ]));
        assert_eq!(config.user_service_port, 5001);
        assert_eq!(config.token_ttl, Duration::from_secs(3600));
    }
}
