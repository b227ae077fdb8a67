//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Card store configuration.
    pub store: StoreConfig,
    /// PAN encryption configuration.
    pub pan_crypto: PanCryptoConfig,
}

/// Card store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Store connection URL. Ignored by the in-memory store.
    #[serde(default)]
    pub url: Option<String>,
    /// Default page size for owner card listings.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
}

fn default_page_size() -> u32 {
    20
}

/// PAN encryption configuration.
///
/// The key is required configuration with no baked-in default; the process
/// refuses to start without it. `key_id` names the key so ciphertexts remain
/// attributable when keys are rotated in the future.
#[derive(Debug, Clone, Deserialize)]
pub struct PanCryptoConfig {
    /// Identifier of the active encryption key.
    pub key_id: String,
    /// Base64-encoded 256-bit AES key.
    pub key_base64: String,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded, including a
    /// missing PAN encryption key.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("CARDVAULT").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let cfg: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [store]
                url = "postgres://localhost/cards"

                [pan_crypto]
                key_id = "k1"
                key_base64 = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA="
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(cfg.pan_crypto.key_id, "k1");
        assert_eq!(cfg.store.default_page_size, 20);
        assert_eq!(cfg.store.url.as_deref(), Some("postgres://localhost/cards"));
    }

    #[test]
    fn test_missing_key_is_an_error() {
        let result: Result<AppConfig, _> = config::Config::builder()
            .add_source(config::File::from_str(
                "[store]\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize();

        assert!(result.is_err());
    }
}
