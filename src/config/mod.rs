//! Application configuration module
//!
//! Configuration is read from environment variables with the `SIGNUP_FLOW`
//! prefix; nested values are separated by double underscores. A `.env` file
//! is honoured in development.
//!
//! # Example
//!
//! ```no_run
//! use signup_flow::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Documents stored under {}", config.store.data_dir.display());
//! ```

mod error;
mod onboarding;
mod storage;
mod store;

pub use error::{ConfigError, ValidationError};
pub use onboarding::OnboardingConfig;
pub use storage::StorageConfig;
pub use store::StoreConfig;

use serde::Deserialize;

/// Output format for log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Root application configuration
///
/// Every section has defaults, so an empty environment loads successfully.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// User document store (file-backed)
    #[serde(default)]
    pub store: StoreConfig,

    /// Photo blob storage and photo-set limits
    #[serde(default)]
    pub storage: StorageConfig,

    /// Screen rules
    #[serde(default)]
    pub onboarding: OnboardingConfig,

    /// Default tracing filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Environment Variable Format
    ///
    /// - `SIGNUP_FLOW__STORE__DATA_DIR=/var/lib/signup` -> `store.data_dir`
    /// - `SIGNUP_FLOW__STORAGE__MAX_PHOTOS=4` -> `storage.max_photos = 4`
    /// - `SIGNUP_FLOW__LOG_LEVEL=debug` -> `log_level = "debug"`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SIGNUP_FLOW")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.store.validate()?;
        self.storage.validate()?;
        self.onboarding.validate()?;
        if self.log_level.trim().is_empty() {
            return Err(ValidationError::MissingRequired("log_level"));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            storage: StorageConfig::default(),
            onboarding: OnboardingConfig::default(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::path::PathBuf;
    use std::sync::Mutex;

    // Tests touching process environment must not interleave.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "SIGNUP_FLOW__STORE__DATA_DIR",
        "SIGNUP_FLOW__STORE__COLLECTION",
        "SIGNUP_FLOW__STORAGE__MAX_PHOTOS",
        "SIGNUP_FLOW__ONBOARDING__MINIMUM_AGE",
        "SIGNUP_FLOW__LOG_LEVEL",
        "SIGNUP_FLOW__LOG_FORMAT",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_with_empty_environment_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();

        let config = AppConfig::load().unwrap();

        assert_eq!(config.store.collection, "users");
        assert_eq!(config.storage.max_photos, 6);
        assert_eq!(config.onboarding.minimum_age, 18);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_nested_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("SIGNUP_FLOW__STORE__DATA_DIR", "/tmp/signup");
        env::set_var("SIGNUP_FLOW__STORAGE__MAX_PHOTOS", "4");
        env::set_var("SIGNUP_FLOW__ONBOARDING__MINIMUM_AGE", "21");
        env::set_var("SIGNUP_FLOW__LOG_FORMAT", "json");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.store.data_dir, PathBuf::from("/tmp/signup"));
        assert_eq!(config.storage.photo_rules().max_photos, 4);
        assert_eq!(config.onboarding.minimum_age, 21);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_validate_reports_section_errors() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("SIGNUP_FLOW__ONBOARDING__MINIMUM_AGE", "9");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.validate(), Err(ValidationError::InvalidMinimumAge));
    }

    #[test]
    fn test_unparseable_number_is_load_error() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("SIGNUP_FLOW__STORAGE__MAX_PHOTOS", "lots");
        let result = AppConfig::load();
        clear_env();

        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn test_blank_log_level_is_rejected() {
        let config = AppConfig {
            log_level: " ".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("log_level"))
        );
    }
}
