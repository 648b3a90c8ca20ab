//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `ASSEMBLE_REPORTS` prefix and nested values use double underscores as
//! separators.
//!
//! # Example
//!
//! ```no_run
//! use assemble_reports::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod error;
mod report;

pub use ai::{AiConfig, AiProviderKind};
pub use error::{ConfigError, ValidationError};
pub use report::ReportConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// AI provider configuration
    #[serde(default)]
    pub ai: AiConfig,

    /// Report generation configuration
    #[serde(default)]
    pub report: ReportConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads a `.env` file if present, then reads variables with the
    /// `ASSEMBLE_REPORTS` prefix. `__` separates nested values:
    /// `ASSEMBLE_REPORTS__AI__ANTHROPIC_API_KEY` maps to
    /// `ai.anthropic_api_key`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into the expected
    /// types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("ASSEMBLE_REPORTS")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        self.report.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global; serialize the tests that touch them.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var("ASSEMBLE_REPORTS__AI__ANTHROPIC_API_KEY");
        env::remove_var("ASSEMBLE_REPORTS__AI__PROVIDER");
        env::remove_var("ASSEMBLE_REPORTS__REPORT__RETRIEVAL_TOP_K");
    }

    #[test]
    fn loads_with_no_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().unwrap();
        assert_eq!(config.report.retrieval_top_k, 8);
        assert!(config.ai.anthropic_api_key.is_none());
    }

    #[test]
    fn reads_nested_values_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("ASSEMBLE_REPORTS__AI__ANTHROPIC_API_KEY", "sk-ant-test");
        env::set_var("ASSEMBLE_REPORTS__REPORT__RETRIEVAL_TOP_K", "12");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.ai.anthropic_api_key.as_deref(), Some("sk-ant-test"));
        assert_eq!(config.report.retrieval_top_k, 12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn mock_provider_validates_without_key() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("ASSEMBLE_REPORTS__AI__PROVIDER", "mock");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.ai.provider, AiProviderKind::Mock);
        assert!(config.validate().is_ok());
    }
}
