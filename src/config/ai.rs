//! AI provider configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// AI provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Anthropic API key
    pub anthropic_api_key: Option<String>,

    /// Which provider backs section generation
    #[serde(default)]
    pub provider: AiProviderKind,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on retryable failures
    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

/// AI provider type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProviderKind {
    #[default]
    Anthropic,
    /// Scripted provider for demos and tests; no API key needed.
    Mock,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if an Anthropic key is present
    pub fn has_anthropic(&self) -> bool {
        self.anthropic_api_key
            .as_ref()
            .is_some_and(|k| !k.is_empty())
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.provider == AiProviderKind::Anthropic {
            if !self.has_anthropic() {
                return Err(ValidationError::MissingRequired("ANTHROPIC_API_KEY"));
            }
            if !self
                .anthropic_api_key
                .as_deref()
                .unwrap_or_default()
                .starts_with("sk-ant-")
            {
                return Err(ValidationError::InvalidAnthropicKey);
            }
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            anthropic_api_key: None,
            provider: AiProviderKind::default(),
            model: default_model(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
        }
    }
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_retries() -> u32 {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_anthropic() {
        let config = AiConfig::default();
        assert_eq!(config.provider, AiProviderKind::Anthropic);
        assert_eq!(config.timeout_secs, 120);
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn timeout_converts_to_duration() {
        let config = AiConfig {
            timeout_secs: 60,
            ..Default::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn anthropic_provider_requires_a_key() {
        let config = AiConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_key_is_rejected() {
        let config = AiConfig {
            anthropic_api_key: Some("not-a-key".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidAnthropicKey)
        ));
    }

    #[test]
    fn mock_provider_needs_no_key() {
        let config = AiConfig {
            provider: AiProviderKind::Mock,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn valid_anthropic_config_passes() {
        let config = AiConfig {
            anthropic_api_key: Some("sk-ant-xxx".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
