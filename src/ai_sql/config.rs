//! Configuration for the completion service

use serde::{Deserialize, Serialize};

pub const DEFAULT_COMPLETION_ENDPOINT: &str = "https://api.openai.com/v1/completions";
pub const DEFAULT_MODEL: &str = "text-davinci-003";
pub const DEFAULT_TEMPERATURE: f32 = 0.5;
pub const DEFAULT_MAX_TOKENS: u32 = 250;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

/// Fixed parameters sent with every completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionSettings {
    /// Completions endpoint URL
    pub endpoint: String,

    /// Model identifier
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_COMPLETION_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl CompletionSettings {
    /// Validate settings
    pub fn validate(&self) -> Result<(), String> {
        if self.endpoint.is_empty() {
            return Err("Completion endpoint must not be empty".to_string());
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err("Temperature must be between 0.0 and 2.0".to_string());
        }

        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("timeout_seconds must be greater than 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = CompletionSettings::default();
        assert_eq!(settings.model, "text-davinci-003");
        assert_eq!(settings.temperature, 0.5);
        assert_eq!(settings.max_tokens, 250);
        assert_eq!(settings.endpoint, "https://api.openai.com/v1/completions");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let mut settings = CompletionSettings::default();

        settings.temperature = 3.0;
        assert!(settings.validate().is_err());

        settings.temperature = 0.5;
        settings.max_tokens = 0;
        assert!(settings.validate().is_err());

        settings.max_tokens = 250;
        settings.endpoint = String::new();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: CompletionSettings = toml::from_str("model = \"gpt-3.5-turbo-instruct\"").unwrap();
        assert_eq!(settings.model, "gpt-3.5-turbo-instruct");
        assert_eq!(settings.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(settings.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
    }
}
