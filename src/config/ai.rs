//! Copy generator configuration (OpenAI).

use serde::Deserialize;

use super::error::ValidationError;

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

/// OpenAI configuration for the copy generator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AiConfig {
    /// OpenAI API key.
    pub api_key: String,

    /// Model used for copy generation.
    #[serde(default = "default_model")]
    pub model: String,
}

impl AiConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.api_key.is_empty() {
            return Err(ValidationError::MissingRequired("AI__API_KEY"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_is_rejected() {
        assert!(AiConfig::default().validate().is_err());
    }

    #[test]
    fn key_with_default_model_is_valid() {
        let config = AiConfig {
            api_key: "sk-abc".to_string(),
            model: default_model(),
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.model, "gpt-4o-mini");
    }
}
