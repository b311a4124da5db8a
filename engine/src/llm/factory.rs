//! Provider construction from configuration

use super::{
    AnthropicProvider, ModelProvider, OllamaProvider, OpenAIProvider, OpenRouterProvider,
};
use crate::config::LlmConfig;
use sdk::EngineError;

/// Builds the provider named by `config.default_provider`
pub fn create_provider(config: &LlmConfig) -> Result<Box<dyn ModelProvider>, EngineError> {
    match config.default_provider.as_str() {
        "ollama" => Ok(Box::new(OllamaProvider::new(
            &config.ollama,
            config.temperature,
            config.max_tokens,
        ))),
        "openai" => Ok(Box::new(OpenAIProvider::new(
            &config.openai,
            config.temperature,
            config.max_tokens,
        )?)),
        "anthropic" => Ok(Box::new(AnthropicProvider::new(
            &config.anthropic,
            config.temperature,
            config.max_tokens,
        )?)),
        "openrouter" => Ok(Box::new(OpenRouterProvider::new(
            &config.openrouter,
            config.temperature,
            config.max_tokens,
        )?)),
        other => Err(EngineError::UnknownProvider(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_builds_ollama() {
        let config = LlmConfig::default();
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.name(), "ollama");
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let config = LlmConfig {
            default_provider: "skynet".to_string(),
            ..LlmConfig::default()
        };

        let result = create_provider(&config);
        match result {
            Err(EngineError::UnknownProvider(name)) => assert_eq!(name, "skynet"),
            other => panic!("expected UnknownProvider, got {:?}", other.map(|p| p.name().to_string())),
        }
    }

    #[test]
    fn test_anthropic_with_key_builds() {
        let mut config = LlmConfig {
            default_provider: "anthropic".to_string(),
            ..LlmConfig::default()
        };
        config.anthropic.api_key = Some("sk-ant-test".to_string());

        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.name(), "anthropic");
    }
}
