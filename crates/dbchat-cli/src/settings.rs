//! Bridge from the validated config file to provider settings.

use dbchat_config::{ConfigError, LlmConfig};
use dbchat_providers::{ProviderKind, ProviderSettings};

/// Map an `[llm]` config table onto the settings a provider is built from.
///
/// "openai" and "openai-compatible" differ only in their default base URL;
/// both speak the chat-completions surface.
pub fn provider_settings(llm: &LlmConfig) -> Result<ProviderSettings, ConfigError> {
    let kind = match llm.provider.as_str() {
        "ollama" => ProviderKind::Ollama,
        "openai" | "openai-compatible" => ProviderKind::OpenAiCompatible,
        "anthropic" => ProviderKind::Anthropic,
        other => return Err(ConfigError::UnknownProvider(other.to_string())),
    };

    let base_url = llm
        .effective_base_url()
        .ok_or_else(|| ConfigError::MissingBaseUrl(llm.provider.clone()))?;
    let model = llm.model.clone().ok_or(ConfigError::MissingModel)?;

    let mut settings = ProviderSettings::new(kind, model, base_url)
        .with_extra_params(llm.extra_params.clone());
    if let Some(api_key) = &llm.api_key {
        settings = settings.with_api_key(api_key.clone());
    }
    if let Some(max_tokens) = llm.max_tokens {
        settings = settings.with_max_tokens(max_tokens);
    }
    if let Some(temperature) = llm.temperature {
        settings = settings.with_temperature(temperature);
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn llm(provider: &str) -> LlmConfig {
        LlmConfig {
            provider: provider.to_string(),
            model: Some("m".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            provider_settings(&llm("ollama")).unwrap().kind,
            ProviderKind::Ollama
        );
        assert_eq!(
            provider_settings(&llm("openai")).unwrap().kind,
            ProviderKind::OpenAiCompatible
        );
        assert_eq!(
            provider_settings(&llm("anthropic")).unwrap().kind,
            ProviderKind::Anthropic
        );
    }

    #[test]
    fn test_openai_compatible_needs_a_base_url() {
        let err = provider_settings(&llm("openai-compatible")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingBaseUrl(_)));
    }

    #[test]
    fn test_overrides_flow_through() {
        let mut config = llm("openai");
        config.api_key = Some("sk-test".to_string());
        config.max_tokens = Some(64);
        config.temperature = Some(0.0);

        let settings = provider_settings(&config).unwrap();
        assert_eq!(settings.api_key.as_deref(), Some("sk-test"));
        assert_eq!(settings.max_tokens, 64);
        assert_eq!(settings.temperature, 0.0);
        assert_eq!(settings.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn test_settings_defaults_apply_when_config_is_silent() {
        let settings = provider_settings(&llm("ollama")).unwrap();
        assert_eq!(settings.max_tokens, dbchat_providers::DEFAULT_MAX_TOKENS);
        assert_eq!(settings.temperature, dbchat_providers::DEFAULT_TEMPERATURE);
    }
}
