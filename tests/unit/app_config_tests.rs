/*!
 * Tests for application configuration
 */

use doctrans::app_config::{Config, ProviderConfig, TranslationProvider};

/// Test the default configuration values
#[test]
fn test_default_config_shouldUseExpectedDefaults() {
    let config = Config::default();

    assert_eq!(config.repo, "crewAIInc/crewAI");
    assert_eq!(config.docs_path, "docs");
    assert_eq!(config.primary_language, "en");
    assert_eq!(config.secondary_language, "ko");
    assert!(config.files.is_empty());
    assert_eq!(config.output_dir, "tmp");

    let common = &config.translation.common;
    assert_eq!(common.fetch_batch_size, 10);
    assert_eq!(common.path_batch_size, 10);
    assert_eq!(common.document_batch_size, 1);
    assert_eq!(common.document_pause_ms, 3000);
    assert_eq!(common.retry_attempts, 3);
    assert_eq!(common.retry_delay_ms, 5000);
}

/// Test that the default configuration validates
#[test]
fn test_validate_withDefaultConfig_shouldSucceed() {
    let config = Config::default();
    assert!(config.validate().is_ok());
}

/// Test that identical primary and secondary languages are rejected
#[test]
fn test_validate_withSameLanguages_shouldFail() {
    let mut config = Config::default();
    config.secondary_language = "en".to_string();
    assert!(config.validate().is_err());
}

/// Test that an invalid language tag is rejected
#[test]
fn test_validate_withInvalidLanguageTag_shouldFail() {
    let mut config = Config::default();
    config.secondary_language = "klingon".to_string();
    assert!(config.validate().is_err());
}

/// Test that a malformed repository identifier is rejected
#[test]
fn test_validate_withMalformedRepo_shouldFail() {
    let mut config = Config::default();
    config.repo = "not-a-repo".to_string();
    assert!(config.validate().is_err());
}

/// Test that a zero batch size is rejected
#[test]
fn test_validate_withZeroBatchSize_shouldFail() {
    let mut config = Config::default();
    config.translation.common.fetch_batch_size = 0;
    assert!(config.validate().is_err());
}

/// Test that OpenAI without an API key is rejected
#[test]
fn test_validate_withOpenAiAndNoKey_shouldFail() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::OpenAI;
    assert!(config.validate().is_err());
}

/// Test that OpenAI with an API key validates
#[test]
fn test_validate_withOpenAiAndKey_shouldSucceed() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::OpenAI;
    for provider in config.translation.available_providers.iter_mut() {
        if provider.provider_type == "openai" {
            provider.api_key = "test-key".to_string();
        }
    }
    assert!(config.validate().is_ok());
}

/// Test provider getter fallbacks for the active provider
#[test]
fn test_translation_config_getters_shouldUseActiveProvider() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Anthropic;

    assert_eq!(config.translation.get_endpoint(), "https://api.anthropic.com");
    assert_eq!(config.translation.get_model(), "claude-3-haiku");
    assert_eq!(config.translation.get_timeout_secs(), 60);
}

/// Test that a partial JSON config picks up serde defaults
#[test]
fn test_config_fromPartialJson_shouldApplyDefaults() {
    let json = r#"{
        "secondary_language": "pt-BR",
        "translation": { "provider": "ollama" }
    }"#;

    let config: Config = serde_json::from_str(json).unwrap();
    assert_eq!(config.secondary_language, "pt-BR");
    assert_eq!(config.primary_language, "en");
    assert_eq!(config.docs_path, "docs");
    assert_eq!(config.translation.common.document_batch_size, 1);
}

/// Test provider enum parsing and display
#[test]
fn test_translation_provider_parseAndDisplay_shouldRoundTrip() {
    let provider: TranslationProvider = "anthropic".parse().unwrap();
    assert_eq!(provider, TranslationProvider::Anthropic);
    assert_eq!(provider.to_string(), "anthropic");
    assert_eq!(provider.display_name(), "Anthropic");
    assert!("mistral".parse::<TranslationProvider>().is_err());
}

/// Test that per-provider defaults are populated
#[test]
fn test_provider_config_new_shouldPopulateDefaults() {
    let ollama = ProviderConfig::new(TranslationProvider::Ollama);
    assert_eq!(ollama.provider_type, "ollama");
    assert_eq!(ollama.endpoint, "http://localhost:11434");
    assert!(ollama.api_key.is_empty());
}
