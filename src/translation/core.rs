use anyhow::{Result, Context};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::app_config::{TranslationConfig, TranslationProvider as ConfigTranslationProvider};
use crate::errors::TranslationError;
use crate::providers::Provider;
use crate::providers::ollama::{Ollama, GenerationRequest};
use crate::providers::openai::{OpenAI, OpenAIRequest};
use crate::providers::anthropic::{Anthropic, AnthropicRequest};

// @module: Translation backend over LLM providers

/// Upper bound on generated tokens for a single chunk translation
const MAX_COMPLETION_TOKENS: u32 = 4096;

// @const: Reply wrapped in a markdown fence added by the model
static WRAPPED_REPLY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A```(?:markdown|md|mdx)?\s*\n(.*)\n```\z").unwrap()
});

/// Narrow interface to the translation backend.
///
/// The backend is an opaque natural-language-instruction RPC; keeping the
/// interface this small makes the concrete provider swappable and lets tests
/// substitute a mock.
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    /// Translate one document unit between two languages, preserving markup
    async fn translate_chunk(
        &self,
        chunk: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, TranslationError>;

    /// Rewrite a document path from the source-language directory to the
    /// target-language directory
    async fn translate_path(
        &self,
        path: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, TranslationError>;
}

// @parses: Endpoint string into host and port
// @returns: Tuple of (host, port)
fn parse_endpoint(endpoint: &str) -> Result<(String, u16)> {
    // If it doesn't start with http/https, assume it's just host:port
    let url_str = if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
        format!("http://{}", endpoint)
    } else {
        endpoint.to_string()
    };

    let url = Url::parse(&url_str)
        .context(format!("Failed to parse endpoint URL: {}", endpoint))?;

    let host = format!(
        "{}://{}",
        url.scheme(),
        url.host_str().unwrap_or("localhost")
    );

    let port = url.port().unwrap_or(11434);

    Ok((host, port))
}

/// Build the instruction for translating one document unit.
///
/// Code blocks stay untranslated except for documentation links that embed
/// the source-language directory; entity names and established
/// computer-science terms stay as they are.
pub fn chunk_instruction(chunk: &str, source_language: &str, target_language: &str) -> String {
    format!(
        r#"Translate the following text chunk from "{source}" into "{target}":

<start_of_chunk>
{chunk}
<end_of_chunk>

- Respect formatting such as heading hierarchy, bold, italic, line breaks, and tables.
- Do not translate fenced code blocks. Leave them as-is. The only exception is references to filenames or links of the form "docs/{source}/..." inside code, which become "docs/{target}/...".
- Do not translate product entity names or established computer-science terms.
- Output only the translated chunk content, no other text."#,
        source = source_language,
        target = target_language,
        chunk = chunk,
    )
}

/// Build the instruction for rewriting a document path into the
/// target-language directory
pub fn path_instruction(path: &str, source_language: &str, target_language: &str) -> String {
    format!(
        r#"Knowing that the pathname of the file being translated is "{path}" and the primary language of the file is "{source}", translate the pathname into "{target}".

Its structure is usually "docs/<LANGUAGE>/.../<FILE_NAME>.<EXTENSION>"

OUTPUT FORMAT:
- Only the translated pathname, no other text.
- Change only the language code directory, not the file name or subfolders."#,
        path = path,
        source = source_language,
        target = target_language,
    )
}

/// Normalize a backend reply into usable chunk content.
///
/// Models occasionally wrap the whole answer in a markdown fence or echo the
/// chunk markers from the instruction; both are stripped. A reply that is
/// empty after cleanup is an error.
pub fn clean_backend_reply(reply: &str) -> Result<String, TranslationError> {
    let trimmed = reply.trim();
    if trimmed.is_empty() {
        return Err(TranslationError::EmptyResponse);
    }

    // Only unwrap fences tagged as markdown (or untagged); a unit that is
    // itself a fenced code block keeps its language tag and must survive
    let unwrapped = match WRAPPED_REPLY_REGEX.captures(trimmed) {
        Some(caps) if !caps[1].contains("```") => caps[1].trim().to_string(),
        _ => trimmed.to_string(),
    };

    let cleaned = unwrapped
        .replace("<start_of_chunk>", "")
        .replace("<end_of_chunk>", "")
        .trim()
        .to_string();

    if cleaned.is_empty() {
        return Err(TranslationError::EmptyResponse);
    }

    Ok(cleaned)
}

// @enum: Available translation provider implementations
enum TranslationProviderImpl {
    // @variant: Ollama LLM service
    Ollama {
        // @field: Client instance
        client: Ollama,
    },

    // @variant: OpenAI API service
    OpenAI {
        // @field: Client instance
        client: OpenAI,
    },

    // @variant: Anthropic API service
    Anthropic {
        // @field: Client instance
        client: Anthropic,
    },
}

// @struct: Translation service dispatching instructions to the active provider
pub struct TranslationService {
    // @field: Provider implementation
    provider: TranslationProviderImpl,

    // @field: Configuration
    config: TranslationConfig,
}

impl TranslationService {
    /// Create a new translation service from configuration
    pub fn new(config: TranslationConfig) -> Result<Self> {
        let model = config.get_model();
        let timeout_secs = config.get_timeout_secs();

        let provider = match config.provider {
            ConfigTranslationProvider::Ollama => {
                let (host, port) = parse_endpoint(&config.get_endpoint())?;
                TranslationProviderImpl::Ollama {
                    client: Ollama::new(host, port, model, timeout_secs),
                }
            },
            ConfigTranslationProvider::OpenAI => {
                TranslationProviderImpl::OpenAI {
                    client: OpenAI::new(config.get_api_key(), config.get_endpoint(), model, timeout_secs),
                }
            },
            ConfigTranslationProvider::Anthropic => {
                TranslationProviderImpl::Anthropic {
                    client: Anthropic::new(config.get_api_key(), config.get_endpoint(), model, timeout_secs),
                }
            },
        };

        Ok(Self { provider, config })
    }

    /// Send one instruction to the active provider and return the raw reply
    async fn complete_instruction(&self, instruction: &str) -> Result<String, TranslationError> {
        let temperature = self.config.common.temperature;

        let reply = match &self.provider {
            TranslationProviderImpl::Ollama { client } => {
                let request = GenerationRequest::new(client.model(), instruction)
                    .temperature(temperature);
                let response = client.complete(request).await?;
                Ollama::extract_text(&response)
            },
            TranslationProviderImpl::OpenAI { client } => {
                let request = OpenAIRequest::new(client.model())
                    .add_message("user", instruction)
                    .temperature(temperature)
                    .max_tokens(MAX_COMPLETION_TOKENS);
                let response = client.complete(request).await?;
                OpenAI::extract_text(&response)
            },
            TranslationProviderImpl::Anthropic { client } => {
                let request = AnthropicRequest::new(client.model(), MAX_COMPLETION_TOKENS)
                    .add_message("user", instruction)
                    .temperature(temperature);
                let response = client.complete(request).await?;
                Anthropic::extract_text(&response)
            },
        };

        Ok(reply)
    }

    /// Check that the configured provider is reachable
    pub async fn test_connection(&self) -> Result<(), TranslationError> {
        match &self.provider {
            TranslationProviderImpl::Ollama { client } => client.test_connection().await?,
            TranslationProviderImpl::OpenAI { client } => client.test_connection().await?,
            TranslationProviderImpl::Anthropic { client } => client.test_connection().await?,
        }
        Ok(())
    }
}

#[async_trait]
impl TranslationBackend for TranslationService {
    async fn translate_chunk(
        &self,
        chunk: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        let instruction = chunk_instruction(chunk, source_language, target_language);
        let reply = self.complete_instruction(&instruction).await?;
        clean_backend_reply(&reply)
    }

    async fn translate_path(
        &self,
        path: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        let instruction = path_instruction(path, source_language, target_language);
        let reply = self.complete_instruction(&instruction).await?;
        if reply.trim().is_empty() {
            return Err(TranslationError::EmptyResponse);
        }
        Ok(reply)
    }
}
