//! Configuration
//!
//! Loaded from environment variables with sensible defaults. The generation
//! service is optional: with no provider configured the pipeline still runs
//! and every extraction resolves through its deterministic fallback.
//!
//! # Environment Variables
//!
//! - `SPECFORGE_PROVIDER`: provider selection (ollama|openai|claude|gemini|grok|groq);
//!   unset means "no generation service"
//! - `SPECFORGE_MODEL`: model name - default depends on provider
//! - `SPECFORGE_REQUEST_TIMEOUT`: timeout in seconds - default: "30"
//! - `SPECFORGE_MAX_RETRIES`: extraction retry bound - default: "2"
//! - `SPECFORGE_PROMPT_BUDGET`: prompt packing budget in characters - default: "24000"
//! - `SPECFORGE_LOG_LEVEL`: logging level - default: "info"
//!
//! Provider credentials are read by the genai library itself (`OLLAMA_HOST`,
//! `OPENAI_API_KEY`, `ANTHROPIC_API_KEY`, `GOOGLE_API_KEY`, ...).

use genai::adapter::AdapterKind;
use std::env;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::llm::{GenAiClient, GenerationClient, PromptBudget};

const DEFAULT_OLLAMA_MODEL: &str = "qwen2.5-coder:7b";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_RETRIES: u32 = 2;
const DEFAULT_PROMPT_BUDGET: usize = 24_000;
const PER_FILE_CHARS: usize = 2_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid provider: {0}. Valid options: ollama, openai, claude, gemini, grok, groq")]
    InvalidProvider(String),

    #[error("failed to parse {field}: {error}")]
    Parse { field: String, error: String },
}

/// Supported generation providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Ollama,
    OpenAi,
    Claude,
    Gemini,
    Grok,
    Groq,
}

impl Provider {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.to_lowercase().as_str() {
            "ollama" => Ok(Provider::Ollama),
            "openai" => Ok(Provider::OpenAi),
            "claude" => Ok(Provider::Claude),
            "gemini" => Ok(Provider::Gemini),
            "grok" => Ok(Provider::Grok),
            "groq" => Ok(Provider::Groq),
            other => Err(ConfigError::InvalidProvider(other.to_string())),
        }
    }

    fn adapter_kind(&self) -> AdapterKind {
        match self {
            Provider::Ollama => AdapterKind::Ollama,
            Provider::OpenAi => AdapterKind::OpenAI,
            Provider::Claude => AdapterKind::Anthropic,
            Provider::Gemini => AdapterKind::Gemini,
            Provider::Grok => AdapterKind::Xai,
            Provider::Groq => AdapterKind::Groq,
        }
    }

    fn default_model(&self) -> &'static str {
        match self {
            Provider::Ollama => DEFAULT_OLLAMA_MODEL,
            _ => "default-model",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ForgeConfig {
    /// None means the generation service is not configured
    pub provider: Option<Provider>,
    pub model: String,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub prompt_budget_chars: usize,
    pub log_level: String,
}

impl ForgeConfig {
    /// Loads from the environment. Unset variables fall back to defaults;
    /// set-but-invalid variables are errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        let provider = match env::var("SPECFORGE_PROVIDER") {
            Ok(value) => Some(Provider::parse(&value)?),
            Err(_) => None,
        };

        let model = env::var("SPECFORGE_MODEL").unwrap_or_else(|_| {
            provider
                .map(|p| p.default_model().to_string())
                .unwrap_or_else(|| "default-model".to_string())
        });

        Ok(Self {
            provider,
            model,
            request_timeout_secs: parse_env("SPECFORGE_REQUEST_TIMEOUT", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            max_retries: parse_env("SPECFORGE_MAX_RETRIES", DEFAULT_MAX_RETRIES)?,
            prompt_budget_chars: parse_env("SPECFORGE_PROMPT_BUDGET", DEFAULT_PROMPT_BUDGET)?,
            log_level: env::var("SPECFORGE_LOG_LEVEL")
                .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string()),
        })
    }

    /// Builds the generation client, or None when no provider is set.
    pub fn create_client(&self) -> Option<Arc<dyn GenerationClient>> {
        let provider = self.provider?;
        Some(Arc::new(GenAiClient::new(
            provider.adapter_kind(),
            self.model.clone(),
            Duration::from_secs(self.request_timeout_secs),
        )))
    }

    pub fn prompt_budget(&self) -> PromptBudget {
        PromptBudget::new(self.prompt_budget_chars, PER_FILE_CHARS)
    }
}

fn parse_env<T: std::str::FromStr>(field: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(field) {
        Ok(value) => value.parse().map_err(|e: T::Err| ConfigError::Parse {
            field: field.to_string(),
            error: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for var in [
            "SPECFORGE_PROVIDER",
            "SPECFORGE_MODEL",
            "SPECFORGE_REQUEST_TIMEOUT",
            "SPECFORGE_MAX_RETRIES",
            "SPECFORGE_PROMPT_BUDGET",
            "SPECFORGE_LOG_LEVEL",
        ] {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_without_provider() {
        clear_env();
        let config = ForgeConfig::from_env().unwrap();

        assert!(config.provider.is_none());
        assert!(config.create_client().is_none());
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.prompt_budget_chars, 24_000);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    #[serial]
    fn test_provider_and_model_from_env() {
        clear_env();
        env::set_var("SPECFORGE_PROVIDER", "ollama");
        let config = ForgeConfig::from_env().unwrap();

        assert_eq!(config.provider, Some(Provider::Ollama));
        assert_eq!(config.model, DEFAULT_OLLAMA_MODEL);
        assert!(config.create_client().is_some());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_provider_is_an_error() {
        clear_env();
        env::set_var("SPECFORGE_PROVIDER", "skynet");
        assert!(matches!(
            ForgeConfig::from_env(),
            Err(ConfigError::InvalidProvider(_))
        ));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_numeric_value_is_an_error() {
        clear_env();
        env::set_var("SPECFORGE_MAX_RETRIES", "many");
        assert!(matches!(
            ForgeConfig::from_env(),
            Err(ConfigError::Parse { .. })
        ));
        clear_env();
    }

    #[test]
    fn test_provider_parsing() {
        assert_eq!(Provider::parse("Claude").unwrap(), Provider::Claude);
        assert!(Provider::parse("unknown").is_err());
    }
}
