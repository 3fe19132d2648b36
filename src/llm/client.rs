use async_trait::async_trait;
use thiserror::Error;

use super::prompt::Prompt;

/// Errors that can occur while talking to the generation service
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    /// API request failed with the given message
    #[error("API error: {message}")]
    Api {
        message: String,
        status_code: Option<u16>,
    },

    /// Request timed out after the specified duration (in seconds)
    #[error("request timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// Missing API keys, invalid provider settings, etc.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The service returned no usable text at all
    #[error("empty response from generation service")]
    EmptyResponse,
}

/// A plain-text-in, plain-text-out generation backend.
///
/// Implementations must not interpret the response; JSON recovery and
/// validation happen in the extraction contract.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, prompt: &Prompt) -> Result<String, GenerationError>;

    fn name(&self) -> &str;

    fn model_info(&self) -> Option<String> {
        None
    }
}
