//! GenAI-based generation client
//!
//! Thin adapter over the `genai` crate, supporting multiple providers
//! (Ollama, OpenAI, Claude, Gemini, Grok, Groq) through one interface.

use async_trait::async_trait;
use genai::adapter::AdapterKind;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest};
use genai::Client;
use std::time::Duration;
use tracing::{debug, error};

use super::client::{GenerationClient, GenerationError};
use super::prompt::Prompt;

/// Temperature used for extraction calls. Low on purpose: the service is
/// asked for structured output, not creativity.
const EXTRACTION_TEMPERATURE: f64 = 0.2;

pub struct GenAiClient {
    client: Client,
    model: String,
    provider: AdapterKind,
    timeout: Duration,
}

impl GenAiClient {
    pub fn new(provider: AdapterKind, model: String, timeout: Duration) -> Self {
        debug!(
            "Creating generation client: provider={}, model={}",
            provider.as_str(),
            model,
        );

        Self {
            client: Client::default(),
            model,
            provider,
            timeout,
        }
    }
}

#[async_trait]
impl GenerationClient for GenAiClient {
    async fn generate(&self, prompt: &Prompt) -> Result<String, GenerationError> {
        let mut messages = Vec::with_capacity(2);
        if !prompt.system.is_empty() {
            messages.push(ChatMessage::system(&prompt.system));
        }
        messages.push(ChatMessage::user(&prompt.user));

        let request = ChatRequest::new(messages);
        let options = ChatOptions::default().with_temperature(EXTRACTION_TEMPERATURE);

        let response = match tokio::time::timeout(
            self.timeout,
            self.client.exec_chat(&self.model, request, Some(&options)),
        )
        .await
        {
            Ok(Ok(resp)) => resp,
            Ok(Err(e)) => {
                error!("{} API error: {}", self.provider.as_str(), e);
                return Err(GenerationError::Api {
                    message: format!("{} request failed: {}", self.provider.as_str(), e),
                    status_code: None,
                });
            }
            Err(_) => {
                error!(
                    "{} request timed out after {}s",
                    self.provider.as_str(),
                    self.timeout.as_secs()
                );
                return Err(GenerationError::Timeout {
                    seconds: self.timeout.as_secs(),
                });
            }
        };

        let content = response.first_text().unwrap_or_default().to_string();
        if content.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        Ok(content)
    }

    fn name(&self) -> &str {
        self.provider.as_str()
    }

    fn model_info(&self) -> Option<String> {
        Some(self.model.clone())
    }
}

impl std::fmt::Debug for GenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenAiClient")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}
