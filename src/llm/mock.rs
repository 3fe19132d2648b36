//! Queue-backed mock generation client for tests
//!
//! Responses are popped in FIFO order; an exhausted queue is an error so a
//! test that makes more calls than it scripted fails loudly. The client also
//! counts calls, which several pipeline properties assert on.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::client::{GenerationClient, GenerationError};
use super::prompt::Prompt;

#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    Error(GenerationError),
}

impl MockReply {
    pub fn text(content: impl Into<String>) -> Self {
        MockReply::Text(content.into())
    }

    pub fn error(error: GenerationError) -> Self {
        MockReply::Error(error)
    }
}

pub struct MockGenerationClient {
    replies: Mutex<VecDeque<MockReply>>,
    calls: AtomicUsize,
    name: String,
}

impl MockGenerationClient {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
            name: "MockGeneration".to_string(),
        }
    }

    pub fn with_replies(replies: impl IntoIterator<Item = MockReply>) -> Self {
        let client = Self::new();
        client.add_replies(replies);
        client
    }

    pub fn add_reply(&self, reply: MockReply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn add_replies(&self, replies: impl IntoIterator<Item = MockReply>) {
        let mut queue = self.replies.lock().unwrap();
        for reply in replies {
            queue.push_back(reply);
        }
    }

    /// Number of `generate` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn remaining_replies(&self) -> usize {
        self.replies.lock().unwrap().len()
    }
}

impl Default for MockGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationClient for MockGenerationClient {
    async fn generate(&self, _prompt: &Prompt) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(GenerationError::EmptyResponse)?;

        match reply {
            MockReply::Text(content) => Ok(content),
            MockReply::Error(error) => Err(error),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn model_info(&self) -> Option<String> {
        Some("mock-model".to_string())
    }
}

impl std::fmt::Debug for MockGenerationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockGenerationClient")
            .field("name", &self.name)
            .field("remaining_replies", &self.remaining_replies())
            .finish()
    }
}
