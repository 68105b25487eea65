//! Mock completion service for tests.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{CompletionService, LlmError};

/// A canned outcome for [`MockLlm`].
#[derive(Clone, Debug)]
pub enum MockReply {
    Text(String),
    /// Simulate a provider error with the given status and message.
    ApiError(u16, String),
}

/// Hand-rolled [`CompletionService`] that replays replies and records prompts.
///
/// Replies are served in order; the last one repeats once the sequence runs out.
pub struct MockLlm {
    replies: Mutex<Vec<MockReply>>,
    fallback: MockReply,
    prompts: Mutex<Vec<String>>,
    max_tokens_seen: Mutex<Vec<u32>>,
}

impl MockLlm {
    pub fn new(reply: MockReply) -> Self {
        Self::with_sequence(vec![reply])
    }

    pub fn text(reply: impl Into<String>) -> Self {
        Self::new(MockReply::Text(reply.into()))
    }

    pub fn with_sequence(mut replies: Vec<MockReply>) -> Self {
        assert!(!replies.is_empty(), "sequence must have at least one reply");
        replies.reverse();
        let fallback = replies[0].clone();
        Self {
            replies: Mutex::new(replies),
            fallback,
            prompts: Mutex::new(Vec::new()),
            max_tokens_seen: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn max_tokens_seen(&self) -> Vec<u32> {
        self.max_tokens_seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for MockLlm {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.max_tokens_seen.lock().unwrap().push(max_tokens);

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| self.fallback.clone());

        match reply {
            MockReply::Text(text) => Ok(text),
            MockReply::ApiError(status, message) => Err(LlmError::Api { status, message }),
        }
    }
}
