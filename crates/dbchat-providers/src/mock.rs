//! Mock provider for testing
//!
//! A scriptable [`ChatProvider`] that replays queued replies and records
//! every message list it is handed, so tests can assert on session
//! semantics without a live backend.
//!
//! # Example
//!
//! ```rust,ignore
//! use dbchat_providers::MockProvider;
//!
//! let provider = MockProvider::new()
//!     .with_reply("Hello, world!")
//!     .with_failure("backend down");
//! ```

use crate::{ChatProvider, Message, ProviderError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct MockProvider {
    replies: Arc<Mutex<VecDeque<Result<String, String>>>>,
    models: Arc<Mutex<Result<Vec<String>, String>>>,
    requests: Arc<Mutex<Vec<Vec<Message>>>>,
    model: String,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            models: Arc::new(Mutex::new(Ok(Vec::new()))),
            requests: Arc::new(Mutex::new(Vec::new())),
            model: "mock-model".to_string(),
        }
    }

    /// Queue a successful reply for the next unanswered `complete` call.
    pub fn with_reply(self, reply: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(reply.to_string()));
        self
    }

    /// Queue a generation failure for the next unanswered `complete` call.
    pub fn with_failure(self, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    /// Set the catalog `list_models` returns.
    pub fn with_models(self, models: Vec<&str>) -> Self {
        *self.models.lock().unwrap() = Ok(models.into_iter().map(String::from).collect());
        self
    }

    /// Make `list_models` fail with a discovery error.
    pub fn with_discovery_failure(self, message: &str) -> Self {
        *self.models.lock().unwrap() = Err(message.to_string());
        self
    }

    /// Every message list `complete` has received, in call order.
    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatProvider for MockProvider {
    async fn list_models(&self) -> Result<Vec<String>, ProviderError> {
        match &*self.models.lock().unwrap() {
            Ok(models) => Ok(models.clone()),
            Err(message) => Err(ProviderError::discovery("mock", message.clone())),
        }
    }

    async fn complete(&self, messages: &[Message]) -> Result<String, ProviderError> {
        self.requests.lock().unwrap().push(messages.to_vec());

        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(ProviderError::generation("mock", message)),
            None => Err(ProviderError::generation("mock", "no scripted reply left")),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
