pub mod mock;
pub use mock::MockProvider;

mod error;
pub use error::ProviderError;

use serde::{Deserialize, Serialize};
use serde_json::Map;

/// Trait for chat-capable LLM providers
#[async_trait::async_trait]
pub trait ChatProvider: Send + Sync {
    /// Enumerate the models this provider currently serves
    async fn list_models(&self) -> Result<Vec<String>, ProviderError>;

    /// Produce a completion for the accumulated conversation.
    ///
    /// The full history is always passed in; how much of it actually goes
    /// over the wire is a per-provider decision (the Anthropic path sends
    /// only the latest user message, the chat-completions path sends
    /// everything).
    async fn complete(&self, messages: &[Message]) -> Result<String, ProviderError>;

    /// Get the provider name
    fn name(&self) -> &str;

    /// Get the configured model id
    fn model(&self) -> &str;
}

/// Which backend family an adapter instance targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Local model server speaking the Ollama tag/generate protocol
    Ollama,
    /// OpenAI or any API exposing the same chat-completions surface
    OpenAiCompatible,
    /// Anthropic's messages API
    Anthropic,
}

/// Settings supplied at construction time; immutable for the life of the
/// provider instance.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub extra_params: Map<String, serde_json::Value>,
}

pub const DEFAULT_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

impl ProviderSettings {
    pub fn new(kind: ProviderKind, model: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            kind,
            api_key: None,
            model: model.into(),
            base_url: base_url.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            extra_params: Map::new(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_extra_params(mut self, extra_params: Map<String, serde_json::Value>) -> Self {
        self.extra_params = extra_params;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

pub mod anthropic;
pub mod ollama;
pub mod openai;

pub use anthropic::AnthropicProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

/// Construct the provider implementation matching the configured kind.
pub fn build_provider(settings: ProviderSettings) -> Box<dyn ChatProvider> {
    match settings.kind {
        ProviderKind::Ollama => Box::new(OllamaProvider::new(settings)),
        ProviderKind::OpenAiCompatible => Box::new(OpenAiProvider::new(settings)),
        ProviderKind::Anthropic => Box::new(AnthropicProvider::new(settings)),
    }
}

/// One conversation against one provider instance.
///
/// Owns the ordered turn log and the cached model catalog. Not designed for
/// concurrent `send_message` calls against the same session; callers must
/// serialize requests (the UI keeps its send affordance disabled while a
/// request is in flight).
pub struct ChatSession {
    provider: Box<dyn ChatProvider>,
    history: Vec<Message>,
    models: Option<Vec<String>>,
}

impl ChatSession {
    pub fn new(provider: Box<dyn ChatProvider>) -> Self {
        Self {
            provider,
            history: Vec::new(),
            models: None,
        }
    }

    /// Refresh the model catalog from the provider.
    ///
    /// The cached catalog is replaced wholesale on success and left
    /// untouched on failure.
    pub async fn list_models(&mut self) -> Result<Vec<String>, ProviderError> {
        let models = self.provider.list_models().await?;
        self.models = Some(models.clone());
        Ok(models)
    }

    /// Send one user message and return the assistant's reply.
    ///
    /// Appends a system turn first when `system_context` is given, then the
    /// user turn, then dispatches. On failure the user turn stays appended
    /// (no rollback) and no assistant turn is added.
    pub async fn send_message(
        &mut self,
        text: &str,
        system_context: Option<&str>,
    ) -> Result<String, ProviderError> {
        if let Some(context) = system_context {
            self.history.push(Message::system(context));
        }
        self.history.push(Message::user(text));

        let reply = self.provider.complete(&self.history).await?;

        self.history.push(Message::assistant(reply.as_str()));
        Ok(reply)
    }

    /// The accumulated turn log, oldest first.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Drop all turns. The model catalog and provider settings are unaffected.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// The catalog from the last successful discovery call, if any.
    pub fn available_models(&self) -> Option<&[String]> {
        self.models.as_deref()
    }

    pub fn provider(&self) -> &dyn ChatProvider {
        self.provider.as_ref()
    }
}
