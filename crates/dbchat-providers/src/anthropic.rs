use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::{ChatProvider, Message, MessageRole, ProviderError, ProviderSettings};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic's messages API.
///
/// Generation posts only the latest user message, not the accumulated
/// history. The chat-completions path sends everything; this asymmetry
/// matches the behavior this adapter was built against and is deliberate.
#[derive(Clone)]
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: u32,
    temperature: f32,
    extra_params: serde_json::Map<String, serde_json::Value>,
    name: String,
}

impl AnthropicProvider {
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            client: Client::new(),
            api_key: settings.api_key.unwrap_or_default(),
            model: settings.model,
            base_url: settings.base_url,
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            extra_params: settings.extra_params,
            name: "anthropic".to_string(),
        }
    }

    fn create_request_body(&self, latest: &str) -> serde_json::Value {
        let mut body = json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "messages": [{ "role": "user", "content": latest }],
            "temperature": self.temperature,
        });

        for (key, value) in &self.extra_params {
            body[key] = value.clone();
        }

        body
    }
}

#[async_trait]
impl ChatProvider for AnthropicProvider {
    async fn list_models(&self) -> Result<Vec<String>, ProviderError> {
        debug!("Fetching model list from {}", self.base_url);

        let response = self
            .client
            .get(format!("{}/models", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .send()
            .await
            .map_err(|e| ProviderError::discovery_transport(&self.name, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ProviderError::discovery(
                &self.name,
                format!("Anthropic API error {}: {}", status, body),
            ));
        }

        let listing: ModelListResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::discovery_transport(&self.name, e))?;

        Ok(listing.data.into_iter().map(|m| m.id).collect())
    }

    async fn complete(&self, messages: &[Message]) -> Result<String, ProviderError> {
        let latest = messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.content.as_str())
            .ok_or_else(|| ProviderError::generation(&self.name, "no user message to send"))?;

        let body = self.create_request_body(latest);

        debug!("Sending messages request to Anthropic: model={}", self.model);

        let response = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::generation_transport(&self.name, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ProviderError::generation(
                &self.name,
                format!("Anthropic API error {}: {}", status, body),
            ));
        }

        let reply: MessagesResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::generation_transport(&self.name, e))?;

        reply
            .content
            .into_iter()
            .next()
            .map(|block| block.text)
            .ok_or_else(|| ProviderError::generation(&self.name, "empty content in messages reply"))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// Anthropic API response structures
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ModelListResponse {
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
}
