use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::{ChatProvider, Message, MessageRole, ProviderError, ProviderSettings};

/// OpenAI, or any endpoint exposing the same chat-completions surface
/// (OpenRouter, vLLM, LM Studio and friends).
///
/// Generation submits the full accumulated history on every call. The
/// bearer credential is optional since local compatible servers accept
/// unauthenticated requests.
#[derive(Clone)]
pub struct OpenAiProvider {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
    max_tokens: u32,
    temperature: f32,
    extra_params: serde_json::Map<String, serde_json::Value>,
    name: String,
}

impl OpenAiProvider {
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            client: Client::new(),
            api_key: settings.api_key,
            model: settings.model,
            base_url: settings.base_url,
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
            extra_params: settings.extra_params,
            name: "openai".to_string(),
        }
    }

    fn create_request_body(&self, messages: &[Message]) -> serde_json::Value {
        let mut body = json!({
            "model": self.model,
            "messages": convert_messages(messages),
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        });

        for (key, value) in &self.extra_params {
            body[key] = value.clone();
        }

        body
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.header("Authorization", format!("Bearer {}", key)),
            None => request,
        }
    }
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    async fn list_models(&self) -> Result<Vec<String>, ProviderError> {
        debug!("Fetching model list from {}", self.base_url);

        let request = self.client.get(format!("{}/models", self.base_url));
        let response = self
            .authorize(request)
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
                format!("OpenAI API error {}: {}", status, body),
            ));
        }

        let listing: ModelListResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::discovery_transport(&self.name, e))?;

        Ok(listing.data.into_iter().map(|m| m.id).collect())
    }

    async fn complete(&self, messages: &[Message]) -> Result<String, ProviderError> {
        debug!(
            "Sending chat completion request with {} messages: model={}",
            messages.len(),
            self.model
        );

        let body = self.create_request_body(messages);

        let request = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&body);
        let response = self
            .authorize(request)
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
                format!("OpenAI API error {}: {}", status, body),
            ));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::generation_transport(&self.name, e))?;

        // Empty or absent content is a valid (empty) reply, not an error.
        let content = completion
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default();

        Ok(content)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }
}

fn convert_messages(messages: &[Message]) -> Vec<serde_json::Value> {
    messages
        .iter()
        .map(|msg| {
            json!({
                "role": match msg.role {
                    MessageRole::System => "system",
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                },
                "content": msg.content,
            })
        })
        .collect()
}

// OpenAI API response structures
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelListResponse {
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
}
