use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::{ChatProvider, Message, MessageRole, ProviderError, ProviderSettings};

/// Local model server speaking the Ollama HTTP protocol.
///
/// Discovery goes through `GET /api/tags`; generation goes through the raw
/// prompt endpoint `POST /api/generate` with `stream: false`, carrying only
/// the latest user message as the prompt. No auth.
#[derive(Clone)]
pub struct OllamaProvider {
    client: Client,
    model: String,
    base_url: String,
    name: String,
}

impl OllamaProvider {
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            client: Client::new(),
            model: settings.model,
            base_url: settings.base_url,
            name: "ollama".to_string(),
        }
    }
}

#[async_trait]
impl ChatProvider for OllamaProvider {
    async fn list_models(&self) -> Result<Vec<String>, ProviderError> {
        debug!("Fetching model tags from {}", self.base_url);

        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
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
                format!("Ollama API error {}: {}", status, body),
            ));
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::discovery_transport(&self.name, e))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    async fn complete(&self, messages: &[Message]) -> Result<String, ProviderError> {
        // The generate endpoint is prompt-based, not chat-based; only the
        // latest user turn goes over the wire.
        let prompt = messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.content.as_str())
            .ok_or_else(|| ProviderError::generation(&self.name, "no user message to send"))?;

        let body = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
        });

        debug!("Sending generate request to Ollama: model={}", self.model);

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
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
                format!("Ollama API error {}: {}", status, body),
            ));
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::generation_transport(&self.name, e))?;

        generated
            .response
            .ok_or_else(|| ProviderError::generation(&self.name, "response field missing from generate reply"))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// Ollama API response structures
#[derive(Debug, Deserialize)]
struct TagsResponse {
    models: Vec<TaggedModel>,
}

#[derive(Debug, Deserialize)]
struct TaggedModel {
    name: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}
