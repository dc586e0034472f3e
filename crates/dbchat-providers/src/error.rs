use thiserror::Error;

/// Failures surfaced by a provider. Nothing is caught-and-continued inside
/// the adapter; every failure carries its underlying transport cause where
/// one exists and is re-raised to the caller.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Model discovery failed: transport error, non-success status, or a
    /// response body that did not match the expected shape.
    #[error("{provider} model discovery failed: {message}")]
    Discovery {
        provider: String,
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// Completion failed: transport error, non-success status, or a
    /// response body that did not match the expected shape.
    #[error("{provider} generation failed: {message}")]
    Generation {
        provider: String,
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },
}

impl ProviderError {
    pub fn discovery(provider: &str, message: impl Into<String>) -> Self {
        Self::Discovery {
            provider: provider.to_string(),
            message: message.into(),
            source: None,
        }
    }

    pub fn discovery_transport(provider: &str, source: reqwest::Error) -> Self {
        Self::Discovery {
            provider: provider.to_string(),
            message: source.to_string(),
            source: Some(source),
        }
    }

    pub fn generation(provider: &str, message: impl Into<String>) -> Self {
        Self::Generation {
            provider: provider.to_string(),
            message: message.into(),
            source: None,
        }
    }

    pub fn generation_transport(provider: &str, source: reqwest::Error) -> Self {
        Self::Generation {
            provider: provider.to_string(),
            message: source.to_string(),
            source: Some(source),
        }
    }

    pub fn is_discovery(&self) -> bool {
        matches!(self, Self::Discovery { .. })
    }

    pub fn is_generation(&self) -> bool {
        matches!(self, Self::Generation { .. })
    }
}
