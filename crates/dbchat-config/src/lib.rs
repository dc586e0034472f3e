use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;


/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub llm: LlmConfig,
}

/// LLM connection settings, one provider at a time.
///
/// `provider` takes "ollama", "openai", "openai-compatible", or
/// "anthropic". Base URLs default per provider when omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Provider-specific knobs merged verbatim into generation requests
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub extra_params: serde_json::Map<String, serde_json::Value>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            base_url: None,
            api_key: None,
            model: None,
            max_tokens: None,
            temperature: None,
            extra_params: serde_json::Map::new(),
        }
    }
}

/// Raised by the configuration step, before any provider is built.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config file {path}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown provider '{0}' (expected ollama, openai, openai-compatible, or anthropic)")]
    UnknownProvider(String),

    #[error("API key is required for provider '{0}'")]
    MissingApiKey(String),

    #[error("base URL is required for provider '{0}'")]
    MissingBaseUrl(String),

    #[error("model is required")]
    MissingModel,
}

const KNOWN_PROVIDERS: [&str; 4] = ["ollama", "openai", "openai-compatible", "anthropic"];

const DEFAULT_PATHS: [&str; 3] = [
    "./dbchat.toml",
    "~/.config/dbchat/config.toml",
    "~/.dbchat.toml",
];

impl LlmConfig {
    /// The configured base URL, falling back to the provider's well-known
    /// default when omitted.
    pub fn effective_base_url(&self) -> Option<String> {
        if let Some(url) = &self.base_url {
            if !url.trim().is_empty() {
                return Some(url.trim_end_matches('/').to_string());
            }
        }
        match self.provider.as_str() {
            "ollama" => Some("http://localhost:11434".to_string()),
            "openai" => Some("https://api.openai.com/v1".to_string()),
            "anthropic" => Some("https://api.anthropic.com/v1".to_string()),
            _ => None,
        }
    }

    /// Check that everything the chosen provider needs is present.
    ///
    /// Ollama is the only provider that runs without a credential; every
    /// other kind refuses to start without one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !KNOWN_PROVIDERS.contains(&self.provider.as_str()) {
            return Err(ConfigError::UnknownProvider(self.provider.clone()));
        }

        if self.effective_base_url().is_none() {
            return Err(ConfigError::MissingBaseUrl(self.provider.clone()));
        }

        if self.provider != "ollama"
            && !self
                .api_key
                .as_deref()
                .is_some_and(|key| !key.trim().is_empty())
        {
            return Err(ConfigError::MissingApiKey(self.provider.clone()));
        }

        if !self
            .model
            .as_deref()
            .is_some_and(|model| !model.trim().is_empty())
        {
            return Err(ConfigError::MissingModel);
        }

        Ok(())
    }
}

impl Config {
    pub fn load(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let path_to_load = if let Some(path) = config_path {
            Some(path.to_string())
        } else {
            DEFAULT_PATHS.iter().find_map(|path| {
                let expanded = shellexpand::tilde(path);
                if Path::new(expanded.as_ref()).exists() {
                    Some(expanded.to_string())
                } else {
                    None
                }
            })
        };

        let Some(path) = path_to_load else {
            // First run: persist a default config so the user has a file
            // to edit, then hand back the defaults.
            let default_config = Self::default();
            default_config.save_default_location();
            return Ok(default_config);
        };

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse { path, source })
    }

    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    fn save_default_location(&self) {
        let config_dir = dirs::home_dir()
            .map(|mut path| {
                path.push(".config");
                path.push("dbchat");
                path
            })
            .unwrap_or_else(|| std::path::PathBuf::from("."));

        std::fs::create_dir_all(&config_dir).ok();

        let config_file = config_dir.join("config.toml");
        if let Some(path) = config_file.to_str() {
            if let Err(e) = self.save(path) {
                eprintln!("Warning: Could not save default config: {}", e);
            }
        }
    }
}
