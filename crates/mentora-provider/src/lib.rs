pub mod openai;
pub mod openai_compat;
pub mod types;

use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use openai::{OpenAiProvider, ProviderErrorKind};
pub use openai_compat::{custom, ollama, ollama_with_base, openai};
pub use types::*;

/// Chat-completion collaborator boundary. One attempt per call, no retry;
/// timeout policy belongs to the client behind the implementation.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn chat(&self, request: ChatRequest) -> Result<ChatReply>;

    async fn health(&self) -> Result<()> {
        Ok(())
    }
}

// ============================================================
// Provider Configuration
// ============================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    OpenAI,
    Ollama,
    /// Custom OpenAI-compatible endpoint
    Custom,
}

/// Configuration for the chat collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(rename = "type")]
    pub provider_type: ProviderType,
    /// Model id sent on every request
    #[serde(default = "default_model")]
    pub model: String,
    /// API key (optional for Ollama; falls back to env)
    #[serde(default)]
    pub api_key: Option<String>,
    /// Custom base URL (optional, uses the provider type's default)
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: ProviderType::OpenAI,
            model: default_model(),
            api_key: None,
            base_url: None,
            max_tokens: default_max_tokens(),
        }
    }
}

impl ProviderConfig {
    /// Configured key, or the host's secret mechanism (env) as fallback.
    fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("MENTORA_API_KEY").ok())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
    }
}

/// Create a provider from configuration.
pub fn create_provider(config: &ProviderConfig) -> Result<Arc<dyn ChatProvider>> {
    let provider: Arc<dyn ChatProvider> = match config.provider_type {
        ProviderType::OpenAI => {
            let key = config
                .resolve_api_key()
                .ok_or_else(|| anyhow!("openai requires api_key (config or MENTORA_API_KEY)"))?;
            match &config.base_url {
                Some(base) => Arc::new(custom(key, base.clone())),
                None => Arc::new(openai(key)),
            }
        }
        ProviderType::Ollama => {
            let base_url = config.base_url.as_deref().unwrap_or("http://localhost:11434/v1");
            Arc::new(ollama_with_base(base_url))
        }
        ProviderType::Custom => {
            let key = config
                .resolve_api_key()
                .ok_or_else(|| anyhow!("custom provider requires api_key"))?;
            let base_url = config
                .base_url
                .as_ref()
                .ok_or_else(|| anyhow!("custom provider requires base_url"))?;
            Arc::new(custom(key, base_url.clone()))
        }
    };
    tracing::info!(model = %config.model, "chat provider configured");
    Ok(provider)
}
