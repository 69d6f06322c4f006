//! OpenAI-compatible endpoint constructors.
//!
//! These share the request format and differ only in base URL.

use crate::OpenAiProvider;

/// OpenAI API
/// https://platform.openai.com/docs/api-reference/chat
pub fn openai(api_key: impl Into<String>) -> OpenAiProvider {
    OpenAiProvider::new(api_key, "https://api.openai.com/v1")
}

/// Ollama local API - OpenAI compatible
/// Default: http://localhost:11434/v1
pub fn ollama() -> OpenAiProvider {
    ollama_with_base("http://localhost:11434/v1")
}

/// Ollama with custom base URL
pub fn ollama_with_base(base_url: impl Into<String>) -> OpenAiProvider {
    // Ollama doesn't require an API key, but the header needs a value
    OpenAiProvider::new("ollama", base_url)
}

/// Custom OpenAI-compatible endpoint
pub fn custom(api_key: impl Into<String>, base_url: impl Into<String>) -> OpenAiProvider {
    OpenAiProvider::new(api_key, base_url)
}
