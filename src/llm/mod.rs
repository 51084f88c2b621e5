//! LLM provider selection and client construction.
//!
//! Both supported providers speak the OpenAI chat API; Groq only differs by
//! base URL and key, so a single `async-openai` client covers them.

mod client;

pub use client::create_client;

use crate::config::LlmSettings;
use crate::error::{MaxchatError, Result};
use serde::{Deserialize, Serialize};

/// Supported chat-model providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Groq,
    OpenAI,
}

impl Provider {
    /// Models offered for this provider.
    pub fn models(&self) -> &[&str] {
        match self {
            Provider::Groq => &[
                "llama-3.1-70b-versatile",
                "gemma2-9b-it",
                "mixtral-8x7b-32768",
            ],
            Provider::OpenAI => &["gpt-4o-mini", "gpt-4o", "o1-preview", "o1-mini"],
        }
    }

    /// Default model when none is configured.
    pub fn default_model(&self) -> &str {
        self.models()[0]
    }

    /// Environment variable holding this provider's API key.
    pub fn env_var(&self) -> &'static str {
        match self {
            Provider::Groq => "GROQ_API_KEY",
            Provider::OpenAI => "OPENAI_API_KEY",
        }
    }

    /// Base URL override for OpenAI-compatible endpoints. None means the
    /// client default.
    pub fn api_base(&self) -> Option<&'static str> {
        match self {
            Provider::Groq => Some("https://api.groq.com/openai/v1"),
            Provider::OpenAI => None,
        }
    }
}

impl std::str::FromStr for Provider {
    type Err = MaxchatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "groq" => Ok(Provider::Groq),
            "openai" => Ok(Provider::OpenAI),
            _ => Err(MaxchatError::InvalidInput(format!(
                "unknown provider: {} (expected groq or openai)",
                s
            ))),
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Groq => write!(f, "groq"),
            Provider::OpenAI => write!(f, "openai"),
        }
    }
}

/// Resolve the API key for a provider.
///
/// Priority: explicitly passed key, then the configured key, then the
/// provider's environment variable. Blank values are treated as absent.
pub fn resolve_api_key(
    provider: Provider,
    explicit: Option<&str>,
    settings: &LlmSettings,
) -> Result<String> {
    let explicit = explicit.map(str::trim).filter(|k| !k.is_empty());
    if let Some(key) = explicit {
        return Ok(key.to_string());
    }

    if let Some(key) = settings.api_key_for(provider) {
        return Ok(key.to_string());
    }

    if let Ok(key) = std::env::var(provider.env_var()) {
        let key = key.trim().to_string();
        if !key.is_empty() {
            return Ok(key);
        }
    }

    Err(MaxchatError::MissingApiKey {
        provider: provider.to_string(),
        env_var: provider.env_var().to_string(),
    })
}
