//! Configuration settings for Maxchat.

use crate::llm::Provider;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub llm: LlmSettings,
    pub youtube: YoutubeSettings,
    pub site: SiteSettings,
    pub chat: ChatSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// LLM provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Provider to use (groq, openai).
    pub provider: Provider,
    /// Model override. None picks the provider's default model.
    pub model: Option<String>,
    /// Groq API key. Falls back to the GROQ_API_KEY environment variable.
    pub groq_api_key: Option<String>,
    /// OpenAI API key. Falls back to the OPENAI_API_KEY environment variable.
    pub openai_api_key: Option<String>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: Provider::Groq,
            model: None,
            groq_api_key: None,
            openai_api_key: None,
        }
    }
}

impl LlmSettings {
    /// Configured key for the given provider, if any.
    pub fn api_key_for(&self, provider: Provider) -> Option<&str> {
        let key = match provider {
            Provider::Groq => self.groq_api_key.as_deref(),
            Provider::OpenAI => self.openai_api_key.as_deref(),
        };
        key.map(str::trim).filter(|k| !k.is_empty())
    }
}

/// YouTube transcript settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeSettings {
    /// Transcript language preference order.
    pub languages: Vec<String>,
}

impl Default for YoutubeSettings {
    fn default() -> Self {
        Self {
            languages: crate::youtube::DEFAULT_LANGUAGES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Web page loader settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    /// Fetch attempts before giving up.
    pub max_attempts: usize,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            timeout_secs: 20,
        }
    }
}

/// Chat session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    /// Maximum messages kept in conversation history (system prompt excluded).
    pub max_history: usize,
    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            max_history: 30,
            temperature: 0.7,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::MaxchatError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("maxchat")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let settings = Settings::default();
        assert_eq!(settings.llm.provider, Provider::Groq);
        assert_eq!(settings.youtube.languages, vec!["pt-BR", "pt", "en"]);
        assert_eq!(settings.site.max_attempts, 5);
        assert!(settings.chat.max_history > 0);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let settings: Settings =
            toml::from_str("[youtube]\nlanguages = [\"en\"]\n").unwrap();
        assert_eq!(settings.youtube.languages, vec!["en"]);
        assert_eq!(settings.site.max_attempts, 5);
    }

    #[test]
    fn blank_api_key_is_ignored() {
        let mut settings = LlmSettings::default();
        settings.groq_api_key = Some("   ".to_string());
        assert!(settings.api_key_for(Provider::Groq).is_none());
        settings.groq_api_key = Some(" gsk_abc ".to_string());
        assert_eq!(settings.api_key_for(Provider::Groq), Some("gsk_abc"));
    }

    #[test]
    fn settings_round_trip_through_toml() {
        let settings = Settings::default();
        let serialized = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.youtube.languages, settings.youtube.languages);
        assert_eq!(parsed.chat.max_history, settings.chat.max_history);
    }
}
