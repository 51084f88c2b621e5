//! Configuration management.

mod prompts;
mod settings;

pub use prompts::{ChatPrompts, Prompts};
pub use settings::{
    ChatSettings, GeneralSettings, LlmSettings, PromptSettings, Settings, SiteSettings,
    YoutubeSettings,
};
