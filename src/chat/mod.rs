//! Document-grounded chat session.
//!
//! Holds the conversation memory and streams model output token-by-token.
//! The loaded document travels inside the system prompt, so every answer is
//! grounded in it without any retrieval machinery.

use crate::config::{ChatSettings, Prompts};
use crate::error::{MaxchatError, Result};
use crate::loader::Document;
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use futures::StreamExt;
use std::collections::HashMap;
use tracing::debug;

/// Build the system prompt for a loaded document.
pub fn build_system_prompt(prompts: &Prompts, kind: &str, document: &Document) -> String {
    let mut vars = HashMap::new();
    vars.insert("kind".to_string(), kind.to_string());
    vars.insert("document".to_string(), document.content.clone());
    prompts.render_with_custom(&prompts.chat.system, &vars)
}

/// Interactive chat session over one document.
pub struct ChatSession {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
    max_history: usize,
    messages: Vec<ChatCompletionRequestMessage>,
}

impl ChatSession {
    /// Create a new session with the given system prompt.
    pub fn new(
        client: async_openai::Client<async_openai::config::OpenAIConfig>,
        model: &str,
        system_prompt: &str,
        settings: &ChatSettings,
    ) -> Result<Self> {
        let system_message = ChatCompletionRequestSystemMessageArgs::default()
            .content(system_prompt)
            .build()
            .map_err(|e| MaxchatError::Chat(e.to_string()))?;

        Ok(Self {
            client,
            model: model.to_string(),
            temperature: settings.temperature,
            max_history: settings.max_history,
            messages: vec![system_message.into()],
        })
    }

    /// Clear conversation history (keeps system prompt).
    pub fn clear_history(&mut self) {
        self.messages.truncate(1);
    }

    /// Send a message and stream the response.
    ///
    /// `on_token` is invoked for each streamed content fragment as it
    /// arrives; the full answer is also returned and recorded in history.
    pub async fn send_message<F>(&mut self, user_input: &str, mut on_token: F) -> Result<String>
    where
        F: FnMut(&str),
    {
        let user_message = ChatCompletionRequestUserMessageArgs::default()
            .content(user_input)
            .build()
            .map_err(|e| MaxchatError::Chat(e.to_string()))?;
        self.messages.push(user_message.into());

        debug!("chat request: {} messages, model {}", self.messages.len(), self.model);

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(self.messages.clone())
            .temperature(self.temperature)
            .stream(true)
            .build()
            .map_err(|e| MaxchatError::Chat(e.to_string()))?;

        let mut stream = self
            .client
            .chat()
            .create_stream(request)
            .await
            .map_err(|e| MaxchatError::Llm(format!("Chat API error: {}", e)))?;

        let mut answer = String::new();
        while let Some(result) = stream.next().await {
            let response =
                result.map_err(|e| MaxchatError::Llm(format!("Stream error: {}", e)))?;
            for choice in &response.choices {
                if let Some(fragment) = &choice.delta.content {
                    on_token(fragment);
                    answer.push_str(fragment);
                }
            }
        }

        let assistant_message = ChatCompletionRequestAssistantMessageArgs::default()
            .content(answer.clone())
            .build()
            .map_err(|e| MaxchatError::Chat(e.to_string()))?;
        self.messages.push(assistant_message.into());

        self.trim_history();

        Ok(answer)
    }

    /// Number of messages in history, system prompt included.
    pub fn history_len(&self) -> usize {
        self.messages.len()
    }

    /// Keep the system message plus the most recent exchanges.
    fn trim_history(&mut self) {
        let cap = self.max_history + 1; // system message not counted
        if self.messages.len() > cap {
            let start = self.messages.len() - self.max_history;
            let mut trimmed = vec![self.messages[0].clone()];
            trimmed.extend(self.messages[start..].iter().cloned());
            self.messages = trimmed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChatSettings;
    use crate::llm::{create_client, Provider};
    use crate::loader::Document;

    fn session(max_history: usize) -> ChatSession {
        let settings = ChatSettings {
            max_history,
            temperature: 0.7,
        };
        ChatSession::new(
            create_client(Provider::Groq, "test-key"),
            "llama-3.1-70b-versatile",
            "system prompt",
            &settings,
        )
        .unwrap()
    }

    fn user_message(text: &str) -> ChatCompletionRequestMessage {
        ChatCompletionRequestUserMessageArgs::default()
            .content(text)
            .build()
            .unwrap()
            .into()
    }

    #[test]
    fn starts_with_only_the_system_message() {
        assert_eq!(session(10).history_len(), 1);
    }

    #[test]
    fn clear_keeps_system_message() {
        let mut chat = session(10);
        chat.messages.push(user_message("hello"));
        chat.messages.push(user_message("again"));
        chat.clear_history();
        assert_eq!(chat.history_len(), 1);
    }

    #[test]
    fn trim_keeps_system_plus_recent() {
        let mut chat = session(4);
        for i in 0..10 {
            chat.messages.push(user_message(&format!("msg {i}")));
        }
        chat.trim_history();
        assert_eq!(chat.history_len(), 5); // system + 4
    }

    #[test]
    fn trim_is_noop_under_cap() {
        let mut chat = session(10);
        chat.messages.push(user_message("only one"));
        chat.trim_history();
        assert_eq!(chat.history_len(), 2);
    }

    #[test]
    fn system_prompt_embeds_document_and_kind() {
        let prompts = Prompts::default();
        let doc = Document::new(
            "the entire transcript".to_string(),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string(),
            "youtube-captions",
        );
        let prompt = build_system_prompt(&prompts, "youtube", &doc);
        assert!(prompt.contains("a youtube document"));
        assert!(prompt.contains("the entire transcript"));
    }
}
