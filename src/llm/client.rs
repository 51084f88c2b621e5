//! Chat client construction with sensible defaults.

use super::Provider;
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for chat API requests (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Create a chat client for the given provider and key.
///
/// Uses a 5-minute timeout to prevent hung API calls.
pub fn create_client(provider: Provider, api_key: &str) -> Client<OpenAIConfig> {
    create_client_with_timeout(provider, api_key, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
}

/// Create a chat client with a custom timeout.
pub fn create_client_with_timeout(
    provider: Provider,
    api_key: &str,
    timeout: Duration,
) -> Client<OpenAIConfig> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("Failed to create HTTP client");

    let mut config = OpenAIConfig::new().with_api_key(api_key);
    if let Some(base) = provider.api_base() {
        config = config.with_api_base(base);
    }

    Client::with_config(config).with_http_client(http_client)
}
