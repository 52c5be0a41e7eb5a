//! HTTP client for the AI completion provider.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::CompletionSettings;
use crate::error::{BotError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// A source of completions for the relay. Implemented by [`CompletionClient`]
/// and by fakes in tests.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Map a prompt to a single completion, one round trip, no retry.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint. Cloning
/// shares the underlying connection pool.
#[derive(Clone)]
pub struct CompletionClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    settings: CompletionSettings,
}

impl CompletionClient {
    pub fn new(api_key: String, base_url: String, settings: CompletionSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            api_key,
            base_url,
            settings,
        })
    }

    /// Shut down the client. Consumes the handle so the connection pool is
    /// released once the last clone drops; a second call cannot be written.
    pub fn close(self) {
        debug!("Completion client closed");
    }
}

#[async_trait]
impl CompletionBackend for CompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        debug!("Sending completion request ({} chars)", prompt.len());

        let request = ChatRequest {
            model: &self.settings.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response: {e}"));
            return Err(BotError::Api { status, message });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| BotError::Response(e.to_string()))?;

        debug!("Received completion response");
        extract_reply(body)
    }
}

fn extract_reply(response: ChatResponse) -> Result<String> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| BotError::Response("no choices in response".to_string()))?;
    Ok(choice.message.content)
}
