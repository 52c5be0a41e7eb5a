//! Bridges inbound chat messages to the completion client.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, error, info, warn};
use poise::serenity_prelude::{ChannelId, Http};

use crate::completion::CompletionBackend;
use crate::error::Result;

/// Fixed fallback sent when delivering the real reply fails.
pub const APOLOGY: &str =
    "Sorry, I encountered an error processing your request. Please try again.";

/// Outbound side of a conversation: typing indicator plus message send.
#[async_trait]
pub trait OutboundChat: Send + Sync {
    async fn typing(&self) -> Result<()>;
    async fn send(&self, text: &str) -> Result<()>;
}

/// Chat handle for a Discord channel.
pub struct DiscordChat {
    http: Arc<Http>,
    channel_id: ChannelId,
}

impl DiscordChat {
    pub fn new(http: Arc<Http>, channel_id: ChannelId) -> Self {
        Self { http, channel_id }
    }
}

#[async_trait]
impl OutboundChat for DiscordChat {
    async fn typing(&self) -> Result<()> {
        self.channel_id.broadcast_typing(&self.http).await?;
        Ok(())
    }

    async fn send(&self, text: &str) -> Result<()> {
        self.channel_id.say(&self.http, text).await?;
        Ok(())
    }
}

/// Stateless relay from inbound text to an AI-backed reply. The completion
/// backend is injected at construction.
pub struct Relay<C> {
    client: C,
}

impl<C: CompletionBackend> Relay<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Handle one inbound text message. Sends exactly one reply back: the
    /// completion, its error rendered for the user, or the fixed apology if
    /// the send itself fails. Never returns an error to the dispatcher.
    pub async fn handle(&self, incoming_text: &str, chat: &dyn OutboundChat) {
        if let Err(e) = chat.typing().await {
            debug!("Failed to broadcast typing indicator: {}", e);
        }

        let reply = match self.client.complete(incoming_text).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Completion failed: {}", e);
                e.user_message()
            }
        };

        match chat.send(&reply).await {
            Ok(()) => info!("Replied with {} chars", reply.len()),
            Err(e) => {
                error!("Failed to send reply: {}", e);
                if let Err(e) = chat.send(APOLOGY).await {
                    error!("Failed to send fallback reply: {}", e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BotError;
    use std::sync::Mutex;

    struct FakeBackend {
        fail: bool,
    }

    #[async_trait]
    impl CompletionBackend for FakeBackend {
        async fn complete(&self, prompt: &str) -> Result<String> {
            if self.fail {
                Err(BotError::Response("no choices in response".to_string()))
            } else {
                Ok(format!("echo: {prompt}"))
            }
        }
    }

    struct RecordingChat {
        fail_sends: bool,
        attempts: Mutex<Vec<String>>,
    }

    impl RecordingChat {
        fn new(fail_sends: bool) -> Self {
            Self {
                fail_sends,
                attempts: Mutex::new(Vec::new()),
            }
        }

        fn attempts(&self) -> Vec<String> {
            self.attempts.lock().expect("lock").clone()
        }
    }

    #[async_trait]
    impl OutboundChat for RecordingChat {
        async fn typing(&self) -> Result<()> {
            Ok(())
        }

        async fn send(&self, text: &str) -> Result<()> {
            self.attempts.lock().expect("lock").push(text.to_string());
            if self.fail_sends {
                Err(BotError::Config("send unavailable".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn every_message_gets_exactly_one_reply() {
        let relay = Relay::new(FakeBackend { fail: false });
        let chat = RecordingChat::new(false);

        relay.handle("hi", &chat).await;

        assert_eq!(chat.attempts(), vec!["echo: hi".to_string()]);
    }

    #[tokio::test]
    async fn empty_message_still_gets_a_reply() {
        let relay = Relay::new(FakeBackend { fail: false });
        let chat = RecordingChat::new(false);

        relay.handle("", &chat).await;

        assert_eq!(chat.attempts(), vec!["echo: ".to_string()]);
    }

    #[tokio::test]
    async fn completion_error_is_rendered_for_the_user() {
        let relay = Relay::new(FakeBackend { fail: true });
        let chat = RecordingChat::new(false);

        relay.handle("hi", &chat).await;

        let attempts = chat.attempts();
        assert_eq!(attempts.len(), 1);
        assert!(attempts[0].starts_with("Processing Error:"));
    }

    #[tokio::test]
    async fn send_failure_falls_back_to_apology_without_escaping() {
        let relay = Relay::new(FakeBackend { fail: false });
        let chat = RecordingChat::new(true);

        relay.handle("hi", &chat).await;

        let attempts = chat.attempts();
        assert_eq!(attempts, vec!["echo: hi".to_string(), APOLOGY.to_string()]);
    }
}
