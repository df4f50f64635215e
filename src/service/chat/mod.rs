//! Chat service integration for greeter-bot.
//!
//! It defines the `GenericChatClient` trait that can be implemented for different
//! chat services, with a default implementation for Slack.

pub mod slack;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::{base::types::Void, interaction::listeners::Listeners};

// Traits.

/// Generic "chat" trait that clients must implement.
///
/// This trait defines the core functionality for interacting with chat platforms
/// like Slack.
#[async_trait]
pub trait GenericChatClient: Send + Sync + 'static {
    /// Get the bot user ID.
    ///
    /// Events authored by this user are never dispatched, so the bot does not
    /// answer itself.
    fn bot_user_id(&self) -> &str;

    /// Get the bot ID, if the platform assigns one.
    ///
    /// Messages posted under this bot ID are never dispatched either.
    fn bot_id(&self) -> Option<String>;

    /// Start the chat client listener.
    ///
    /// Connects to the platform, feeds every inbound event to `listeners`, and
    /// blocks until the connection is shut down.
    async fn start(&self, listeners: Listeners) -> Void;

    /// Send a message to a conversation.
    async fn send_message(&self, channel_id: &str, text: &str) -> Void;

    /// Send a message to a thread in a conversation.
    async fn send_thread_reply(&self, channel_id: &str, thread_ts: &str, text: &str) -> Void;
}

// Structs.

/// Chat client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<dyn GenericChatClient>,
}

impl Deref for ChatClient {
    type Target = dyn GenericChatClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl ChatClient {
    pub fn new(inner: Arc<dyn GenericChatClient>) -> Self {
        Self { inner }
    }
}
