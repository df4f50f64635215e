//! The reply capability handed to every listener invocation.

use tracing::instrument;

use crate::{base::types::Void, service::chat::ChatClient};

/// Sends messages back into the conversation an event came from.
#[derive(Clone)]
pub struct Say {
    chat: ChatClient,
    channel_id: String,
    thread_ts: Option<String>,
}

impl Say {
    pub fn new(chat: ChatClient, channel_id: impl Into<String>) -> Self {
        Self {
            chat,
            channel_id: channel_id.into(),
            thread_ts: None,
        }
    }

    /// Sets the thread that [`Say::reply_in_thread`] posts to.
    pub fn with_thread_ts(mut self, thread_ts: Option<impl Into<String>>) -> Self {
        self.thread_ts = thread_ts.map(Into::into);
        self
    }

    /// The conversation replies are sent to.
    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    /// The bot's own user ID on the chat platform.
    pub fn bot_user_id(&self) -> &str {
        self.chat.bot_user_id()
    }

    /// Posts `text` to the conversation.
    #[instrument(skip_all)]
    pub async fn say(&self, text: &str) -> Void {
        self.chat.send_message(&self.channel_id, text).await
    }

    /// Posts `text` to the event's thread, or to the conversation if there is none.
    #[instrument(skip_all)]
    pub async fn reply_in_thread(&self, text: &str) -> Void {
        match &self.thread_ts {
            Some(thread_ts) => self.chat.send_thread_reply(&self.channel_id, thread_ts, text).await,
            None => self.say(text).await,
        }
    }
}
