//! Slack implementation of the chat client.
//!
//! This module connects to Slack through socket mode, converts push events into
//! [`InboundEvent`]s, and posts replies through the Web API.

use crate::{
    base::{
        config::Config,
        types::{InboundEvent, MentionEvent, MessageEvent, Res, Void},
    },
    interaction::{self, listeners::Listeners},
};
use async_trait::async_trait;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use slack_morphism::prelude::*;
use tracing::{debug, info, instrument};

use std::{ops::Deref, sync::Arc};

use super::{ChatClient, GenericChatClient};

// Type aliases.

type FullClient = slack_morphism::SlackClient<SlackClientHyperConnector<HttpsConnector<HttpConnector>>>;

// Extra methods on `ChatClient` applied by the slack implementation.

impl ChatClient {
    /// Creates a new Slack chat client.
    pub async fn slack(config: &Config) -> Res<Self> {
        let client = SlackChatClient::new(config).await?;
        Ok(Self { inner: Arc::new(client) })
    }
}

impl From<SlackChatClient> for ChatClient {
    fn from(client: SlackChatClient) -> Self {
        Self { inner: Arc::new(client) }
    }
}

// Structs.

/// User state for the slack socket client.
struct SlackUserState {
    listeners: Listeners,
    chat: ChatClient,
}

/// Slack client implementation.
#[derive(Clone)]
struct SlackChatClient {
    pub app_token: SlackApiToken,
    pub bot_token: SlackApiToken,
    pub bot_user_id: String,
    pub bot_id: Option<String>,
    pub client: Arc<FullClient>,
}

impl Deref for SlackChatClient {
    type Target = FullClient;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

impl SlackChatClient {
    /// Create a new Slack chat client.
    #[instrument(name = "SlackChatClient::new", skip_all)]
    pub async fn new(config: &Config) -> Res<Self> {
        // Initialize tokens.

        let app_token = SlackApiToken::new(SlackApiTokenValue(config.slack_app_token.clone()));
        let bot_token = SlackApiToken::new(SlackApiTokenValue(config.slack_bot_token.clone()));

        // Initialize the Slack client.

        let https_connector = HttpsConnector::<HttpConnector>::builder().with_native_roots()?.https_only().enable_all_versions().build();
        let connector = SlackClientHyperConnector::with_connector(https_connector);
        let client = Arc::new(slack_morphism::SlackClient::new(connector));

        // Get the bot's user ID (this also verifies the bot token).

        let session = client.open_session(&bot_token);
        let bot_user = session.auth_test().await?;
        let bot_user_id = bot_user.user_id.0;
        let bot_id = bot_user.bot_id.map(|b| b.0);

        info!("Slack bot user ID: {} (bot ID: {:?})", bot_user_id, bot_id);

        Ok(Self {
            app_token,
            bot_token,
            bot_user_id,
            bot_id,
            client,
        })
    }
}

#[async_trait]
impl GenericChatClient for SlackChatClient {
    fn bot_user_id(&self) -> &str {
        &self.bot_user_id
    }

    fn bot_id(&self) -> Option<String> {
        self.bot_id.clone()
    }

    async fn start(&self, listeners: Listeners) -> Void {
        // Initialize the socket mode listener.

        let socket_mode_callbacks = SlackSocketModeListenerCallbacks::new().with_push_events(handle_push_event);

        // Initialize the socket mode listener environment.

        let listener_environment = Arc::new(SlackClientEventsListenerEnvironment::new(self.client.clone()).with_user_state(SlackUserState {
            listeners,
            chat: ChatClient::from(self.clone()),
        }));

        let socket_mode_listener = Arc::new(SlackClientSocketModeListener::new(
            &SlackClientSocketModeConfig::new(),
            listener_environment.clone(),
            socket_mode_callbacks,
        ));

        // Register the app token to listen for events.
        socket_mode_listener.listen_for(&self.app_token).await?;

        info!("Listening for Slack events ...");

        // Open the WS connections and wait for Ctrl-C to shutdown.
        socket_mode_listener.serve().await;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn send_message(&self, channel_id: &str, text: &str) -> Void {
        let message = SlackMessageContent::new().with_text(text.to_string());
        let request = SlackApiChatPostMessageRequest::new(SlackChannelId(channel_id.to_string()), message);

        let session = self.client.open_session(&self.bot_token);

        let _ = session.chat_post_message(&request).await.map_err(|e| anyhow::anyhow!("Failed to send message: {}", e))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn send_thread_reply(&self, channel_id: &str, thread_ts: &str, text: &str) -> Void {
        let message = SlackMessageContent::new().with_text(text.to_string());
        let request = SlackApiChatPostMessageRequest::new(SlackChannelId(channel_id.to_string()), message).with_thread_ts(SlackTs(thread_ts.to_string()));

        let session = self.client.open_session(&self.bot_token);

        let _ = session.chat_post_message(&request).await.map_err(|e| anyhow::anyhow!("Failed to send thread reply: {}", e))?;

        Ok(())
    }
}

// Conversions from Slack events.

/// Converts a Slack message event into an [`InboundEvent`].
fn message_event_from_slack(event: SlackMessageEvent) -> InboundEvent {
    let subtype = event
        .subtype
        .as_ref()
        .and_then(|s| serde_json::to_value(s).ok())
        .and_then(|v| v.as_str().map(str::to_owned));

    InboundEvent::Message(MessageEvent {
        user_id: event.sender.user.map(|u| u.0),
        text: event.content.and_then(|c| c.text).unwrap_or_default(),
        channel: event.origin.channel.map(|c| c.0).unwrap_or_default(),
        subtype,
        bot_id: event.sender.bot_id.map(|b| b.0),
        ts: Some(event.origin.ts.0),
        thread_ts: event.origin.thread_ts.map(|t| t.0),
    })
}

/// Converts a Slack app mention event into an [`InboundEvent`].
fn mention_event_from_slack(event: SlackAppMentionEvent) -> InboundEvent {
    InboundEvent::AppMention(MentionEvent {
        user_id: event.user.0,
        text: event.content.text.unwrap_or_default(),
        channel: event.channel.0,
        ts: Some(event.origin.ts.0),
        thread_ts: event.origin.thread_ts.map(|t| t.0),
    })
}

// Socket mode listener callbacks for Slack.

/// Handles push events from Slack.
#[instrument(skip_all)]
async fn handle_push_event(event_callback: SlackPushEventCallback, _client: Arc<SlackHyperClient>, states: SlackClientEventsUserState) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let event = match event_callback.event {
        SlackEventCallbackBody::Message(slack_message_event) => {
            info!("Received message event ...");
            message_event_from_slack(slack_message_event)
        }
        SlackEventCallbackBody::AppMention(slack_app_mention_event) => {
            info!("Received app mention event ...");
            mention_event_from_slack(slack_app_mention_event)
        }
        _ => {
            debug!("Received unhandled push event.");
            return Ok(());
        }
    };

    let states = states.read().await;
    let user_state = states.get_user_state::<SlackUserState>().ok_or(anyhow::anyhow!("Failed to get user state"))?;

    interaction::inbound::handle_inbound_event(event, user_state.listeners.clone(), user_state.chat.clone());

    Ok(())
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::types::EventKind;

    #[test]
    fn converts_user_message() {
        let event: SlackMessageEvent = serde_json::from_value(serde_json::json!({
            "ts": "1700000000.000100",
            "channel": "C1",
            "user": "U1",
            "text": "hello world",
        }))
        .unwrap();

        let inbound = message_event_from_slack(event);

        assert_eq!(inbound.kind(), EventKind::Message);
        assert_eq!(inbound.user_id(), Some("U1"));
        assert_eq!(inbound.channel(), "C1");
        assert_eq!(inbound.text(), "hello world");
        assert_eq!(inbound.reply_thread_ts(), Some("1700000000.000100"));
    }

    #[test]
    fn converts_bot_message_subtype() {
        let event: SlackMessageEvent = serde_json::from_value(serde_json::json!({
            "ts": "1700000000.000200",
            "channel": "C1",
            "subtype": "bot_message",
            "bot_id": "B1",
            "text": "hello from a bot",
        }))
        .unwrap();

        let InboundEvent::Message(message) = message_event_from_slack(event) else {
            panic!("expected a message event");
        };

        assert_eq!(message.user_id, None);
        assert_eq!(message.bot_id.as_deref(), Some("B1"));
        assert_eq!(message.subtype.as_deref(), Some("bot_message"));
        assert!(message.is_posted_message());
    }
}
