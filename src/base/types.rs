use serde::{Deserialize, Serialize};

pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

/// Message subtypes that represent an actual posted message.
///
/// Anything else (edits, deletions, joins, topic changes, ...) is housekeeping
/// and never triggers a message listener.
const POSTED_MESSAGE_SUBTYPES: [&str; 3] = ["bot_message", "file_share", "thread_broadcast"];

/// The kind of an inbound event, used by event triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Message,
    AppMention,
}

/// A chat message posted in a conversation the bot can see.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEvent {
    /// The author's user ID; some bot messages carry none.
    #[serde(rename = "user", default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub bot_id: Option<String>,
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub thread_ts: Option<String>,
}

impl MessageEvent {
    /// Whether this event is a real posted message rather than housekeeping.
    pub fn is_posted_message(&self) -> bool {
        match self.subtype.as_deref() {
            None => true,
            Some(subtype) => POSTED_MESSAGE_SUBTYPES.contains(&subtype),
        }
    }
}

/// A message that mentions the bot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionEvent {
    #[serde(rename = "user")]
    pub user_id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub thread_ts: Option<String>,
}

/// An event delivered by the chat platform.
///
/// Events are transient: they live for the duration of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundEvent {
    Message(MessageEvent),
    AppMention(MentionEvent),
}

impl InboundEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            InboundEvent::Message(_) => EventKind::Message,
            InboundEvent::AppMention(_) => EventKind::AppMention,
        }
    }

    /// The triggering user's ID, if the event carries one.
    pub fn user_id(&self) -> Option<&str> {
        match self {
            InboundEvent::Message(m) => m.user_id.as_deref(),
            InboundEvent::AppMention(m) => Some(m.user_id.as_str()),
        }
    }

    /// The conversation the event originated from.
    pub fn channel(&self) -> &str {
        match self {
            InboundEvent::Message(m) => &m.channel,
            InboundEvent::AppMention(m) => &m.channel,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            InboundEvent::Message(m) => &m.text,
            InboundEvent::AppMention(m) => &m.text,
        }
    }

    /// The bot that posted the event, if any.
    pub fn bot_id(&self) -> Option<&str> {
        match self {
            InboundEvent::Message(m) => m.bot_id.as_deref(),
            InboundEvent::AppMention(_) => None,
        }
    }

    /// The thread a reply to this event belongs in: the event's own thread, or a new
    /// thread rooted at the event.
    pub fn reply_thread_ts(&self) -> Option<&str> {
        let (thread_ts, ts) = match self {
            InboundEvent::Message(m) => (&m.thread_ts, &m.ts),
            InboundEvent::AppMention(m) => (&m.thread_ts, &m.ts),
        };

        thread_ts.as_deref().or(ts.as_deref())
    }
}

// Tests.
