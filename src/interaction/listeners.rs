//! Listener registry and dispatcher.
//!
//! Listeners are `(Trigger, Handler)` pairs kept in registration order. For each
//! inbound event the dispatcher invokes the first listener whose trigger matches.

use std::{future::Future, sync::Arc};

use futures::{FutureExt, future::BoxFuture};
use tracing::{debug, error, instrument};

use crate::{
    base::types::{EventKind, InboundEvent, Res, Void},
    interaction::say::Say,
    service::chat::ChatClient,
};

// Types.

pub type BoxedHandler = Arc<dyn Fn(InboundEvent, Say) -> BoxFuture<'static, Void> + Send + Sync>;

/// The condition under which a listener fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// A posted message whose text contains the keyword (case-sensitive).
    MessageContains(String),
    /// Any event of the given kind.
    Event(EventKind),
}

impl Trigger {
    pub fn matches(&self, event: &InboundEvent) -> bool {
        match (self, event) {
            (Trigger::MessageContains(keyword), InboundEvent::Message(message)) => message.is_posted_message() && message.text.contains(keyword.as_str()),
            (Trigger::MessageContains(_), _) => false,
            (Trigger::Event(kind), event) => event.kind() == *kind,
        }
    }
}

/// A registered trigger and the handler it fires.
#[derive(Clone)]
pub struct Listener {
    pub trigger: Trigger,
    handler: BoxedHandler,
}

/// Ordered set of listeners.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone, Default)]
pub struct Listeners {
    entries: Vec<Listener>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` to run whenever `trigger` matches.
    pub fn on<F, Fut>(&mut self, trigger: Trigger, handler: F) -> &mut Self
    where
        F: Fn(InboundEvent, Say) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Void> + Send + 'static,
    {
        let handler: BoxedHandler = Arc::new(move |event, say| handler(event, say).boxed());
        self.entries.push(Listener { trigger, handler });
        self
    }

    /// Registers `handler` for posted messages containing `keyword`.
    pub fn message<F, Fut>(&mut self, keyword: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(InboundEvent, Say) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Void> + Send + 'static,
    {
        self.on(Trigger::MessageContains(keyword.into()), handler)
    }

    /// Registers `handler` for every event of `kind`.
    pub fn event<F, Fut>(&mut self, kind: EventKind, handler: F) -> &mut Self
    where
        F: Fn(InboundEvent, Say) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Void> + Send + 'static,
    {
        self.on(Trigger::Event(kind), handler)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Listener> {
        self.entries.iter()
    }

    /// Dispatches `event` to the first matching listener, in registration order.
    ///
    /// Events authored by the bot itself (by user ID or bot ID) are skipped. Returns
    /// whether a handler was invoked, or the handler's failure.
    #[instrument(skip_all, fields(kind = ?event.kind()))]
    pub async fn dispatch(&self, event: InboundEvent, chat: &ChatClient) -> Res<bool> {
        if is_own_event(&event, chat) {
            debug!("Skipping event authored by the bot itself.");
            return Ok(false);
        }

        let Some(listener) = self.entries.iter().find(|l| l.trigger.matches(&event)) else {
            debug!("No listener matched.");
            return Ok(false);
        };

        debug!("Listener {:?} matched.", listener.trigger);

        let say = Say::new(chat.clone(), event.channel()).with_thread_ts(event.reply_thread_ts());

        (listener.handler)(event, say).await.inspect_err(|err| error!("Listener {:?} failed: {}", listener.trigger, err))?;

        Ok(true)
    }
}

/// Whether `event` was posted by the bot, under its user ID or its bot ID.
fn is_own_event(event: &InboundEvent, chat: &ChatClient) -> bool {
    let own_user = event.user_id().is_some_and(|user_id| user_id == chat.bot_user_id());
    let own_bot = event.bot_id().is_some_and(|bot_id| chat.bot_id().as_deref() == Some(bot_id));

    own_user || own_bot
}

// Tests.
