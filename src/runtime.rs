//! Runtime services and shared state for the greeter-bot.

use tracing::{info, instrument};

use crate::{
    base::{
        config::Config,
        types::{InboundEvent, Res, Void},
    },
    interaction::{greetings, listeners::Listeners},
    service::{answer::AnswerClient, chat::ChatClient},
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the chat client, the registered listeners, and configuration.
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The chat client instance.
    pub chat: ChatClient,
    /// The listeners events are dispatched to.
    pub listeners: Listeners,
}

impl Runtime {
    /// Create a new runtime instance.
    #[instrument(skip_all)]
    pub async fn new(config: Config) -> Res<Self> {
        // Initialize the answer client, if configured.
        let answer = AnswerClient::from_config(&config)?;

        if answer.is_some() {
            info!("Relaying mentions to Dify.");
        }

        // Initialize the slack client.
        let chat = ChatClient::slack(&config).await?;

        Ok(Self::with_clients(config, chat, answer))
    }

    /// Create a runtime around existing clients, registering the greeting listeners.
    pub fn with_clients(config: Config, chat: ChatClient, answer: Option<AnswerClient>) -> Self {
        let listeners = greetings::listeners(&config, answer);

        Self { config, chat, listeners }
    }

    /// Dispatch a single event to the registered listeners.
    ///
    /// Returns whether a listener handled it.
    pub async fn dispatch(&self, event: InboundEvent) -> Res<bool> {
        self.listeners.dispatch(event, &self.chat).await
    }

    /// Start listening; blocks until the chat client shuts down.
    pub async fn start(&self) -> Void {
        self.chat.start(self.listeners.clone()).await
    }
}
