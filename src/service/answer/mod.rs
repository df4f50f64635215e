//! Answer service integration for greeter-bot.
//!
//! An answer service turns a user's question into a reply. When one is configured,
//! mentions of the bot are relayed to it instead of getting the fixed mention reply.

pub mod dify;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::{config::Config, types::Res};

// Traits.

/// Generic answer client trait that clients must implement.
#[async_trait]
pub trait GenericAnswerClient: Send + Sync + 'static {
    /// Ask the service `query` on behalf of `user_id` and return its answer.
    async fn answer(&self, query: &str, user_id: &str) -> Res<String>;
}

// Structs.

/// Answer client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct AnswerClient {
    inner: Arc<dyn GenericAnswerClient>,
}

impl Deref for AnswerClient {
    type Target = dyn GenericAnswerClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl AnswerClient {
    pub fn new(inner: Arc<dyn GenericAnswerClient>) -> Self {
        Self { inner }
    }

    /// Builds the configured answer client, if any.
    pub fn from_config(config: &Config) -> Res<Option<Self>> {
        match (&config.dify_api_url, &config.dify_api_key) {
            (Some(url), Some(key)) if config.dify_enabled() => Ok(Some(Self::dify(url.trim(), key.trim())?)),
            _ => Ok(None),
        }
    }
}
