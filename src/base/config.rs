//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, path::Path, sync::Arc};

use anyhow::anyhow;
use serde::Deserialize;
use tracing::warn;

use crate::base::replies;

use super::types::Res;

/// Default path of the optional config file.
const DEFAULT_CONFIG_PATH: &str = ".hidden/config.toml";

/// Default keyword that triggers the hello listener.
fn default_greeting_keyword() -> String {
    replies::GREETING_KEYWORD.to_string()
}

/// Default reply for the hello listener.
fn default_hello_reply_template() -> String {
    replies::HELLO_REPLY_TEMPLATE.to_string()
}

/// Default reply for the mention listener.
fn default_mention_reply_template() -> String {
    replies::MENTION_REPLY_TEMPLATE.to_string()
}

/// Configuration for the greeter-bot application.
#[derive(Debug, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<ConfigInner> for Config {
    fn from(inner: ConfigInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConfigInner {
    /// Slack app-level token used to open the socket (`SLACK_APP_TOKEN`).
    #[serde(default)]
    pub slack_app_token: String,
    /// Slack bot token used for Web API calls (`SLACK_BOT_TOKEN`).
    #[serde(default)]
    pub slack_bot_token: String,
    /// Case-sensitive substring that triggers the hello reply (`GREETING_KEYWORD`).
    #[serde(default = "default_greeting_keyword")]
    pub greeting_keyword: String,
    /// Optional override of the hello reply (`HELLO_REPLY_TEMPLATE`).
    #[serde(default = "default_hello_reply_template")]
    pub hello_reply_template: String,
    /// Optional override of the mention reply (`MENTION_REPLY_TEMPLATE`).
    #[serde(default = "default_mention_reply_template")]
    pub mention_reply_template: String,
    /// Dify chat-messages endpoint that mentions are relayed to (`DIFY_API_URL`).
    #[serde(default)]
    pub dify_api_url: Option<String>,
    /// Dify API key (`DIFY_API_KEY`).
    #[serde(default)]
    pub dify_api_key: Option<String>,
}

impl ConfigInner {
    /// Whether mentions are relayed to Dify, i.e. both the URL and the key are set.
    pub fn dify_enabled(&self) -> bool {
        is_set(&self.dify_api_url) && is_set(&self.dify_api_key)
    }
}

fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

impl Config {
    /// Loads the configuration from the process environment, plus an optional TOML file.
    ///
    /// Environment variables take precedence over the file.
    pub fn load(explicit_path: Option<&Path>) -> Res<Self> {
        Self::load_from(explicit_path, config::Environment::default())
    }

    fn load_from(explicit_path: Option<&Path>, environment: config::Environment) -> Res<Self> {
        let mut cfg = config::Config::builder();

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
            cfg = cfg.add_source(config::File::with_name(DEFAULT_CONFIG_PATH));
        }

        cfg = cfg.add_source(environment);

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        result.validate()?;

        Ok(result)
    }

    fn validate(&self) -> Res<()> {
        if self.slack_bot_token.trim().is_empty() {
            return Err(anyhow!("SLACK_BOT_TOKEN is not set."));
        }

        if self.slack_app_token.trim().is_empty() {
            return Err(anyhow!("SLACK_APP_TOKEN is not set."));
        }

        if self.greeting_keyword.is_empty() {
            return Err(anyhow!("GREETING_KEYWORD must not be empty."));
        }

        if is_set(&self.dify_api_url) != is_set(&self.dify_api_key) {
            return Err(anyhow!("DIFY_API_URL and DIFY_API_KEY must be set together."));
        }

        if !self.slack_bot_token.starts_with("xoxb-") {
            warn!("SLACK_BOT_TOKEN does not look like a bot token (expected `xoxb-` prefix).");
        }

        if !self.slack_app_token.starts_with("xapp-") {
            warn!("SLACK_APP_TOKEN does not look like an app-level token (expected `xapp-` prefix).");
        }

        Ok(())
    }
}

// Tests.
