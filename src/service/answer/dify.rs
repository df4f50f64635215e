//! Dify implementation of the answer client.
//!
//! Sends a blocking chat-message request and returns the `answer` field.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::base::types::Res;

use super::{AnswerClient, GenericAnswerClient};

// Extra methods on `AnswerClient` applied by the dify implementation.

impl AnswerClient {
    /// Creates a new Dify answer client.
    pub fn dify(api_url: &str, api_key: &str) -> Res<Self> {
        let client = DifyAnswerClient::new(api_url, api_key)?;
        Ok(Self { inner: Arc::new(client) })
    }
}

// Structs.

/// Request body of a Dify chat message.
#[derive(Debug, Serialize)]
struct DifyRequest<'a> {
    inputs: HashMap<String, String>,
    query: &'a str,
    response_mode: &'static str,
    user: &'a str,
}

impl<'a> DifyRequest<'a> {
    fn blocking(query: &'a str, user: &'a str) -> Self {
        Self {
            inputs: HashMap::new(),
            query,
            response_mode: "blocking",
            user,
        }
    }
}

/// The parts of a Dify chat message response the bot uses.
#[derive(Debug, Deserialize)]
struct DifyResponse {
    answer: String,
    #[serde(default)]
    conversation_id: Option<String>,
}

/// Dify client implementation.
struct DifyAnswerClient {
    api_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl DifyAnswerClient {
    fn new(api_url: &str, api_key: &str) -> Res<Self> {
        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }
}

#[async_trait]
impl GenericAnswerClient for DifyAnswerClient {
    #[instrument(skip(self))]
    async fn answer(&self, query: &str, user_id: &str) -> Res<String> {
        let request = DifyRequest::blocking(query, user_id);

        let response = self.client.post(&self.api_url).bearer_auth(&self.api_key).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Dify returned {}: {}", status, body));
        }

        let response: DifyResponse = response.json().await?;

        debug!("Dify conversation ID: {:?}", response.conversation_id);

        Ok(response.answer)
    }
}

// Tests.
