//! HTTP client for the REST message store.
//!
//! Talks to a store exposing `/messages` with the usual verbs:
//! `GET` lists, `POST` creates, `PUT /{id}` updates and `DELETE /{id}`
//! removes. Any non-2xx answer is treated as a failure.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::error::SyncError;
use super::store::MessageStore;
use crate::config::StoreConfig;
use crate::models::{Message, MessageId, MessageUpdate, NewMessage};

/// Store client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpMessageStore {
    base_url: String,
    client: Client,
}

impl HttpMessageStore {
    /// Creates a client from config.
    pub fn from_config(config: &StoreConfig) -> Result<Self, SyncError> {
        Self::new(&config.server_url, Duration::from_secs(config.timeout_secs))
    }

    /// Creates a client with an explicit base URL and per-request timeout.
    ///
    /// The base URL is the server root (e.g. `http://localhost:8000`);
    /// a trailing `/messages` is accepted as well.
    pub fn new(server_url: &str, timeout: Duration) -> Result<Self, SyncError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SyncError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: normalize_base_url(server_url),
            client,
        })
    }

    /// Returns the collection URL, e.g. `http://localhost:8000/messages`.
    pub fn collection_url(&self) -> String {
        format!("{}/messages", self.base_url)
    }

    fn item_url(&self, id: MessageId) -> String {
        format!("{}/messages/{}", self.base_url, id)
    }
}

fn normalize_base_url(server_url: &str) -> String {
    let trimmed = server_url.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix("/messages").unwrap_or(trimmed);

    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

/// Turns a response into its JSON body, or an error for non-2xx statuses.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, SyncError> {
    let status = response.status();
    if !status.is_success() {
        return Err(SyncError::Status(status));
    }

    Ok(response.json().await?)
}

#[async_trait]
impl MessageStore for HttpMessageStore {
    async fn list(&self) -> Result<Vec<Message>, SyncError> {
        let response = self.client.get(self.collection_url()).send().await?;
        read_json(response).await
    }

    async fn create(&self, message: &NewMessage) -> Result<Message, SyncError> {
        let response = self
            .client
            .post(self.collection_url())
            .json(message)
            .send()
            .await?;
        read_json(response).await
    }

    async fn delete(&self, id: MessageId) -> Result<Message, SyncError> {
        let response = self.client.delete(self.item_url(id)).send().await?;
        read_json(response).await
    }

    async fn update(&self, id: MessageId, update: &MessageUpdate) -> Result<Message, SyncError> {
        let response = self
            .client
            .put(self.item_url(id))
            .json(update)
            .send()
            .await?;
        read_json(response).await
    }
}
