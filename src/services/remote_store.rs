//! Remote bookmark store.
//!
//! Wire contract:
//! - `POST {api}/s` creates a store; the `Location` header carries its id.
//! - `GET {api}/s/{id}` returns `{ "bookmarks": [...] }` (field absent for a
//!   never-written store).
//! - `PUT {api}/s/{id}` replaces the whole document.
//!
//! Any non-2xx answer is a transport failure. The document is replaced
//! without a concurrency token, so two writers can overwrite each other.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::LOCATION;
use reqwest::{Client, Response};
use tracing::debug;

use crate::types::errors::StoreError;
use crate::types::sync::StoreDocument;

/// Create/fetch/replace access to the shared store document.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Creates an empty store and returns its id.
    async fn create_store(&self, api_url: &str) -> Result<String, StoreError>;
    async fn fetch_store(&self, api_url: &str, store_id: &str) -> Result<StoreDocument, StoreError>;
    async fn update_store(
        &self,
        api_url: &str,
        store_id: &str,
        document: &StoreDocument,
    ) -> Result<(), StoreError>;
}

/// `RemoteStore` over HTTP.
#[derive(Clone)]
pub struct HttpRemoteStore {
    client: Client,
}

impl HttpRemoteStore {
    /// Builds a client with no request timeout.
    pub fn new() -> Result<Self, StoreError> {
        Self::build(None)
    }

    /// Builds a client that gives up on any request after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, StoreError> {
        Self::build(Some(timeout))
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    fn build(timeout: Option<Duration>) -> Result<Self, StoreError> {
        let mut builder = Client::builder().user_agent(concat!("marksync/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| StoreError::Transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn create_store(&self, api_url: &str) -> Result<String, StoreError> {
        let url = format!("{}/s", base(api_url));
        debug!(%url, "Creating store");
        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| StoreError::transport("create", e))?;
        let response = ensure_success(response, "create")?;

        let location = response
            .headers()
            .get(LOCATION)
            .ok_or_else(|| StoreError::unexpected("create", "response has no Location header"))?
            .to_str()
            .map_err(|e| StoreError::unexpected("create", e))?;
        store_id_from_location(location)
    }

    async fn fetch_store(&self, api_url: &str, store_id: &str) -> Result<StoreDocument, StoreError> {
        let url = format!("{}/s/{}", base(api_url), store_id);
        debug!(%url, "Fetching store");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| StoreError::transport("fetch", e))?;
        let body = ensure_success(response, "fetch")?
            .text()
            .await
            .map_err(|e| StoreError::transport("fetch", e))?;
        parse_document(&body)
    }

    async fn update_store(
        &self,
        api_url: &str,
        store_id: &str,
        document: &StoreDocument,
    ) -> Result<(), StoreError> {
        let url = format!("{}/s/{}", base(api_url), store_id);
        debug!(%url, "Updating store");
        let response = self
            .client
            .put(&url)
            .json(document)
            .send()
            .await
            .map_err(|e| StoreError::transport("update", e))?;
        ensure_success(response, "update")?;
        Ok(())
    }
}

fn base(api_url: &str) -> &str {
    api_url.trim_end_matches('/')
}

fn ensure_success(response: Response, operation: &str) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let reason = status.canonical_reason().unwrap_or("");
    Err(StoreError::transport(
        operation,
        format!("{} {}", status.as_u16(), reason).trim_end(),
    ))
}

/// Decodes a fetched store body. A blank body counts as a never-written store.
pub fn parse_document(body: &str) -> Result<StoreDocument, StoreError> {
    if body.trim().is_empty() {
        return Ok(StoreDocument::default());
    }
    serde_json::from_str(body).map_err(|e| StoreError::unexpected("fetch", e))
}

/// Extracts the store id from a `Location` value.
///
/// The server may send the bare id or a path/URL ending in it; the last
/// non-empty path segment is used either way.
pub fn store_id_from_location(location: &str) -> Result<String, StoreError> {
    location
        .trim()
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .map(str::to_string)
        .ok_or_else(|| StoreError::unexpected("create", "empty Location header"))
}
