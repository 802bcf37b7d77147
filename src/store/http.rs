//! Store backed by the portfolio content REST API.
//!
//! Routes per collection endpoint:
//! - `GET    {base}/{endpoint}` list
//! - `GET    {base}/{endpoint}/{id}` read
//! - `POST   {base}/{endpoint}` create
//! - `PUT    {base}/{endpoint}/{id}` full replace
//! - `DELETE {base}/{endpoint}/{id}` delete
//!
//! Responses may be bare JSON or wrapped as `{ "data": ... }`.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{OrderedStore, StoreError};
use crate::collection::{Collection, Endpoints};
use crate::order::{NewItem, OrderableItem};

/// Default request timeout for API calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Response bodies longer than this are cut in error messages.
const MAX_ERROR_BODY_CHARS: usize = 500;

#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Bare(T),
    Wrapped { data: T },
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Bare(inner) | Envelope::Wrapped { data: inner } => inner,
        }
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, StoreError> {
    Ok(serde_json::from_str::<Envelope<T>>(body)?.into_inner())
}

fn truncate_body(body: String) -> String {
    if body.chars().count() > MAX_ERROR_BODY_CHARS {
        let head: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
        format!("{head}... (truncated)")
    } else {
        body
    }
}

/// Read the body and turn non-2xx statuses into [`StoreError::Status`].
async fn read_body(response: Response, url: &str) -> Result<String, StoreError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(StoreError::Status {
            status: status.as_u16(),
            url: url.to_string(),
            body: truncate_body(body),
        });
    }
    Ok(body)
}

#[derive(Debug, Clone)]
pub struct HttpStore {
    client: Client,
    base_url: String,
    token: Option<String>,
    endpoints: Endpoints,
}

impl HttpStore {
    /// Build a store for the API at `base_url`.
    ///
    /// `token` is sent as a bearer credential on every request when present.
    pub fn new(
        base_url: &str,
        token: Option<String>,
        endpoints: Endpoints,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| StoreError::InvalidUrl(format!("{base_url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(StoreError::InvalidUrl(format!(
                "{base_url}: scheme must be http or https"
            )));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
            endpoints,
        })
    }

    /// Whether requests carry a bearer token. Blank tokens are never sent.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    #[must_use]
    pub fn collection_url(&self, collection: Collection) -> String {
        format!("{}/{}", self.base_url, self.endpoints.path(collection))
    }

    #[must_use]
    pub fn item_url(&self, collection: Collection, id: &str) -> String {
        format!("{}/{id}", self.collection_url(collection))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, url: &str) -> Result<String, StoreError> {
        let response = self.authorized(request).send().await?;
        read_body(response, url).await
    }
}

#[async_trait]
impl OrderedStore for HttpStore {
    async fn fetch_all(&self, collection: Collection) -> Result<Vec<OrderableItem>, StoreError> {
        let url = self.collection_url(collection);
        let body = self.send(self.client.get(&url), &url).await?;
        let items: Vec<OrderableItem> = decode(&body)?;
        debug!(collection = %collection, count = items.len(), "Fetched collection");
        Ok(items)
    }

    async fn fetch(&self, collection: Collection, id: &str) -> Result<OrderableItem, StoreError> {
        let url = self.item_url(collection, id);
        let body = self
            .send(self.client.get(&url), &url)
            .await
            .map_err(|e| e.or_not_found(collection, id))?;
        decode(&body)
    }

    async fn create(
        &self,
        collection: Collection,
        item: &NewItem,
    ) -> Result<OrderableItem, StoreError> {
        let url = self.collection_url(collection);
        let body = self.send(self.client.post(&url).json(item), &url).await?;
        decode(&body)
    }

    async fn replace(
        &self,
        collection: Collection,
        id: &str,
        item: &OrderableItem,
    ) -> Result<(), StoreError> {
        let url = self.item_url(collection, id);
        self.send(self.client.put(&url).json(item), &url)
            .await
            .map_err(|e| e.or_not_found(collection, id))?;
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        let url = self.item_url(collection, id);
        self.send(self.client.delete(&url), &url)
            .await
            .map_err(|e| e.or_not_found(collection, id))?;
        Ok(())
    }
}
