//! CMS data API client.
//!
//! Orders are written with the mutations endpoint:
//!
//! ```text
//! POST https://<project>.api.sanity.io/v<version>/data/mutate/<dataset>?returnIds=true
//! Authorization: Bearer <token>
//!
//! {"mutations": [{"create": { "_type": "order", ... }}]}
//! ```
//!
//! The live API host is always used (never the CDN) since every call is a write.

use std::sync::Arc;

use async_trait::async_trait;
use marketplace_core::{OrderDocument, OrderId};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use super::{OrderStore, StoreError};
use crate::config::SanityConfig;

/// Client for the CMS data API.
#[derive(Clone)]
pub struct SanityClient {
    inner: Arc<SanityClientInner>,
}

struct SanityClientInner {
    client: reqwest::Client,
    mutate_url: Url,
}

impl SanityClient {
    /// Create a new data API client.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Config` if the project/dataset do not form a valid
    /// URL or the token is not a valid header value, and `StoreError::Http`
    /// if the HTTP client fails to build.
    pub fn new(config: &SanityConfig) -> Result<Self, StoreError> {
        Self::build(config, mutate_url(config)?)
    }

    /// Create a client that talks to `api_base` instead of the project's
    /// hosted API, e.g. a local proxy or a stand-in server.
    ///
    /// # Errors
    ///
    /// Same as [`SanityClient::new`].
    pub fn with_api_base(config: &SanityConfig, api_base: &Url) -> Result<Self, StoreError> {
        let path = format!("v{}/data/mutate/{}", config.api_version, config.dataset);
        let mut url = api_base
            .join(&path)
            .map_err(|e| StoreError::Config(format!("{api_base}{path}: {e}")))?;
        url.query_pairs_mut().append_pair("returnIds", "true");
        Self::build(config, url)
    }

    fn build(config: &SanityConfig, mutate_url: Url) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        let auth_value = format!("Bearer {}", config.token.expose_secret());
        let mut auth_header = HeaderValue::from_str(&auth_value)
            .map_err(|e| StoreError::Config(format!("Invalid token format: {e}")))?;
        auth_header.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_header);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(SanityClientInner {
                client,
                mutate_url,
            }),
        })
    }

    /// The mutations endpoint this client posts to.
    #[must_use]
    pub fn mutate_url(&self) -> &Url {
        &self.inner.mutate_url
    }
}

#[async_trait]
impl OrderStore for SanityClient {
    #[instrument(skip(self, order), fields(items = order.items.len()))]
    async fn create_order(&self, order: &OrderDocument) -> Result<OrderId, StoreError> {
        let body = MutationRequest {
            mutations: vec![Mutation { create: order }],
        };

        let response = self
            .inner
            .client
            .post(self.inner.mutate_url.clone())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "CMS returned non-success status"
            );
            return Err(StoreError::Api {
                status: status.as_u16(),
                message: api_error_message(&response_text),
            });
        }

        let order_id = parse_created_id(&response_text)?;
        debug!(order_id = %order_id, "Order document created");
        Ok(order_id)
    }
}

/// Build the mutations URL for a project and dataset.
fn mutate_url(config: &SanityConfig) -> Result<Url, StoreError> {
    let raw = format!(
        "https://{}.api.sanity.io/v{}/data/mutate/{}",
        config.project_id, config.api_version, config.dataset
    );
    let mut url = Url::parse(&raw).map_err(|e| StoreError::Config(format!("{raw}: {e}")))?;
    url.query_pairs_mut().append_pair("returnIds", "true");
    Ok(url)
}

/// Pull the ID of the created document out of a mutation response.
fn parse_created_id(body: &str) -> Result<OrderId, StoreError> {
    let response: MutationResponse = serde_json::from_str(body)?;
    response
        .results
        .into_iter()
        .next()
        .and_then(|result| result.id)
        .filter(|id| !id.is_empty())
        .map(OrderId::from)
        .ok_or(StoreError::MissingDocumentId)
}

/// Best-effort human message from an error body.
///
/// The API answers errors with `{"error": {"description": ...}}` or
/// `{"error": "...", "message": "..."}`; anything else is passed through.
fn api_error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.chars().take(200).collect();
    };

    let described = value
        .pointer("/error/description")
        .or_else(|| value.get("message"))
        .or_else(|| value.get("error"))
        .and_then(serde_json::Value::as_str);

    described.map_or_else(|| body.chars().take(200).collect(), str::to_owned)
}

#[derive(Serialize)]
struct MutationRequest<'a> {
    mutations: Vec<Mutation<'a>>,
}

#[derive(Serialize)]
struct Mutation<'a> {
    create: &'a OrderDocument,
}

#[derive(Debug, Deserialize)]
struct MutationResponse {
    #[serde(default)]
    results: Vec<MutationResult>,
}

#[derive(Debug, Deserialize)]
struct MutationResult {
    id: Option<String>,
}
