//! Document store clients for order persistence.
//!
//! # Architecture
//!
//! - The hosted CMS is the source of truth for orders. Nothing is cached or
//!   mirrored locally.
//! - Order creation goes through the [`OrderStore`] trait so the checkout
//!   pipeline can run against [`MemoryOrderStore`] in tests and local dev.
//! - [`SanityClient`] talks to the CMS data API with a single `create`
//!   mutation per order, so an order is either fully written or not at all.
//!
//! # Example
//!
//! ```rust,ignore
//! use marketplace_storefront::cms::{OrderStore, SanityClient};
//!
//! let client = SanityClient::new(&config.sanity)?;
//! let order_id = client.create_order(&document).await?;
//! ```

mod memory;
mod sanity;

pub use memory::MemoryOrderStore;
pub use sanity::SanityClient;

use async_trait::async_trait;
use marketplace_core::{OrderDocument, OrderId};
use thiserror::Error;

/// Errors that can occur when talking to the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed (connection refused, DNS, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The response body was not what the API documents.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The mutation succeeded but no document ID came back.
    #[error("Store did not return a document ID")]
    MissingDocumentId,

    /// The store is not accepting writes.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Client could not be constructed from configuration.
    #[error("Invalid store configuration: {0}")]
    Config(String),
}

/// The one capability checkout needs from the document store.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Create a new order document and return its ID.
    ///
    /// Implementations must create the document in a single atomic call.
    async fn create_order(&self, order: &OrderDocument) -> Result<OrderId, StoreError>;
}
