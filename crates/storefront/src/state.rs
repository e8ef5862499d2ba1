//! Application state shared across handlers.

use std::sync::Arc;

use crate::cms::{MemoryOrderStore, OrderStore, SanityClient, StoreError};
use crate::config::{OrderStoreKind, StorefrontConfig};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the configuration and the order store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    orders: Arc<dyn OrderStore>,
}

impl AppState {
    /// Create application state with an explicit order store.
    #[must_use]
    pub fn new(config: StorefrontConfig, orders: Arc<dyn OrderStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, orders }),
        }
    }

    /// Create application state with the store named in the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the CMS client cannot be built.
    pub fn from_config(config: StorefrontConfig) -> Result<Self, StoreError> {
        let orders: Arc<dyn OrderStore> = match (config.order_store, &config.sanity) {
            (OrderStoreKind::Sanity, Some(sanity)) => Arc::new(SanityClient::new(sanity)?),
            (OrderStoreKind::Sanity, None) => {
                return Err(StoreError::Config(
                    "ORDER_STORE=sanity requires CMS settings".to_string(),
                ));
            }
            (OrderStoreKind::Memory, _) => {
                tracing::warn!("Using in-memory order store; orders are lost on restart");
                Arc::new(MemoryOrderStore::new())
            }
        };

        Ok(Self::new(config, orders))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the order store.
    #[must_use]
    pub fn orders(&self) -> &dyn OrderStore {
        self.inner.orders.as_ref()
    }
}
