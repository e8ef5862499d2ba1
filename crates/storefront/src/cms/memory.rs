//! In-process order store.
//!
//! Keeps created documents in memory. Used by tests and by local development
//! with `ORDER_STORE=memory`. The store can be put into outage mode to
//! exercise the endpoint's failure path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use marketplace_core::{OrderDocument, OrderId};
use uuid::Uuid;

use super::{OrderStore, StoreError};

/// An [`OrderStore`] backed by a `Vec`.
#[derive(Clone, Default)]
pub struct MemoryOrderStore {
    inner: Arc<MemoryOrderStoreInner>,
}

#[derive(Default)]
struct MemoryOrderStoreInner {
    orders: Mutex<Vec<(OrderId, OrderDocument)>>,
    outage: AtomicBool,
}

impl MemoryOrderStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `create_order` fail (or succeed again).
    pub fn set_outage(&self, down: bool) {
        self.inner.outage.store(down, Ordering::SeqCst);
    }

    /// Snapshot of every created order, oldest first.
    #[must_use]
    pub fn orders(&self) -> Vec<(OrderId, OrderDocument)> {
        self.inner
            .orders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Look up a created order by ID.
    #[must_use]
    pub fn get(&self, id: &OrderId) -> Option<OrderDocument> {
        self.inner
            .orders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|(order_id, _)| order_id == id)
            .map(|(_, doc)| doc.clone())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .orders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn create_order(&self, order: &OrderDocument) -> Result<OrderId, StoreError> {
        if self.inner.outage.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }

        let id = OrderId::new(Uuid::new_v4().simple().to_string());
        self.inner
            .orders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id.clone(), order.clone()));
        Ok(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use marketplace_core::{CartItem, CheckoutFormData, CheckoutRequest, Price};

    use super::*;

    fn document() -> OrderDocument {
        OrderDocument::new_pending(CheckoutRequest {
            buyer: CheckoutFormData::default(),
            cart: vec![CartItem::new("p1", "Widget", 1, Price::whole(3))],
            total_price: Price::whole(3),
        })
    }

    #[tokio::test]
    async fn test_create_assigns_distinct_ids() {
        let store = MemoryOrderStore::new();
        let a = store.create_order(&document()).await.unwrap();
        let b = store.create_order(&document()).await.unwrap();

        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
        assert!(store.get(&a).is_some());
    }

    #[tokio::test]
    async fn test_outage_rejects_writes() {
        let store = MemoryOrderStore::new();
        store.set_outage(true);

        let err = store.create_order(&document()).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert!(store.is_empty());

        store.set_outage(false);
        assert!(store.create_order(&document()).await.is_ok());
    }
}
