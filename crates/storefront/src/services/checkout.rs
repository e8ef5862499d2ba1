//! Order submission pipeline.
//!
//! cart lines → order items (fresh `_key` each) → one `create` call → order ID.
//!
//! The request is trusted as sent: buyer fields, quantities, prices, and
//! `totalPrice` are stored without re-validation.

use marketplace_core::{CheckoutRequest, OrderDocument, OrderId};
use tracing::instrument;

use crate::cms::{OrderStore, StoreError};

/// Create a pending order for a checkout request.
///
/// # Errors
///
/// Returns the store's error if the document could not be created. Nothing
/// is written in that case.
#[instrument(skip_all, fields(lines = request.cart.len(), total = %request.total_price))]
pub async fn place_order(
    store: &dyn OrderStore,
    request: CheckoutRequest,
) -> Result<OrderId, StoreError> {
    let document = OrderDocument::new_pending(request);
    store.create_order(&document).await
}
