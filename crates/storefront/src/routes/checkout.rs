//! Order submission endpoint.
//!
//! The body is read as raw bytes and decoded here so that a malformed
//! payload is reported with the same `{ error, details }` shape as a store
//! failure.

use axum::{Json, body::Bytes, extract::State};
use marketplace_core::{CheckoutRequest, CheckoutResponse};
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::services::place_order;
use crate::state::AppState;

/// Create an order from the submitted cart and buyer details.
///
/// POST /api/checkout
#[instrument(skip_all)]
pub async fn create_order(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<CheckoutResponse>> {
    let request: CheckoutRequest = serde_json::from_slice(&body)?;

    let lines = request.cart.len().to_string();
    add_breadcrumb(
        "checkout",
        "Order received",
        Some(&[("lines", lines.as_str())][..]),
    );

    let order_id = place_order(state.orders(), request).await?;
    tracing::info!(order_id = %order_id, "Order created");

    Ok(Json(CheckoutResponse::placed(order_id)))
}
