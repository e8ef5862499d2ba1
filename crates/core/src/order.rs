//! Order documents as persisted in the CMS.
//!
//! An order is written once, at checkout, as a single document of type
//! `order`. Each cart line becomes an embedded `orderItem` object holding a
//! reference to the product document.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::CartItem;
use crate::checkout::CheckoutRequest;
use crate::types::{LineItemKey, OrderStatus, PaymentMethod, Price, PriceOverflow, ProductId};

/// Document `_type` for orders.
pub const ORDER_TYPE: &str = "order";
/// Object `_type` for order lines.
pub const ORDER_ITEM_TYPE: &str = "orderItem";
/// Object `_type` for cross-document references.
pub const REFERENCE_TYPE: &str = "reference";

/// A weak pointer to another document, by ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "_type")]
    pub kind: String,
    #[serde(rename = "_ref")]
    pub target: ProductId,
}

impl Reference {
    #[must_use]
    pub fn to(target: ProductId) -> Self {
        Self {
            kind: REFERENCE_TYPE.to_string(),
            target,
        }
    }
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Unique within the enclosing order's `items` array.
    #[serde(rename = "_key")]
    pub key: LineItemKey,
    #[serde(rename = "_type")]
    pub kind: String,
    pub product: Reference,
    pub quantity: u32,
    pub price: Price,
}

impl OrderItem {
    /// Build a line from a cart item using the supplied key.
    #[must_use]
    pub fn from_cart_item(item: &CartItem, key: LineItemKey) -> Self {
        Self {
            key,
            kind: ORDER_ITEM_TYPE.to_string(),
            product: Reference::to(item.id.clone()),
            quantity: item.quantity,
            price: item.price,
        }
    }
}

/// An order document, ready to hand to the document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDocument {
    #[serde(rename = "_type")]
    pub kind: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_notes: Option<String>,
    pub payment_method: PaymentMethod,
    pub items: Vec<OrderItem>,
    pub total_price: Price,
    pub status: OrderStatus,
    #[serde(with = "rfc3339_millis")]
    pub created_at: DateTime<Utc>,
}

impl OrderDocument {
    /// Map a checkout request into a pending order document.
    ///
    /// `next_key` is called once per cart line; it must not repeat a key
    /// within one call. The total is copied from the request unchanged.
    #[must_use]
    pub fn from_request<F>(request: CheckoutRequest, created_at: DateTime<Utc>, mut next_key: F) -> Self
    where
        F: FnMut() -> LineItemKey,
    {
        let items = request
            .cart
            .iter()
            .map(|item| OrderItem::from_cart_item(item, next_key()))
            .collect();

        let buyer = request.buyer;
        Self {
            kind: ORDER_TYPE.to_string(),
            name: buyer.name,
            email: buyer.email,
            phone: buyer.phone,
            company: buyer.company,
            address: buyer.address,
            city: buyer.city,
            state: buyer.state,
            zip: buyer.zip,
            country: buyer.country,
            order_notes: buyer.order_notes,
            payment_method: buyer.payment_method,
            items,
            total_price: request.total_price,
            status: OrderStatus::Pending,
            created_at,
        }
    }

    /// Map a checkout request using random UUID keys and the current time.
    #[must_use]
    pub fn new_pending(request: CheckoutRequest) -> Self {
        Self::from_request(request, Utc::now(), LineItemKey::generate)
    }

    /// Sum of `quantity × price` over the stored lines.
    ///
    /// Not necessarily equal to `total_price`, which is whatever the client sent.
    ///
    /// # Errors
    ///
    /// Returns [`PriceOverflow`] if the lines do not sum within range.
    pub fn computed_total(&self) -> Result<Price, PriceOverflow> {
        Price::total(self.items.iter().map(|item| item.price.times(item.quantity)))
    }
}

/// `createdAt` is written as an ISO-8601 UTC string with millisecond precision
/// (e.g. `2024-05-01T12:00:00.000Z`).
mod rfc3339_millis {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_created_at(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// Format a timestamp the way order documents store it.
#[must_use]
pub fn format_created_at(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::HashSet;

    use chrono::TimeZone;

    use super::*;
    use crate::checkout::CheckoutFormData;

    fn request(cart: Vec<CartItem>) -> CheckoutRequest {
        let total_price = Price::total(cart.iter().map(CartItem::line_total)).unwrap();
        CheckoutRequest {
            buyer: CheckoutFormData {
                name: "Ada Lovelace".into(),
                email: "ada@shop.test".into(),
                phone: "555-0100".into(),
                address: "1 Loop Rd".into(),
                city: "Springfield".into(),
                state: "IL".into(),
                zip: "62701".into(),
                country: "US".into(),
                ..CheckoutFormData::default()
            },
            cart,
            total_price,
        }
    }

    fn counter_keys() -> impl FnMut() -> LineItemKey {
        let mut n = 0;
        move || {
            n += 1;
            LineItemKey::new(format!("key-{n}"))
        }
    }

    #[test]
    fn test_single_widget_example() {
        let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let cart = vec![CartItem::new("p1", "Widget", 2, Price::whole(10))];

        let doc = OrderDocument::from_request(request(cart), created_at, counter_keys());

        assert_eq!(doc.kind, "order");
        assert_eq!(doc.status, OrderStatus::Pending);
        assert_eq!(doc.total_price, Price::whole(20));
        assert_eq!(doc.items.len(), 1);
        let item = &doc.items[0];
        assert_eq!(item.product.target.as_str(), "p1");
        assert_eq!(item.product.kind, "reference");
        assert_eq!(item.kind, "orderItem");
        assert_eq!(item.quantity, 2);
        assert_eq!(item.price, Price::whole(10));
    }

    #[test]
    fn test_one_item_per_cart_line_with_unique_keys() {
        // Same product twice with different quantities still yields two lines.
        let cart = vec![
            CartItem::new("p1", "Widget", 1, Price::whole(10)),
            CartItem::new("p1", "Widget", 4, Price::whole(10)),
            CartItem::new("p2", "Gadget", 1, Price::from_cents(550)),
        ];

        let doc = OrderDocument::new_pending(request(cart));

        assert_eq!(doc.items.len(), 3);
        let keys: HashSet<_> = doc.items.iter().map(|i| i.key.clone()).collect();
        assert_eq!(keys.len(), 3);
        assert_eq!(doc.computed_total().unwrap(), doc.total_price);
    }

    #[test]
    fn test_total_is_copied_not_recomputed() {
        let mut req = request(vec![CartItem::new("p1", "Widget", 2, Price::whole(10))]);
        req.total_price = Price::whole(1);

        let doc = OrderDocument::new_pending(req);
        assert_eq!(doc.total_price, Price::whole(1));
        assert_eq!(doc.computed_total().unwrap(), Price::whole(20));
    }

    #[test]
    fn test_document_wire_shape() {
        let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let cart = vec![CartItem::new("p1", "Widget", 2, Price::whole(10))];
        let doc = OrderDocument::from_request(request(cart), created_at, counter_keys());

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["_type"], "order");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["paymentMethod"], "cash-on-delivery");
        assert_eq!(json["createdAt"], "2024-05-01T12:00:00.000Z");
        assert!(json.get("company").is_none());
        assert_eq!(json["items"][0]["_key"], "key-1");
        assert_eq!(json["items"][0]["_type"], "orderItem");
        assert_eq!(json["items"][0]["product"]["_type"], "reference");
        assert_eq!(json["items"][0]["product"]["_ref"], "p1");

        let parsed: OrderDocument = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.created_at, created_at);
    }

    #[test]
    fn test_format_created_at() {
        let ts = Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(format_created_at(&ts), "2030-01-02T03:04:05.000Z");
    }
}
