//! Checkout wire types shared by the form and the order endpoint.
//!
//! ```text
//! POST /api/checkout
//! { name, email, phone, company?, address, city, state, zip, country,
//!   orderNotes?, paymentMethod, cart: [{_id, title, quantity, price}], totalPrice }
//!
//! 200 { message, orderId }
//! 500 { error, details }
//! ```

use serde::{Deserialize, Serialize};

use crate::cart::CartItem;
use crate::types::{OrderId, PaymentMethod, Price};

/// Message returned alongside the order ID on success.
pub const ORDER_PLACED_MESSAGE: &str = "Order placed successfully!";

/// Error summary returned on any endpoint failure.
pub const ORDER_FAILED_ERROR: &str = "Failed to process order";

/// Buyer-entered billing fields.
///
/// Every text field starts empty and the payment method starts as
/// cash on delivery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutFormData {
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
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

/// Addressable fields of [`CheckoutFormData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Name,
    Email,
    Phone,
    Company,
    Address,
    City,
    State,
    Zip,
    Country,
    OrderNotes,
    PaymentMethod,
}

impl FormField {
    /// Fields that must be non-empty before the form can be submitted.
    pub const REQUIRED: [Self; 8] = [
        Self::Name,
        Self::Email,
        Self::Phone,
        Self::Address,
        Self::City,
        Self::State,
        Self::Zip,
        Self::Country,
    ];

    /// Input `name` attribute / JSON key for this field.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Company => "company",
            Self::Address => "address",
            Self::City => "city",
            Self::State => "state",
            Self::Zip => "zip",
            Self::Country => "country",
            Self::OrderNotes => "orderNotes",
            Self::PaymentMethod => "paymentMethod",
        }
    }

    /// Placeholder text shown in the empty input.
    #[must_use]
    pub const fn placeholder(&self) -> &'static str {
        match self {
            Self::Name => "Full Name",
            Self::Email => "Email Address",
            Self::Phone => "Phone Number",
            Self::Company => "Company (optional)",
            Self::Address => "Street Address",
            Self::City => "City",
            Self::State => "State",
            Self::Zip => "ZIP Code",
            Self::Country => "Country",
            Self::OrderNotes => "Order Notes (optional)",
            Self::PaymentMethod => "Payment Method",
        }
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        Self::REQUIRED.contains(self)
    }
}

impl std::str::FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "email" => Ok(Self::Email),
            "phone" => Ok(Self::Phone),
            "company" => Ok(Self::Company),
            "address" => Ok(Self::Address),
            "city" => Ok(Self::City),
            "state" => Ok(Self::State),
            "zip" => Ok(Self::Zip),
            "country" => Ok(Self::Country),
            "orderNotes" => Ok(Self::OrderNotes),
            "paymentMethod" => Ok(Self::PaymentMethod),
            _ => Err(format!("unknown form field: {s}")),
        }
    }
}

impl CheckoutFormData {
    /// Current text value of a field. Optional fields read as `""` when unset.
    #[must_use]
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Phone => &self.phone,
            FormField::Company => self.company.as_deref().unwrap_or(""),
            FormField::Address => &self.address,
            FormField::City => &self.city,
            FormField::State => &self.state,
            FormField::Zip => &self.zip,
            FormField::Country => &self.country,
            FormField::OrderNotes => self.order_notes.as_deref().unwrap_or(""),
            FormField::PaymentMethod => self.payment_method.as_str(),
        }
    }

    /// Required fields that are empty or whitespace-only, in form order.
    #[must_use]
    pub fn missing_required(&self) -> Vec<FormField> {
        FormField::REQUIRED
            .into_iter()
            .filter(|field| self.get(*field).trim().is_empty())
            .collect()
    }

    /// Copy with empty optional fields normalized to `None`.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let non_empty = |value: &Option<String>| {
            value
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .map(str::to_owned)
        };

        Self {
            company: non_empty(&self.company),
            order_notes: non_empty(&self.order_notes),
            ..self.clone()
        }
    }
}

/// Body of `POST /api/checkout`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(flatten)]
    pub buyer: CheckoutFormData,
    pub cart: Vec<CartItem>,
    /// Client-computed total. The server stores it as given.
    pub total_price: Price,
}

/// Success body of `POST /api/checkout`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub message: String,
    pub order_id: OrderId,
}

impl CheckoutResponse {
    #[must_use]
    pub fn placed(order_id: OrderId) -> Self {
        Self {
            message: ORDER_PLACED_MESSAGE.to_string(),
            order_id,
        }
    }
}

/// Failure body of `POST /api/checkout`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutErrorBody {
    pub error: String,
    #[serde(default)]
    pub details: String,
}

impl CheckoutErrorBody {
    /// Generic failure carrying the underlying error message.
    #[must_use]
    pub fn failed(details: impl Into<String>) -> Self {
        Self {
            error: ORDER_FAILED_ERROR.to_string(),
            details: details.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_request_deserializes_wire_shape() {
        let body = json!({
            "name": "Ada",
            "email": "ada@shop.test",
            "phone": "555-0100",
            "address": "1 Loop Rd",
            "city": "Springfield",
            "state": "IL",
            "zip": "62701",
            "country": "US",
            "orderNotes": "Leave at door",
            "paymentMethod": "paypal",
            "cart": [{"_id": "p1", "title": "Widget", "quantity": 2, "price": 10}],
            "totalPrice": 20
        });

        let request: CheckoutRequest = serde_json::from_value(body).unwrap();
        assert_eq!(request.buyer.name, "Ada");
        assert_eq!(request.buyer.company, None);
        assert_eq!(request.buyer.order_notes.as_deref(), Some("Leave at door"));
        assert_eq!(request.buyer.payment_method, PaymentMethod::Paypal);
        assert_eq!(request.cart.len(), 1);
        assert_eq!(request.total_price, Price::whole(20));
    }

    #[test]
    fn test_payment_method_defaults_when_absent() {
        let body = json!({
            "name": "Ada", "email": "ada@shop.test", "phone": "1",
            "address": "a", "city": "c", "state": "s", "zip": "z", "country": "US",
            "cart": [], "totalPrice": 0
        });

        let request: CheckoutRequest = serde_json::from_value(body).unwrap();
        assert_eq!(request.buyer.payment_method, PaymentMethod::CashOnDelivery);
    }

    #[test]
    fn test_request_serializes_flat_camel_case() {
        let request = CheckoutRequest {
            buyer: CheckoutFormData {
                name: "Ada".into(),
                order_notes: Some("ring twice".into()),
                ..CheckoutFormData::default()
            },
            cart: vec![],
            total_price: Price::ZERO,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["name"], "Ada");
        assert_eq!(json["orderNotes"], "ring twice");
        assert_eq!(json["paymentMethod"], "cash-on-delivery");
        assert!(json.get("company").is_none());
        assert!(json.get("buyer").is_none());
        assert!(json["totalPrice"].is_number());
    }

    #[test]
    fn test_missing_required_lists_blank_fields() {
        let data = CheckoutFormData {
            name: "Ada".into(),
            email: "   ".into(),
            ..CheckoutFormData::default()
        };

        let missing = data.missing_required();
        assert!(!missing.contains(&FormField::Name));
        assert!(missing.contains(&FormField::Email));
        assert_eq!(missing.len(), 7);
        assert!(!missing.contains(&FormField::Company));
    }

    #[test]
    fn test_normalized_drops_blank_optionals() {
        let data = CheckoutFormData {
            company: Some("  ".into()),
            order_notes: Some("fragile".into()),
            ..CheckoutFormData::default()
        };

        let normalized = data.normalized();
        assert_eq!(normalized.company, None);
        assert_eq!(normalized.order_notes.as_deref(), Some("fragile"));
    }

    #[test]
    fn test_form_field_keys_round_trip() {
        for field in FormField::REQUIRED {
            assert_eq!(field.key().parse::<FormField>().unwrap(), field);
            assert!(field.is_required());
        }
        assert!(!FormField::OrderNotes.is_required());
        assert!("nope".parse::<FormField>().is_err());
    }

    #[test]
    fn test_response_bodies() {
        let ok = serde_json::to_value(CheckoutResponse::placed(OrderId::new("o1"))).unwrap();
        assert_eq!(ok, json!({"message": "Order placed successfully!", "orderId": "o1"}));

        let err = serde_json::to_value(CheckoutErrorBody::failed("store down")).unwrap();
        assert_eq!(err, json!({"error": "Failed to process order", "details": "store down"}));
    }
}
