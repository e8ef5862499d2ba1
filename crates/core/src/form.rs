//! Checkout form state.
//!
//! [`CheckoutForm`] is the client-side half of checkout with the network call
//! left out: it owns the buyer's input and the cart, produces the request
//! body, and applies the outcome. The caller performs the POST between
//! [`CheckoutForm::begin_submit`] and [`CheckoutForm::finish_submit`].
//!
//! ```text
//! Idle ──begin_submit──▶ Submitting ──finish_submit(Ok)──▶ Idle (cart cleared, fields reset)
//!                                  └─finish_submit(Err)──▶ Idle (cart and fields kept)
//! ```

use thiserror::Error;

use crate::cart::{Cart, CartItem};
use crate::checkout::{CheckoutFormData, CheckoutRequest, CheckoutResponse, FormField};
use crate::types::{Email, EmailError, PaymentMethod, Price, PriceOverflow};

/// Shown when the request never produced a usable response.
pub const TRANSPORT_ERROR_MESSAGE: &str = "Error placing order. Please try again.";

/// Submit button label while idle.
pub const PLACE_ORDER_LABEL: &str = "Place Order";

/// Submit button label while a request is in flight.
pub const PLACING_ORDER_LABEL: &str = "Placing Order...";

/// Reasons the form refuses to start a submission.
#[derive(Debug, Clone, Error)]
pub enum FormError {
    /// One or more required fields are blank.
    #[error("missing required fields: {}", format_fields(.0))]
    MissingFields(Vec<FormField>),

    /// The email field is not a plausible address.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Nothing to order.
    #[error("cart is empty")]
    EmptyCart,

    /// A line total or the cart total does not fit in a price.
    #[error("cannot total cart: {0}")]
    PriceOverflow(#[from] PriceOverflow),

    /// A submission is already outstanding.
    #[error("an order is already being placed")]
    AlreadySubmitting,

    /// `finish_submit` was called with nothing in flight.
    #[error("no order is being placed")]
    NotSubmitting,

    /// The payment method select received an unknown value.
    #[error("{0}")]
    InvalidPaymentMethod(String),
}

fn format_fields(fields: &[FormField]) -> String {
    fields
        .iter()
        .map(FormField::key)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Why a submission did not produce an order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The server answered with a non-2xx status and an `error` field.
    #[error("{0}")]
    Api(String),

    /// The request failed before a usable response arrived.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Banner shown above the form after a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMessage {
    Success(String),
    Error(String),
}

impl FormMessage {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Success(text) | Self::Error(text) => text,
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// One rendered cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLine {
    pub title: String,
    pub quantity: u32,
    pub price: Price,
    pub line_total: Price,
    pub image: Option<String>,
}

/// The cart summary block: lines plus the grand total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    pub lines: Vec<SummaryLine>,
    pub total: Price,
}

/// Client-side checkout form.
#[derive(Debug, Clone, Default)]
pub struct CheckoutForm {
    data: CheckoutFormData,
    cart: Cart,
    submitting: bool,
    message: Option<FormMessage>,
}

impl CheckoutForm {
    /// Mount the form over a cart. All fields start at their defaults.
    #[must_use]
    pub fn new(cart: Cart) -> Self {
        Self {
            data: CheckoutFormData::default(),
            cart,
            submitting: false,
            message: None,
        }
    }

    #[must_use]
    pub const fn data(&self) -> &CheckoutFormData {
        &self.data
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Mutable access for add/remove/quantity changes while the form is open.
    pub const fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    #[must_use]
    pub const fn message(&self) -> Option<&FormMessage> {
        self.message.as_ref()
    }

    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Label for the submit control.
    #[must_use]
    pub const fn button_label(&self) -> &'static str {
        if self.submitting {
            PLACING_ORDER_LABEL
        } else {
            PLACE_ORDER_LABEL
        }
    }

    /// Running total of the cart.
    ///
    /// # Errors
    ///
    /// Returns [`PriceOverflow`] if the cart holds amounts too large to add up.
    pub fn total_price(&self) -> Result<Price, PriceOverflow> {
        self.cart.total_price()
    }

    /// Cart lines with per-line totals, as shown above the form.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::PriceOverflow`] if a line or the total is out of range.
    pub fn summary(&self) -> Result<CartSummary, FormError> {
        let lines = self
            .cart
            .items()
            .iter()
            .map(|item: &CartItem| -> Result<SummaryLine, PriceOverflow> {
                Ok(SummaryLine {
                    title: item.title.clone(),
                    quantity: item.quantity,
                    price: item.price,
                    line_total: item.line_total()?,
                    image: item.image.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CartSummary {
            lines,
            total: self.cart.total_price()?,
        })
    }

    /// Apply one input change.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::InvalidPaymentMethod`] if `field` is the payment
    /// method and `value` is not one of the listed options.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) -> Result<(), FormError> {
        let value = value.into();
        match field {
            FormField::Name => self.data.name = value,
            FormField::Email => self.data.email = value,
            FormField::Phone => self.data.phone = value,
            FormField::Company => self.data.company = Some(value),
            FormField::Address => self.data.address = value,
            FormField::City => self.data.city = value,
            FormField::State => self.data.state = value,
            FormField::Zip => self.data.zip = value,
            FormField::Country => self.data.country = value,
            FormField::OrderNotes => self.data.order_notes = Some(value),
            FormField::PaymentMethod => {
                self.data.payment_method = value
                    .parse::<PaymentMethod>()
                    .map_err(FormError::InvalidPaymentMethod)?;
            }
        }
        Ok(())
    }

    /// Validate and enter the submitting state.
    ///
    /// Clears any previous banner and returns the body to POST. The body
    /// carries the email as validated, without surrounding whitespace. On
    /// error the form is left exactly as it was.
    ///
    /// # Errors
    ///
    /// - [`FormError::AlreadySubmitting`] while a request is outstanding
    /// - [`FormError::MissingFields`] if a required field is blank
    /// - [`FormError::InvalidEmail`] if the email is malformed
    /// - [`FormError::EmptyCart`] if there is nothing to order
    /// - [`FormError::PriceOverflow`] if the cart total is out of range
    pub fn begin_submit(&mut self) -> Result<CheckoutRequest, FormError> {
        if self.submitting {
            return Err(FormError::AlreadySubmitting);
        }

        let missing = self.data.missing_required();
        if !missing.is_empty() {
            return Err(FormError::MissingFields(missing));
        }

        let email = Email::parse(&self.data.email)?;

        if self.cart.is_empty() {
            return Err(FormError::EmptyCart);
        }

        let total_price = self.cart.total_price()?;

        self.submitting = true;
        self.message = None;

        let mut buyer = self.data.normalized();
        buyer.email = email.into_inner();

        Ok(CheckoutRequest {
            buyer,
            cart: self.cart.items().to_vec(),
            total_price,
        })
    }

    /// Apply the result of the request started by `begin_submit`.
    ///
    /// On success the cart is cleared and every field returns to its default.
    /// On failure nothing but the banner changes.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::NotSubmitting`] if no submission is in flight.
    pub fn finish_submit(
        &mut self,
        outcome: Result<CheckoutResponse, SubmitError>,
    ) -> Result<&FormMessage, FormError> {
        if !self.submitting {
            return Err(FormError::NotSubmitting);
        }
        self.submitting = false;

        let message = match outcome {
            Ok(response) => {
                self.data = CheckoutFormData::default();
                self.cart.clear();
                FormMessage::Success(format!(
                    "Order placed successfully! Order ID: {}",
                    response.order_id
                ))
            }
            Err(SubmitError::Api(error)) => {
                FormMessage::Error(format!("Error placing order: {error}"))
            }
            Err(SubmitError::Transport(_)) => {
                FormMessage::Error(TRANSPORT_ERROR_MESSAGE.to_string())
            }
        };

        Ok(&*self.message.insert(message))
    }

    /// Give the cart back, e.g. to persist it between page loads.
    #[must_use]
    pub fn into_cart(self) -> Cart {
        self.cart
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::OrderId;

    fn filled_form(cart: Cart) -> CheckoutForm {
        let mut form = CheckoutForm::new(cart);
        for (field, value) in [
            (FormField::Name, "Ada Lovelace"),
            (FormField::Email, "ada@shop.test"),
            (FormField::Phone, "555-0100"),
            (FormField::Address, "1 Loop Rd"),
            (FormField::City, "Springfield"),
            (FormField::State, "IL"),
            (FormField::Zip, "62701"),
            (FormField::Country, "US"),
        ] {
            form.set_field(field, value).unwrap();
        }
        form
    }

    fn widget_cart() -> Cart {
        Cart::from_items(vec![CartItem::new("p1", "Widget", 2, Price::whole(10))])
    }

    #[test]
    fn test_new_form_has_defaults() {
        let form = CheckoutForm::new(widget_cart());
        assert_eq!(form.data(), &CheckoutFormData::default());
        assert_eq!(form.data().payment_method, PaymentMethod::CashOnDelivery);
        assert_eq!(form.button_label(), "Place Order");
        assert!(form.message().is_none());
    }

    #[test]
    fn test_summary_and_total() {
        let mut cart = widget_cart();
        cart.add(CartItem::new("p2", "Gadget", 1, Price::from_cents(1999)));
        let form = CheckoutForm::new(cart);

        let summary = form.summary().unwrap();
        assert_eq!(summary.lines.len(), 2);
        assert_eq!(summary.lines.first().unwrap().line_total, Price::whole(20));
        assert_eq!(summary.total, Price::from_cents(3999));
        assert_eq!(summary.total.display(), "$39.99");
        assert_eq!(form.total_price().unwrap(), summary.total);
    }

    fn oversized_cart() -> Cart {
        serde_json::from_str(r#"[{"_id":"a","title":"A","quantity":2,"price":5e28}]"#).unwrap()
    }

    #[test]
    fn test_summary_reports_overflow() {
        let form = CheckoutForm::new(oversized_cart());
        assert!(matches!(form.summary(), Err(FormError::PriceOverflow(_))));
        assert_eq!(form.total_price(), Err(PriceOverflow));
    }

    #[test]
    fn test_overflowing_cart_blocks_submit() {
        let mut form = filled_form(oversized_cart());

        assert!(matches!(form.begin_submit(), Err(FormError::PriceOverflow(_))));
        assert!(!form.is_submitting());
        assert_eq!(form.button_label(), "Place Order");
    }

    #[test]
    fn test_request_carries_trimmed_email() {
        let mut form = filled_form(widget_cart());
        form.set_field(FormField::Email, "  ada@shop.test ").unwrap();

        let request = form.begin_submit().unwrap();
        assert_eq!(request.buyer.email, "ada@shop.test");
        // The input itself is left as typed.
        assert_eq!(form.data().email, "  ada@shop.test ");
    }

    #[test]
    fn test_begin_submit_builds_request() {
        let mut form = filled_form(widget_cart());
        form.set_field(FormField::PaymentMethod, "paypal").unwrap();

        let request = form.begin_submit().unwrap();

        assert!(form.is_submitting());
        assert_eq!(form.button_label(), "Placing Order...");
        assert_eq!(request.buyer.name, "Ada Lovelace");
        assert_eq!(request.buyer.payment_method, PaymentMethod::Paypal);
        assert_eq!(request.cart.len(), 1);
        assert_eq!(request.total_price, Price::whole(20));
    }

    #[test]
    fn test_blank_optional_fields_are_sent_as_absent() {
        let mut form = filled_form(widget_cart());
        form.set_field(FormField::Company, "").unwrap();
        form.set_field(FormField::OrderNotes, "Leave at door").unwrap();

        let request = form.begin_submit().unwrap();
        assert_eq!(request.buyer.company, None);
        assert_eq!(request.buyer.order_notes.as_deref(), Some("Leave at door"));
    }

    #[test]
    fn test_missing_required_field_blocks_submit() {
        let mut form = filled_form(widget_cart());
        form.set_field(FormField::Zip, "  ").unwrap();

        let err = form.begin_submit().unwrap_err();
        assert!(matches!(err, FormError::MissingFields(ref f) if f == &vec![FormField::Zip]));
        assert_eq!(err.to_string(), "missing required fields: zip");
        assert!(!form.is_submitting());
    }

    #[test]
    fn test_invalid_email_blocks_submit() {
        let mut form = filled_form(widget_cart());
        form.set_field(FormField::Email, "not-an-email").unwrap();

        assert!(matches!(form.begin_submit(), Err(FormError::InvalidEmail(_))));
        assert!(!form.is_submitting());
    }

    #[test]
    fn test_empty_cart_blocks_submit() {
        let mut form = filled_form(Cart::new());
        assert!(matches!(form.begin_submit(), Err(FormError::EmptyCart)));
    }

    #[test]
    fn test_only_one_submission_in_flight() {
        let mut form = filled_form(widget_cart());
        form.begin_submit().unwrap();
        assert!(matches!(form.begin_submit(), Err(FormError::AlreadySubmitting)));
    }

    #[test]
    fn test_finish_without_begin() {
        let mut form = filled_form(widget_cart());
        let outcome = Ok(CheckoutResponse::placed(OrderId::new("o1")));
        assert!(matches!(form.finish_submit(outcome), Err(FormError::NotSubmitting)));
    }

    #[test]
    fn test_success_clears_cart_and_resets_fields() {
        let mut form = filled_form(widget_cart());
        form.set_field(FormField::PaymentMethod, "credit-card").unwrap();
        form.begin_submit().unwrap();

        let message = form
            .finish_submit(Ok(CheckoutResponse::placed(OrderId::new("order-42"))))
            .unwrap()
            .clone();

        assert_eq!(
            message,
            FormMessage::Success("Order placed successfully! Order ID: order-42".into())
        );
        assert!(form.cart().is_empty());
        assert_eq!(form.data(), &CheckoutFormData::default());
        assert!(!form.is_submitting());
    }

    #[test]
    fn test_api_error_keeps_cart_and_fields() {
        let mut form = filled_form(widget_cart());
        let before = form.data().clone();
        form.begin_submit().unwrap();

        let message = form
            .finish_submit(Err(SubmitError::Api("Failed to process order".into())))
            .unwrap()
            .clone();

        assert_eq!(
            message,
            FormMessage::Error("Error placing order: Failed to process order".into())
        );
        assert_eq!(form.data(), &before);
        assert_eq!(form.cart(), &widget_cart());
        assert!(!form.is_submitting());
    }

    #[test]
    fn test_transport_error_shows_generic_message() {
        let mut form = filled_form(widget_cart());
        form.begin_submit().unwrap();

        let message = form
            .finish_submit(Err(SubmitError::Transport("connection refused".into())))
            .unwrap();

        assert!(message.is_error());
        assert_eq!(message.text(), "Error placing order. Please try again.");
        assert!(!form.cart().is_empty());
    }

    #[test]
    fn test_resubmit_after_failure() {
        let mut form = filled_form(widget_cart());
        form.begin_submit().unwrap();
        form.finish_submit(Err(SubmitError::Transport("timeout".into())))
            .unwrap();

        assert!(form.begin_submit().is_ok());
        assert!(form.message().is_none());
    }

    #[test]
    fn test_invalid_payment_method() {
        let mut form = CheckoutForm::new(Cart::new());
        assert!(matches!(
            form.set_field(FormField::PaymentMethod, "barter"),
            Err(FormError::InvalidPaymentMethod(_))
        ));
        assert_eq!(form.data().payment_method, PaymentMethod::CashOnDelivery);
    }
}
