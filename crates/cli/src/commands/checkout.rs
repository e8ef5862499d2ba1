//! Order submission command.
//!
//! # Environment Variables
//!
//! - `STOREFRONT_URL` - Default for `--server`

use std::path::Path;

use clap::Args;
use marketplace_core::{CheckoutForm, FormError, FormField, FormMessage, PaymentMethod};
use marketplace_storefront::client::{HttpCheckoutClient, submit_checkout};
use thiserror::Error;

use super::cart::{CartFileError, load_cart};

/// Errors that can occur while placing an order from the command line.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Cart file could not be loaded.
    #[error(transparent)]
    Cart(#[from] CartFileError),

    /// `--server` is not a usable URL.
    #[error("Invalid server URL: {0}")]
    InvalidServer(#[from] url::ParseError),

    /// The form refused to submit.
    #[error("{0}")]
    Form(#[from] FormError),

    /// The storefront did not place the order.
    #[error("{0}")]
    Rejected(String),
}

/// Buyer details, one flag per form field.
#[derive(Debug, Clone, Args)]
pub struct BuyerArgs {
    /// Full name
    #[arg(long)]
    pub name: String,

    /// Email address
    #[arg(long)]
    pub email: String,

    /// Phone number
    #[arg(long)]
    pub phone: String,

    /// Company name
    #[arg(long)]
    pub company: Option<String>,

    /// Street address
    #[arg(long)]
    pub address: String,

    /// City
    #[arg(long)]
    pub city: String,

    /// State or province
    #[arg(long)]
    pub state: String,

    /// ZIP or postal code
    #[arg(long)]
    pub zip: String,

    /// Country
    #[arg(long)]
    pub country: String,

    /// Order notes
    #[arg(long)]
    pub notes: Option<String>,

    /// Payment method (`credit-card`, `paypal`, `cash-on-delivery`)
    #[arg(long, default_value_t = PaymentMethod::default())]
    pub payment_method: PaymentMethod,
}

impl BuyerArgs {
    /// Copy every provided value into the form.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::InvalidPaymentMethod`] if the form refuses the
    /// payment method.
    pub fn fill(&self, form: &mut CheckoutForm) -> Result<(), FormError> {
        let required = [
            (FormField::Name, &self.name),
            (FormField::Email, &self.email),
            (FormField::Phone, &self.phone),
            (FormField::Address, &self.address),
            (FormField::City, &self.city),
            (FormField::State, &self.state),
            (FormField::Zip, &self.zip),
            (FormField::Country, &self.country),
        ];
        for (field, value) in required {
            form.set_field(field, value.as_str())?;
        }

        if let Some(company) = &self.company {
            form.set_field(FormField::Company, company.as_str())?;
        }
        if let Some(notes) = &self.notes {
            form.set_field(FormField::OrderNotes, notes.as_str())?;
        }
        form.set_field(FormField::PaymentMethod, self.payment_method.as_str())
    }
}

/// Submit the cart at `cart_path` to the storefront at `server` once.
///
/// Prints the banner the form ends up showing.
///
/// # Errors
///
/// - [`CheckoutError::Cart`] if the cart file cannot be loaded
/// - [`CheckoutError::InvalidServer`] if `server` is not a URL
/// - [`CheckoutError::Form`] if the form refuses to submit, including a cart
///   whose total is out of range
/// - [`CheckoutError::Rejected`] if the storefront did not place the order
#[allow(clippy::print_stdout)]
pub async fn run(server: &str, cart_path: &Path, buyer: &BuyerArgs) -> Result<(), CheckoutError> {
    let cart = load_cart(cart_path)?;
    let client = HttpCheckoutClient::new(server)?;

    let mut form = CheckoutForm::new(cart);
    buyer.fill(&mut form)?;

    let summary = form.summary()?;
    tracing::info!(
        lines = summary.lines.len(),
        total = %summary.total,
        endpoint = %client.endpoint(),
        "Submitting order"
    );

    match submit_checkout(&mut form, &client).await? {
        FormMessage::Success(text) => {
            println!("{text}");
            Ok(())
        }
        FormMessage::Error(text) => Err(CheckoutError::Rejected(text)),
    }
}
