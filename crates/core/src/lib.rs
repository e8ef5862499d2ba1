//! Marketplace Core - Shared types library.
//!
//! This crate provides the types used across all Marketplace components:
//! - `storefront` - The order endpoint and its document store clients
//! - `cli` - Command-line checkout client
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients. The checkout form state machine lives here so that any frontend
//! (CLI, tests, a future web client) drives the same rules.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, and statuses
//! - [`cart`] - Cart lines and the cart container
//! - [`checkout`] - Request/response bodies of `POST /api/checkout`
//! - [`order`] - Order documents as persisted in the CMS
//! - [`form`] - Client-side checkout form state

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod form;
pub mod order;
pub mod types;

pub use cart::{Cart, CartItem};
pub use checkout::{CheckoutErrorBody, CheckoutFormData, CheckoutRequest, CheckoutResponse, FormField};
pub use form::{CheckoutForm, FormError, FormMessage, SubmitError};
pub use order::{OrderDocument, OrderItem, Reference, format_created_at};
pub use types::*;
