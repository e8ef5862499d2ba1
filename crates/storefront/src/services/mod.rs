//! Business logic services for storefront.
//!
//! # Services
//!
//! - `checkout` - Order submission pipeline (request → order document → store)

pub mod checkout;

pub use checkout::place_order;
