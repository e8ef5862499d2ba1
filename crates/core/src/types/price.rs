//! Type-safe price representation using decimal arithmetic.
//!
//! Prices travel on the wire as plain JSON numbers (`"price": 10`), but are
//! held as [`Decimal`] so that line totals and cart totals add up exactly.
//! The store operates in a single currency; there is no currency code.
//!
//! Arithmetic is checked. A cart deserialized from JSON can carry amounts
//! near [`Decimal::MAX`], so line and cart totals return [`PriceOverflow`]
//! instead of panicking.

use core::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A price computation exceeded the range of [`Decimal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("price total is too large")]
pub struct PriceOverflow;

/// A monetary amount in the store's currency.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price of a whole number of currency units.
    #[must_use]
    pub fn whole(amount: i64) -> Self {
        Self(Decimal::new(amount, 0))
    }

    /// Create a price from an amount in cents (`from_cents(1999)` is 19.99).
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units at this unit price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceOverflow`] if the product does not fit in a [`Decimal`].
    pub fn times(self, quantity: u32) -> Result<Self, PriceOverflow> {
        self.0
            .checked_mul(Decimal::from(quantity))
            .map(Self)
            .ok_or(PriceOverflow)
    }

    /// `self + rhs`.
    ///
    /// # Errors
    ///
    /// Returns [`PriceOverflow`] if the sum does not fit in a [`Decimal`].
    pub fn checked_add(self, rhs: Self) -> Result<Self, PriceOverflow> {
        self.0.checked_add(rhs.0).map(Self).ok_or(PriceOverflow)
    }

    /// Sum a sequence of prices, stopping at the first overflow.
    ///
    /// # Errors
    ///
    /// Returns [`PriceOverflow`] if the running total leaves the [`Decimal`] range.
    pub fn total<I>(prices: I) -> Result<Self, PriceOverflow>
    where
        I: IntoIterator<Item = Result<Self, PriceOverflow>>,
    {
        prices
            .into_iter()
            .try_fold(Self::ZERO, |acc, price| acc.checked_add(price?))
    }

    /// Whether the amount is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Lossy conversion for display widgets and logs.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or_default()
    }

    /// Format with a dollar sign and exactly two decimals (e.g. `$19.90`).
    #[must_use]
    pub fn display(&self) -> String {
        format!("${:.2}", self.0.round_dp(2))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0.round_dp(2))
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}
