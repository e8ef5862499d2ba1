//! Saved cart commands.
//!
//! A cart file is the JSON array the storefront keeps in the browser:
//!
//! ```json
//! [{ "_id": "p1", "title": "Widget", "quantity": 2, "price": 10 }]
//! ```

use std::fmt::Write as _;
use std::path::Path;

use marketplace_core::{Cart, PriceOverflow};
use thiserror::Error;

/// Errors that can occur while reading a cart file.
#[derive(Debug, Error)]
pub enum CartFileError {
    /// The file could not be read.
    #[error("Failed to read cart file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    /// The file is not a cart.
    #[error("Invalid cart JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The cart holds amounts too large to total.
    #[error("Cannot total cart: {0}")]
    Overflow(#[from] PriceOverflow),
}

/// Parse a cart from its JSON form.
///
/// Lines are added one by one, so repeated products merge and zero-quantity
/// lines are dropped, as they would be in the browser.
///
/// # Errors
///
/// Returns [`CartFileError::Parse`] if `json` is not an array of cart lines.
pub fn parse_cart(json: &str) -> Result<Cart, CartFileError> {
    let saved: Cart = serde_json::from_str(json)?;
    let mut cart = Cart::new();
    for item in saved.items() {
        cart.add(item.clone());
    }
    Ok(cart)
}

/// Read and parse a cart file.
///
/// # Errors
///
/// Returns [`CartFileError::Read`] if the file cannot be read, or
/// [`CartFileError::Parse`] if its contents are not a cart.
pub fn load_cart(path: &Path) -> Result<Cart, CartFileError> {
    let json = std::fs::read_to_string(path).map_err(|source| CartFileError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_cart(&json)
}

/// Render one line per item followed by the total.
///
/// # Errors
///
/// Returns [`PriceOverflow`] if a line total or the cart total is out of range.
pub fn render_summary(cart: &Cart) -> Result<String, PriceOverflow> {
    let mut out = String::new();
    for item in cart.items() {
        let _ = writeln!(
            out,
            "{} x{} @ {} = {}",
            item.title,
            item.quantity,
            item.price.display(),
            item.line_total()?.display()
        );
    }
    let _ = writeln!(
        out,
        "Total ({} items): {}",
        cart.item_count(),
        cart.total_price()?.display()
    );
    Ok(out)
}

/// Print the summary of the cart at `path`.
///
/// # Errors
///
/// Returns [`CartFileError`] if the cart cannot be loaded or totalled.
/// Nothing is printed in that case.
#[allow(clippy::print_stdout)]
pub fn summary(path: &Path) -> Result<(), CartFileError> {
    let cart = load_cart(path)?;
    tracing::debug!(lines = cart.len(), "Cart loaded");
    print!("{}", render_summary(&cart)?);
    Ok(())
}
