//! Buyer email check applied before an order is submitted.

use core::fmt;

use thiserror::Error;

/// Why an email field was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailError {
    #[error("email cannot be empty")]
    Empty,
    #[error("email must be at most {max} characters")]
    TooLong { max: usize },
    #[error("email must contain an @ symbol")]
    MissingAtSymbol,
    #[error("email needs text before the @")]
    EmptyLocalPart,
    #[error("email needs a domain after the @")]
    EmptyDomain,
    #[error("email cannot contain whitespace")]
    ContainsWhitespace,
}

/// A buyer email that passed the same loose check a browser gives an
/// `type=email` input.
///
/// Surrounding whitespace is dropped; the stored value is what gets sent.
///
/// ```
/// use marketplace_core::Email;
///
/// assert_eq!(Email::parse(" ada@shop.test ").unwrap().as_str(), "ada@shop.test");
/// assert!(Email::parse("ada at shop.test").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    /// RFC 5321 path limit.
    pub const MAX_LENGTH: usize = 254;

    /// Trim and validate a raw form value.
    ///
    /// # Errors
    ///
    /// Returns the first [`EmailError`] the trimmed input runs into.
    pub fn parse(raw: &str) -> Result<Self, EmailError> {
        let address = raw.trim();

        if address.is_empty() {
            return Err(EmailError::Empty);
        }
        if address.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if address.chars().any(char::is_whitespace) {
            return Err(EmailError::ContainsWhitespace);
        }

        let (local, domain) = address
            .split_once('@')
            .ok_or(EmailError::MissingAtSymbol)?;
        if local.is_empty() {
            return Err(EmailError::EmptyLocalPart);
        }
        if domain.is_empty() {
            return Err(EmailError::EmptyDomain);
        }

        Ok(Self(address.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
