//! Currencies and currency pairs.
//!
//! A [`CurrencyPair`] fixes the quotation of an FX rate: for EUR/USD = 1.39,
//! `base` is EUR, `counter` is USD, and one EUR buys 1.39 USD. Restating a
//! quote in the inverse pair reciprocates rates, strikes and forwards.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{self, FxVolError};

/// An ISO 4217 currency, stored as its three-letter upper-case code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency([u8; 3]);

impl Currency {
    pub const EUR: Currency = Currency(*b"EUR");
    pub const USD: Currency = Currency(*b"USD");
    pub const GBP: Currency = Currency(*b"GBP");
    pub const JPY: Currency = Currency(*b"JPY");
    pub const CHF: Currency = Currency(*b"CHF");
    pub const AUD: Currency = Currency(*b"AUD");
    pub const CAD: Currency = Currency(*b"CAD");

    /// Create a currency from a three-letter code (case-insensitive).
    ///
    /// # Errors
    /// Returns [`FxVolError::InvalidInput`] unless `code` is exactly three
    /// ASCII letters.
    pub fn of(code: &str) -> error::Result<Self> {
        let bytes = code.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_alphabetic) {
            return Err(FxVolError::invalid(format!(
                "currency code must be three ASCII letters, got {code:?}"
            )));
        }
        Ok(Currency([
            bytes[0].to_ascii_uppercase(),
            bytes[1].to_ascii_uppercase(),
            bytes[2].to_ascii_uppercase(),
        ]))
    }

    /// The three-letter code.
    pub fn code(&self) -> &str {
        // Only ASCII letters are ever stored.
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = FxVolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::of(s)
    }
}

impl TryFrom<String> for Currency {
    type Error = FxVolError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Currency::of(&s)
    }
}

impl From<Currency> for String {
    fn from(c: Currency) -> Self {
        c.code().to_string()
    }
}

/// An ordered pair of currencies, `base/counter`.
///
/// # Examples
/// ```
/// use fxsmile::currency::{Currency, CurrencyPair};
///
/// let pair: CurrencyPair = "EUR/USD".parse()?;
/// assert_eq!(pair, CurrencyPair::new(Currency::EUR, Currency::USD));
/// assert_eq!(pair.inverse().to_string(), "USD/EUR");
/// assert!(pair.is_inverse_of(&pair.inverse()));
/// # Ok::<(), fxsmile::FxVolError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    /// Base currency: the currency being priced.
    pub base: Currency,
    /// Counter currency: the currency the price is expressed in.
    pub counter: Currency,
}

impl CurrencyPair {
    /// Creates a new currency pair.
    #[must_use]
    pub fn new(base: Currency, counter: Currency) -> Self {
        Self { base, counter }
    }

    /// Returns the inverse pair (swaps base and counter).
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self::new(self.counter, self.base)
    }

    /// Whether `other` quotes the same two currencies the other way round.
    pub fn is_inverse_of(&self, other: &CurrencyPair) -> bool {
        self.base != self.counter && self.inverse() == *other
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.counter)
    }
}

impl FromStr for CurrencyPair {
    type Err = FxVolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (base, counter) = s.split_once('/').ok_or_else(|| {
            FxVolError::invalid(format!("currency pair must be formatted BASE/COUNTER, got {s:?}"))
        })?;
        Ok(CurrencyPair::new(Currency::of(base)?, Currency::of(counter)?))
    }
}
