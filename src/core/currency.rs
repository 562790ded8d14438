use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque currency identifier used as a vertex key in the rate graph.
///
/// Codes are compared verbatim. No ISO 4217 validation is performed, so
/// fiat codes, crypto tickers and experimental settlement units are all
/// accepted alike.
///
/// # Examples
///
/// ```
/// use rates_engine::core::currency::CurrencyCode;
///
/// let btc = CurrencyCode::new("BTC");
/// let eur = CurrencyCode::new("EUR");
/// assert_ne!(btc, eur);
/// assert!(btc < eur);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CurrencyCode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A pair of currencies representing an exchange rate direction.
///
/// `1 base = rate quote`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub base: CurrencyCode,
    pub quote: CurrencyCode,
}

impl CurrencyPair {
    pub fn new(base: CurrencyCode, quote: CurrencyCode) -> Self {
        Self { base, quote }
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}
