use crate::core::currency::{CurrencyCode, CurrencyPair};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors arising from rate publication and conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// Rate or amount text that is not a decimal number.
    #[error("invalid {field}: '{value}' is not a decimal number")]
    InvalidDecimal { field: &'static str, value: String },

    #[error("rate must be positive, got {rate} for {pair}")]
    NonPositiveRate { pair: CurrencyPair, rate: Decimal },

    #[error("amount must not be negative, got {0}")]
    NegativeAmount(Decimal),

    /// A rate was published with the same currency on both sides.
    #[error("cannot publish a rate from {0} to itself")]
    SameCurrencyRate(CurrencyCode),

    /// The reverse of a published rate is not representable at the reverse-rate scale.
    #[error("rate {rate} for {pair} has no representable reverse rate")]
    RateOutOfRange { pair: CurrencyPair, rate: Decimal },

    #[error("unsupported currency: {0}")]
    UnsupportedCurrency(CurrencyCode),

    /// Both currencies are known but no chain of rates connects them.
    #[error("no conversion route from {from} to {to}")]
    NoRoute { from: CurrencyCode, to: CurrencyCode },

    #[error("decimal overflow while {0}")]
    Overflow(&'static str),

    /// The graph changed shape underneath a path that was being composed.
    #[error("internal invariant violated: {0}")]
    Internal(String),
}

/// Coarse grouping of [`ConversionError`]s as seen by a transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    InvalidInput,
    NotFound,
    Internal,
}

impl ConversionError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidDecimal { .. }
            | Self::NonPositiveRate { .. }
            | Self::NegativeAmount(_)
            | Self::SameCurrencyRate(_)
            | Self::RateOutOfRange { .. }
            | Self::Overflow(_) => ErrorCategory::InvalidInput,
            Self::UnsupportedCurrency(_) | Self::NoRoute { .. } => ErrorCategory::NotFound,
            Self::Internal(_) => ErrorCategory::Internal,
        }
    }

    /// True for both "unsupported currency" and "no route".
    pub fn is_not_found(&self) -> bool {
        self.category() == ErrorCategory::NotFound
    }
}

pub type ConversionResult<T> = Result<T, ConversionError>;
