//! Decimal parsing and rounding policy.
//!
//! Only two places in the engine ever round: the reverse rate stored when a
//! rate is published, and the final converted amount. Everything in between
//! is exact `Decimal` arithmetic.

use crate::core::currency::CurrencyPair;
use crate::core::error::{ConversionError, ConversionResult};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Fractional digits kept for a computed reverse rate.
pub const RATE_REVERSE_SCALE: u32 = 10;

/// Fractional digits of a converted amount.
pub const PRICE_SCALE: u32 = 4;

/// Round-half-up.
pub const ROUNDING: RoundingStrategy = RoundingStrategy::MidpointAwayFromZero;

/// Parse rate or amount text into an exact decimal.
///
/// Accepts plain (`"50000.0000"`) and scientific (`"5E+4"`) notation;
/// surrounding whitespace is ignored. Digit separators (`"1_000"`) are
/// rejected, as is a non-zero value too small to represent, which would
/// otherwise parse as zero.
pub fn parse_decimal(field: &'static str, text: &str) -> ConversionResult<Decimal> {
    let invalid = || ConversionError::InvalidDecimal {
        field,
        value: text.to_string(),
    };

    let trimmed = text.trim();
    if trimmed.contains('_') {
        return Err(invalid());
    }

    let value = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| invalid())?;

    if value.is_zero() && has_nonzero_digit(trimmed) {
        return Err(invalid());
    }
    Ok(value)
}

fn has_nonzero_digit(text: &str) -> bool {
    text.split(['e', 'E'])
        .next()
        .unwrap_or_default()
        .chars()
        .any(|c| matches!(c, '1'..='9'))
}

/// Compute `1 / rate` at [`RATE_REVERSE_SCALE`].
///
/// The caller guarantees `rate > 0`. Rates so large that their reverse
/// rounds to zero are rejected, since a zero edge would break every
/// conversion routed through it.
pub fn reverse_rate(pair: &CurrencyPair, rate: Decimal) -> ConversionResult<Decimal> {
    let reverse = Decimal::ONE
        .checked_div(rate)
        .ok_or_else(|| ConversionError::RateOutOfRange {
            pair: pair.clone(),
            rate,
        })?
        .round_dp_with_strategy(RATE_REVERSE_SCALE, ROUNDING);

    if reverse <= Decimal::ZERO {
        return Err(ConversionError::RateOutOfRange {
            pair: pair.clone(),
            rate,
        });
    }
    Ok(reverse)
}

/// Round a converted amount half-up to [`PRICE_SCALE`] digits.
///
/// The scale is padded as well, so `75000` renders as `75000.0000`. Values
/// with too many integer digits to carry four fractional digits fail with
/// [`ConversionError::Overflow`].
pub fn round_price(value: Decimal) -> ConversionResult<Decimal> {
    let mut rounded = value.round_dp_with_strategy(PRICE_SCALE, ROUNDING);
    rounded.rescale(PRICE_SCALE);
    if rounded.scale() != PRICE_SCALE {
        return Err(ConversionError::Overflow("rounding a converted amount"));
    }
    Ok(rounded)
}
