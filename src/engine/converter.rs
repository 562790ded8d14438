use crate::core::currency::{CurrencyCode, CurrencyPair};
use crate::core::error::{ConversionError, ConversionResult};
use crate::core::precision::{parse_decimal, round_price};
use crate::graph::path_finding::{ConversionPath, PathPolicy};
use crate::graph::rate_graph::RateGraph;
use log::{debug, trace};
use rust_decimal::Decimal;

/// The currency conversion engine.
///
/// Owns the rate graph and the path policy chosen at startup. All methods
/// take `&self`; share one instance behind an `Arc` across request handlers.
///
/// # Examples
///
/// ```
/// use rates_engine::prelude::*;
///
/// let converter = CurrencyConverter::default();
/// converter.add_rate("BTC", "EUR", "50000.0000").unwrap();
/// converter.add_rate("EUR", "AUD", "1.5000").unwrap();
///
/// let amount = converter.convert("BTC", "AUD", "1").unwrap();
/// assert_eq!(amount.to_string(), "75000.0000");
/// ```
#[derive(Debug, Default)]
pub struct CurrencyConverter {
    graph: RateGraph,
    policy: PathPolicy,
}

impl CurrencyConverter {
    pub fn new(policy: PathPolicy) -> Self {
        Self {
            graph: RateGraph::new(),
            policy,
        }
    }

    pub fn policy(&self) -> PathPolicy {
        self.policy
    }

    /// Read-only access to the underlying rate graph.
    pub fn graph(&self) -> &RateGraph {
        &self.graph
    }

    /// Known currencies, sorted.
    pub fn currencies(&self) -> Vec<CurrencyCode> {
        self.graph.currencies()
    }

    /// Number of distinct currency pairs with a published rate.
    pub fn rate_count(&self) -> usize {
        self.graph.edge_count() / 2
    }

    /// Publish `1 base = rate quote`, replacing any earlier rate for the pair.
    ///
    /// The text is parsed exactly; non-positive or unparseable rates are
    /// rejected before the graph is touched.
    pub fn add_rate(
        &self,
        base: impl Into<CurrencyCode>,
        quote: impl Into<CurrencyCode>,
        rate: &str,
    ) -> ConversionResult<()> {
        let rate = parse_decimal("rate", rate)?;
        self.add_decimal_rate(base.into(), quote.into(), rate)
    }

    /// [`add_rate`](Self::add_rate) for an already-parsed rate.
    pub fn add_decimal_rate(
        &self,
        base: CurrencyCode,
        quote: CurrencyCode,
        rate: Decimal,
    ) -> ConversionResult<()> {
        if base == quote {
            return Err(ConversionError::SameCurrencyRate(base));
        }
        if rate <= Decimal::ZERO {
            return Err(ConversionError::NonPositiveRate {
                pair: CurrencyPair::new(base, quote),
                rate,
            });
        }

        trace!("upserting {}/{} = {}", base, quote, rate);
        self.graph.upsert_rate(base, quote, rate)
    }

    /// Find the path a conversion from `from` to `to` would take.
    pub fn resolve_path(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> ConversionResult<ConversionPath> {
        let path = self.graph.shortest_path(from, to, self.policy)?;
        debug!(
            "resolved {} -> {} via {} ({} hops, policy {})",
            from,
            to,
            path,
            path.hops(),
            self.policy
        );
        Ok(path)
    }

    /// Convert `amount` of `from` into `to`.
    ///
    /// The amount is multiplied by every rate along the resolved path and the
    /// product is rounded half-up to four fractional digits.
    pub fn convert(
        &self,
        from: impl Into<CurrencyCode>,
        to: impl Into<CurrencyCode>,
        amount: &str,
    ) -> ConversionResult<Decimal> {
        let amount = parse_decimal("amount", amount)?;
        self.convert_decimal(&from.into(), &to.into(), amount)
    }

    /// [`convert`](Self::convert) for an already-parsed amount.
    pub fn convert_decimal(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        amount: Decimal,
    ) -> ConversionResult<Decimal> {
        if amount < Decimal::ZERO {
            return Err(ConversionError::NegativeAmount(amount));
        }

        let path = self.resolve_path(from, to)?;
        let product = path.compose(amount)?;
        round_price(product)
    }
}
