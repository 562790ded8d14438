//! Random rate tables for load testing and benchmarks.
//!
//! Generated networks are always connected: a random spanning tree is laid
//! down first, then extra pairs are added until the requested count.

use crate::core::currency::CurrencyCode;
use crate::graph::rate_graph::RateEdge;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::HashSet;

/// Configuration for generating a random rate network.
#[derive(Debug, Clone)]
pub struct RateNetworkConfig {
    /// Number of currencies.
    pub currency_count: usize,
    /// Number of distinct currency pairs to quote. Clamped to what the
    /// currency count allows, and never below a spanning tree.
    pub rate_count: usize,
    /// Smallest generated rate.
    pub min_rate: Decimal,
    /// Largest generated rate.
    pub max_rate: Decimal,
    /// Fixed seed for reproducible networks; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for RateNetworkConfig {
    fn default() -> Self {
        Self {
            currency_count: 10,
            rate_count: 20,
            min_rate: Decimal::new(1, 2),
            max_rate: Decimal::from(1_000),
            seed: None,
        }
    }
}

/// Currency codes used by generated networks: `C000`, `C001`, ...
pub fn currency_code(index: usize) -> CurrencyCode {
    CurrencyCode::new(format!("C{:03}", index))
}

/// Generate published rates (one `RateEdge` per pair, base -> quote).
pub fn generate_rate_network(config: &RateNetworkConfig) -> Vec<RateEdge> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let n = config.currency_count;
    if n < 2 {
        return Vec::new();
    }
    let currencies: Vec<CurrencyCode> = (0..n).map(currency_code).collect();

    let max_pairs = n * (n - 1) / 2;
    let target = config.rate_count.clamp(n - 1, max_pairs);

    // Rates are drawn with four fractional digits.
    let scaled = |rate: Decimal| {
        rate.checked_mul(Decimal::from(10_000))
            .and_then(|d| d.to_i64())
    };
    let lo = scaled(config.min_rate).unwrap_or(1).max(1);
    let hi = scaled(config.max_rate).unwrap_or(lo).max(lo);

    let mut seen: HashSet<(usize, usize)> = HashSet::new();
    let mut rates = Vec::with_capacity(target);

    for i in 1..n {
        let j = rng.gen_range(0..i);
        seen.insert((j, i));
        rates.push((i, j));
    }

    while rates.len() < target {
        let a = rng.gen_range(0..n);
        let b = rng.gen_range(0..n);
        if a == b || !seen.insert((a.min(b), a.max(b))) {
            continue;
        }
        rates.push((a, b));
    }

    rates
        .into_iter()
        .map(|(base, quote)| {
            RateEdge::new(
                currencies[base].clone(),
                currencies[quote].clone(),
                Decimal::new(rng.gen_range(lo..=hi), 4),
            )
        })
        .collect()
}
