use crate::core::currency::{CurrencyCode, CurrencyPair};
use crate::core::error::{ConversionError, ConversionResult};
use crate::core::precision::reverse_rate;
use crate::graph::path_finding::{ConversionPath, PathPolicy};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// currency -> (neighbour -> rate). Ordered so traversal is deterministic.
pub(crate) type Adjacency = BTreeMap<CurrencyCode, BTreeMap<CurrencyCode, Decimal>>;

/// A directed rate: 1 unit of `from` equals `rate` units of `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateEdge {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub rate: Decimal,
}

impl RateEdge {
    pub fn new(from: CurrencyCode, to: CurrencyCode, rate: Decimal) -> Self {
        Self { from, to, rate }
    }
}

/// A directed graph of exchange rates between currencies.
///
/// Every published rate is stored as a pair of edges: `base -> quote` with
/// the published value and `quote -> base` with its reverse. Both edges are
/// written under a single write lock, so readers see either the old pair or
/// the new pair and never a mix. Vertices are created on first mention and
/// never removed.
///
/// # Examples
///
/// ```
/// use rates_engine::prelude::*;
/// use rust_decimal_macros::dec;
///
/// let graph = RateGraph::new();
/// graph
///     .upsert_rate(CurrencyCode::new("EUR"), CurrencyCode::new("USD"), dec!(1.25))
///     .unwrap();
///
/// assert!(graph.has_vertex(&CurrencyCode::new("USD")));
/// assert_eq!(
///     graph.rate(&CurrencyCode::new("USD"), &CurrencyCode::new("EUR")),
///     Some(dec!(0.8))
/// );
/// ```
#[derive(Debug, Default)]
pub struct RateGraph {
    adjacency: RwLock<Adjacency>,
}

impl RateGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the rate for `base/quote` and its reverse.
    ///
    /// Callers are expected to have rejected non-positive rates and
    /// `base == quote` already; both are still refused here so the graph
    /// never holds a self-loop or a non-positive edge.
    pub fn upsert_rate(
        &self,
        base: CurrencyCode,
        quote: CurrencyCode,
        rate: Decimal,
    ) -> ConversionResult<()> {
        if base == quote {
            return Err(ConversionError::SameCurrencyRate(base));
        }
        let pair = CurrencyPair::new(base, quote);
        if rate <= Decimal::ZERO {
            return Err(ConversionError::NonPositiveRate { pair, rate });
        }
        let reverse = reverse_rate(&pair, rate)?;
        let CurrencyPair { base, quote } = pair;

        let mut adjacency = self.adjacency.write();
        adjacency
            .entry(base.clone())
            .or_default()
            .insert(quote.clone(), rate);
        adjacency.entry(quote).or_default().insert(base, reverse);
        Ok(())
    }

    pub fn has_vertex(&self, currency: &CurrencyCode) -> bool {
        self.adjacency.read().contains_key(currency)
    }

    /// The direct rate `from -> to`, if one was published in either direction.
    pub fn rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> Option<Decimal> {
        self.adjacency
            .read()
            .get(from)
            .and_then(|neighbors| neighbors.get(to))
            .copied()
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.read().len()
    }

    /// Number of directed edges; always twice the number of distinct pairs.
    pub fn edge_count(&self) -> usize {
        self.adjacency.read().values().map(|n| n.len()).sum()
    }

    /// All known currencies in sorted order.
    pub fn currencies(&self) -> Vec<CurrencyCode> {
        self.adjacency.read().keys().cloned().collect()
    }

    /// A consistent copy of every directed edge.
    pub fn snapshot(&self) -> Vec<RateEdge> {
        let adjacency = self.adjacency.read();
        adjacency
            .iter()
            .flat_map(|(from, neighbors)| {
                neighbors
                    .iter()
                    .map(move |(to, rate)| RateEdge::new(from.clone(), to.clone(), *rate))
            })
            .collect()
    }

    /// Resolve a path from `from` to `to` under `policy`.
    ///
    /// Vertex checks, the search and the copy of the edge rates all happen
    /// under one read guard.
    pub fn shortest_path(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
        policy: PathPolicy,
    ) -> ConversionResult<ConversionPath> {
        let adjacency = self.adjacency.read();

        for currency in [from, to] {
            if !adjacency.contains_key(currency) {
                return Err(ConversionError::UnsupportedCurrency(currency.clone()));
            }
        }

        if from == to {
            return Ok(ConversionPath::identity(from.clone()));
        }

        let nodes = policy
            .find(&adjacency, from, to)
            .ok_or_else(|| ConversionError::NoRoute {
                from: from.clone(),
                to: to.clone(),
            })?;

        let mut edges = Vec::with_capacity(nodes.len().saturating_sub(1));
        for step in nodes.windows(2) {
            let (source, target) = (&step[0], &step[1]);
            let rate = adjacency
                .get(source)
                .and_then(|neighbors| neighbors.get(target))
                .copied()
                .ok_or_else(|| {
                    ConversionError::Internal(format!(
                        "path step {source} -> {target} has no edge"
                    ))
                })?;
            edges.push(RateEdge::new(source.clone(), target.clone(), rate));
        }

        Ok(ConversionPath::new(from.clone(), to.clone(), edges))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use std::thread;

    fn code(s: &str) -> CurrencyCode {
        CurrencyCode::new(s)
    }

    #[test]
    fn test_upsert_creates_both_directions() {
        let graph = RateGraph::new();
        graph.upsert_rate(code("BTC"), code("EUR"), dec!(50000)).unwrap();

        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.rate(&code("BTC"), &code("EUR")), Some(dec!(50000)));
        assert_eq!(graph.rate(&code("EUR"), &code("BTC")), Some(dec!(0.00002)));
    }

    #[test]
    fn test_upsert_replaces_pair() {
        let graph = RateGraph::new();
        graph.upsert_rate(code("EUR"), code("USD"), dec!(1.2)).unwrap();
        graph.upsert_rate(code("EUR"), code("USD"), dec!(1.25)).unwrap();

        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.rate(&code("EUR"), &code("USD")), Some(dec!(1.25)));
        assert_eq!(graph.rate(&code("USD"), &code("EUR")), Some(dec!(0.8)));
    }

    #[test]
    fn test_upsert_from_quote_side_replaces_pair() {
        let graph = RateGraph::new();
        graph.upsert_rate(code("EUR"), code("USD"), dec!(1.25)).unwrap();
        graph.upsert_rate(code("USD"), code("EUR"), dec!(0.5)).unwrap();

        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.rate(&code("USD"), &code("EUR")), Some(dec!(0.5)));
        assert_eq!(graph.rate(&code("EUR"), &code("USD")), Some(dec!(2)));
    }

    #[test]
    fn test_upsert_rejects_degenerate_input() {
        let graph = RateGraph::new();
        assert!(matches!(
            graph.upsert_rate(code("USD"), code("USD"), dec!(1)),
            Err(ConversionError::SameCurrencyRate(_))
        ));
        assert!(matches!(
            graph.upsert_rate(code("USD"), code("EUR"), dec!(0)),
            Err(ConversionError::NonPositiveRate { .. })
        ));
        assert_eq!(graph.vertex_count(), 0);
    }

    #[test]
    fn test_shortest_path_unknown_vertex() {
        let graph = RateGraph::new();
        graph.upsert_rate(code("BTC"), code("EUR"), dec!(50000)).unwrap();

        let err = graph
            .shortest_path(&code("XXX"), &code("EUR"), PathPolicy::FewestHops)
            .unwrap_err();
        assert_eq!(err, ConversionError::UnsupportedCurrency(code("XXX")));

        let err = graph
            .shortest_path(&code("BTC"), &code("YYY"), PathPolicy::FewestHops)
            .unwrap_err();
        assert_eq!(err, ConversionError::UnsupportedCurrency(code("YYY")));
    }

    #[test]
    fn test_shortest_path_no_route() {
        let graph = RateGraph::new();
        graph.upsert_rate(code("BTC"), code("EUR"), dec!(50000)).unwrap();
        graph.upsert_rate(code("UAH"), code("RUB"), dec!(4)).unwrap();

        for policy in [PathPolicy::FewestHops, PathPolicy::MinimumRate] {
            let err = graph
                .shortest_path(&code("BTC"), &code("RUB"), policy)
                .unwrap_err();
            assert_eq!(
                err,
                ConversionError::NoRoute {
                    from: code("BTC"),
                    to: code("RUB")
                }
            );
        }
    }

    #[test]
    fn test_shortest_path_copies_rates() {
        let graph = RateGraph::new();
        graph.upsert_rate(code("BTC"), code("EUR"), dec!(50000)).unwrap();
        graph.upsert_rate(code("EUR"), code("AUD"), dec!(1.5)).unwrap();

        let path = graph
            .shortest_path(&code("BTC"), &code("AUD"), PathPolicy::FewestHops)
            .unwrap();
        assert_eq!(path.hops(), 2);
        assert_eq!(path.edges()[0].rate, dec!(50000));
        assert_eq!(path.edges()[1].rate, dec!(1.5));
    }

    #[test]
    fn test_snapshot_lists_every_edge() {
        let graph = RateGraph::new();
        graph.upsert_rate(code("BTC"), code("EUR"), dec!(50000)).unwrap();
        graph.upsert_rate(code("EUR"), code("AUD"), dec!(1.5)).unwrap();

        let edges = graph.snapshot();
        assert_eq!(edges.len(), 4);
        assert!(edges.contains(&RateEdge::new(code("AUD"), code("EUR"), dec!(0.6666666667))));
        assert_eq!(graph.currencies(), vec![code("AUD"), code("BTC"), code("EUR")]);
    }

    #[test]
    fn test_readers_never_see_torn_pair() {
        let graph = Arc::new(RateGraph::new());
        graph.upsert_rate(code("EUR"), code("USD"), dec!(2)).unwrap();

        let writer = {
            let graph = Arc::clone(&graph);
            thread::spawn(move || {
                for i in 0..500 {
                    let rate = if i % 2 == 0 { dec!(4) } else { dec!(2) };
                    graph.upsert_rate(code("EUR"), code("USD"), rate).unwrap();
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let graph = Arc::clone(&graph);
                thread::spawn(move || {
                    for _ in 0..500 {
                        let edges = graph.snapshot();
                        let forward = edges
                            .iter()
                            .find(|e| e.from == code("EUR"))
                            .map(|e| e.rate)
                            .unwrap();
                        let reverse = edges
                            .iter()
                            .find(|e| e.from == code("USD"))
                            .map(|e| e.rate)
                            .unwrap();
                        assert_eq!(forward * reverse, dec!(1));
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }

        assert_eq!(graph.rate(&code("EUR"), &code("USD")), Some(dec!(2)));
        assert_eq!(graph.rate(&code("USD"), &code("EUR")), Some(dec!(0.5)));
    }
}
