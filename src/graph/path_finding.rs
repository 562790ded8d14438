use crate::core::currency::CurrencyCode;
use crate::core::error::{ConversionError, ConversionResult};
use crate::graph::rate_graph::{Adjacency, RateEdge};
use petgraph::algo::astar;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::ops::Add;
use std::str::FromStr;

/// How a conversion path is chosen between two currencies.
///
/// Selected once when the engine is built, never per call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathPolicy {
    /// Breadth-first search: the path with the fewest conversions.
    #[default]
    FewestHops,
    /// Dijkstra minimizing the *sum* of the edge rates along the path.
    ///
    /// This is an approximation. The amount a path yields is the *product*
    /// of its rates, and minimizing the sum does not minimize the product.
    /// Results in this mode are best-effort and must not be treated as the
    /// cheapest possible conversion.
    MinimumRate,
}

impl PathPolicy {
    /// Find the sequence of currencies from `from` to `to`, both inclusive.
    ///
    /// Both endpoints must be distinct vertices of `adjacency`.
    pub(crate) fn find(
        self,
        adjacency: &Adjacency,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Option<Vec<CurrencyCode>> {
        match self {
            Self::FewestHops => fewest_hops(adjacency, from, to),
            Self::MinimumRate => minimum_rate(adjacency, from, to),
        }
    }
}

impl fmt::Display for PathPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FewestHops => write!(f, "fewest_hops"),
            Self::MinimumRate => write!(f, "minimum_rate"),
        }
    }
}

impl FromStr for PathPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "fewest_hops" => Ok(Self::FewestHops),
            "minimum_rate" => Ok(Self::MinimumRate),
            other => Err(format!(
                "unknown path policy '{other}' (expected fewest_hops or minimum_rate)"
            )),
        }
    }
}

/// Unweighted shortest path. Neighbours are visited in currency order, so
/// ties between equally short paths always resolve the same way.
fn fewest_hops<'a>(
    adjacency: &'a Adjacency,
    from: &'a CurrencyCode,
    to: &'a CurrencyCode,
) -> Option<Vec<CurrencyCode>> {
    // child -> parent in the BFS tree; the root points at itself
    let mut previous: HashMap<&'a CurrencyCode, &'a CurrencyCode> = HashMap::new();
    let mut queue = VecDeque::new();
    previous.insert(from, from);
    queue.push_back(from);

    while let Some(current) = queue.pop_front() {
        if current == to {
            let mut nodes = vec![to.clone()];
            let mut step = to;
            while step != from {
                step = *previous.get(step)?;
                nodes.push(step.clone());
            }
            nodes.reverse();
            return Some(nodes);
        }

        if let Some(neighbors) = adjacency.get(current) {
            for next in neighbors.keys() {
                if !previous.contains_key(next) {
                    previous.insert(next, current);
                    queue.push_back(next);
                }
            }
        }
    }

    None
}

/// Path cost for the minimum-rate search. Saturates rather than overflowing.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
struct RateWeight(Decimal);

impl Add for RateWeight {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

fn minimum_rate(
    adjacency: &Adjacency,
    from: &CurrencyCode,
    to: &CurrencyCode,
) -> Option<Vec<CurrencyCode>> {
    let mut graph: DiGraph<&CurrencyCode, RateWeight> = DiGraph::new();
    let mut index: HashMap<&CurrencyCode, NodeIndex> = HashMap::new();
    for currency in adjacency.keys() {
        index.insert(currency, graph.add_node(currency));
    }
    for (source, neighbors) in adjacency {
        for (target, rate) in neighbors {
            if let (Some(&a), Some(&b)) = (index.get(source), index.get(target)) {
                graph.add_edge(a, b, RateWeight(*rate));
            }
        }
    }

    let start = *index.get(from)?;
    let goal = *index.get(to)?;

    // Zero heuristic: A* degenerates to Dijkstra.
    let (_cost, nodes) = astar(
        &graph,
        start,
        |node| node == goal,
        |edge| *edge.weight(),
        |_| RateWeight::default(),
    )?;

    Some(
        nodes
            .into_iter()
            .map(|node| CurrencyCode::clone(graph[node]))
            .collect(),
    )
}

/// An ordered chain of rate edges leading from one currency to another.
///
/// Owned by the conversion that resolved it; holds copies of the rates as
/// they were when the path was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionPath {
    from: CurrencyCode,
    to: CurrencyCode,
    edges: Vec<RateEdge>,
}

impl ConversionPath {
    pub fn new(from: CurrencyCode, to: CurrencyCode, edges: Vec<RateEdge>) -> Self {
        Self { from, to, edges }
    }

    /// The empty path from a currency to itself.
    pub fn identity(currency: CurrencyCode) -> Self {
        Self {
            from: currency.clone(),
            to: currency,
            edges: Vec::new(),
        }
    }

    pub fn from(&self) -> &CurrencyCode {
        &self.from
    }

    pub fn to(&self) -> &CurrencyCode {
        &self.to
    }

    pub fn edges(&self) -> &[RateEdge] {
        &self.edges
    }

    /// Number of conversions along the path.
    pub fn hops(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Every currency visited, starting with `from`.
    pub fn currencies(&self) -> Vec<&CurrencyCode> {
        std::iter::once(&self.from)
            .chain(self.edges.iter().map(|edge| &edge.to))
            .collect()
    }

    /// Multiply `amount` by each rate in path order. No rounding happens here.
    pub fn compose(&self, amount: Decimal) -> ConversionResult<Decimal> {
        self.edges.iter().try_fold(amount, |acc, edge| {
            acc.checked_mul(edge.rate)
                .ok_or(ConversionError::Overflow("composing a conversion path"))
        })
    }
}

impl fmt::Display for ConversionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.currencies().iter().map(|c| c.as_str()).collect();
        write!(f, "{}", names.join(" -> "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn code(s: &str) -> CurrencyCode {
        CurrencyCode::new(s)
    }

    /// Builds a symmetric adjacency from (base, quote, forward, reverse) rows.
    fn adjacency(rows: &[(&str, &str, Decimal, Decimal)]) -> Adjacency {
        let mut adj: Adjacency = BTreeMap::new();
        for (base, quote, forward, reverse) in rows {
            adj.entry(code(base)).or_default().insert(code(quote), *forward);
            adj.entry(code(quote)).or_default().insert(code(base), *reverse);
        }
        adj
    }

    #[test]
    fn test_fewest_hops_prefers_short_path() {
        // A -> B -> C -> D and a direct A -> D
        let adj = adjacency(&[
            ("A", "B", dec!(1), dec!(1)),
            ("B", "C", dec!(1), dec!(1)),
            ("C", "D", dec!(1), dec!(1)),
            ("A", "D", dec!(100), dec!(0.01)),
        ]);
        let nodes = PathPolicy::FewestHops.find(&adj, &code("A"), &code("D")).unwrap();
        assert_eq!(nodes, vec![code("A"), code("D")]);
    }

    #[test]
    fn test_fewest_hops_tie_break_is_deterministic() {
        // USD reaches BTC through EUR or LTC in two hops; EUR sorts first
        let adj = adjacency(&[
            ("EUR", "USD", dec!(1.2), dec!(0.8333333333)),
            ("BTC", "EUR", dec!(50000), dec!(0.00002)),
            ("LTC", "USD", dec!(2320), dec!(0.0004310345)),
            ("LTC", "BTC", dec!(0.04), dec!(25)),
        ]);
        for _ in 0..5 {
            let nodes = PathPolicy::FewestHops
                .find(&adj, &code("USD"), &code("BTC"))
                .unwrap();
            assert_eq!(nodes, vec![code("USD"), code("EUR"), code("BTC")]);
        }
    }

    #[test]
    fn test_disconnected_components() {
        let adj = adjacency(&[("A", "B", dec!(2), dec!(0.5)), ("C", "D", dec!(2), dec!(0.5))]);
        assert!(PathPolicy::FewestHops.find(&adj, &code("A"), &code("D")).is_none());
        assert!(PathPolicy::MinimumRate.find(&adj, &code("A"), &code("D")).is_none());
    }

    #[test]
    fn test_minimum_rate_minimizes_sum() {
        // A -> B -> D sums to 3, A -> C -> D sums to 6, direct A -> D is 10
        let adj = adjacency(&[
            ("A", "B", dec!(1), dec!(1)),
            ("B", "D", dec!(2), dec!(0.5)),
            ("A", "C", dec!(3), dec!(0.3333333333)),
            ("C", "D", dec!(3), dec!(0.3333333333)),
            ("A", "D", dec!(10), dec!(0.1)),
        ]);
        let nodes = PathPolicy::MinimumRate.find(&adj, &code("A"), &code("D")).unwrap();
        assert_eq!(nodes, vec![code("A"), code("B"), code("D")]);

        let hops = PathPolicy::FewestHops.find(&adj, &code("A"), &code("D")).unwrap();
        assert_eq!(hops, vec![code("A"), code("D")]);
    }

    #[test]
    fn test_minimum_rate_is_sum_not_product() {
        // Product via X is 0.5 * 0.5 = 0.25 (smaller), but sum 1.0 loses
        // to the direct edge with sum 0.9 and product 0.9.
        let adj = adjacency(&[
            ("A", "X", dec!(0.5), dec!(2)),
            ("X", "B", dec!(0.5), dec!(2)),
            ("A", "B", dec!(0.9), dec!(1.1111111111)),
        ]);
        let nodes = PathPolicy::MinimumRate.find(&adj, &code("A"), &code("B")).unwrap();
        assert_eq!(nodes, vec![code("A"), code("B")]);
    }

    #[test]
    fn test_rate_weight_saturates() {
        let big = RateWeight(Decimal::MAX);
        assert_eq!((big + big).0, Decimal::MAX);
    }

    #[test]
    fn test_policy_parse_and_display() {
        assert_eq!("fewest_hops".parse::<PathPolicy>().unwrap(), PathPolicy::FewestHops);
        assert_eq!("Minimum-Rate".parse::<PathPolicy>().unwrap(), PathPolicy::MinimumRate);
        assert!("cheapest".parse::<PathPolicy>().is_err());
        assert_eq!(PathPolicy::MinimumRate.to_string(), "minimum_rate");
        assert_eq!(PathPolicy::default(), PathPolicy::FewestHops);
    }

    #[test]
    fn test_compose_in_path_order() {
        let path = ConversionPath::new(
            code("BTC"),
            code("KZT"),
            vec![
                RateEdge::new(code("BTC"), code("EUR"), dec!(50000)),
                RateEdge::new(code("EUR"), code("AUD"), dec!(1.5)),
                RateEdge::new(code("AUD"), code("KZT"), dec!(328.65)),
            ],
        );
        assert_eq!(path.hops(), 3);
        assert_eq!(path.to_string(), "BTC -> EUR -> AUD -> KZT");
        assert_eq!(path.compose(dec!(1)).unwrap(), dec!(24648750));
    }

    #[test]
    fn test_identity_path() {
        let path = ConversionPath::identity(code("BTC"));
        assert!(path.is_empty());
        assert_eq!(path.to_string(), "BTC");
        assert_eq!(path.compose(dec!(0.9997)).unwrap(), dec!(0.9997));
    }

    #[test]
    fn test_compose_overflow() {
        let path = ConversionPath::new(
            code("A"),
            code("B"),
            vec![RateEdge::new(code("A"), code("B"), Decimal::MAX)],
        );
        assert!(matches!(
            path.compose(dec!(10)),
            Err(ConversionError::Overflow(_))
        ));
    }
}
