use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rates_engine::engine::converter::CurrencyConverter;
use rates_engine::graph::path_finding::PathPolicy;
use rates_engine::simulation::rate_network::{
    currency_code, generate_rate_network, RateNetworkConfig,
};
use rust_decimal::Decimal;

fn seeded_converter(policy: PathPolicy, currencies: usize, rates: usize) -> CurrencyConverter {
    let config = RateNetworkConfig {
        currency_count: currencies,
        rate_count: rates,
        max_rate: Decimal::from(10),
        seed: Some(42),
        ..Default::default()
    };
    let converter = CurrencyConverter::new(policy);
    for edge in generate_rate_network(&config) {
        converter
            .add_decimal_rate(edge.from, edge.to, edge.rate)
            .unwrap();
    }
    converter
}

fn bench_convert(c: &mut Criterion, name: &str, policy: PathPolicy, currencies: usize, rates: usize) {
    let converter = seeded_converter(policy, currencies, rates);
    let from = currency_code(0);
    let to = currency_code(currencies - 1);
    let amount = Decimal::from(1_000);

    c.bench_function(name, |b| {
        b.iter(|| converter.convert_decimal(black_box(&from), black_box(&to), black_box(amount)))
    });
}

fn bench_fewest_hops_10(c: &mut Criterion) {
    bench_convert(c, "fewest_hops_10_currencies", PathPolicy::FewestHops, 10, 20);
}

fn bench_fewest_hops_150(c: &mut Criterion) {
    bench_convert(c, "fewest_hops_150_currencies", PathPolicy::FewestHops, 150, 600);
}

fn bench_minimum_rate_150(c: &mut Criterion) {
    bench_convert(c, "minimum_rate_150_currencies", PathPolicy::MinimumRate, 150, 600);
}

fn bench_publish(c: &mut Criterion) {
    let converter = seeded_converter(PathPolicy::FewestHops, 150, 600);
    c.bench_function("publish_existing_pair", |b| {
        b.iter(|| converter.add_rate(black_box("C000"), black_box("C001"), black_box("1.2345")))
    });
}

criterion_group!(
    benches,
    bench_fewest_hops_10,
    bench_fewest_hops_150,
    bench_minimum_rate_150,
    bench_publish
);
criterion_main!(benches);
