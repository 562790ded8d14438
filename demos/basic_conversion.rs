//! Publish a small rate table and convert across it.
//!
//! Shows direct, reversed and multi-hop conversions, and how the two
//! path policies can pick different routes over inconsistent quotes.

use rates_engine::prelude::*;

const RATES: [(&str, &str, &str); 8] = [
    ("BTC", "EUR", "50000.0000"),
    ("EUR", "USD", "1.2000"),
    ("EUR", "AUD", "1.5000"),
    ("AUD", "KZT", "328.65"),
    ("USD", "RUB", "80.0000"),
    ("UAH", "RUB", "4.0000"),
    ("LTC", "BTC", "0.0400"),
    ("LTC", "USD", "2320.0000"),
];

fn main() -> Result<(), ConversionError> {
    println!("╔══════════════════════════════════════════╗");
    println!("║   rates-engine: Basic Conversion Example ║");
    println!("╚══════════════════════════════════════════╝\n");

    for policy in [PathPolicy::FewestHops, PathPolicy::MinimumRate] {
        println!("━━━ Policy: {} ━━━\n", policy);

        let converter = CurrencyConverter::new(policy);
        for (base, quote, rate) in RATES {
            converter.add_rate(base, quote, rate)?;
        }

        for (from, to, amount) in [
            ("EUR", "BTC", "50000"),
            ("BTC", "AUD", "1"),
            ("BTC", "KZT", "1"),
            ("RUB", "EUR", "96"),
            ("USD", "BTC", "4"),
        ] {
            let path = converter.resolve_path(&CurrencyCode::new(from), &CurrencyCode::new(to))?;
            let result = converter.convert(from, to, amount)?;
            println!("  {:>6} {} = {:>15} {}   via {}", amount, from, result, to, path);
        }

        match converter.convert("BTC", "UNKNOWN", "1") {
            Ok(_) => println!("  unexpected success"),
            Err(e) => println!("\n  BTC -> UNKNOWN fails: {}", e),
        }
        println!();
    }

    Ok(())
}
