//! # rates-engine
//!
//! In-memory currency rate graph and multi-hop conversion engine.
//!
//! Publishing a rate `1 BASE = r QUOTE` stores it together with its reverse.
//! Converting between two currencies finds a chain of published rates
//! between them and multiplies the amount through it using exact decimal
//! arithmetic.
//!
//! ## Architecture
//!
//! - **core** — Currency codes, errors, decimal parsing and rounding policy
//! - **graph** — Lock-guarded rate graph and path resolution policies
//! - **engine** — The `CurrencyConverter` exposing publish and convert
//! - **service** — Transport-neutral request handling and startup config
//! - **simulation** — Random rate networks for load testing

pub mod core;
pub mod engine;
pub mod graph;
pub mod service;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::currency::{CurrencyCode, CurrencyPair};
    pub use crate::core::error::{ConversionError, ConversionResult, ErrorCategory};
    pub use crate::engine::converter::CurrencyConverter;
    pub use crate::graph::path_finding::{ConversionPath, PathPolicy};
    pub use crate::graph::rate_graph::{RateEdge, RateGraph};
    pub use crate::service::config::EngineConfig;
    pub use crate::service::rates_service::{
        ConvertRequest, ConvertResponse, PublishRequest, RatesRequest, RatesResponse,
        RatesService, Status,
    };
}
