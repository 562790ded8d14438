//! rates-engine CLI
//!
//! Drive the conversion engine from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Replay a file of publish/convert requests
//! rates-engine run --input requests.json
//!
//! # Same, with JSON responses and the minimum-rate path policy
//! rates-engine --calculate-min run --input requests.json --format json
//!
//! # Serve JSON-lines requests on stdin, one response per line on stdout
//! rates-engine serve
//!
//! # Generate a random rate network as a request file
//! rates-engine generate --currencies 20 --rates 60 --seed 7
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use log::{error, info};
use rates_engine::prelude::*;
use rates_engine::simulation::rate_network::{generate_rate_network, RateNetworkConfig};
use serde::Serialize;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "rates-engine")]
#[command(about = "In-memory currency rate graph and multi-hop conversion engine")]
struct Cli {
    /// Path to a JSON engine config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Choose paths by minimum rate sum instead of fewest hops
    #[arg(long, global = true, env = "CONVERSION_RATE_CALCULATE_MIN")]
    calculate_min: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Process a JSON array of publish/convert requests in order
    Run {
        /// Path to the requests file
        #[arg(long)]
        input: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Read one JSON request per line from stdin, answer on stdout
    Serve,
    /// Generate a random, connected rate network as publish requests
    Generate {
        /// Number of currencies
        #[arg(long, default_value = "10")]
        currencies: usize,

        /// Number of quoted currency pairs
        #[arg(long, default_value = "20")]
        rates: usize,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Write to file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn load_config(cli: &Cli) -> EngineConfig {
    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        }),
        None => EngineConfig::default(),
    };
    config.with_calculate_min(cli.calculate_min)
}

fn build_service(config: &EngineConfig) -> RatesService {
    info!("Starting conversion engine with path policy {}", config.path_policy);
    RatesService::new(Arc::new(config.build_converter()))
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> String {
    let encoded = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    encoded.unwrap_or_else(|e| {
        eprintln!("Error encoding JSON: {}", e);
        process::exit(1);
    })
}

fn describe(request: &RatesRequest, response: &RatesResponse) -> String {
    let subject = match request {
        RatesRequest::Publish(p) => {
            format!("publish {}/{} = {}", p.base_currency, p.quote_currency, p.price)
        }
        RatesRequest::Convert(c) => {
            format!("convert {} {} -> {}", c.from_amount, c.from_currency, c.to_currency)
        }
    };
    match (&response.price, &response.message) {
        (Some(price), _) => format!("{:<40} {} {}", subject, response.status, price),
        (None, Some(message)) => format!("{:<40} {} ({})", subject, response.status, message),
        (None, None) => format!("{:<40} {}", subject, response.status),
    }
}

fn cmd_run(service: &RatesService, input: &PathBuf, format: OutputFormat) {
    let content = fs::read_to_string(input).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", input.display(), e);
        process::exit(1);
    });

    let requests: Vec<RatesRequest> = serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"[
  {{ "op": "publish", "base_currency": "BTC", "quote_currency": "EUR", "price": "50000" }},
  {{ "op": "convert", "from_currency": "EUR", "to_currency": "BTC", "from_amount": "100" }}
]"#
        );
        process::exit(1);
    });

    let responses: Vec<RatesResponse> = requests.iter().map(|r| service.handle(r)).collect();

    match format {
        OutputFormat::Json => println!("{}", to_json(&responses, true)),
        OutputFormat::Text => {
            for (request, response) in requests.iter().zip(&responses) {
                println!("{}", describe(request, response));
            }
            let failed = responses.iter().filter(|r| r.status != Status::Ok).count();
            println!(
                "\n{} requests, {} failed; {} currencies, {} rates",
                responses.len(),
                failed,
                service.converter().currencies().len(),
                service.converter().rate_count()
            );
        }
    }
}

fn cmd_serve(service: &RatesService) {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("Error reading request: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<RatesRequest>(&line) {
            Ok(request) => service.handle(&request),
            Err(e) => RatesResponse::error(Status::InvalidArgument, format!("malformed request: {e}")),
        };

        if let Err(e) = writeln!(out, "{}", to_json(&response, false)).and_then(|()| out.flush()) {
            error!("Error writing response: {}", e);
            break;
        }
    }
    info!("Input closed, shutting down");
}

fn cmd_generate(currencies: usize, rates: usize, seed: Option<u64>, output: Option<PathBuf>) {
    let config = RateNetworkConfig {
        currency_count: currencies,
        rate_count: rates,
        seed,
        ..Default::default()
    };

    let requests: Vec<RatesRequest> = generate_rate_network(&config)
        .into_iter()
        .map(|edge| {
            RatesRequest::Publish(PublishRequest {
                base_currency: edge.from.to_string(),
                quote_currency: edge.to.to_string(),
                price: edge.rate.to_string(),
            })
        })
        .collect();

    let json = to_json(&requests, true);

    if let Some(path) = output {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path.display(), e);
            process::exit(1);
        });
        eprintln!(
            "Generated {} rates across {} currencies → {}",
            requests.len(),
            currencies,
            path.display()
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(&cli);

    match cli.command {
        Command::Run { ref input, format } => cmd_run(&build_service(&config), input, format),
        Command::Serve => cmd_serve(&build_service(&config)),
        Command::Generate {
            currencies,
            rates,
            seed,
            output,
        } => cmd_generate(currencies, rates, seed, output),
    }
}
