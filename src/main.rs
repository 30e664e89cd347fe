//! Flood Monitoring Ledger - host binary
//!
//! Loads the ledger configuration, seeds providers and thresholds, and
//! optionally serves the JSON endpoint so external tools can submit
//! readings and query alert state.
//!
//! Usage:
//!   cargo run --release                              # Seed and print status
//!   cargo run --release -- --endpoint 8080           # Serve on port 8080
//!   cargo run --release -- --config other.toml       # Alternate config
//!
//! Environment:
//!   LEDGER_CONFIG - path to the configuration file (default: ledger.toml)

use flomon_ledger::config;
use flomon_ledger::endpoint;
use flomon_ledger::host::HostChain;
use flomon_ledger::logging::{self, LogSource};
use std::env;

fn main() {
    println!("🌊 Flood Monitoring Ledger");
    println!("===========================\n");

    let args: Vec<String> = env::args().collect();
    let mut endpoint_port: Option<u16> = None;
    let mut config_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--endpoint" => {
                match args.get(i + 1).and_then(|p| p.parse::<u16>().ok()) {
                    Some(port) => endpoint_port = Some(port),
                    None => {
                        eprintln!("Error: --endpoint requires a port number");
                        std::process::exit(1);
                    }
                }
                i += 2;
            }
            "--config" => {
                match args.get(i + 1) {
                    Some(path) => config_path = Some(path.clone()),
                    None => {
                        eprintln!("Error: --config requires a file path");
                        std::process::exit(1);
                    }
                }
                i += 2;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                eprintln!("Usage: {} [--config PATH] [--endpoint PORT]", args[0]);
                std::process::exit(1);
            }
        }
    }

    let path = config::resolve_config_path(config_path.as_deref());
    let ledger_config = match config::load_config(&path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("\n❌ Configuration failed: {}\n", e);
            std::process::exit(1);
        }
    };

    logging::init_logger(
        ledger_config.logging.level,
        ledger_config.logging.file.as_deref(),
        ledger_config.logging.timestamps,
    );
    logging::info(LogSource::Config, None, &format!("Loaded {}", path));

    let host = HostChain::from_config(&ledger_config);
    let snapshot = host.ledger().snapshot();
    println!("✓ Ledger seeded at block {}", host.block_height());
    println!("   Authorized providers: {}", snapshot.authorized_providers);
    println!("   Monitored locations:  {}\n", snapshot.monitored_locations);

    let Some(port) = endpoint_port else {
        println!("No --endpoint given; exiting.");
        return;
    };

    println!("🚀 Starting HTTP endpoint server on port {}...", port);
    println!("   Press Ctrl+C to stop\n");

    if let Err(e) = endpoint::start_endpoint_server(port, host) {
        eprintln!("\n❌ Endpoint server error: {}", e);
        std::process::exit(1);
    }
}
