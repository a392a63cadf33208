//! SmartMart POS command-line application.
//!
//! # Usage
//!
//! ```bash
//! smartmart product add --name "Basmati Rice (5kg)" --quantity 50 --price 1200
//! smartmart checkout --customer Asha --item 1:2:10 --order-discount 5 --pay cash
//! smartmart report summary
//! smartmart --user admin data clear
//! ```
//!
//! State lives under `--data-dir` (default `./data`) as one JSON document
//! per collection. Every command loads, acts, commits, prints.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (validation failure, unknown id, insufficient stock, I/O, ...)

mod args;
mod commands;

use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    // RUST_LOG controls verbosity; warnings and up by default.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = args::Cli::parse();
    if let Err(e) = commands::dispatch(cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
