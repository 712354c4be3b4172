//! Furigana CLI binary.

use clap::Parser;
use furigana::cli::{args::*, commands::*};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    // Parse command line arguments using clap
    let args = FuriganaArgs::parse();

    // Map verbosity onto a log level; RUST_LOG still takes precedence
    let level = match args.verbosity() {
        0 => "error", // Quiet mode
        1 => "warn",  // Default
        2 => "info",  // Verbose
        _ => "debug", // Very verbose (3+)
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    // Execute the command
    if let Err(e) = execute_command(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
