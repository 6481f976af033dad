//! Binary crate for the `weatherwise` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Human-friendly output formatting

use std::{env, io::IsTerminal, process::ExitCode};

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod render;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    init_tracing();

    let cmd = cli::Cli::parse();
    cmd.run().await
}

/// Logs go to stderr so they never mix with rendered weather on stdout.
fn init_tracing() {
    // Use RUST_LOG if available, otherwise fall back to WEATHERWISE_LOG
    let env_filter = if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match env::var("WEATHERWISE_LOG").ok().as_deref() {
            Some("trace") => "trace",
            Some("debug") => "debug",
            Some("info") => "info",
            Some("error") => "error",
            _ => "warn",
        };
        EnvFilter::new(format!("{level},hyper=warn,reqwest=warn"))
    };

    tracing_subscriber::fmt()
        .with_target(true)
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .compact()
        .init();
}
