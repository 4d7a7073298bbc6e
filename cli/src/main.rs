//! keymux CLI entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use keymux_cli::actions::report_failure;
use keymux_cli::commands::{dispatch, Cli};

fn main() {
    // Stdout carries progress and the key report; diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = dispatch(cli) {
        report_failure(&*e);
        std::process::exit(1);
    }
}
