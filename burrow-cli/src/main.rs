//! Burrow CLI
//!
//! Detaches itself into a private mount namespace and drops you into an
//! interactive shell there. Mounts made inside do not leak to the host.

use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;

mod run;

/// Launch an interactive shell in a private mount namespace
///
/// Behavior is fixed: there is nothing to configure at run time.
/// Logging verbosity is controlled through `RUST_LOG`.
#[derive(Parser)]
#[command(name = "burrow")]
#[command(about = "Launch an interactive shell in a private mount namespace", long_about = None)]
#[command(version)]
struct Cli {}

fn main() {
    // Parse for --help/--version and to reject stray arguments
    let _cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    match run::execute() {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("❌ Error: {e:#}");
            process::exit(1);
        }
    }
}
