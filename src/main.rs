//! Lost & Found API tester
//!
//! Runs the end-to-end API suite against a live deployment and exits with
//! 0 when every check passed, 1 otherwise.

use apitest::cli::{self, RunOptions};
use apitest::common::logging;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lostfound-apitest", about = "End-to-end tests for the Lost & Found API")]
#[command(version, long_about = None)]
struct Cli {
    /// API base URL (default: from config file, or the preview deployment)
    #[arg(long)]
    base_url: Option<String>,

    /// Path to a config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(long, short)]
    verbose: bool,

    /// List the scenarios in execution order and exit
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_cli(cli.verbose);

    let opts = RunOptions {
        base_url: cli.base_url,
        config: cli.config,
        list: cli.list,
    };

    match cli::dispatch(opts).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
