//! Binary entry point for the `findstar` command.
//!
//! Parses arguments, sets up logging, runs one search, and maps the outcome
//! to an exit code. The search itself lives in the library crate.

mod cli;

use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    match cli.execute().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
