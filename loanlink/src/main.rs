// loanlink/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use miette::Diagnostic;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use loanlink_core::{LoanlinkError, USAGE_EXIT_CODE};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    // .env must be loaded before clap reads DATABASE_URL
    let _ = dotenvy::dotenv();

    // 1. Setup Logging (Tracing)
    // RUST_LOG=debug loanlink seed ... for the details. Logs go to stderr so
    // `--format json` keeps stdout parseable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version land here too and are not failures
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::from(USAGE_EXIT_CODE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match commands::dispatch(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_failure(&e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn report_failure(err: &LoanlinkError) {
    eprintln!("\n💥 {err}");
    if let Some(help) = err.help() {
        eprintln!("\n{help}");
    }
}
