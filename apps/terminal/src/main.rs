//! # Caja Entry Point
//!
//! Parses flags and hands over to [`caja_terminal::run`].

use clap::Parser;
use std::process::ExitCode;

use caja_terminal::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    caja_terminal::init_tracing();

    match caja_terminal::run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "caja stopped");
            eprintln!("caja: {}", e);
            ExitCode::FAILURE
        }
    }
}
