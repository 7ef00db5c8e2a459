//! v2stat daemon standalone binary.

use std::process::ExitCode;

use clap::Parser;
use v2stat_daemon::{DaemonArgs, cli};

#[tokio::main]
async fn main() -> ExitCode {
    let args = DaemonArgs::parse();

    match cli::run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
