//! Unified v2stat CLI.
//!
//! This binary provides a unified interface to all v2stat components:
//! - `v2stat daemon` - Poll the stats API and record traffic
//! - `v2stat init` - Create the database schema
//! - `v2stat conns` - List recorded connections
//! - `v2stat query <type:name>` - Show hourly traffic of a connection
//!
//! The daemon and the reporting commands can also be run as standalone binaries.

use std::process::ExitCode;

use clap::{Parser, Subcommand};

/// v2stat unified CLI.
#[derive(Parser)]
#[command(
    name = "v2stat",
    version,
    about = "Record and report V2Ray traffic statistics",
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the stats API and record traffic samples.
    #[command(name = "daemon", alias = "run")]
    Daemon(Box<v2stat_daemon::DaemonArgs>),

    #[command(flatten)]
    Store(v2stat_store::cli::StoreCommands),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Daemon(args) => v2stat_daemon::cli::run(*args).await,
        Commands::Store(command) => v2stat_store::cli::run_command(command).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
