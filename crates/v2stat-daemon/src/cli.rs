//! CLI entry point for the daemon subcommand.

use std::io;
use std::path::PathBuf;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use v2stat_store::StatsStore;

use crate::config::{
    CliOverrides, DaemonConfig, LoggingConfig, apply_overrides, load_config, validate_config,
};
use crate::error::DaemonError;
use crate::poller::Poller;
use crate::source::CommandSource;

/// CLI arguments for the daemon subcommand.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "v2stat-daemon",
    version,
    about = "Poll V2Ray traffic counters and record them into a database"
)]
pub struct DaemonArgs {
    /// Config file path (TOML, YAML or JSON). Defaults apply without one.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: CliOverrides,
}

/// Run the daemon with the given CLI arguments.
pub async fn run(args: DaemonArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = build_config(&args)?;
    init_tracing(&config.logging);

    info!(
        version = v2stat_core::VERSION,
        server = %config.source.server,
        "v2stat daemon starting"
    );

    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            let signal = wait_for_shutdown_signal().await;
            info!(signal, "stopping after the current poll cycle");
            shutdown.cancel();
        }
    });

    run_daemon(config, shutdown).await?;
    Ok(())
}

/// Load the config file (if any), apply CLI overrides and validate.
pub fn build_config(args: &DaemonArgs) -> Result<DaemonConfig, DaemonError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => DaemonConfig::default(),
    };
    apply_overrides(&mut config, &args.overrides);
    validate_config(&config)?;
    Ok(config)
}

/// Connect the store, make sure the schema exists and poll until shutdown.
pub async fn run_daemon(config: DaemonConfig, shutdown: CancellationToken) -> Result<(), DaemonError> {
    let store = StatsStore::connect(config.database.store_config()?).await?;
    store.init_schema().await?;
    info!(db_type = ?store.database_type(), "database ready");

    let source = CommandSource::from_config(&config.source);
    let poller = Poller::new(source, store, config.daemon.interval()).reset(config.daemon.reset);
    poller.run(shutdown).await;

    poller.store().close().await;
    info!("v2stat daemon stopped");
    Ok(())
}

/// Wait for SIGINT or SIGTERM and return the signal's name.
///
/// A signal that cannot be listened for is logged and never fires.
async fn wait_for_shutdown_signal() -> &'static str {
    let interrupt = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => "SIGINT",
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGINT");
                std::future::pending().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                "SIGTERM"
            }
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<&'static str>();

    tokio::select! {
        name = interrupt => name,
        name = terminate => name,
    }
}

fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_new(filter_directives(config)).unwrap_or_else(|_| EnvFilter::new("info"));

    match config.format.as_deref().unwrap_or(v2stat_core::DEFAULT_LOG_FORMAT) {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(io::stderr))
                .init();
        }
        "compact" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().compact().with_writer(io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(io::stderr))
                .init();
        }
    }
}

/// `level[,module=level...]`, with modules sorted for a stable result.
fn filter_directives(config: &LoggingConfig) -> String {
    let mut directives = config
        .level
        .as_deref()
        .unwrap_or(v2stat_core::DEFAULT_LOG_LEVEL)
        .to_string();

    let mut filters: Vec<_> = config.filters.iter().collect();
    filters.sort();
    for (module, level) in filters {
        directives.push(',');
        directives.push_str(module);
        directives.push('=');
        directives.push_str(level);
    }
    directives
}
