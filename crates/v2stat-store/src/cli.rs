//! CLI module for v2stat-store.
//!
//! Reporting commands over a traffic database. Usable as a standalone
//! binary or as subcommands of the unified `v2stat` CLI.
//!
//! # Usage
//!
//! ```bash
//! # Create tables and indexes
//! v2stat init -d sqlite:traffic.db
//!
//! # List recorded connections
//! v2stat conns -d sqlite:traffic.db
//!
//! # Hourly traffic of one connection
//! v2stat query -d sqlite:traffic.db user:alice
//! ```

use clap::{Parser, Subcommand};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use v2stat_core::{ConnInfo, defaults::DEFAULT_BUCKET_UTC_OFFSET_SECS};

use crate::sql::{HourlyBucket, StatsStore, StoreConfig, resolve_database_url};

/// Traffic database CLI arguments.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "v2stat-store",
    version,
    about = "Inspect a v2stat traffic database"
)]
pub struct StoreArgs {
    #[command(subcommand)]
    pub command: StoreCommands,
}

/// Store CLI subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum StoreCommands {
    /// Initialize database schema.
    Init {
        /// Database URL or SQLite file path.
        #[arg(short, long, env = "DATABASE_URL")]
        database: Option<String>,
    },

    /// List all recorded connections.
    Conns {
        /// Database URL or SQLite file path.
        #[arg(short, long, env = "DATABASE_URL")]
        database: Option<String>,
    },

    /// Show hourly traffic for a connection (e.g. `user:alice`).
    ///
    /// Without a connection, lists the available ones.
    Query {
        /// Database URL or SQLite file path.
        #[arg(short, long, env = "DATABASE_URL")]
        database: Option<String>,

        /// Connection as `type:name` (type is user, inbound or outbound).
        conn: Option<String>,

        /// Seconds added to timestamps before grouping into hours.
        #[arg(long, default_value_t = DEFAULT_BUCKET_UTC_OFFSET_SECS, allow_hyphen_values = true)]
        offset_secs: i64,

        /// Output format (table, json, csv).
        #[arg(short, long, default_value = "table")]
        format: String,
    },
}

/// Hourly row for display.
#[derive(Tabled)]
struct BucketDisplay {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Downlink")]
    downlink: String,
    #[tabled(rename = "Uplink")]
    uplink: String,
}

/// Run the store CLI with the given arguments.
pub async fn run(args: StoreArgs) -> Result<(), Box<dyn std::error::Error>> {
    run_command(args.command).await
}

/// Run one store subcommand.
///
/// Shared by the standalone binary and the unified `v2stat` CLI.
pub async fn run_command(command: StoreCommands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        StoreCommands::Init { database } => {
            let store = connect(database.as_deref(), DEFAULT_BUCKET_UTC_OFFSET_SECS).await?;
            store.init_schema().await?;
            println!("Database schema initialized successfully.");
            Ok(())
        }
        StoreCommands::Conns { database } => {
            let store = connect(database.as_deref(), DEFAULT_BUCKET_UTC_OFFSET_SECS).await?;
            print_conns(&store).await
        }
        StoreCommands::Query {
            database,
            conn,
            offset_secs,
            format,
        } => {
            let store = connect(database.as_deref(), offset_secs).await?;
            match conn {
                None => {
                    println!("Usage: v2stat query <type:name>");
                    println!("Available connections:");
                    print_conns(&store).await
                }
                Some(conn) => {
                    let conn: ConnInfo = conn
                        .parse()
                        .map_err(|e| format!("invalid connection {conn:?}: {e}"))?;
                    let buckets = store.hourly_stats(&conn).await?;
                    print_buckets(&buckets, &format)
                }
            }
        }
    }
}

/// Connect to database.
async fn connect(
    database: Option<&str>,
    offset_secs: i64,
) -> Result<StatsStore, Box<dyn std::error::Error>> {
    let url = resolve_database_url(database)?;
    let config = StoreConfig::new(url)
        .max_connections(1)
        .bucket_offset_secs(offset_secs);
    Ok(StatsStore::connect(config).await?)
}

async fn print_conns(store: &StatsStore) -> Result<(), Box<dyn std::error::Error>> {
    let conns = store.list_conns().await?;
    if conns.is_empty() {
        println!("No connections recorded.");
    }
    for conn in conns {
        println!("\t{conn}");
    }
    Ok(())
}

fn print_buckets(buckets: &[HourlyBucket], format: &str) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(buckets)?);
        }
        "csv" => {
            println!("time,downlink,uplink");
            for b in buckets {
                println!("{},{},{}", b.time, b.downlink, b.uplink);
            }
        }
        _ => {
            println!("{}", render_table(buckets));
        }
    }
    Ok(())
}

/// Render buckets as a table with a trailing total row.
fn render_table(buckets: &[HourlyBucket]) -> String {
    let total_down: i64 = buckets.iter().map(|b| b.downlink).sum();
    let total_up: i64 = buckets.iter().map(|b| b.uplink).sum();

    let rows = buckets
        .iter()
        .map(|b| BucketDisplay {
            time: b.time.clone(),
            downlink: format_bytes(b.downlink),
            uplink: format_bytes(b.uplink),
        })
        .chain(std::iter::once(BucketDisplay {
            time: "Total".to_string(),
            downlink: format_bytes(total_down),
            uplink: format_bytes(total_up),
        }));

    Table::new(rows).with(Style::sharp()).to_string()
}

/// Format bytes to a fixed-width human readable string.
#[allow(clippy::cast_precision_loss)]
fn format_bytes(bytes: i64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

    let mut value = bytes as f64;
    for unit in UNITS {
        if value < 1024.0 {
            return format!("{value:7.2} {unit}");
        }
        value /= 1024.0;
    }
    format!("{value:7.2} PiB")
}
