//! CLI override definitions and application logic.

use clap::Parser;

use super::DaemonConfig;

#[derive(Debug, Clone, Parser, Default)]
pub struct CliOverrides {
    /// Override database URL or SQLite file path
    #[arg(short, long, env = "DATABASE_URL")]
    pub database: Option<String>,
    /// Override stats API server address, e.g. 127.0.0.1:10085
    #[arg(long)]
    pub server: Option<String>,
    /// Override stats client program
    #[arg(long)]
    pub program: Option<String>,
    /// Override poll interval (seconds)
    #[arg(long)]
    pub interval_secs: Option<u64>,
    /// Override hour bucket offset from UTC (seconds)
    #[arg(long, allow_hyphen_values = true)]
    pub offset_secs: Option<i64>,
    /// Override log level (trace/debug/info/warn/error)
    #[arg(long)]
    pub log_level: Option<String>,
    /// Override log format (pretty/compact/json)
    #[arg(long)]
    pub log_format: Option<String>,
}

pub fn apply_overrides(config: &mut DaemonConfig, overrides: &CliOverrides) {
    if let Some(v) = &overrides.database {
        config.database.url = Some(v.clone());
    }
    if let Some(v) = &overrides.server {
        config.source.server = v.clone();
    }
    if let Some(v) = &overrides.program {
        config.source.program = v.clone();
    }
    if let Some(v) = overrides.interval_secs {
        config.daemon.interval_secs = v;
    }
    if let Some(v) = overrides.offset_secs {
        config.database.bucket_offset_secs = v;
    }
    if let Some(v) = &overrides.log_level {
        config.logging.level = Some(v.clone());
    }
    if let Some(v) = &overrides.log_format {
        config.logging.format = Some(v.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_config_values() {
        let mut config = DaemonConfig::default();
        let overrides = CliOverrides {
            database: Some("sqlite::memory:".into()),
            interval_secs: Some(15),
            offset_secs: Some(0),
            log_level: Some("debug".into()),
            ..Default::default()
        };
        apply_overrides(&mut config, &overrides);

        assert_eq!(config.database.url.as_deref(), Some("sqlite::memory:"));
        assert_eq!(config.daemon.interval_secs, 15);
        assert_eq!(config.database.bucket_offset_secs, 0);
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert_eq!(config.source.server, "127.0.0.1:8080");
    }

    #[test]
    fn parses_negative_offset() {
        let overrides =
            CliOverrides::try_parse_from(["v2stat", "--offset-secs", "-18000", "--server", "10.0.0.1:8080"])
                .unwrap();
        assert_eq!(overrides.offset_secs, Some(-18000));
        assert_eq!(overrides.server.as_deref(), Some("10.0.0.1:8080"));
    }
}
