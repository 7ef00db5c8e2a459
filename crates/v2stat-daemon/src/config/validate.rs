//! Configuration validation logic.

use super::DaemonConfig;
use super::loader::ConfigError;

const LOG_FORMATS: [&str; 3] = ["pretty", "compact", "json"];

pub fn validate_config(config: &DaemonConfig) -> Result<(), ConfigError> {
    if config.source.program.trim().is_empty() {
        return Err(ConfigError::Validation("source.program is empty".into()));
    }
    if config.source.server.trim().is_empty() {
        return Err(ConfigError::Validation("source.server is empty".into()));
    }
    if config.source.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "source.timeout_secs must be > 0".into(),
        ));
    }
    if config.daemon.interval_secs == 0 {
        return Err(ConfigError::Validation(
            "daemon.interval_secs must be > 0".into(),
        ));
    }
    if config.database.max_connections == 0 {
        return Err(ConfigError::Validation(
            "database.max_connections must be > 0".into(),
        ));
    }
    if config.database.min_connections > config.database.max_connections {
        return Err(ConfigError::Validation(
            "database.min_connections must be <= max_connections".into(),
        ));
    }
    if let Some(format) = config.logging.format.as_deref()
        && !LOG_FORMATS.contains(&format)
    {
        return Err(ConfigError::Validation(format!(
            "logging.format must be one of: {:?}",
            LOG_FORMATS
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        validate_config(&DaemonConfig::default()).unwrap();
    }

    #[test]
    fn zero_interval_rejected() {
        let mut config = DaemonConfig::default();
        config.daemon.interval_secs = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("daemon.interval_secs"));
    }

    #[test]
    fn empty_program_rejected() {
        let mut config = DaemonConfig::default();
        config.source.program = "  ".into();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn pool_bounds_checked() {
        let mut config = DaemonConfig::default();
        config.database.min_connections = 5;
        config.database.max_connections = 2;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn unknown_log_format_rejected() {
        let mut config = DaemonConfig::default();
        config.logging.format = Some("xml".into());
        assert!(validate_config(&config).is_err());
        config.logging.format = Some("json".into());
        assert!(validate_config(&config).is_ok());
    }
}
