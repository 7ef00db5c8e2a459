//! Config file formats and loading.

use std::path::Path;

use super::DaemonConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("unsupported config format {0:?} (expected toml, yaml, yml, json or jsonc)")]
    UnsupportedFormat(String),
    #[error("validation: {0}")]
    Validation(String),
}

/// Config file syntax, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    /// JSON with `//` and `/* */` comments allowed.
    Json,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        match ext.to_ascii_lowercase().as_str() {
            "toml" => Ok(Self::Toml),
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" | "jsonc" => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFormat(ext.to_string())),
        }
    }

    pub fn parse(self, text: &str) -> Result<DaemonConfig, ConfigError> {
        let config = match self {
            Self::Toml => toml::from_str(text)?,
            Self::Yaml => serde_yaml::from_str(text)?,
            Self::Json => {
                serde_json::from_reader(json_comments::StripComments::new(text.as_bytes()))?
            }
        };
        Ok(config)
    }
}

/// Read and parse a config file. The format is checked before the file is read.
pub fn load_config(path: impl AsRef<Path>) -> Result<DaemonConfig, ConfigError> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)?;
    format.parse(&std::fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_config(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "v2stat.toml",
            "[daemon]\ninterval_secs = 10\n[source]\nserver = \"127.0.0.1:10085\"\n",
        );
        let config = load_config(&path).unwrap();
        assert_eq!(config.daemon.interval_secs, 10);
        assert_eq!(config.source.server, "127.0.0.1:10085");
    }

    #[test]
    fn loads_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "v2stat.yml",
            "database:\n  url: \"sqlite::memory:\"\nlogging:\n  level: debug\n",
        );
        let config = load_config(&path).unwrap();
        assert_eq!(config.database.url.as_deref(), Some("sqlite::memory:"));
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
    }

    #[test]
    fn loads_json_with_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "v2stat.jsonc",
            r#"{
                // poll every minute
                "daemon": { "interval_secs": 60 },
                /* read without reset */
                "source": { "reset_flag": null }
            }"#,
        );
        let config = load_config(&path).unwrap();
        assert_eq!(config.daemon.interval_secs, 60);
        assert!(config.source.reset_flag.is_none());
    }

    #[test]
    fn rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "v2stat.ini", "interval = 1");
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::UnsupportedFormat(ext)) if ext == "ini"
        ));
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("/etc/v2stat/v2stat.TOML")).unwrap(),
            ConfigFormat::Toml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("v2stat.yml")).unwrap(),
            ConfigFormat::Yaml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("v2stat.jsonc")).unwrap(),
            ConfigFormat::Json
        );
        assert!(ConfigFormat::from_path(Path::new("v2stat")).is_err());
    }

    #[test]
    fn yaml_sqlite_url_needs_quotes() {
        let quoted = ConfigFormat::Yaml
            .parse("database:\n  url: \"sqlite::memory:\"\n")
            .unwrap();
        assert_eq!(quoted.database.url.as_deref(), Some("sqlite::memory:"));

        let unquoted = ConfigFormat::Yaml.parse("database:\n  url: sqlite::memory:\n");
        assert!(matches!(unquoted, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn unsupported_extension_skips_reading() {
        let err = load_config("/nonexistent/v2stat.ini").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
