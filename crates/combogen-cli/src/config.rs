use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use combogen_store::StoreConfig;

use crate::logging::DEFAULT_FILTER;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_PATH: &str = "combogen.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml decode error: {0}")]
    TomlDecode(#[from] toml::de::Error),
    #[error("config file not found: {0}")]
    NotFound(PathBuf),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub filter: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            file: None,
        }
    }
}

/// Contents of `combogen.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub database: StoreConfig,
    pub logging: LoggingConfig,
}

/// Read the config file at `path`, or the default file if it exists.
///
/// An explicit path must exist; the default path is optional.
pub fn load_config(path: Option<&Path>) -> Result<FileConfig, ConfigError> {
    let (path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_PATH), false),
    };

    if !path.exists() {
        if required {
            return Err(ConfigError::NotFound(path));
        }
        return Ok(FileConfig::default());
    }

    let content = std::fs::read_to_string(&path)?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<FileConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Layer the database URL: flag over environment over file.
pub fn resolve_store_config(
    file: StoreConfig,
    env_url: Option<String>,
    flag_url: Option<String>,
) -> StoreConfig {
    let url = flag_url.or(env_url).or(file.url);
    StoreConfig { url, ..file }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = parse_config("").expect("parse empty config");
        assert!(config.database.url.is_none());
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.database.acquire_timeout_secs, 10);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn reads_database_and_logging_sections() {
        let config = parse_config(
            r#"
            [database]
            url = "postgres://app@localhost/combos"
            max_connections = 2

            [logging]
            filter = "debug"
            file = "combogen.log"
            "#,
        )
        .expect("parse config");

        assert_eq!(
            config.database.url.as_deref(),
            Some("postgres://app@localhost/combos")
        );
        assert_eq!(config.database.max_connections, 2);
        assert_eq!(config.database.acquire_timeout_secs, 10);
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.logging.file, Some(PathBuf::from("combogen.log")));
    }

    #[test]
    fn flag_beats_env_beats_file() {
        let file = StoreConfig {
            url: Some("postgres://file/db".to_string()),
            ..StoreConfig::default()
        };

        let resolved = resolve_store_config(
            file.clone(),
            Some("postgres://env/db".to_string()),
            Some("postgres://flag/db".to_string()),
        );
        assert_eq!(resolved.url.as_deref(), Some("postgres://flag/db"));

        let resolved =
            resolve_store_config(file.clone(), Some("postgres://env/db".to_string()), None);
        assert_eq!(resolved.url.as_deref(), Some("postgres://env/db"));

        let resolved = resolve_store_config(file, None, None);
        assert_eq!(resolved.url.as_deref(), Some("postgres://file/db"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = load_config(Some(Path::new("does/not/exist.toml")))
            .expect_err("missing explicit config");
        assert!(matches!(err, ConfigError::NotFound(_)));
    }
}
