use std::path::Path;
use std::time::Duration;

use ballot_types::DEFAULT_KEY_PREFIX;
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Connection and namespacing settings.
///
/// `host`, `port`, `db` and `connect_timeout_ms` only route to the backend
/// connection; `key_prefix` namespaces every key the engine builds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,
    /// Logical database index.
    pub db: u32,
    pub key_prefix: String,
    pub connect_timeout_ms: Option<u64>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 6379,
            db: 0,
            key_prefix: DEFAULT_KEY_PREFIX.into(),
            connect_timeout_ms: None,
        }
    }
}

impl StoreConfig {
    /// Parse from TOML. Missing fields take their defaults.
    pub fn from_toml_str(s: &str) -> StoreResult<Self> {
        toml::from_str(s).map_err(|e| StoreError::Config(e.to_string()))
    }

    /// Load a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> StoreResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// `redis://<host>:<port>/<db>`
    pub fn connection_url(&self) -> String {
        format!("redis://{}:{}/{}", self.host, self.port, self.db)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let c = StoreConfig::default();
        assert_eq!(c.host, "localhost");
        assert_eq!(c.port, 6379);
        assert_eq!(c.db, 0);
        assert_eq!(c.key_prefix, "vote:");
        assert!(c.connect_timeout().is_none());
        assert_eq!(c.connection_url(), "redis://localhost:6379/0");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = StoreConfig::from_toml_str("port = 9736\nkey_prefix = \"v:\"\n").unwrap();
        assert_eq!(c.port, 9736);
        assert_eq!(c.key_prefix, "v:");
        assert_eq!(c.host, "localhost");
        assert_eq!(c.connection_url(), "redis://localhost:9736/0");
    }

    #[test]
    fn timeout_in_millis() {
        let c = StoreConfig::from_toml_str("connect_timeout_ms = 300").unwrap();
        assert_eq!(c.connect_timeout(), Some(Duration::from_millis(300)));
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = StoreConfig::from_toml_str("port = \"not a port\"").unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
        assert!(!err.is_unavailable());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "host = \"cache.internal\"\ndb = 3").unwrap();
        let c = StoreConfig::load(file.path()).unwrap();
        assert_eq!(c.connection_url(), "redis://cache.internal:6379/3");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = StoreConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
    }
}
