//! Client configuration

use crate::{ClientError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Connection configuration
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server base URL (e.g. "https://example.odoo.com")
    pub url: String,

    /// Database (tenant) name
    pub database: String,

    /// Login
    pub username: String,

    /// Password or API key
    pub password: String,

    /// HTTP request timeout (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    30
}

impl ClientConfig {
    /// Create a configuration with the default timeout
    pub fn new(
        url: impl Into<String>,
        database: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            database: database.into(),
            username: username.into(),
            password: password.into(),
            timeout_secs: default_timeout(),
        }
    }

    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| ClientError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Load configuration from `path` if it exists, otherwise start from the
    /// defaults. Nothing is written.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Check that the connection settings needed to authenticate are present
    pub fn ensure_complete(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("url", &self.url),
            ("database", &self.database),
            ("username", &self.username),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ClientError::Config(format!(
                "Missing {}. Set them in the config file or pass them on the command line",
                missing.join(", ")
            )))
        }
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ClientError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, toml_string)?;
        Ok(())
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8069", "", "", "")
    }
}

// Keep the secret out of logs
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("url", &self.url)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_strips_trailing_slash() {
        let config = ClientConfig::new("https://acme.odoo.com/", "acme", "admin", "key");
        assert_eq!(config.base_url(), "https://acme.odoo.com");
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = ClientConfig::new("https://acme.odoo.com", "acme", "admin", "hunter2");
        let debug = format!("{:?}", config);

        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odoo.toml");

        let config = ClientConfig::new("https://acme.odoo.com", "acme", "admin", "key");
        config.save_to_file(&path).unwrap();

        let loaded = ClientConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odoo.toml");

        let config = ClientConfig::load_or_default(&path).unwrap();

        assert_eq!(config, ClientConfig::default());
        assert!(!path.exists());
    }

    #[test]
    fn test_load_or_default_reads_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odoo.toml");

        let config = ClientConfig::new("https://acme.odoo.com", "acme", "admin", "key");
        config.save_to_file(&path).unwrap();

        assert_eq!(ClientConfig::load_or_default(&path).unwrap(), config);
    }

    #[test]
    fn test_ensure_complete() {
        let err = ClientConfig::default().ensure_complete().unwrap_err();
        match err {
            ClientError::Config(message) => assert!(message.contains("database, username")),
            other => panic!("Unexpected error: {}", other),
        }

        let config = ClientConfig::new("https://acme.odoo.com", "acme", "admin", "");
        assert!(config.ensure_complete().is_ok());
    }

    #[test]
    fn test_timeout_defaults_when_missing() {
        let config: ClientConfig = toml::from_str(
            r#"
            url = "https://acme.odoo.com"
            database = "acme"
            username = "admin"
            password = "key"
            "#,
        )
        .unwrap();

        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_load_rejects_incomplete_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odoo.toml");
        std::fs::write(&path, "url = \"https://acme.odoo.com\"\n").unwrap();

        let err = ClientConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }
}
