//! Client configuration
//!
//! [`ServerConfig`] is owned by the host. The client never caches it: every
//! call takes a fresh snapshot through a [`ConfigSource`], so host-side edits
//! apply to the next request without rebuilding the client.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Default image quality sent with every image URL.
pub const DEFAULT_IMAGE_QUALITY: i32 = 90;

/// Sentinel telling the server to use its own default.
pub const UNSET: f64 = -1.0;

/// MetaTube server connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
    pub token: String,
    pub default_image_quality: i32,
    pub primary_image_ratio: f64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            token: String::new(),
            default_image_quality: DEFAULT_IMAGE_QUALITY,
            primary_image_ratio: UNSET,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    /// Bearer token, or `None` when empty or whitespace-only.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        let token = self.token.trim();
        (!token.is_empty()).then_some(token)
    }

    /// Base URL without trailing slashes.
    #[must_use]
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

/// Read-only access to the current [`ServerConfig`].
pub trait ConfigSource: Send + Sync {
    /// Take a snapshot of the configuration for a single call.
    fn snapshot(&self) -> ServerConfig;
}

impl ConfigSource for ServerConfig {
    fn snapshot(&self) -> ServerConfig {
        self.clone()
    }
}

impl<T: ConfigSource + ?Sized> ConfigSource for Arc<T> {
    fn snapshot(&self) -> ServerConfig {
        (**self).snapshot()
    }
}

/// Host-mutable configuration shared with one or more clients.
#[derive(Debug, Clone, Default)]
pub struct SharedConfig {
    inner: Arc<RwLock<ServerConfig>>,
}

impl SharedConfig {
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Replace the whole configuration.
    pub fn replace(&self, config: ServerConfig) {
        *self.inner.write() = config;
    }

    /// Edit the configuration in place.
    pub fn update(&self, f: impl FnOnce(&mut ServerConfig)) {
        f(&mut self.inner.write());
    }
}

impl ConfigSource for SharedConfig {
    fn snapshot(&self) -> ServerConfig {
        self.inner.read().clone()
    }
}

/// Transport settings, applied once when the shared HTTP client is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout_seconds: u64,
    pub pool_idle_timeout_seconds: u64,
    pub pool_max_idle_per_host: usize,
    pub tcp_keepalive_seconds: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_seconds: 30,
            pool_idle_timeout_seconds: 90,
            pool_max_idle_per_host: 10,
            tcp_keepalive_seconds: 60,
            user_agent: default_user_agent(),
        }
    }
}

impl HttpConfig {
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    #[must_use]
    pub const fn pool_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.pool_idle_timeout_seconds)
    }

    #[must_use]
    pub const fn tcp_keepalive(&self) -> Duration {
        Duration::from_secs(self.tcp_keepalive_seconds)
    }
}

/// `metatube-client/<version>`
#[must_use]
pub fn default_user_agent() -> String {
    format!("metatube-client/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "pretty"
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Complete settings for a standalone host process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
}

impl Settings {
    /// Load settings from multiple sources with priority:
    /// 1. Environment variables (highest priority)
    /// 2. Config file (if provided)
    /// 3. Defaults (lowest priority)
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).required(true));
        }

        // METATUBE__SERVER__TOKEN, METATUBE__HTTP__USER_AGENT, ...
        builder = builder.add_source(
            Environment::with_prefix("METATUBE")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Load from environment variables only
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_server_config() {
        let config = ServerConfig::default();
        assert!(config.base_url.is_empty());
        assert_eq!(config.default_image_quality, 90);
        assert!((config.primary_image_ratio - UNSET).abs() < f64::EPSILON);
        assert_eq!(config.bearer_token(), None);
    }

    #[test]
    fn test_bearer_token_whitespace_is_absent() {
        let config = ServerConfig::new("http://localhost:8080").with_token("   \t");
        assert_eq!(config.bearer_token(), None);

        let config = config.with_token(" secret ");
        assert_eq!(config.bearer_token(), Some("secret"));
    }

    #[test]
    fn test_base_strips_trailing_slash() {
        let config = ServerConfig::new("https://metatube.example.com//");
        assert_eq!(config.base(), "https://metatube.example.com");
    }

    #[test]
    fn test_shared_config_update_visible_in_snapshot() {
        let shared = SharedConfig::new(ServerConfig::new("http://a"));
        let before = shared.snapshot();

        shared.update(|c| c.base_url = "http://b".to_string());
        assert_eq!(before.base_url, "http://a");
        assert_eq!(shared.snapshot().base_url, "http://b");

        shared.replace(ServerConfig::new("http://c").with_token("t"));
        assert_eq!(shared.snapshot().bearer_token(), Some("t"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
base_url = "https://metatube.example.com"
token = "abc"
primary_image_ratio = 0.7

[http]
connect_timeout_seconds = 5
"#
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.server.base_url, "https://metatube.example.com");
        assert_eq!(settings.server.token, "abc");
        assert!((settings.server.primary_image_ratio - 0.7).abs() < f64::EPSILON);
        assert_eq!(settings.server.default_image_quality, 90);
        assert_eq!(settings.http.connect_timeout(), Duration::from_secs(5));
        assert_eq!(settings.http.pool_max_idle_per_host, 10);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = Settings::load(Some(Path::new("/nonexistent/metatube.toml")));
        assert!(result.is_err());
    }
}
