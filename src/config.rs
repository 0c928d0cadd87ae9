use crate::constants::{DEFAULT_FETCH_TIMEOUT_SECONDS, DEFAULT_MAX_REDIRECTS, DEFAULT_USER_AGENT};
use crate::error::{Result, ScraperError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fetcher: FetcherConfig,
    pub store: StoreConfig,
    pub collector: CollectorConfig,
    pub scheduler: SchedulerConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    pub timeout_seconds: u64,
    pub user_agent: String,
    pub max_redirects: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Source ids left out of the registry.
    pub disabled_sources: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub interval_minutes: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub port: u16,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_FETCH_TIMEOUT_SECONDS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { backend: StoreBackend::Sqlite, path: PathBuf::from("data/events.db") }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { interval_minutes: 6 * 60 }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: false, port: 9898 }
    }
}

impl Config {
    /// Load `path` if it exists, otherwise start from defaults. Environment
    /// overrides are applied in both cases.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                ScraperError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
            })?;
            Self::from_toml(&content)?
        } else {
            info!(path = %path.display(), "No config file, using defaults");
            Self::default()
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(path) = env_var("AGENDA_DATABASE_PATH") {
            self.store.path = PathBuf::from(path);
        }
        if let Some(backend) = env_var("AGENDA_STORE") {
            self.store.backend = match backend.to_lowercase().as_str() {
                "sqlite" => StoreBackend::Sqlite,
                "memory" => StoreBackend::Memory,
                other => return Err(ScraperError::Config(format!("Unknown store backend '{}'", other))),
            };
        }
        if let Some(port) = env_var("AGENDA_METRICS_PORT") {
            self.metrics.port = port
                .parse()
                .map_err(|_| ScraperError::Config(format!("Invalid AGENDA_METRICS_PORT '{}'", port)))?;
            self.metrics.enabled = true;
        }
        if let Some(agent) = env_var("AGENDA_USER_AGENT") {
            self.fetcher.user_agent = agent;
        }
        if let Some(timeout) = env_var("AGENDA_FETCH_TIMEOUT_SECONDS") {
            self.fetcher.timeout_seconds = timeout.parse().map_err(|_| {
                ScraperError::Config(format!("Invalid AGENDA_FETCH_TIMEOUT_SECONDS '{}'", timeout))
            })?;
        }
        self.validate()
    }

    fn validate(&self) -> Result<()> {
        if self.fetcher.timeout_seconds == 0 {
            return Err(ScraperError::Config("fetcher.timeout_seconds must be positive".into()));
        }
        if self.scheduler.interval_minutes == 0 {
            return Err(ScraperError::Config("scheduler.interval_minutes must be positive".into()));
        }
        Ok(())
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.fetcher.timeout_seconds, 30);
        assert_eq!(config.store.backend, StoreBackend::Sqlite);
        assert!(config.collector.disabled_sources.is_empty());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [store]
            backend = "memory"

            [collector]
            disabled_sources = ["gam"]
            "#,
        )
        .unwrap();
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.collector.disabled_sources, vec!["gam".to_string()]);
        assert_eq!(config.fetcher.max_redirects, 10);
        assert_eq!(config.scheduler.interval_minutes, 360);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = Config::from_toml("[fetcher]\ntimeout_seconds = 0\n").unwrap_err();
        assert!(matches!(err, ScraperError::Config(_)));
    }

    #[test]
    fn test_unknown_backend_rejected() {
        assert!(Config::from_toml("[store]\nbackend = \"postgres\"\n").is_err());
    }
}
