use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub catalog: CatalogConfig,

    pub store: StoreConfig,

    pub search: SearchConfig,

    pub server: ServerConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    #[serde(default)]
    pub suppress_connection_errors: bool,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            suppress_connection_errors: false,
            worker_threads: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,

    /// TMDB read access token. Without it every search short-circuits
    /// with a configuration error.
    pub api_key: Option<String>,

    /// Prefix the poster path is appended to.
    pub image_base_url: String,

    /// Request timeout in seconds (default: 30)
    pub request_timeout_seconds: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.themoviedb.org/3".to_string(),
            api_key: None,
            image_base_url: "https://image.tmdb.org/t/p/w500".to_string(),
            request_timeout_seconds: 30,
        }
    }
}

impl CatalogConfig {
    /// The API key, treating an empty string as absent.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Appwrite,
    Sqlite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,

    pub endpoint: String,

    pub project_id: Option<String>,

    pub database_id: Option<String>,

    pub collection_id: Option<String>,

    /// Server API key, only needed when the collection is not writable by guests.
    pub api_key: Option<String>,

    /// Used by the sqlite backend only.
    pub database_path: String,

    pub request_timeout_seconds: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Appwrite,
            endpoint: "https://cloud.appwrite.io/v1".to_string(),
            project_id: None,
            database_id: None,
            collection_id: None,
            api_key: None,
            database_path: "sqlite:data/reelscout.db".to_string(),
            request_timeout_seconds: 30,
        }
    }
}

/// Resolved Appwrite coordinates, present only when every id is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppwriteTarget {
    pub endpoint: String,
    pub project_id: String,
    pub database_id: String,
    pub collection_id: String,
    pub api_key: Option<String>,
}

impl StoreConfig {
    #[must_use]
    pub fn appwrite_target(&self) -> Option<AppwriteTarget> {
        let non_empty = |v: &Option<String>| v.clone().filter(|s| !s.is_empty());

        Some(AppwriteTarget {
            endpoint: self.endpoint.trim_end_matches('/').to_string(),
            project_id: non_empty(&self.project_id)?,
            database_id: non_empty(&self.database_id)?,
            collection_id: non_empty(&self.collection_id)?,
            api_key: non_empty(&self.api_key),
        })
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        match self.backend {
            StoreBackend::Appwrite => self.appwrite_target().is_some(),
            StoreBackend::Sqlite => !self.database_path.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// How long input must stay unchanged before a fetch fires.
    pub debounce_ms: u64,

    pub trending_limit: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            trending_limit: crate::services::trending::TRENDING_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub enabled: bool,

    pub port: u16,

    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 5173,
            cors_allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub loki_enabled: bool,

    pub loki_url: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
        }
    }
}

/// Environment variables that override the config file. The `VITE_`-prefixed
/// spelling is accepted too so an existing frontend `.env` can be reused.
const ENV_TMDB_API_KEY: &str = "TMDB_API_KEY";
const ENV_APPWRITE_ENDPOINT: &str = "APPWRITE_ENDPOINT";
const ENV_APPWRITE_PROJECT_ID: &str = "APPWRITE_PROJECT_ID";
const ENV_APPWRITE_DATABASE_ID: &str = "APPWRITE_DATABASE_ID";
const ENV_APPWRITE_COLLECTION_ID: &str = "APPWRITE_COLLECTION_ID";
const ENV_APPWRITE_API_KEY: &str = "APPWRITE_API_KEY";

impl Config {
    /// Loads the config file (or defaults), then applies `.env` and
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut config = Self::load_file()?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Overrides credentials and store ids from the environment. Empty
    /// values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let get = |key: &str| non_empty(key).or_else(|| non_empty(&format!("VITE_{key}")));

        if let Some(v) = get(ENV_TMDB_API_KEY) {
            self.catalog.api_key = Some(v);
        }
        if let Some(v) = get(ENV_APPWRITE_ENDPOINT) {
            self.store.endpoint = v;
        }
        if let Some(v) = get(ENV_APPWRITE_PROJECT_ID) {
            self.store.project_id = Some(v);
        }
        if let Some(v) = get(ENV_APPWRITE_DATABASE_ID) {
            self.store.database_id = Some(v);
        }
        if let Some(v) = get(ENV_APPWRITE_COLLECTION_ID) {
            self.store.collection_id = Some(v);
        }
        if let Some(v) = get(ENV_APPWRITE_API_KEY) {
            self.store.api_key = Some(v);
        }
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("reelscout").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".reelscout").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.catalog.base_url.is_empty() {
            anyhow::bail!("Catalog base URL cannot be empty");
        }

        if self.search.debounce_ms == 0 {
            anyhow::bail!("Search debounce must be > 0 ms");
        }

        if self.search.trending_limit == 0 {
            anyhow::bail!("Trending limit must be > 0");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.search.debounce_ms, 500);
        assert_eq!(config.search.trending_limit, 5);
        assert_eq!(config.catalog.base_url, "https://api.themoviedb.org/3");
        assert!(config.catalog.api_key().is_none());
        assert!(!config.store.is_configured());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[catalog]"));
        assert!(toml_str.contains("[store]"));
        assert!(toml_str.contains("[search]"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [store]
            backend = "sqlite"
            database_path = "sqlite::memory:"

            [search]
            debounce_ms = 250
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.store.backend, StoreBackend::Sqlite);
        assert!(config.store.is_configured());
        assert_eq!(config.search.debounce_ms, 250);

        assert_eq!(config.search.trending_limit, 5);
    }

    #[test]
    fn env_overrides_and_vite_prefix() {
        let env: HashMap<&str, &str> = [
            ("VITE_TMDB_API_KEY", "token"),
            ("APPWRITE_PROJECT_ID", "proj"),
            ("VITE_APPWRITE_DATABASE_ID", "db"),
            ("APPWRITE_COLLECTION_ID", "metrics"),
            ("APPWRITE_API_KEY", ""),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|k| env.get(k).map(ToString::to_string));

        assert_eq!(config.catalog.api_key(), Some("token"));
        let target = config.store.appwrite_target().unwrap();
        assert_eq!(target.project_id, "proj");
        assert_eq!(target.database_id, "db");
        assert_eq!(target.collection_id, "metrics");
        assert_eq!(target.api_key, None);
    }

    #[test]
    fn empty_variable_falls_back_to_vite_prefix() {
        let env: HashMap<&str, &str> = [
            ("TMDB_API_KEY", ""),
            ("VITE_TMDB_API_KEY", "token"),
            ("APPWRITE_PROJECT_ID", ""),
            ("VITE_APPWRITE_PROJECT_ID", "proj"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|k| env.get(k).map(ToString::to_string));

        assert_eq!(config.catalog.api_key(), Some("token"));
        assert_eq!(config.store.project_id.as_deref(), Some("proj"));
    }

    #[test]
    fn appwrite_needs_every_id() {
        let mut config = Config::default();
        config.store.project_id = Some("proj".to_string());
        config.store.database_id = Some("db".to_string());
        assert!(config.store.appwrite_target().is_none());

        config.store.collection_id = Some(String::new());
        assert!(!config.store.is_configured());

        config.store.collection_id = Some("metrics".to_string());
        assert!(config.store.is_configured());
    }

    #[test]
    fn empty_api_key_counts_as_missing() {
        let mut config = Config::default();
        config.catalog.api_key = Some(String::new());
        assert!(config.catalog.api_key().is_none());
    }

    #[test]
    fn validate_rejects_zero_debounce() {
        let mut config = Config::default();
        config.search.debounce_ms = 0;
        assert!(config.validate().is_err());
    }
}
