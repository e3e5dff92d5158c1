use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::stream::StreamProvider;

pub const API_KEY_ENV: &str = "VITRO_TMDB_API_KEY";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub streaming: StreamingConfig,
    #[serde(skip)]
    pub debug_logs: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmdbConfig {
    #[serde(default)]
    pub apikey: String,
    #[serde(default = "default_base_url")]
    pub baseurl: String,
    #[serde(default = "default_image_base")]
    pub imagebase: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_poster_placeholder")]
    pub poster_placeholder: String,
    #[serde(default = "default_backdrop_placeholder")]
    pub backdrop_placeholder: String,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            apikey: String::new(),
            baseurl: default_base_url(),
            imagebase: default_image_base(),
            timeout_secs: default_timeout_secs(),
            poster_placeholder: default_poster_placeholder(),
            backdrop_placeholder: default_backdrop_placeholder(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub datadir: Option<String>,
    #[serde(default = "default_max_history")]
    pub max_history: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            datadir: None,
            max_history: default_max_history(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_len: default_min_query_len(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StreamingConfig {
    #[serde(default)]
    pub failover: bool,
    #[serde(default = "default_providers")]
    pub providers: Vec<StreamProvider>,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            failover: false,
            providers: default_providers(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_poster_placeholder() -> String {
    "https://via.placeholder.com/500x750/667eea/ffffff?text=No+Poster".to_string()
}

fn default_backdrop_placeholder() -> String {
    "https://via.placeholder.com/1280x720/667eea/ffffff?text=No+Image".to_string()
}

fn default_max_history() -> usize {
    20
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_min_query_len() -> usize {
    2
}

fn default_providers() -> Vec<StreamProvider> {
    vec![StreamProvider::multiembed()]
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_string(), e))?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_string(), e))?;

        Ok(config)
    }

    /// Like `from_file`, but a missing file yields the defaults. The API key
    /// can always be supplied through the environment.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            info!("Config file {} not found, using defaults", path);
            Config::default()
        };

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.is_empty() {
                config.tmdb.apikey = key;
            }
        }

        Ok(config)
    }

    pub fn get_data_dir(&self) -> PathBuf {
        if let Some(ref dir) = self.storage.datadir {
            return PathBuf::from(dir);
        }

        dirs::data_dir()
            .map(|d| d.join("vitro"))
            .unwrap_or_else(|| PathBuf::from("./vitro-data"))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(String, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(String, serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.tmdb.baseurl, "https://api.themoviedb.org/3");
        assert_eq!(config.storage.max_history, 20);
        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.search.min_query_len, 2);
        assert!(!config.streaming.failover);
        assert_eq!(config.streaming.providers.len(), 1);
        assert_eq!(config.streaming.providers[0].id, "multiembed");
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
tmdb:
  apikey: secret
  timeout_secs: 5
storage:
  datadir: /tmp/vitro
  max_history: 5
streaming:
  failover: true
  providers:
    - id: backup
      name: Backup
      priority: 2
      base_url: https://backup.example
      movie_url: "{base}/movie/{id}"
      tv_url: "{base}/tv/{id}/{season}/{episode}"
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.tmdb.apikey, "secret");
        assert_eq!(config.tmdb.timeout_secs, 5);
        assert_eq!(config.tmdb.imagebase, "https://image.tmdb.org/t/p");
        assert_eq!(config.get_data_dir(), PathBuf::from("/tmp/vitro"));
        assert_eq!(config.storage.max_history, 5);
        assert!(config.streaming.failover);
        assert_eq!(config.streaming.providers[0].priority, 2);
        assert!(config.streaming.providers[0].health_check.is_none());
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = Config::from_file("/nonexistent/vitro.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::ReadError(_, _)));
    }
}
