// src/environment.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::{
    PipelineConfig, DEFAULT_API_URL, DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT_SECS,
    DEFAULT_TRANSLATE_URL,
};

const CONFIG_FILE: &str = "config.yaml";
const DEFAULT_DATA_DIR: &str = "zensearchData";

fn default_data_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_translate_url() -> String {
    DEFAULT_TRANSLATE_URL.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_translate_url")]
    pub translate_url: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            api_url: default_api_url(),
            translate_url: default_translate_url(),
            page_size: default_page_size(),
            request_timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: EnvironmentConfig,
    production: EnvironmentConfig,
}

impl EnvironmentConfig {
    /// Load configuration based on environment. `config.yaml` is optional;
    /// without it the built-in defaults apply.
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);

        let config_path = PathBuf::from(CONFIG_FILE);
        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path, &environment)?
        } else {
            Self::default()
        };

        if let Ok(dir) = std::env::var("ZENSEARCH_DATA_DIR") {
            config.data_path = PathBuf::from(dir);
        }

        config.data_path = Self::resolve_path(&config.data_path)?;
        Ok(config)
    }

    fn get_environment() -> String {
        std::env::var("ZENSEARCH_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .or_else(|_| std::env::var("ENV"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn load_from_file(config_path: &Path, environment: &str) -> Result<Self> {
        let config_content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        Self::parse(&config_content, environment)
            .with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    fn parse(content: &str, environment: &str) -> Result<Self> {
        let config_file: ConfigFile = serde_yaml::from_str(content)?;

        Ok(match environment {
            "production" => config_file.production,
            _ => config_file.local,
        })
    }

    fn resolve_path(path: &Path) -> Result<PathBuf> {
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            let current_dir = std::env::current_dir().context("Failed to get current directory")?;
            Ok(current_dir.join(path))
        }
    }

    /// Override the data directory (e.g. from the `--data-dir` flag)
    pub fn with_data_path(mut self, path: &Path) -> Result<Self> {
        self.data_path = Self::resolve_path(path)?;
        Ok(self)
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig::new(&self.data_path)
            .with_api_url(self.api_url.clone())
            .with_translate_url(self.translate_url.clone())
            .with_page_size(self.page_size)
            .with_timeout_secs(self.request_timeout_secs)
    }

    /// Ensure the data and per-company output directories exist
    pub async fn ensure_directories(&self) -> Result<()> {
        let config = self.pipeline_config();
        for dir in [&config.data_dir, &config.individual_dir] {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }

        info!("All configured directories ensured to exist");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
local:
  data_path: ./zensearchData
production:
  data_path: /var/lib/zensearch
  api_url: https://proxy.internal/api/postings
  page_size: 25
"#;

    #[test]
    fn test_parse_selects_environment() {
        let local = EnvironmentConfig::parse(SAMPLE, "local").unwrap();
        assert_eq!(local.data_path, PathBuf::from("./zensearchData"));
        assert_eq!(local.api_url, DEFAULT_API_URL);
        assert_eq!(local.page_size, 50);

        let prod = EnvironmentConfig::parse(SAMPLE, "production").unwrap();
        assert_eq!(prod.data_path, PathBuf::from("/var/lib/zensearch"));
        assert_eq!(prod.api_url, "https://proxy.internal/api/postings");
        assert_eq!(prod.page_size, 25);
        assert_eq!(prod.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_unknown_environment_falls_back_to_local() {
        let config = EnvironmentConfig::parse(SAMPLE, "staging").unwrap();
        assert_eq!(config.data_path, PathBuf::from("./zensearchData"));
    }

    #[test]
    fn test_parse_rejects_missing_sections() {
        assert!(EnvironmentConfig::parse("local: {}\n", "local").is_err());
    }

    #[tokio::test]
    async fn test_ensure_directories_creates_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let config = EnvironmentConfig::default()
            .with_data_path(&tmp.path().join("data"))
            .unwrap();
        config.ensure_directories().await.unwrap();
        assert!(tmp.path().join("data/individual_csvs").is_dir());
    }
}
