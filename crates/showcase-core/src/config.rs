use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::platform;

pub const API_KEY_ENV: &str = "LASTFM_API_KEY";
pub const BASE_URL_ENV: &str = "LASTFM_BASE_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub paging: PagingConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Connection settings for the Last.fm web service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Tag whose chart feeds the album overview when no artist is searched.
    #[serde(default = "default_chart_tag")]
    pub chart_tag: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagingConfig {
    #[serde(default = "default_album_page_size")]
    pub album_page_size: u32,
    /// How many search results are revealed per scroll step.
    #[serde(default = "default_search_page_size")]
    pub search_page_size: usize,
    /// Upper bound on results fetched (and kept) per search.
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "platform::favourites_file")]
    pub favourites_file: PathBuf,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            chart_tag: default_chart_tag(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            album_page_size: default_album_page_size(),
            search_page_size: default_search_page_size(),
            search_limit: default_search_limit(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            favourites_file: platform::favourites_file(),
        }
    }
}

fn default_base_url() -> String {
    "https://ws.audioscrobbler.com/2.0/".to_string()
}

fn default_chart_tag() -> String {
    "rock".to_string()
}

fn default_user_agent() -> String {
    format!("showcase/{}", env!("CARGO_PKG_VERSION"))
}

fn default_album_page_size() -> u32 {
    8
}

fn default_search_page_size() -> usize {
    6
}

fn default_search_limit() -> u32 {
    30
}

impl Config {
    /// Load `config.toml` from the config dir, writing defaults on first run,
    /// then apply environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::load_from(&Self::config_path())?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn load_from(config_path: &Path) -> anyhow::Result<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    /// Non-empty `LASTFM_API_KEY` / `LASTFM_BASE_URL` win over the file.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(API_KEY_ENV).filter(|v| !v.trim().is_empty()) {
            self.api.api_key = key.trim().to_string();
        }
        if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.api.api_key.is_empty());
        assert_eq!(config.api.base_url, "https://ws.audioscrobbler.com/2.0/");
        assert_eq!(config.api.chart_tag, "rock");
        assert_eq!(config.paging.album_page_size, 8);
        assert_eq!(config.paging.search_page_size, 6);
        assert_eq!(config.paging.search_limit, 30);
        assert!(config
            .paths
            .favourites_file
            .ends_with("artist-showcase-storage.json"));
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [api]
            api_key = "abc123"

            [paging]
            album_page_size = 12
            "#,
        )
        .unwrap();
        assert_eq!(config.api.api_key, "abc123");
        assert_eq!(config.api.chart_tag, "rock");
        assert_eq!(config.paging.album_page_size, 12);
        assert_eq!(config.paging.search_limit, 30);
    }

    #[test]
    fn test_env_overrides_only_non_empty_values() {
        let mut config = Config::default();
        config.api.api_key = "from-file".into();
        config.apply_env(|key| match key {
            API_KEY_ENV => Some("  ".into()),
            BASE_URL_ENV => Some("http://127.0.0.1:9000/2.0/".into()),
            _ => None,
        });
        assert_eq!(config.api.api_key, "from-file");
        assert_eq!(config.api.base_url, "http://127.0.0.1:9000/2.0/");
    }

    #[test]
    fn test_load_from_writes_defaults_on_first_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.paging.album_page_size, 8);

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.api.base_url, config.api.base_url);
    }
}
