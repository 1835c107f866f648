use crate::cache::CacheConfig;
use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub paths: PathsConfig,
    pub cache: CacheSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the lyrics search/scrape backend.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub max_entries: usize,
    pub max_size_bytes: usize,
    pub expiry_days: i64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000/api".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let proj = ProjectDirs::from("dev", "vibelines", "vibelines");
        let data_dir = proj
            .as_ref()
            .map(|p| p.data_dir().to_path_buf())
            .unwrap_or_else(|| std::env::temp_dir().join("vibelines"));
        Self { data_dir }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        let defaults = CacheConfig::default();
        Self {
            max_entries: defaults.max_entries,
            max_size_bytes: defaults.max_bytes,
            expiry_days: 30,
        }
    }
}

impl CacheSettings {
    pub fn to_cache_config(&self) -> CacheConfig {
        CacheConfig {
            max_entries: self.max_entries,
            max_bytes: self.max_size_bytes,
            expiry_ms: self.expiry_days * 24 * 60 * 60 * 1000,
        }
    }
}

#[allow(dead_code)]
pub fn save(cfg: &Config, override_path: Option<&Path>) -> anyhow::Result<()> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
    }
    let raw = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&path, raw).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let proj =
        ProjectDirs::from("dev", "vibelines", "vibelines").context("ProjectDirs unavailable")?;
    Ok(proj.config_dir().join("config.toml"))
}

pub fn load(override_path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    if !path.exists() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }
        let cfg = Config::default();
        let raw = toml::to_string_pretty(&cfg).context("serialize default config")?;
        fs::write(&path, raw).with_context(|| format!("write {}", path.display()))?;
        return Ok(cfg);
    }

    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let cfg = toml::from_str::<Config>(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_cache_limits() {
        let cfg = Config::default();
        let cache = cfg.cache.to_cache_config();
        assert_eq!(cache.max_entries, 10_000);
        assert_eq!(cache.max_bytes, 50 * 1024 * 1024);
        assert_eq!(cache.expiry_ms, 30 * 24 * 60 * 60 * 1000);
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.api.base_url = "http://example.com/api".to_string();
        cfg.cache.expiry_days = 7;
        save(&cfg, Some(&path)).unwrap();

        let loaded = load(Some(&path)).unwrap();
        assert_eq!(loaded.api.base_url, "http://example.com/api");
        assert_eq!(loaded.cache.expiry_days, 7);
        assert_eq!(loaded.api.timeout_secs, 10);
    }

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let cfg = load(Some(&path)).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.api.timeout_secs, 10);
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api]\nbase_url = \"http://x/api\"\n").unwrap();

        let cfg = load(Some(&path)).unwrap();
        assert_eq!(cfg.api.base_url, "http://x/api");
        assert_eq!(cfg.api.timeout_secs, 10);
        assert_eq!(cfg.cache.max_entries, 10_000);
    }
}
