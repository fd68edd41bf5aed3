use crate::avatars::DEFAULT_AVATARS;
use crate::months::YearMonth;
use crate::pager::ExhaustionPolicy;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const AUTHOR_ENV: &str = "CHANFEED_AUTHOR";
pub const BASE_URL_ENV: &str = "CHANFEED_BASE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub author: String,
    pub base_url: String,
    pub archive_start: YearMonth,
    pub policy: ExhaustionPolicy,
    pub avatars: Vec<String>,
    pub request_timeout_secs: u64,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            author: "channel".to_string(),
            base_url: String::new(),
            archive_start: YearMonth::january(2020),
            policy: ExhaustionPolicy::default(),
            avatars: DEFAULT_AVATARS.iter().map(|s| s.to_string()).collect(),
            request_timeout_secs: 20,
            log_file: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("chanfeed").join("config.toml"))
    }

    /// Load from `path`, or from the default location when `path` is `None`.
    /// A missing default file yields the defaults; a missing explicit file
    /// is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Overlay values from the environment. `lookup` is `std::env::var`
    /// in the binary and a map in tests.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(author) = lookup(AUTHOR_ENV).filter(|v| !v.is_empty()) {
            self.author = author;
        }
        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|v| !v.is_empty()) {
            self.base_url = base_url;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            bail!(
                "No base URL configured. Set `base_url` in the config file, {} or --base-url",
                BASE_URL_ENV
            );
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            bail!("Base URL must start with http:// or https://: {}", self.base_url);
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be greater than zero");
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("chanfeed")
                .join("chanfeed.log")
        })
    }
}
