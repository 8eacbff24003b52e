//! Application configuration: an optional TOML file under `DAHAN_*`
//! environment overrides.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::{Context, Result};
use dahan_sheets::SourceUrls;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  /// SQLite database file. A leading `~/` is expanded.
  pub store_path:         PathBuf,
  /// Published sheet URL for each master-data dimension.
  pub sources:            SourceUrls,
  /// Per-request fetch timeout. Unset means the HTTP client default.
  pub fetch_timeout_secs: Option<u64>,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      store_path:         PathBuf::from("dahan.db"),
      sources:            SourceUrls::default(),
      fetch_timeout_secs: None,
    }
  }
}

impl AppConfig {
  /// Read `path` if it exists, then apply environment overrides such as
  /// `DAHAN_STORE_PATH` or `DAHAN_SOURCES__SPIRIT`.
  pub fn load(path: &Path) -> Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("DAHAN")
          .prefix_separator("_")
          .separator("__"),
      )
      .build()
      .with_context(|| format!("failed to read config file {}", path.display()))?;
    Self::from_settings(settings)
  }

  fn from_settings(settings: config::Config) -> Result<Self> {
    let mut cfg: Self = settings
      .try_deserialize()
      .context("failed to deserialise AppConfig")?;
    cfg.store_path = expand_tilde(&cfg.store_path);
    Ok(cfg)
  }

  pub fn fetch_timeout(&self) -> Option<Duration> {
    self.fetch_timeout_secs.map(Duration::from_secs)
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
