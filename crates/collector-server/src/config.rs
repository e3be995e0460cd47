//! Runtime configuration, layered from an optional TOML file and
//! `COLLECTOR_*` environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use collector_core::report::DEFAULT_EXPIRING_WINDOW_DAYS;
use serde::Deserialize;

/// Server settings, deserialised from `collector.toml`.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:                 String,
  pub port:                 u16,
  pub store_path:           PathBuf,
  /// Default look-ahead of the expiring-soon report, in days.
  pub expiring_window_days: i64,
}

impl ServerConfig {
  /// Load from `path` (if it exists), then the environment, over defaults.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 8080)?
      .set_default("store_path", "collector.db")?
      .set_default("expiring_window_days", DEFAULT_EXPIRING_WINDOW_DAYS)?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("COLLECTOR"))
      .build()
      .context("failed to read config file")?;

    let mut cfg: Self = settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")?;
    cfg.store_path = expand_tilde(&cfg.store_path);
    Ok(cfg)
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

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_apply_without_file() {
    let cfg = ServerConfig::load(Path::new("does-not-exist.toml")).unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.expiring_window_days, 14);
  }

  #[test]
  fn plain_paths_are_untouched() {
    assert_eq!(
      expand_tilde(Path::new("data/collector.db")),
      PathBuf::from("data/collector.db")
    );
  }
}
