//! Shared configuration, preferences, and path helpers for the idfill workspace.

use std::path::PathBuf;

pub mod config;
pub mod prefs;
pub mod util;

pub use config::{load_config, Config, Variant};
pub use prefs::FillDefaults;

pub const STORE_FILE: &str = "records.sqlite";

/// Per-user state directory. `IDFILL_STATE_DIR` wins over the platform default.
pub fn state_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("IDFILL_STATE_DIR") {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    directories::ProjectDirs::from("org", "idfill", "idfill")
        .map(|p| p.data_local_dir().to_path_buf())
        .or_else(|| std::env::var("HOME").ok().map(|h| PathBuf::from(h).join(".idfill")))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Store path from config, falling back to `<state_dir>/records.sqlite`.
pub fn store_path(cfg: &Config) -> PathBuf {
    cfg.store
        .path
        .as_ref()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| state_dir().join(STORE_FILE))
}

/// Load the effective config: `IDFILL_CONFIG`, else `configs/default.toml` when present,
/// else built-in defaults. An invalid file is logged and ignored.
pub fn load_effective_config() -> Config {
    let path = match std::env::var("IDFILL_CONFIG") {
        Ok(p) => Some(PathBuf::from(p)),
        Err(_) => {
            let candidate = PathBuf::from("configs/default.toml");
            candidate.exists().then_some(candidate)
        }
    };
    let Some(path) = path else {
        return Config::default();
    };
    match load_config(&path) {
        Ok(cfg) => cfg,
        Err(err) => {
            tracing::error!(path = %path.display(), error = %err, "invalid config; using defaults");
            Config::default()
        }
    }
}
