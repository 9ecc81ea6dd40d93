//! Persisted fill defaults (sub-district and block) kept in a small JSON file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::DefaultsConfig;

pub const PREFS_FILE: &str = "prefs.json";

/// The two free-text values applied during the deferred fill phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillDefaults {
    #[serde(default)]
    pub sub_district: String,
    #[serde(default)]
    pub block: String,
}

impl FillDefaults {
    pub fn from_config(cfg: &DefaultsConfig) -> Self {
        Self {
            sub_district: cfg.sub_district.clone().unwrap_or_default(),
            block: cfg.block.clone().unwrap_or_default(),
        }
    }
}

pub fn prefs_path(state_dir: &Path) -> PathBuf {
    state_dir.join(PREFS_FILE)
}

/// Load preferences from `path`, or `fallback` when the file does not exist yet.
pub fn load_prefs(path: &Path, fallback: FillDefaults) -> Result<FillDefaults> {
    match std::fs::read(path) {
        Ok(bytes) => serde_json::from_slice(&bytes)
            .with_context(|| format!("parsing preferences {}", path.display())),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(fallback),
        Err(err) => Err(err).with_context(|| format!("reading preferences {}", path.display())),
    }
}

pub fn save_prefs(path: &Path, prefs: &FillDefaults) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let body = serde_json::to_vec_pretty(prefs)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, body).with_context(|| format!("writing {}", tmp.display()))?;
    std::fs::rename(&tmp, path).with_context(|| format!("replacing {}", path.display()))?;
    Ok(())
}
