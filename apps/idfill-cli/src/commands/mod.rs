use anyhow::Result;
use idfill_core::Config;
use idfill_store::{RecordStore, StoreOptions};
use std::path::Path;
use std::time::Duration;

pub mod import;
pub mod prefs;
pub mod replay;
pub mod store;

/// An explicit path must parse; otherwise the usual lookup applies.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(p) => idfill_core::load_config(p),
        None => Ok(idfill_core::load_effective_config()),
    }
}

fn store_options(cfg: &Config) -> StoreOptions {
    let mut opts = StoreOptions::default();
    if let Some(ms) = cfg.store.busy_timeout_ms {
        opts.busy_timeout = Duration::from_millis(ms);
    }
    opts
}

/// Open the record store, creating it when missing.
pub fn open_store(cfg: &Config) -> Result<RecordStore> {
    let path = idfill_core::store_path(cfg);
    Ok(RecordStore::open_with(&path, store_options(cfg))?)
}

/// Open the store for lookups. Failure is logged and yields `None` ("no data" mode).
pub fn open_store_for_lookup(cfg: &Config) -> Option<RecordStore> {
    match open_store(cfg) {
        Ok(store) => Some(store),
        Err(err) => {
            tracing::warn!(error = %err, "record store unavailable; continuing without data");
            None
        }
    }
}

pub fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}
