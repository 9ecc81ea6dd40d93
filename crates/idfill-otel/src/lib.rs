use idfill_core::util::env_flag;
use once_cell::sync::OnceCell;
use std::path::PathBuf;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::{
    fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter,
};

static FILE_GUARD: OnceCell<tracing_appender::non_blocking::WorkerGuard> = OnceCell::new();

/// Targets mirrored into the rolling log file when `IDFILL_LOG_ROLL=1`.
const FILE_TARGETS: &[&str] = &[
    "idfill_store",
    "idfill_ingest",
    "idfill_engine",
    "idfill_cli",
    "idfill.events",
];

const LOG_PREFIX: &str = "idfill";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rotation {
    Minutely,
    Hourly,
    Daily,
}

fn rotation_from(raw: &str) -> Rotation {
    match raw.trim().to_ascii_lowercase().as_str() {
        "hourly" => Rotation::Hourly,
        "minutely" => Rotation::Minutely,
        _ => Rotation::Daily,
    }
}

fn log_dir() -> PathBuf {
    std::env::var("IDFILL_LOG_DIR")
        .ok()
        .filter(|d| !d.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| idfill_core::state_dir().join("logs"))
}

/// Install the global subscriber: console output filtered by `RUST_LOG` (default `info`)
/// plus an optional rolling file. Safe to call more than once.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout carries command output; diagnostics go to stderr.
    let console = fmt::layer().with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry().with(console.with_filter(filter));

    if !env_flag("IDFILL_LOG_ROLL", false) {
        let _ = registry.try_init();
        return;
    }

    let dir = log_dir();
    if std::fs::create_dir_all(&dir).is_err() {
        eprintln!("failed to create log directory {}", dir.display());
    }
    let rotation = rotation_from(
        &std::env::var("IDFILL_LOG_ROTATION").unwrap_or_else(|_| "daily".into()),
    );
    let writer = match rotation {
        Rotation::Hourly => tracing_appender::rolling::hourly(&dir, LOG_PREFIX),
        Rotation::Minutely => tracing_appender::rolling::minutely(&dir, LOG_PREFIX),
        Rotation::Daily => tracing_appender::rolling::daily(&dir, LOG_PREFIX),
    };
    let (nb, guard) = tracing_appender::non_blocking(writer);
    let _ = FILE_GUARD.set(guard);
    let targets = FILE_TARGETS.iter().fold(Targets::new(), |t, target| {
        t.with_target(*target, tracing::Level::INFO)
    });
    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(nb)
        .with_filter(targets);
    let _ = registry.with(file_layer).try_init();
    tracing::debug!(directory = %dir.display(), ?rotation, "rolling log enabled");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn rotation_parses_known_values() {
        assert_eq!(rotation_from("HOURLY"), Rotation::Hourly);
        assert_eq!(rotation_from(" minutely "), Rotation::Minutely);
        assert_eq!(rotation_from("weekly"), Rotation::Daily);
    }

    #[test]
    #[serial]
    fn log_dir_prefers_env() {
        std::env::set_var("IDFILL_LOG_DIR", "/tmp/idfill-logs");
        assert_eq!(log_dir(), PathBuf::from("/tmp/idfill-logs"));
        std::env::set_var("IDFILL_LOG_DIR", "  ");
        assert!(log_dir().ends_with("logs"));
        std::env::remove_var("IDFILL_LOG_DIR");
    }

    #[test]
    #[serial]
    fn repeated_init_is_harmless() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("logs");
        std::env::set_var("IDFILL_LOG_ROLL", "1");
        std::env::set_var("IDFILL_LOG_DIR", &dir);
        init();
        init();
        tracing::info!("still logging");
        std::env::remove_var("IDFILL_LOG_ROLL");
        std::env::remove_var("IDFILL_LOG_DIR");
        assert!(dir.is_dir());
    }
}
