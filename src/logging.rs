use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use crate::config::Config;

/// Filter from `RUST_LOG`, falling back to the configured level
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Send tracing output to the log file. Nothing goes to the terminal so the
/// TUI screen and CLI output stay clean.
pub fn init(config: &Config) -> std::io::Result<PathBuf> {
    let log_path = config.get_log_path();
    init_at(&log_path, &config.logging.level)?;
    Ok(log_path)
}

fn init_at(log_path: &Path, level: &str) -> std::io::Result<()> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(log_path)?;

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true);

    // A second init (tests, repeated calls) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(build_filter(level))
        .with(file_layer)
        .try_init();

    tracing::debug!(path = ?log_path, "logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_the_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("gifts.log");
        init_at(&path, "debug").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn bad_level_falls_back() {
        // Must not panic on a malformed directive
        let _ = build_filter("=== nonsense");
    }
}
