use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "INKPAD_LOG";
pub const LOG_FILE: &str = "inkpad.log";

/// Filter directive from `INKPAD_LOG`, else `inkpad=<level>`.
fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(format!("inkpad={}", level)))
}

/// Send tracing output to a file in the data directory. The terminal belongs
/// to the UI, so when the file cannot be opened logging stays off.
pub fn init(data_dir: &Path, level: &str) -> Option<PathBuf> {
    fs::create_dir_all(data_dir).ok()?;
    let log_path = data_dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok()?;

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter(level))
        .with(file_layer)
        .try_init()
        .ok()?;

    tracing::info!(path = ?log_path, version = env!("CARGO_PKG_VERSION"), "inkpad tracing initialized");
    Some(log_path)
}
