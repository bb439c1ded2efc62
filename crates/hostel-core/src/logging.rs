//! Tracing setup for applications embedding the hostel managers.
//!
//! Logs go to stderr and, when a directory is given, to a daily-rolling
//! file. Use `RUST_LOG` to control the level (e.g. `RUST_LOG=hostel_core=debug`).

use std::path::{Path, PathBuf};

use tracing::debug;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::APP_NAME;

/// Filter used when `RUST_LOG` is unset
const DEFAULT_FILTER: &str = "warn";

/// Prefix for rolling log file names
const LOG_FILE_PREFIX: &str = "hostel-admin.log";

/// Default log directory under the user cache dir.
pub fn default_log_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join(APP_NAME).join("logs"))
}

/// Install the global tracing subscriber.
///
/// Keep the returned guard alive for the life of the program, dropping it
/// flushes the file writer. Calling this again after a subscriber is
/// installed leaves the existing one in place.
pub fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let installed = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .with(filter)
        .try_init();

    if installed.is_err() {
        debug!("Tracing subscriber already installed");
    }
    guard
}
