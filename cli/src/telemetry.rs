use std::sync::Once;

use tracing_appender::{
    non_blocking::{NonBlocking, WorkerGuard},
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::settings::LoggingSettings;

pub const DEFAULT_LOG_FILTER: &str = "info";
const LOG_FILE_PREFIX: &str = "ingl";
const MAX_LOG_FILES: usize = 24;

static INIT: Once = Once::new();

/// Installs the global subscriber. Later calls are no-ops.
pub fn setup_telemetry(logging: &LoggingSettings) {
    INIT.call_once(|| {
        let stdout_layer = fmt::layer()
            .with_target(false)
            .with_filter(env_filter(&logging.filter));

        let (file_layer, guard) = match file_writer(logging) {
            Some((writer, guard)) => {
                let layer = fmt::layer()
                    .with_ansi(false)
                    .with_writer(writer)
                    .with_filter(env_filter(&logging.filter));
                (Some(layer), Some(guard))
            }
            None => (None, None),
        };

        tracing_subscriber::registry()
            .with(stdout_layer)
            .with(file_layer)
            .init();

        if let Some(guard) = guard {
            std::mem::forget(guard);
        }
    });
}

/// `RUST_LOG` wins over `configured`; an unparsable filter falls back to
/// [`DEFAULT_LOG_FILTER`].
pub fn env_filter(configured: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Hourly rotated `ingl.*.log` files under the configured directory.
fn file_writer(logging: &LoggingSettings) -> Option<(NonBlocking, WorkerGuard)> {
    if !logging.to_file {
        return None;
    }
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::HOURLY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .max_log_files(MAX_LOG_FILES)
        .build(&logging.directory);
    match appender {
        Ok(appender) => Some(tracing_appender::non_blocking(appender)),
        Err(e) => {
            eprintln!(
                "Cannot log to {}: {}, logging to stdout only",
                logging.directory.display(),
                e
            );
            None
        }
    }
}
