//! Structured Logger
//!
//! Wraps `tracing` to provide console output, a daily-rolling NDJSON file,
//! and environment-based level control.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global structured logger.
///
/// `RUST_LOG` takes precedence over `level`. Console output is plain text
/// unless `json` is set; the file under `log_dir` is always NDJSON. Calling
/// this twice is harmless: the second call leaves the first subscriber in
/// place.
pub fn init_logger<P: AsRef<Path>>(log_dir: P, level: &str, json: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    // Rolling file appender: writes NDJSON to `hostwatch.log.YYYY-MM-DD`
    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "hostwatch.log");

    let file_layer = fmt::layer()
        .json()
        .with_writer(file_appender)
        .with_ansi(false);

    // Console goes to stderr so command output on stdout stays clean.
    let (plain_console, json_console) = if json {
        (None, Some(fmt::layer().json().with_writer(std::io::stderr)))
    } else {
        (
            Some(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_ansi(true),
            ),
            None,
        )
    };

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(plain_console)
        .with(json_console)
        .with(file_layer)
        .try_init();
}
