//! Tracing subscriber setup for the updater binary

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Filter used when RUST_LOG is unset or invalid
pub const DEFAULT_LOG_FILTER: &str = "info";

/// File name prefix of the daily rolling log
pub const LOG_FILE_NAME: &str = "release-updater.log";

/// Install the global subscriber.
///
/// Always logs to stderr. When `log_dir` is given, also writes JSON lines to a
/// daily rolling file there; keep the returned guard alive until exit so the
/// file writer is flushed.
pub fn init_logging(log_dir: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = log_filter(std::env::var("RUST_LOG").ok());
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let Some(dir) = log_dir else {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .try_init()?;
        return Ok(None);
    };

    std::fs::create_dir_all(dir)?;
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, LOG_FILE_NAME));

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(fmt::layer().json().with_writer(writer))
        .try_init()?;

    Ok(Some(guard))
}

fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_filter_uses_given_directives() {
        let filter = log_filter(Some("release_updater=debug".to_string()));
        assert_eq!(filter.to_string(), "release_updater=debug");
    }

    #[test]
    fn log_filter_falls_back_to_default() {
        assert_eq!(log_filter(None).to_string(), DEFAULT_LOG_FILTER);
    }
}
