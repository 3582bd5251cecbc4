use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::domain::{DomainError, LoggingConfig};

/// Default log directory: `<data dir>/PrismQ/logs`.
pub fn default_logs_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("PrismQ").join("logs"))
}

fn crate_filter(level: &str) -> String {
    format!("prismq_lib={level},prismq={level}")
}

/// Initialize logging: console output on stderr, plus a rotating JSON file
/// in `logs_dir` when file logging is enabled.
///
/// Returns a guard that must be kept alive for the duration of the process.
/// When the guard is dropped, any remaining logs are flushed.
pub fn init_logging(
    config: &LoggingConfig,
    logs_dir: &Path,
) -> Result<Option<WorkerGuard>, DomainError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},warn", crate_filter(&config.level))));

    // stdout is reserved for command output
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .with_filter(env_filter);

    if config.file_logging {
        fs::create_dir_all(logs_dir)?;

        let file_appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("prismq")
            .filename_suffix("log")
            .max_log_files(config.max_files)
            .build(logs_dir)
            .map_err(|e| DomainError::Config(format!("cannot create log file: {}", e)))?;

        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .json()
            .with_filter(EnvFilter::new(crate_filter(&config.level)));

        // try_init: a second initialisation (tests) must not panic
        if tracing_subscriber::registry()
            .with(console_layer)
            .with(file_layer)
            .try_init()
            .is_ok()
        {
            tracing::debug!(
                logs_dir = ?logs_dir,
                level = %config.level,
                "Logging initialized with file output"
            );
        }

        Ok(Some(guard))
    } else {
        let _ = tracing_subscriber::registry()
            .with(console_layer)
            .try_init();

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_logging_creates_directory() {
        let dir = TempDir::new().unwrap();
        let logs_dir = dir.path().join("logs");
        let config = LoggingConfig {
            file_logging: true,
            ..LoggingConfig::default()
        };

        let guard = init_logging(&config, &logs_dir).unwrap();
        assert!(guard.is_some());
        assert!(logs_dir.is_dir());
    }

    #[test]
    fn test_console_only_returns_no_guard() {
        let dir = TempDir::new().unwrap();
        let config = LoggingConfig::default();

        let guard = init_logging(&config, dir.path()).unwrap();
        assert!(guard.is_none());
    }
}
