use std::io;
use std::io::ErrorKind;
use std::path::Path;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::{Config, LogLevel};

const MAX_LOG_FILES: usize = 30;

impl From<LogLevel> for LevelFilter {
    fn from(value: LogLevel) -> Self {
        match value {
            // tracing has nothing above ERROR
            LogLevel::Critical | LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// `/var/log/server.log` rotates into `/var/log/server.log.YYYY-MM-DD`.
fn split_location(location: &Path) -> io::Result<(&Path, String)> {
    let file_name = match location.file_name() {
        Some(name) => name.to_string_lossy().to_string(),
        None => return Err(io::Error::new(
            ErrorKind::InvalidInput, format!("Log location {} has no file name", location.display()))),
    };
    let dir = location.parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    Ok((dir, file_name))
}

fn env_filter(level: LevelFilter) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy()
}

fn init_error(e: impl std::fmt::Display) -> io::Error {
    io::Error::new(ErrorKind::Other, format!("Error installing logger: {}", e))
}

/// Installs the global subscriber described by `[log]`. Without that section
/// everything at info and above goes to the console.
///
/// The returned guard flushes the log file when dropped, keep it alive in main.
pub fn configure_logger(config: &Config) -> io::Result<Option<WorkerGuard>> {
    let Some(ref log) = config.log else {
        tracing_subscriber::registry()
            .with(env_filter(LevelFilter::INFO))
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .map_err(init_error)?;
        return Ok(None);
    };

    let mut guard = None;
    let file_layer = match log.location {
        Some(ref location) => {
            let (dir, file_name) = split_location(location)?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(file_name)
                .max_log_files(MAX_LOG_FILES)
                .build(dir)
                .map_err(|e| io::Error::new(
                    ErrorKind::Other, format!("Error creating log file in {}: {}", dir.display(), e)))?;
            let (writer, worker_guard) = tracing_appender::non_blocking(appender);
            guard = Some(worker_guard);
            Some(tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .boxed())
        }
        None => None,
    };

    // warnings and errors on stderr, the rest on stdout
    let console_layer = if log.log_to_console || log.location.is_none() {
        let writer = io::stderr.with_max_level(Level::WARN).or_else(io::stdout);
        Some(tracing_subscriber::fmt::layer().with_writer(writer).boxed())
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter(log.level.into()))
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(init_error)?;

    Ok(guard)
}
