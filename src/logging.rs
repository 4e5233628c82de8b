use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use time::macros::format_description;
use time::UtcOffset;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{self, fmt, prelude::*, EnvFilter};

const LOG_RETENTION: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Session log directory in the user cache directory
/// - Linux: ~/.cache/query-language-server/
/// - macOS: ~/Library/Caches/query-language-server/
/// - Windows: %LOCALAPPDATA%\query-language-server\
fn log_dir() -> io::Result<PathBuf> {
    let mut dir = dirs::cache_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Unable to determine user cache directory"))?;
    dir.push("query-language-server");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Removes `session-*.log` files in `dir` last modified more than
/// `retention` ago. Returns how many were removed.
pub fn cleanup_old_logs(dir: &Path, retention: Duration) -> io::Result<usize> {
    let now = SystemTime::now();
    let mut removed = 0;
    for entry in fs::read_dir(dir)?.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if !(name.starts_with("session-") && name.ends_with(".log")) {
            continue;
        }
        let Ok(metadata) = entry.metadata() else { continue };
        if !metadata.is_file() {
            continue;
        }
        let expired = metadata
            .modified()
            .ok()
            .and_then(|modified| now.duration_since(modified).ok())
            .is_some_and(|age| age > retention);
        if expired {
            match fs::remove_file(entry.path()) {
                Ok(()) => removed += 1,
                Err(e) => eprintln!("Failed to remove old log file {:?}: {}", entry.path(), e),
            }
        }
    }
    Ok(removed)
}

fn session_id() -> String {
    let timestamp = time::OffsetDateTime::now_utc()
        .format(format_description!("[year][month][day]-[hour][minute][second]"))
        .unwrap_or_else(|_| "unknown".to_string());
    format!("{}-{}", timestamp, std::process::id())
}

/// Installs the global subscriber: stderr at `log_level` (else `RUST_LOG`,
/// else `info`) and, when enabled, a DEBUG session log file.
///
/// The returned guard flushes the file writer and must outlive the server.
/// Calling this twice is not an error; the first subscriber stays installed.
pub fn init_logger(no_color: bool, log_level: Option<&str>, enable_file_logging: bool) -> io::Result<WorkerGuard> {
    let timer = fmt::time::OffsetTime::new(
        UtcOffset::UTC,
        format_description!("[[[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z]"),
    );

    let stderr_filter = match log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_timer(timer.clone())
        .with_ansi(!no_color)
        .with_filter(stderr_filter);

    let (result, guard) = if enable_file_logging {
        let dir = log_dir()?;
        cleanup_old_logs(&dir, LOG_RETENTION)?;
        let log_path = dir.join(format!("session-{}.log", session_id()));
        let file = fs::OpenOptions::new().create(true).append(true).open(&log_path)?;
        let (writer, guard) = tracing_appender::non_blocking(file);
        let file_layer = fmt::layer()
            .with_writer(writer)
            .with_timer(timer)
            .with_ansi(false)
            .with_filter(EnvFilter::new("debug"));
        eprintln!("Logging to file: {:?}", log_path);
        let result = tracing_subscriber::registry().with(stderr_layer).with(file_layer).try_init();
        (result, guard)
    } else {
        let (_, guard) = tracing_appender::non_blocking(io::sink());
        (tracing_subscriber::registry().with(stderr_layer).try_init(), guard)
    };

    match result {
        Ok(()) => Ok(guard),
        Err(e) if e.to_string().contains("already been set") || e.to_string().contains("SetLoggerError") => Ok(guard),
        Err(e) => Err(io::Error::other(e)),
    }
}
