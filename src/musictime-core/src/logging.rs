use crate::{config::LoggingConfig, paths::AppDirs};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{fmt, EnvFilter};

/// Keeps the non-blocking file appender alive; drop it last.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Install the global subscriber: stdout (optional) plus a daily-rolling log
/// file under the app's log directory, pruning the oldest files beyond the
/// configured count.
pub fn init_logging(config: &LoggingConfig, dirs: &AppDirs) -> Result<LoggingGuard, LoggingError> {
    let log_dir = dirs.log_dir().to_path_buf();
    fs::create_dir_all(&log_dir).map_err(|source| LoggingError::CreateDirectory {
        path: log_dir.clone(),
        source,
    })?;

    let directive = config.level.as_filter_directive();
    let env_filter = EnvFilter::try_new(directive).map_err(|source| LoggingError::ParseLevel {
        level: directive.to_string(),
        source,
    })?;

    let file_stem = config.file_name.as_deref().unwrap_or("musictime.log");
    prune_old_logs(&log_dir, file_stem, config.max_log_files.max(1))?;
    let appender = tracing_appender::rolling::daily(&log_dir, file_stem);
    let (file_writer, file_guard) = tracing_appender::non_blocking(appender);

    let writer = if config.stdout {
        BoxMakeWriter::new(
            std::io::stdout
                .with_max_level(tracing::Level::TRACE)
                .and(file_writer),
        )
    } else {
        BoxMakeWriter::new(file_writer)
    };

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(config.stdout)
        .with_writer(writer)
        .try_init()
        .map_err(LoggingError::SubscriberInstall)?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Delete the oldest matching log files so at most `max_files` remain before
/// today's appender adds its own.
fn prune_old_logs(dir: &Path, file_stem: &str, max_files: usize) -> Result<(), LoggingError> {
    let entries = fs::read_dir(dir).map_err(|source| LoggingError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut logs: Vec<(PathBuf, std::time::SystemTime)> = Vec::new();
    for entry in entries.filter_map(|e| e.ok()) {
        if !entry.file_name().to_string_lossy().starts_with(file_stem) {
            continue;
        }
        if let Some(mtime) = entry.metadata().ok().and_then(|m| m.modified().ok()) {
            logs.push((entry.path(), mtime));
        }
    }

    if logs.len() <= max_files {
        return Ok(());
    }
    logs.sort_by_key(|(_, mtime)| *mtime);
    let overflow = logs.len() - max_files;
    for (path, _) in logs.into_iter().take(overflow) {
        fs::remove_file(&path).map_err(|source| LoggingError::Prune { path, source })?;
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to create log directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse log level {level}: {source}")]
    ParseLevel {
        level: String,
        source: tracing_subscriber::filter::ParseError,
    },
    #[error("failed to install tracing subscriber: {0}")]
    SubscriberInstall(Box<dyn std::error::Error + Send + Sync>),
    #[error("failed to list log directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to remove old log file {path}: {source}")]
    Prune { path: PathBuf, source: std::io::Error },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn filter_directive_is_lowercase() {
        assert_eq!(LogLevel::Info.as_filter_directive(), "info");
        assert_eq!(LogLevel::Warn.as_filter_directive(), "warn");
    }

    #[test]
    fn prune_keeps_newest_logs() {
        let dir = tempdir().unwrap();
        for i in 0..5 {
            let f = File::create(dir.path().join(format!("musictime.log.2026-08-2{i}"))).unwrap();
            f.sync_all().unwrap();
        }
        File::create(dir.path().join("unrelated.txt")).unwrap();

        prune_old_logs(dir.path(), "musictime.log", 3).unwrap();
        let remaining = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("musictime.log"))
            .count();
        assert_eq!(remaining, 3);
        assert!(dir.path().join("unrelated.txt").exists());
    }
}
