//! Tracing setup for the terminal client.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Where log lines go.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// `<dir>/<session>/skirmish.log`
    File { dir: PathBuf, session: String },
}

impl LogTarget {
    /// Interactive sessions log to a file so the prompt stays readable;
    /// AI-only runs log to stderr unless `SKIRMISH_LOG_DIR` is set.
    pub fn choose(interactive: bool, log_dir: Option<PathBuf>, seed: u64) -> Self {
        if !interactive && log_dir.is_none() {
            return LogTarget::Stderr;
        }
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        LogTarget::File {
            dir: log_dir.unwrap_or_else(default_log_dir),
            session: format!("session_{timestamp}_seed{seed}"),
        }
    }
}

/// Platform cache directory, e.g. `~/.cache/skirmish/logs` on Linux.
pub fn default_log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "skirmish")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/tmp/skirmish"))
        .join("logs")
}

/// Installs the global subscriber. Keep the guard alive until exit so the
/// file writer flushes.
pub fn init(target: &LogTarget) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match target {
        LogTarget::Stderr => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
            Ok(None)
        }
        LogTarget::File { dir, session } => {
            let session_dir = dir.join(session);
            std::fs::create_dir_all(&session_dir)
                .with_context(|| format!("creating log directory {}", session_dir.display()))?;

            let appender = tracing_appender::rolling::never(&session_dir, "skirmish.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false),
                )
                .init();

            tracing::info!(session = %session, "logging initialized");
            tracing::info!("log file: {}/skirmish.log", session_dir.display());
            Ok(Some(guard))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ai_only_runs_default_to_stderr() {
        assert_eq!(LogTarget::choose(false, None, 3), LogTarget::Stderr);
    }

    #[test]
    fn explicit_directory_wins() {
        let target = LogTarget::choose(false, Some(PathBuf::from("/var/log/sk")), 9);
        let LogTarget::File { dir, session } = target else {
            panic!("expected a file target");
        };
        assert_eq!(dir, PathBuf::from("/var/log/sk"));
        assert!(session.ends_with("_seed9"));
    }

    #[test]
    fn interactive_sessions_use_the_cache_directory() {
        let LogTarget::File { dir, .. } = LogTarget::choose(true, None, 0) else {
            panic!("expected a file target");
        };
        assert_eq!(dir, default_log_dir());
        assert!(dir.ends_with("logs"));
    }
}
