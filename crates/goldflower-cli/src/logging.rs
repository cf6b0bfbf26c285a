use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{Dispatch, Level};
use tracing_appender::non_blocking::{self, WorkerGuard};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;

pub struct LoggingGuard {
    _guard: WorkerGuard,
    pub log_path: PathBuf,
}

/// Install a JSON subscriber writing to the configured file.
///
/// Logs never go to the terminal, which belongs to the prompts.
pub fn init_logging(logging: &LoggingConfig) -> Result<Option<LoggingGuard>> {
    let Some((dispatch, guard)) = build_dispatch(logging)? else {
        return Ok(None);
    };

    // Ignore error if a global subscriber is already set (e.g., when running in tests)
    let _ = tracing::dispatcher::set_global_default(dispatch);
    Ok(Some(guard))
}

fn build_dispatch(logging: &LoggingConfig) -> Result<Option<(Dispatch, LoggingGuard)>> {
    if !logging.enable_structured {
        return Ok(None);
    }

    let log_path = logging.path.clone();
    if let Some(dir) = log_path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating log directory at {}", dir.display()))?;
    }

    let file = open_log(&log_path)?;
    let (writer, guard) = non_blocking::NonBlockingBuilder::default()
        .lossy(false)
        .finish(file);

    let level = logging.level().unwrap_or(Level::INFO);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .json()
        .with_current_span(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(writer)
        .finish();

    Ok(Some((
        Dispatch::new(subscriber),
        LoggingGuard {
            _guard: guard,
            log_path,
        },
    )))
}

fn open_log(path: &Path) -> Result<File> {
    File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file at {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_logging_installs_nothing() {
        let cfg = LoggingConfig::default();
        assert!(init_logging(&cfg).expect("no error").is_none());
    }

    #[test]
    fn enabled_logging_writes_json_to_nested_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let cfg = LoggingConfig {
            enable_structured: true,
            tracing_level: "info".to_string(),
            path: dir.path().join("nested").join("dealer.jsonl"),
        };
        let (dispatch, guard) = build_dispatch(&cfg).expect("logging").expect("enabled");
        let log_path = guard.log_path.clone();
        assert!(log_path.exists());

        tracing::dispatcher::with_default(&dispatch, || {
            tracing::event!(target: "goldflower::session", Level::INFO, round = 4u64, "dealt");
        });
        drop(guard);

        let contents = fs::read_to_string(&log_path).expect("read log");
        let line = contents.lines().next().expect("one event");
        let event: serde_json::Value = serde_json::from_str(line).expect("json line");
        assert_eq!(event["target"], "goldflower::session");
        assert_eq!(event["fields"]["round"], 4);
    }
}
