//! Logging setup.
//!
//! Two layers share one registry:
//! - a human-readable console layer on stderr, quiet unless asked
//! - a JSONL file layer, written through a non-blocking appender
//!
//! The log file location is resolved from `LECAT_LOG_PATH`, then
//! `LECAT_LOG_DIR`, then the `log_dir` config key, then the platform's local
//! data directory. If the directory cannot be created, file logging is
//! skipped and the console layer still works.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

const ENV_LOG_PATH: &str = "LECAT_LOG_PATH";
const ENV_LOG_DIR: &str = "LECAT_LOG_DIR";
const LOG_FILE_NAME: &str = "lecat.jsonl";

/// Where and how loudly to log.
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// JSONL log file, `None` for console only.
    pub log_file: Option<PathBuf>,
    /// Most verbose level shown on stderr.
    pub console_level: LevelFilter,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_file: None,
            console_level: LevelFilter::WARN,
        }
    }
}

impl ObservabilityConfig {
    /// Resolve the log file from the environment, then `config_log_dir`,
    /// then the platform default.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        let log_file = resolve_log_file(
            std::env::var_os(ENV_LOG_PATH).map(PathBuf::from),
            std::env::var_os(ENV_LOG_DIR).map(PathBuf::from),
            config_log_dir,
        );
        Self {
            log_file,
            ..Self::default()
        }
    }

    /// Set the console level from the global `-q` / `-v` flags.
    #[must_use]
    pub const fn with_console_flags(mut self, quiet: bool, verbose: u8) -> Self {
        self.console_level = console_level(quiet, verbose);
        self
    }
}

fn resolve_log_file(
    explicit: Option<PathBuf>,
    env_dir: Option<PathBuf>,
    config_dir: Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path);
    }
    env_dir
        .or(config_dir)
        .or_else(|| {
            lecat_core::config::user_data_local_dir()
                .map(|dir| dir.join("logs").into_std_path_buf())
        })
        .map(|dir| dir.join(LOG_FILE_NAME))
}

const fn console_level(quiet: bool, verbose: u8) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::ERROR,
        (false, 0) => LevelFilter::WARN,
        (false, 1) => LevelFilter::DEBUG,
        (false, _) => LevelFilter::TRACE,
    }
}

/// Build the event filter.
///
/// `RUST_LOG` wins when set. Otherwise `-q` means errors only, `-v` means
/// debug, `-vv` means trace, and the configured level applies.
pub fn env_filter(quiet: bool, verbose: u8, default_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => default_level,
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber.
///
/// Returns the appender guard when file logging is active; keep it alive
/// until exit so buffered lines are flushed.
pub fn init_observability(
    config: &ObservabilityConfig,
    filter: EnvFilter,
) -> anyhow::Result<Option<WorkerGuard>> {
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(config.console_level);

    let (file, guard) = match config.log_file.as_deref().and_then(open_appender) {
        Some((writer, guard)) => {
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_current_span(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()?;
    Ok(guard)
}

fn open_appender(
    path: &Path,
) -> Option<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path.file_name()?;
    std::fs::create_dir_all(dir).ok()?;
    let appender = tracing_appender::rolling::never(dir, file_name);
    Some(tracing_appender::non_blocking(appender))
}
