//! Process-wide file logging for the todo list core.
//!
//! # Responsibility
//! - Start one rolling file logger per process from `StoreConfig`.
//! - Keep log lines metadata-only: ids, counts and statuses, never titles or
//!   credentials.
//!
//! # Invariants
//! - Starting twice with identical settings is a no-op.
//! - Starting with different settings after the first start is rejected.
//! - Nothing in here panics.

use crate::config::StoreConfig;
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_BASENAME: &str = "todolists";
const ROTATE_AT_BYTES: u64 = 4 * 1024 * 1024;
const KEEP_LOG_FILES: usize = 3;
const PANIC_SUMMARY_CHARS: usize = 120;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

/// Normalized logger settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: &'static str,
    pub dir: PathBuf,
}

struct ActiveLogger {
    settings: LogSettings,
    _handle: LoggerHandle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggingError {
    UnsupportedLevel(String),
    RelativeDir(String),
    EmptyDir,
    CreateDir { dir: PathBuf, message: String },
    Backend(String),
    AlreadyStarted { active: LogSettings, requested: LogSettings },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected trace|debug|info|warn|error"
            ),
            Self::RelativeDir(dir) => write!(f, "log directory must be absolute, got `{dir}`"),
            Self::EmptyDir => write!(f, "log directory cannot be empty"),
            Self::CreateDir { dir, message } => {
                write!(f, "cannot create log directory `{}`: {message}", dir.display())
            }
            Self::Backend(message) => write!(f, "cannot start file logger: {message}"),
            Self::AlreadyStarted { active, requested } => write!(
                f,
                "logging already runs at {} in `{}`; refusing {} in `{}`",
                active.level,
                active.dir.display(),
                requested.level,
                requested.dir.display()
            ),
        }
    }
}

impl Error for LoggingError {}

impl LogSettings {
    pub fn parse(level: &str, dir: &str) -> Result<Self, LoggingError> {
        Ok(Self {
            level: parse_level(level)?,
            dir: parse_dir(dir)?,
        })
    }
}

/// Starts file logging with an explicit level and absolute directory.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), LoggingError> {
    start(LogSettings::parse(level, log_dir)?)
}

/// Starts file logging when `config` names a log directory.
///
/// Returns `Ok(false)` when no directory is configured and logging stays off.
pub fn init_from_config(config: &StoreConfig) -> Result<bool, LoggingError> {
    let Some(dir) = config.log_dir.as_deref() else {
        return Ok(false);
    };
    init_logging(&config.log_level, dir)?;
    Ok(true)
}

/// Settings of the running logger, if any.
pub fn logging_status() -> Option<LogSettings> {
    ACTIVE.get().map(|active| active.settings.clone())
}

/// `debug` for debug builds, `info` otherwise.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start(requested: LogSettings) -> Result<(), LoggingError> {
    let active = ACTIVE.get_or_try_init(|| spawn_logger(&requested))?;
    if active.settings != requested {
        return Err(LoggingError::AlreadyStarted {
            active: active.settings.clone(),
            requested,
        });
    }
    Ok(())
}

fn spawn_logger(settings: &LogSettings) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(&settings.dir).map_err(|err| LoggingError::CreateDir {
        dir: settings.dir.clone(),
        message: err.to_string(),
    })?;

    let handle = Logger::try_with_str(settings.level)
        .map_err(|err| LoggingError::Backend(err.to_string()))?
        .log_to_file(
            FileSpec::default()
                .directory(settings.dir.as_path())
                .basename(LOG_BASENAME),
        )
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| LoggingError::Backend(err.to_string()))?;

    install_panic_hook();
    info!(
        "event=logging_start module=logging status=ok level={} dir={} version={}",
        settings.level,
        settings.dir.display(),
        env!("CARGO_PKG_VERSION")
    );

    Ok(ActiveLogger {
        settings: settings.clone(),
        _handle: handle,
    })
}

fn parse_level(level: &str) -> Result<&'static str, LoggingError> {
    let level = level.trim().to_ascii_lowercase();
    Ok(match level.as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" | "warning" => "warn",
        "error" => "error",
        _ => return Err(LoggingError::UnsupportedLevel(level)),
    })
}

fn parse_dir(dir: &str) -> Result<PathBuf, LoggingError> {
    let dir = dir.trim();
    if dir.is_empty() {
        return Err(LoggingError::EmptyDir);
    }
    let path = Path::new(dir);
    if path.is_relative() {
        return Err(LoggingError::RelativeDir(dir.to_string()));
    }
    Ok(path.to_path_buf())
}

fn install_panic_hook() {
    if PANIC_HOOK.set(()).is_err() {
        return;
    }

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map_or_else(|| "unknown".to_string(), |loc| format!("{}:{}", loc.file(), loc.line()));
        let payload = info
            .payload()
            .downcast_ref::<&str>()
            .map(|message| (*message).to_string())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_default();
        error!(
            "event=panic module=logging status=error location={location} payload={}",
            one_line(&payload, PANIC_SUMMARY_CHARS)
        );
        previous(info);
    }));
}

// Panic payloads can quote list titles, so keep them short and single-line.
fn one_line(value: &str, max_chars: usize) -> String {
    let mut line: String = value
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .take(max_chars)
        .collect();
    if value.chars().count() > max_chars {
        line.push_str("...");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::{init_from_config, init_logging, logging_status, one_line, LogSettings, LoggingError};
    use crate::config::StoreConfig;

    #[test]
    fn settings_normalize_level_and_require_absolute_dir() {
        let dir = std::env::temp_dir();
        let settings = LogSettings::parse(" Warning ", dir.to_str().unwrap()).unwrap();
        assert_eq!(settings.level, "warn");
        assert_eq!(settings.dir, dir);

        assert!(matches!(
            LogSettings::parse("info", "logs/dev"),
            Err(LoggingError::RelativeDir(_))
        ));
        assert_eq!(LogSettings::parse("info", "  "), Err(LoggingError::EmptyDir));
        assert!(matches!(
            LogSettings::parse("chatty", dir.to_str().unwrap()),
            Err(LoggingError::UnsupportedLevel(level)) if level == "chatty"
        ));
    }

    #[test]
    fn config_without_log_dir_leaves_logging_off() {
        let config = StoreConfig::from_lookup(|_| None).unwrap();
        assert_eq!(init_from_config(&config), Ok(false));
    }

    #[test]
    fn one_line_flattens_and_truncates() {
        assert_eq!(one_line("a\nb\rc", 10), "a b c");
        assert_eq!(one_line("abcdef", 3), "abc...");
    }

    #[test]
    fn second_start_must_match_the_first() {
        let root = tempfile::tempdir().unwrap();
        let first = root.path().join("first");
        let second = root.path().join("second");
        let first_str = first.to_str().unwrap();

        init_logging("info", first_str).unwrap();
        init_logging("INFO", first_str).unwrap();

        assert!(matches!(
            init_logging("debug", first_str),
            Err(LoggingError::AlreadyStarted { .. })
        ));
        assert!(matches!(
            init_logging("info", second.to_str().unwrap()),
            Err(LoggingError::AlreadyStarted { .. })
        ));

        let active = logging_status().unwrap();
        assert_eq!(active.level, "info");
        assert_eq!(active.dir, first);
    }
}
