//! Logging setup for the CLI using `tracing-subscriber`.
//!
//! The library crates only emit `tracing` events; this module decides where
//! they go and how they look.
//!
//! # Log Levels
//!
//! - `error`: fatal errors
//! - `warn`: adapter fallbacks, empty sheets
//! - `info`: document totals, analysis totals
//! - `debug`: adapter choice, per-unit and per-test progress
//! - `trace`: skipped rows and records, keyword searches

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Crates whose events pass the configured level.
const OWN_CRATES: &[&str] = &[
    "sttm_cli",
    "sttm_core",
    "sttm_ingest",
    "sttm_match",
    "sttm_model",
];

/// Configuration for logging behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level_filter: LevelFilter,
    /// Let `RUST_LOG` override `level_filter` when set.
    pub use_env_filter: bool,
    pub with_timestamps: bool,
    /// Include the module path in each line.
    pub with_target: bool,
    pub with_ansi: bool,
    pub format: LogFormat,
    /// Write to this file instead of stderr.
    pub log_file: Option<PathBuf>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors.
    #[default]
    Pretty,
    /// Single-line format.
    Compact,
    /// JSON lines for machine parsing.
    Json,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level_filter: LevelFilter::WARN,
            use_env_filter: true,
            with_timestamps: false,
            with_target: false,
            with_ansi: true,
            format: LogFormat::default(),
            log_file: None,
        }
    }
}

/// Initialize the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    match &config.log_file {
        Some(path) => init_logging_with_writer(config, SharedFileWriter::open(path)?),
        None => init_logging_with_writer(config, io::stderr),
    }
    Ok(())
}

/// Initialize logging with a custom writer.
pub fn init_logging_with_writer<W>(config: &LogConfig, writer: W)
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let base = fmt::layer()
        .with_writer(writer)
        .with_target(config.with_target);
    let ansi = config.with_ansi;
    let layer: Box<dyn Layer<Registry> + Send + Sync> =
        match (config.format, config.with_timestamps) {
            (LogFormat::Json, _) => base.json().boxed(),
            (LogFormat::Compact, true) => base.compact().with_ansi(ansi).boxed(),
            (LogFormat::Compact, false) => base.compact().with_ansi(ansi).without_time().boxed(),
            (LogFormat::Pretty, true) => base.with_ansi(ansi).boxed(),
            (LogFormat::Pretty, false) => base.with_ansi(ansi).without_time().boxed(),
        };
    tracing_subscriber::registry()
        .with(layer)
        .with(build_env_filter(config))
        .init();
}

/// Appending log file shared by every event writer.
#[derive(Clone)]
pub struct SharedFileWriter {
    file: Arc<Mutex<File>>,
}

impl SharedFileWriter {
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Arc::new(Mutex::new(file)),
        })
    }
}

pub struct SharedFileGuard {
    file: Arc<Mutex<File>>,
}

impl SharedFileGuard {
    fn lock(&self) -> io::Result<MutexGuard<'_, File>> {
        self.file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))
    }
}

impl Write for SharedFileGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock()?.flush()
    }
}

impl<'a> MakeWriter<'a> for SharedFileWriter {
    type Writer = SharedFileGuard;

    fn make_writer(&'a self) -> Self::Writer {
        SharedFileGuard {
            file: Arc::clone(&self.file),
        }
    }
}

/// Our crates at the configured level, everything else at warn.
pub fn default_directives(level: LevelFilter) -> String {
    let level = level.to_string().to_lowercase();
    let mut directives = vec!["warn".to_string()];
    directives.extend(OWN_CRATES.iter().map(|name| format!("{name}={level}")));
    directives.join(",")
}

fn build_env_filter(config: &LogConfig) -> EnvFilter {
    let fallback = || EnvFilter::new(default_directives(config.level_filter));
    if config.use_env_filter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback())
    } else {
        fallback()
    }
}
