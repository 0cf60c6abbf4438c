//! Rolling Logger
//!
//! Installs a tracing subscriber that writes to stderr and to a size-rotated
//! log file, and keeps the most recent lines in a circular in-memory buffer.
//! `log` records are bridged into tracing, so library code may use either
//! facade.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Tuning knobs for the file writer and the in-memory buffer
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Rotate once the active file grows past this many bytes
    pub max_file_bytes: u64,
    /// Number of rotated files kept next to the active one
    pub max_files: usize,
    /// Lines retained by `recent_lines`
    pub buffer_lines: usize,
    /// Filter used when `RUST_LOG` is not set
    pub default_filter: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: 5 * 1024 * 1024,
            max_files: 3,
            buffer_lines: 500,
            default_filter: "info".to_string(),
        }
    }
}

#[derive(Debug)]
pub enum LoggerError {
    Io(io::Error),
    AlreadyInitialized,
    NotInitialized,
}

impl std::fmt::Display for LoggerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoggerError::Io(e) => write!(f, "Log file error: {}", e),
            LoggerError::AlreadyInitialized => write!(f, "Logger already initialized"),
            LoggerError::NotInitialized => write!(f, "Logger not initialized"),
        }
    }
}

impl std::error::Error for LoggerError {}

impl From<io::Error> for LoggerError {
    fn from(e: io::Error) -> Self {
        LoggerError::Io(e)
    }
}

/// Size-rotated log file plus the circular buffer of recent lines
pub struct RollingFile {
    dir: PathBuf,
    app_name: String,
    file: File,
    written: u64,
    recent: VecDeque<String>,
    config: LoggerConfig,
}

impl RollingFile {
    pub fn open(dir: &Path, app_name: &str, config: LoggerConfig) -> Result<Self, LoggerError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.log", app_name));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();

        let mut rolling = Self {
            dir: dir.to_path_buf(),
            app_name: app_name.to_string(),
            file,
            written,
            recent: VecDeque::with_capacity(config.buffer_lines),
            config,
        };
        let banner = format!(
            "--- {} log opened at {} ---\n",
            rolling.app_name,
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f")
        );
        rolling.append(banner.as_bytes())?;
        Ok(rolling)
    }

    pub fn active_path(&self) -> PathBuf {
        self.dir.join(format!("{}.log", self.app_name))
    }

    fn rotated_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{}.log.{}", self.app_name, index))
    }

    /// Shift `app.log.N-1 -> app.log.N`, move the active file to `.1`, reopen.
    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        if self.config.max_files == 0 {
            self.file = File::create(self.active_path())?;
            self.written = 0;
            return Ok(());
        }

        let oldest = self.rotated_path(self.config.max_files);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for index in (1..self.config.max_files).rev() {
            let from = self.rotated_path(index);
            if from.exists() {
                fs::rename(&from, self.rotated_path(index + 1))?;
            }
        }
        fs::rename(self.active_path(), self.rotated_path(1))?;

        self.file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.active_path())?;
        self.written = 0;
        Ok(())
    }

    pub fn append(&mut self, buf: &[u8]) -> io::Result<()> {
        if self.written > 0 && self.written + buf.len() as u64 > self.config.max_file_bytes {
            self.rotate()?;
        }
        self.file.write_all(buf)?;
        self.written += buf.len() as u64;

        if self.config.buffer_lines > 0 {
            for line in String::from_utf8_lossy(buf).lines() {
                if line.is_empty() {
                    continue;
                }
                if self.recent.len() == self.config.buffer_lines {
                    self.recent.pop_front();
                }
                self.recent.push_back(line.to_string());
            }
        }
        Ok(())
    }

    pub fn recent_lines(&self) -> Vec<String> {
        self.recent.iter().cloned().collect()
    }
}

/// `MakeWriter` handle shared with the fmt layer
#[derive(Clone)]
pub struct RollingHandle {
    inner: Arc<Mutex<RollingFile>>,
}

impl RollingHandle {
    pub fn new(file: RollingFile) -> Self {
        Self {
            inner: Arc::new(Mutex::new(file)),
        }
    }

    pub fn recent_lines(&self) -> Vec<String> {
        match self.inner.lock() {
            Ok(file) => file.recent_lines(),
            Err(poisoned) => poisoned.into_inner().recent_lines(),
        }
    }
}

pub struct RollingWriter {
    inner: Arc<Mutex<RollingFile>>,
}

impl Write for RollingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut file = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;
        file.append(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut file = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;
        file.file.flush()
    }
}

impl<'a> MakeWriter<'a> for RollingHandle {
    type Writer = RollingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        RollingWriter {
            inner: Arc::clone(&self.inner),
        }
    }
}

static HANDLE: OnceLock<RollingHandle> = OnceLock::new();

/// Initialize logging with default settings
pub fn init_logger(log_dir: impl AsRef<Path>, app_name: &str) -> Result<(), LoggerError> {
    init_logger_with(log_dir, app_name, LoggerConfig::default())
}

pub fn init_logger_with(
    log_dir: impl AsRef<Path>,
    app_name: &str,
    config: LoggerConfig,
) -> Result<(), LoggerError> {
    if HANDLE.get().is_some() {
        return Err(LoggerError::AlreadyInitialized);
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_filter.clone()));
    let handle = RollingHandle::new(RollingFile::open(log_dir.as_ref(), app_name, config)?);

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(handle.clone()),
        )
        .try_init()
        .map_err(|_| LoggerError::AlreadyInitialized)?;

    HANDLE
        .set(handle)
        .map_err(|_| LoggerError::AlreadyInitialized)
}

/// Most recent lines written to the log file (oldest first)
pub fn recent_lines() -> Vec<String> {
    HANDLE.get().map(|h| h.recent_lines()).unwrap_or_default()
}

fn ensure_initialized() -> Result<(), LoggerError> {
    if HANDLE.get().is_none() {
        return Err(LoggerError::NotInitialized);
    }
    Ok(())
}

pub fn info(msg: &str) -> Result<(), LoggerError> {
    ensure_initialized()?;
    log::info!("{}", msg);
    Ok(())
}

pub fn warn(msg: &str) -> Result<(), LoggerError> {
    ensure_initialized()?;
    log::warn!("{}", msg);
    Ok(())
}

pub fn error(msg: &str) -> Result<(), LoggerError> {
    ensure_initialized()?;
    log::error!("{}", msg);
    Ok(())
}
