//! Rolling Logger
//!
//! A `tracing` subscriber writing to a size-rotated log file and stderr, with
//! the most recent lines kept in memory for display in the app.
//! `log` records are bridged into tracing, so both macro families work.

use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Rotate once the active file reaches this size
pub const DEFAULT_MAX_BYTES: u64 = 1024 * 1024;
/// Rotated files kept next to the active one
pub const DEFAULT_KEEP: usize = 3;
/// Lines kept in the in-memory ring buffer
pub const DEFAULT_CAPACITY: usize = 500;

static SINK: OnceLock<LogSink> = OnceLock::new();

struct RollingFile {
    dir: PathBuf,
    base: String,
    max_bytes: u64,
    keep: usize,
    file: File,
    size: u64,
}

impl RollingFile {
    fn open(dir: &Path, base: &str, max_bytes: u64, keep: usize) -> io::Result<Self> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.log", base));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let size = file.metadata()?.len();
        Ok(Self { dir: dir.to_path_buf(), base: base.to_string(), max_bytes, keep, file, size })
    }

    fn archive_path(&self, n: usize) -> PathBuf {
        self.dir.join(format!("{}.{}.log", self.base, n))
    }

    /// app.log -> app.1.log -> app.2.log ..., oldest dropped
    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        let oldest = self.archive_path(self.keep);
        if oldest.exists() {
            std::fs::remove_file(&oldest)?;
        }
        for n in (1..self.keep).rev() {
            let from = self.archive_path(n);
            if from.exists() {
                std::fs::rename(&from, self.archive_path(n + 1))?;
            }
        }
        let active = self.dir.join(format!("{}.log", self.base));
        if self.keep > 0 {
            std::fs::rename(&active, self.archive_path(1))?;
        }
        self.file = OpenOptions::new().create(true).write(true).truncate(true).open(&active)?;
        self.size = 0;
        Ok(())
    }

    fn write_record(&mut self, buf: &[u8]) -> io::Result<()> {
        if self.size > 0 && self.size + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        self.file.write_all(buf)?;
        self.size += buf.len() as u64;
        Ok(())
    }
}

struct Inner {
    file: Mutex<RollingFile>,
    recent: Mutex<VecDeque<String>>,
    capacity: usize,
}

/// File + ring-buffer sink; cheap to clone
#[derive(Clone)]
pub struct LogSink {
    inner: Arc<Inner>,
}

impl LogSink {
    pub fn new(dir: &Path, base: &str, max_bytes: u64, keep: usize, capacity: usize) -> io::Result<Self> {
        let file = RollingFile::open(dir, base, max_bytes, keep)?;
        Ok(Self {
            inner: Arc::new(Inner {
                file: Mutex::new(file),
                recent: Mutex::new(VecDeque::with_capacity(capacity)),
                capacity,
            }),
        })
    }

    /// Most recent lines, oldest first
    pub fn recent_lines(&self) -> Vec<String> {
        match self.inner.recent.lock() {
            Ok(recent) => recent.iter().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    fn remember(&self, buf: &[u8]) {
        let Ok(mut recent) = self.inner.recent.lock() else { return };
        for line in String::from_utf8_lossy(buf).lines().filter(|l| !l.is_empty()) {
            if recent.len() == self.inner.capacity {
                recent.pop_front();
            }
            recent.push_back(line.to_string());
        }
    }
}

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        {
            let mut file = self
                .inner
                .file
                .lock()
                .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;
            file.write_record(buf)?;
        }
        if self.inner.capacity > 0 {
            self.remember(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.inner.file.lock() {
            Ok(mut file) => file.file.flush(),
            Err(_) => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for LogSink {
    type Writer = LogSink;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Install the global subscriber. Logs go to `<log_dir>/<app_name>.log` and stderr.
pub fn init_logger(log_dir: PathBuf, app_name: &str) -> Result<(), String> {
    let sink = LogSink::new(&log_dir, app_name, DEFAULT_MAX_BYTES, DEFAULT_KEEP, DEFAULT_CAPACITY)
        .map_err(|e| format!("Failed to open log file in {}: {}", log_dir.display(), e))?;

    tracing_subscriber::registry()
        .with(LevelFilter::INFO)
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(sink.clone()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init()
        .map_err(|e| format!("Failed to install logger: {}", e))?;

    let _ = SINK.set(sink);
    tracing::info!(
        "{} logging to {} (started {})",
        app_name,
        log_dir.display(),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    Ok(())
}

/// Lines captured since `init_logger`, oldest first
pub fn recent_lines() -> Vec<String> {
    SINK.get().map(LogSink::recent_lines).unwrap_or_default()
}

pub fn info(msg: &str) -> Result<(), String> {
    if SINK.get().is_none() {
        return Err("logger not initialized".to_string());
    }
    log::info!("{}", msg);
    Ok(())
}

pub fn error(msg: &str) -> Result<(), String> {
    if SINK.get().is_none() {
        return Err("logger not initialized".to_string());
    }
    log::error!("{}", msg);
    Ok(())
}
