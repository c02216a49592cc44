//! Process-wide log sink
//!
//! Info and access lines go to stdout or `logging.access_log_file`; warnings
//! and errors go to stderr or `logging.error_log_file`. Files are opened in
//! append mode once, at startup.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

enum Sink {
    Stdout,
    Stderr,
    File(Mutex<File>),
}

impl Sink {
    fn open(path: Option<&str>, console: Self) -> io::Result<Self> {
        match path {
            Some(path) => Ok(Self::File(Mutex::new(open_append(path)?))),
            None => Ok(console),
        }
    }

    fn line(&self, message: &str) {
        match self {
            Self::Stdout => println!("{message}"),
            Self::Stderr => eprintln!("{message}"),
            Self::File(file) => {
                // Nowhere left to report a failed log write
                let _ = writeln!(lock(file), "{message}");
            }
        }
    }
}

pub struct LogWriter {
    access: Sink,
    error: Sink,
}

impl LogWriter {
    fn new(access_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<Self> {
        Ok(Self {
            access: Sink::open(access_log_file, Sink::Stdout)?,
            error: Sink::open(error_log_file, Sink::Stderr)?,
        })
    }

    pub fn write_access(&self, message: &str) {
        self.access.line(message);
    }

    /// Banner and event lines share the access sink
    pub fn write_info(&self, message: &str) {
        self.access.line(message);
    }

    pub fn write_error(&self, message: &str) {
        self.error.line(message);
    }
}

/// Lock, recovering the guard from a poisoned mutex
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Open `path` for appending, creating missing parent directories
fn open_append(path: &str) -> io::Result<File> {
    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global writer. Fails if a log file cannot be opened or the
/// writer was already installed.
pub fn init(access_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<()> {
    let writer = LogWriter::new(access_log_file, error_log_file)?;
    LOG_WRITER
        .set(writer)
        .map_err(|_| io::Error::new(io::ErrorKind::AlreadyExists, "log writer already initialized"))
}

/// The global writer, once `init()` has run
pub fn get() -> Option<&'static LogWriter> {
    LOG_WRITER.get()
}
