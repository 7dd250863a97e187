//! Timestamped line logger.
//!
//! One call, one line: `[2024-05-01 14:03:22] [INFO] message`, flushed
//! immediately.  The packager only logs at phase boundaries, so the
//! volume is low enough that per-line flushing costs nothing.

use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::{self, Stderr, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    fn label(self) -> &'static str {
        match self {
            Severity::Info => "[INFO]",
            Severity::Warning => "[WARNING]",
            Severity::Error => "[ERROR]",
        }
    }
}

enum Sink {
    Stderr(Stderr),
    File(File),
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Sink::Stderr(stream) => stream.write(buf),
            Sink::File(file) => file.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::Stderr(stream) => stream.flush(),
            Sink::File(file) => file.flush(),
        }
    }
}

pub struct Log {
    sink: Sink,
}

impl Log {
    pub fn to_stderr() -> Self {
        Self {
            sink: Sink::Stderr(io::stderr()),
        }
    }

    /// Append to a log file, creating it if absent.
    pub fn to_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            sink: Sink::File(file),
        })
    }

    pub fn info(&mut self, message: &str) {
        self.line(Severity::Info, message);
    }

    pub fn warning(&mut self, message: &str) {
        self.line(Severity::Warning, message);
    }

    pub fn error(&mut self, message: &str) {
        self.line(Severity::Error, message);
    }

    /// Emit an empty separator line.
    pub fn blank(&mut self) {
        let _ = writeln!(self.sink);
        let _ = self.sink.flush();
    }

    /// `[date time] [severity] message`.  Write failures are swallowed:
    /// logging is observability only and must never abort the operation
    /// being logged.
    pub fn line(&mut self, severity: Severity, message: &str) {
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let _ = writeln!(self.sink, "[{stamp}] {} {message}", severity.label());
        let _ = self.sink.flush();
    }
}

impl Default for Log {
    fn default() -> Self {
        Self::to_stderr()
    }
}
