use crate::header::HeaderError;
use crate::index::IndexError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Crate-level error type.
///
/// Header and index failures keep their own enums so callers can tell a
/// structurally corrupt package apart from an operation that could not
/// even start (bad argument) or plain I/O trouble.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Corrupt header: {0}")]
    Header(#[from] HeaderError),
    #[error("Corrupt index table: {0}")]
    Index(#[from] IndexError),
    #[error("Source path must be absolute: '{}'", .0.display())]
    SourceNotAbsolute(PathBuf),
    #[error("Source directory not found: '{}'", .0.display())]
    SourceNotFound(PathBuf),
    #[error("Size of '{path}' changed during packing: indexed {indexed} bytes, streamed {actual}")]
    EntrySizeMismatch {
        path: String,
        indexed: u64,
        actual: u64,
    },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
