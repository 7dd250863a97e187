//! Filesystem helpers shared by the installer.

use std::fs::{self, File};
use std::io;
use std::path::Path;

/// Create every missing parent directory of `path`, then create (or
/// truncate) the file itself and return the open handle.
pub fn create_file_path(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    File::create(path)
}
