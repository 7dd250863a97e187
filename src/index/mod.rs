//! The package index table: an ordered `path → size` mapping.
//!
//! Iteration order is part of the wire protocol.  The data segment is a
//! plain concatenation with no per-entry offsets, so readers and writers
//! must walk the table in the exact order its records were written; the
//! table is therefore kept as an explicitly ordered list, never an
//! unordered map.

use crate::codec::{encode_u64, read_u64};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Index entry path is not valid UTF-8")]
    InvalidPath(#[from] std::string::FromUtf8Error),
    #[error("File name is not valid UTF-8: '{}'", .0.display())]
    NonUtf8Name(PathBuf),
    #[error("Index entry overruns the {budget}-byte index segment")]
    Desynchronized { budget: u64 },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A single file record: archive-relative path and byte length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// `/`-separated path relative to the package root.
    pub path: String,
    pub size: u64,
}

impl IndexEntry {
    /// Map the archive-relative path onto a host path under `base`.
    pub fn host_path(&self, base: &Path) -> PathBuf {
        let mut full = base.to_path_buf();
        full.extend(self.path.split('/'));
        full
    }

    /// On-disk record length: the 8-byte path length prefix, the path
    /// bytes, then the 8-byte file size.
    fn encoded_len(&self) -> u64 {
        16 + self.path.len() as u64
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexTable {
    entries: Vec<IndexEntry>,
}

impl IndexTable {
    /// Recursively enumerate every regular file under `root`.
    ///
    /// Directory children are visited depth-first in sorted name order,
    /// so the canonical entry order is stable across platforms.
    /// Directories themselves never become entries; each file's size is
    /// whatever the filesystem reports at enumeration time.
    pub fn from_directory(root: &Path) -> Result<Self, IndexError> {
        let mut entries = Vec::new();
        collect_files(root, "", &mut entries)?;
        Ok(Self { entries })
    }

    /// Decode a table from exactly `index_size` bytes of `reader`.
    ///
    /// Each record is `{ path_len: 8 BE, path: path_len bytes UTF-8,
    /// size: 8 BE }`.  A record that would run past the declared segment
    /// length means the package is corrupt; the read fails loudly rather
    /// than truncating to a partial table.
    pub fn read<R: Read>(mut reader: R, index_size: u64) -> Result<Self, IndexError> {
        let mut entries = Vec::new();
        let mut remaining = index_size;
        while remaining > 0 {
            if remaining < 16 {
                return Err(IndexError::Desynchronized { budget: index_size });
            }
            let path_len = read_u64(&mut reader)?;
            let record_len = path_len
                .checked_add(16)
                .filter(|len| *len <= remaining)
                .ok_or(IndexError::Desynchronized { budget: index_size })?;
            let mut raw = vec![0u8; path_len as usize];
            reader.read_exact(&mut raw)?;
            let path = String::from_utf8(raw)?;
            let size = read_u64(&mut reader)?;
            entries.push(IndexEntry { path, size });
            remaining -= record_len;
        }
        Ok(Self { entries })
    }

    /// Serialize every record in canonical order.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len() as usize);
        for entry in &self.entries {
            out.extend_from_slice(&encode_u64(entry.path.len() as u64));
            out.extend_from_slice(entry.path.as_bytes());
            out.extend_from_slice(&encode_u64(entry.size));
        }
        out
    }

    /// Byte length of the serialized table.
    pub fn encoded_len(&self) -> u64 {
        self.entries.iter().map(IndexEntry::encoded_len).sum()
    }

    /// Total byte length of the data segment.
    pub fn data_len(&self) -> u64 {
        self.entries.iter().map(|entry| entry.size).sum()
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a IndexTable {
    type Item = &'a IndexEntry;
    type IntoIter = std::slice::Iter<'a, IndexEntry>;
    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn collect_files(
    dir: &Path,
    prefix: &str,
    entries: &mut Vec<IndexEntry>,
) -> Result<(), IndexError> {
    let mut children: Vec<fs::DirEntry> = fs::read_dir(dir)?.collect::<io::Result<_>>()?;
    children.sort_by_key(fs::DirEntry::file_name);
    for child in children {
        let name = child
            .file_name()
            .into_string()
            .map_err(|_| IndexError::NonUtf8Name(child.path()))?;
        let relative = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}/{name}")
        };
        if child.file_type()?.is_dir() {
            collect_files(&child.path(), &relative, entries)?;
        } else {
            let size = child.metadata()?.len();
            entries.push(IndexEntry {
                path: relative,
                size,
            });
        }
    }
    Ok(())
}
