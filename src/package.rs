//! High-level [`PackageManager`] API — the primary embedding surface.
//!
//! ```no_run
//! use maj::package::PackageManager;
//!
//! let mut pm = PackageManager::new();
//!
//! // Pack a directory tree into a single package file.
//! pm.create("/srv/release", "release.maj")?;
//!
//! // Reconstruct it somewhere else.
//! pm.install("release.maj", "installed")?;
//! # Ok::<(), maj::Error>(())
//! ```

use std::fs::{self, File};
use std::path::Path;

use crate::error::{Error, Result};
use crate::fsutil::create_file_path;
use crate::header::Header;
use crate::index::{IndexEntry, IndexTable};
use crate::io_stream::{MajReader, MajWriter};
use crate::logger::Log;

pub struct PackageManager {
    log: Log,
}

impl PackageManager {
    pub fn new() -> Self {
        Self {
            log: Log::to_stderr(),
        }
    }

    pub fn with_log(log: Log) -> Self {
        Self { log }
    }

    // ── Create ───────────────────────────────────────────────────────────────

    /// Pack `directory` into a package at `outpath`.
    ///
    /// Three phases, each depending on the previous: scan the directory
    /// into an index table, derive the header from the table, then
    /// stream header + index + file data to the destination.  The
    /// destination file is created or overwritten; on a mid-stream
    /// failure the partial file is left behind.
    ///
    /// `directory` must be an absolute path to an existing directory.
    pub fn create<P, Q>(&mut self, directory: P, outpath: Q) -> Result<Header>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let directory = directory.as_ref();
        if !directory.is_absolute() {
            return Err(Error::SourceNotAbsolute(directory.to_owned()));
        }
        if !directory.is_dir() {
            self.log
                .error(&format!("Directory not found '{}'", directory.display()));
            return Err(Error::SourceNotFound(directory.to_owned()));
        }

        self.log.info("Creating index table...");
        let index = IndexTable::from_directory(directory)?;

        self.log.info("Creating header...");
        let header = Header::new(index.encoded_len(), index.data_len());

        self.log.info("Writing package...");
        let mut writer = MajWriter::new(File::create(outpath.as_ref())?);
        writer.pack(&header, directory, &index)?;

        self.log.info("Package has been created!");
        self.log.blank();
        Ok(header)
    }

    // ── Read ─────────────────────────────────────────────────────────────────

    /// Open a package and read its header and index table.
    ///
    /// The returned reader is positioned at the first data byte, ready
    /// for in-order extraction.
    pub fn open<P: AsRef<Path>>(&mut self, package: P) -> Result<MajReader<File>> {
        let file = File::open(package.as_ref())?;
        match MajReader::new(file) {
            Ok(reader) => {
                self.log.info("Header has been read...");
                self.log.info("Index table has been read...");
                self.log.info("Package read!");
                self.log.blank();
                Ok(reader)
            }
            Err(err) => {
                match &err {
                    Error::Header(_) => self.log.error("Could not read header!"),
                    Error::Index(_) => self.log.error("Could not read index table!"),
                    _ => self.log.error("Could not read package!"),
                }
                Err(err)
            }
        }
    }

    // ── Install ──────────────────────────────────────────────────────────────

    /// Install the package into `directory`, reconstructing every
    /// indexed file at its recorded size.
    ///
    /// The destination root is created first; if it already exists the
    /// install proceeds with a warning.  Entries are then extracted
    /// strictly in table order: the data segment has no offsets, so
    /// the stream position after each entry is the next entry's start.
    pub fn install<P, Q>(&mut self, package: P, directory: Q) -> Result<()>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let directory = directory.as_ref();
        if directory.exists() {
            self.log.warning(&format!(
                "Destination directory already exists '{}'",
                directory.display()
            ));
        } else {
            fs::create_dir_all(directory)?;
        }

        let mut reader = self.open(package)?;
        let entries: Vec<IndexEntry> = reader.index.entries().to_vec();
        for entry in &entries {
            let mut file = create_file_path(&entry.host_path(directory))?;
            reader.copy_entry(entry.size, &mut file)?;
        }

        self.log.info("Package installed successfully!");
        Ok(())
    }
}

impl Default for PackageManager {
    fn default() -> Self {
        Self::new()
    }
}
