//! Streaming package engine — writer and reader.
//!
//! # Writer
//! [`MajWriter`] turns a scanned [`IndexTable`] into a complete package:
//! header first, then the serialized index, then every file's bytes in
//! table order.  Files are streamed in fixed-size chunks, so nothing
//! larger than one chunk is ever held in memory.
//!
//! # Reader
//! [`MajReader`] consumes the same stream in the same order.  The format
//! stores no per-entry offsets, so the reader never seeks: once the
//! header and index are read the stream cursor sits at the first data
//! byte, and each [`MajReader::copy_entry`] call advances it by exactly
//! one entry.  Skipping an entry or copying the wrong byte count
//! desynchronizes every entry after it.
//!
//! # Endianness
//! All integer fields are strictly big-endian; see `codec` and `header`
//! for field-level documentation.  No runtime negotiation is ever
//! performed.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::header::Header;
use crate::index::IndexTable;

/// Default streaming chunk size: 32 KiB.  A tuning knob, not a format
/// invariant.
pub const DEFAULT_CHUNK_SIZE: usize = 32 * 1024;

// ── Writer ───────────────────────────────────────────────────────────────────

pub struct MajWriter<W: Write> {
    writer: W,
    chunk_size: usize,
}

impl<W: Write> MajWriter<W> {
    pub fn new(writer: W) -> Self {
        Self::with_chunk_size(writer, DEFAULT_CHUNK_SIZE)
    }

    pub fn with_chunk_size(writer: W, chunk_size: usize) -> Self {
        Self {
            writer,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Write the complete package: `header`, the serialized index, then
    /// every indexed file under `root` in table order, flushing after
    /// each file.
    ///
    /// `header` must have been built from `index`.  The index records
    /// each file's size as seen at scan time, and a file that streams a
    /// different byte count here would silently shift every later
    /// entry's data, so the mismatch is an error instead.  On failure
    /// the partially written package is left behind.
    pub fn pack(&mut self, header: &Header, root: &Path, index: &IndexTable) -> Result<()> {
        header.write(&mut self.writer)?;
        self.writer.write_all(&index.to_bytes())?;
        for entry in index {
            let mut file = File::open(entry.host_path(root))?;
            let copied = self.copy_file(&mut file)?;
            if copied != entry.size {
                return Err(Error::EntrySizeMismatch {
                    path: entry.path.clone(),
                    indexed: entry.size,
                    actual: copied,
                });
            }
            self.writer.flush()?;
        }
        Ok(())
    }

    fn copy_file(&mut self, file: &mut File) -> io::Result<u64> {
        let mut buf = vec![0u8; self.chunk_size];
        let mut copied = 0u64;
        loop {
            let n = file.read(&mut buf)?;
            if n == 0 {
                return Ok(copied);
            }
            self.writer.write_all(&buf[..n])?;
            copied += n as u64;
        }
    }
}

// ── Reader ───────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct MajReader<R: Read> {
    reader: R,
    pub header: Header,
    pub index: IndexTable,
    chunk_size: usize,
}

impl<R: Read> MajReader<R> {
    /// Read the header, then the index table using the header's declared
    /// index size as an exact byte budget.
    ///
    /// A header failure aborts before the index is touched; an index
    /// failure aborts before any data byte is consumed.  On success the
    /// reader is positioned at the first byte of the data segment.
    pub fn new(mut reader: R) -> Result<Self> {
        let header = Header::read(&mut reader)?;
        let index = IndexTable::read(&mut reader, header.index_size)?;
        Ok(Self {
            reader,
            header,
            index,
            chunk_size: DEFAULT_CHUNK_SIZE,
        })
    }

    /// Copy the next entry's bytes into `out`.
    ///
    /// `size` must be the recorded size of the entry at the current
    /// stream position; entries must be consumed strictly in table
    /// order.
    pub fn copy_entry<W: Write>(&mut self, size: u64, out: &mut W) -> io::Result<()> {
        let mut buf = vec![0u8; self.chunk_size];
        let mut remaining = size;
        while remaining > 0 {
            let want = remaining.min(buf.len() as u64) as usize;
            self.reader.read_exact(&mut buf[..want])?;
            out.write_all(&buf[..want])?;
            remaining -= want as u64;
        }
        Ok(())
    }
}
