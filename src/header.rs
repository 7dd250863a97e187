use crate::codec::{read_u64, write_u64};
use std::io::{self, Read, Write};
use thiserror::Error;
pub const MAGIC: [u8; 4] = [0x00, 0x6D, 0x61, 0x6A];
pub const HEADER_SIZE: u64 = 28;
#[derive(Error, Debug)]
pub enum HeaderError {
    #[error("Invalid magic number")]
    InvalidMagic,
    #[error("Inconsistent sizes: file={file_size} index={index_size} data={data_size}")]
    SizeMismatch {
        file_size: u64,
        index_size: u64,
        data_size: u64,
    },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub file_size: u64,
    pub index_size: u64,
    pub data_size: u64,
}
impl Header {
    pub fn new(index_size: u64, data_size: u64) -> Self {
        Self {
            file_size: HEADER_SIZE + index_size + data_size,
            index_size,
            data_size,
        }
    }
    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(&MAGIC)?;
        write_u64(&mut writer, self.file_size)?;
        write_u64(&mut writer, self.index_size)?;
        write_u64(&mut writer, self.data_size)?;
        Ok(())
    }
    pub fn read<R: Read>(mut reader: R) -> Result<Self, HeaderError> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(HeaderError::InvalidMagic);
        }
        let file_size = read_u64(&mut reader)?;
        let index_size = read_u64(&mut reader)?;
        let data_size = read_u64(&mut reader)?;
        let header = Self {
            file_size,
            index_size,
            data_size,
        };
        if !header.validate() {
            return Err(HeaderError::SizeMismatch {
                file_size,
                index_size,
                data_size,
            });
        }
        Ok(header)
    }
    /// True iff `file_size` accounts for the header, index and data
    /// segments exactly.
    pub fn validate(&self) -> bool {
        HEADER_SIZE
            .checked_add(self.index_size)
            .and_then(|n| n.checked_add(self.data_size))
            == Some(self.file_size)
    }
}
