//! Fixed-width integer codec.
//!
//! Every integer field in a `.maj` package (sizes, lengths) is stored as
//! exactly 8 bytes, most-significant byte first.  No sign bit, no variable
//! length, no runtime negotiation.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

/// Encode an unsigned integer as 8 big-endian bytes.
pub fn encode_u64(n: u64) -> [u8; 8] {
    n.to_be_bytes()
}

/// Decode 8 big-endian bytes back into an unsigned integer.
pub fn decode_u64(bytes: [u8; 8]) -> u64 {
    u64::from_be_bytes(bytes)
}

/// Read one 8-byte big-endian integer from a stream.
pub fn read_u64<R: Read>(mut reader: R) -> io::Result<u64> {
    reader.read_u64::<BigEndian>()
}

/// Write one 8-byte big-endian integer to a stream.
pub fn write_u64<W: Write>(mut writer: W, n: u64) -> io::Result<()> {
    writer.write_u64::<BigEndian>(n)
}
