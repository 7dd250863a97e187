pub mod codec;
pub mod error;
pub mod fsutil;
pub mod header;
pub mod index;
pub mod io_stream;
pub mod logger;
pub mod package;

pub use error::{Error, Result};
pub use header::{Header, HEADER_SIZE, MAGIC};
pub use index::{IndexEntry, IndexTable};
pub use io_stream::{MajReader, MajWriter};
pub use logger::Log;
pub use package::PackageManager;
