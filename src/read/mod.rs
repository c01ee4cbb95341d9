//! Interface for reading waveform files.
//!
//! ## Decoding a file
//!
//! [`WbfFile::parse`] decodes and validates the complete file: the header,
//! the temperature range table, the extra information block, the mode graph
//! and every waveform segment. The first integrity violation stops the decode.
//!
//! ## Lower level API
//!
//! The building blocks used by [`WbfFile`] are public as well:
//! [`WbfHeader`], [`TemperatureRangeTable`], [`ExtraInfo`], [`PointerTable`],
//! [`WaveformRegistry`] and [`Waveform`]. They can be used to inspect a file
//! that does not validate as a whole.

use core::{fmt, result};

mod read_ref;
pub use read_ref::*;

mod header;
pub use header::*;

mod temperature;
pub use temperature::*;

mod extra_info;
pub use extra_info::*;

mod pointer;
pub use pointer::*;

mod registry;
pub use registry::*;

mod waveform;
pub use waveform::*;

mod file;
pub use file::*;

/// The kind of a read error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The data is shorter than a structure requires, or an offset points
    /// outside of the data.
    TruncatedInput,
    /// The file size stored in the header does not match the data length.
    SizeMismatch,
    /// A stored checksum does not match the checksummed bytes.
    Integrity,
    /// The file references more distinct waveforms than the format allows.
    CapacityExceeded,
    /// An internal consistency check failed.
    Invariant,
}

/// The part of the file that an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// The fixed size header.
    Header,
    /// The temperature range table following the header.
    TemperatureRanges,
    /// The extra waveform information block.
    ExtraInfo,
    /// The table of per-mode pointers.
    ModeTable,
    /// The table of per-temperature pointers for a mode.
    TemperatureTable {
        /// The index of the mode in the mode table.
        mode: usize,
    },
    /// The waveform address registry.
    Waveforms,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Table::Header => f.write_str("header"),
            Table::TemperatureRanges => f.write_str("temperature range table"),
            Table::ExtraInfo => f.write_str("extra info block"),
            Table::ModeTable => f.write_str("mode table"),
            Table::TemperatureTable { mode } => write!(f, "temperature table of mode {}", mode),
            Table::Waveforms => f.write_str("waveform registry"),
        }
    }
}

/// The error type used within the read module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    message: &'static str,
    table: Option<Table>,
    index: Option<usize>,
    offset: Option<usize>,
    expected: Option<usize>,
    found: Option<usize>,
}

impl Error {
    #[inline]
    pub(crate) fn new(kind: ErrorKind, message: &'static str) -> Self {
        Error {
            kind,
            message,
            table: None,
            index: None,
            offset: None,
            expected: None,
            found: None,
        }
    }

    #[inline]
    pub(crate) fn truncated(message: &'static str) -> Self {
        Self::new(ErrorKind::TruncatedInput, message)
    }

    #[inline]
    pub(crate) fn integrity(message: &'static str, expected: u8, found: u8) -> Self {
        Self::new(ErrorKind::Integrity, message).values(expected.into(), found.into())
    }

    #[inline]
    pub(crate) fn table(mut self, table: Table) -> Self {
        self.table = Some(table);
        self
    }

    #[inline]
    pub(crate) fn index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    #[inline]
    pub(crate) fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    #[inline]
    pub(crate) fn values(mut self, expected: usize, found: usize) -> Self {
        self.expected = Some(expected);
        self.found = Some(found);
        self
    }

    /// Get the kind of error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the error message, without location information.
    #[inline]
    pub fn message(&self) -> &'static str {
        self.message
    }

    /// The table containing the offending bytes, if known.
    #[inline]
    pub fn location(&self) -> Option<Table> {
        self.table
    }

    /// The index of the offending entry within its table, if any.
    #[inline]
    pub fn entry(&self) -> Option<usize> {
        self.index
    }

    /// The file offset of the offending bytes, if known.
    #[inline]
    pub fn file_offset(&self) -> Option<usize> {
        self.offset
    }

    /// The expected and found values, if the error compares two values.
    ///
    /// For checksum errors these are the stored and computed checksums.
    /// For size errors these are the declared and actual sizes.
    #[inline]
    pub fn mismatch(&self) -> Option<(usize, usize)> {
        self.expected.zip(self.found)
    }
}

impl fmt::Display for Error {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message)?;
        if let Some(table) = self.table {
            write!(f, " in {}", table)?;
        }
        if let Some(index) = self.index {
            write!(f, " entry {}", index)?;
        }
        if let Some(offset) = self.offset {
            write!(f, " at offset 0x{:x}", offset)?;
        }
        if let Some((expected, found)) = self.mismatch() {
            write!(f, " (expected 0x{:x}, found 0x{:x})", expected, found)?;
        }
        Ok(())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// The result type used within the read module.
pub type Result<T> = result::Result<T, Error>;

trait ReadError<T> {
    fn read_error(self, error: &'static str) -> Result<T>;
}

impl<T> ReadError<T> for result::Result<T, ()> {
    fn read_error(self, error: &'static str) -> Result<T> {
        self.map_err(|()| Error::truncated(error))
    }
}

impl<T> ReadError<T> for Option<T> {
    fn read_error(self, error: &'static str) -> Result<T> {
        self.ok_or(Error::truncated(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn error_display() {
        let error = Error::truncated("Invalid header size").table(Table::Header);
        assert_eq!(error.to_string(), "Invalid header size in header");

        let error = Error::integrity("Invalid pointer checksum", 0x12, 0x13)
            .table(Table::TemperatureTable { mode: 2 })
            .index(5)
            .offset(0x1a4);
        assert_eq!(
            error.to_string(),
            "Invalid pointer checksum in temperature table of mode 2 entry 5 at offset 0x1a4 \
             (expected 0x12, found 0x13)"
        );
        assert_eq!(error.kind(), ErrorKind::Integrity);
        assert_eq!(error.location(), Some(Table::TemperatureTable { mode: 2 }));
        assert_eq!(error.entry(), Some(5));
        assert_eq!(error.file_offset(), Some(0x1a4));
        assert_eq!(error.mismatch(), Some((0x12, 0x13)));
    }

    #[test]
    fn read_error() {
        let result: result::Result<(), ()> = Err(());
        let error = result.read_error("Invalid mode table").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::TruncatedInput);
        assert_eq!(error.message(), "Invalid mode table");
        assert_eq!(error.location(), None);

        assert_eq!(Some(3).read_error("unused"), Ok(3));
    }
}
