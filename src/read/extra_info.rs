use alloc::borrow::Cow;
use alloc::string::String;
use core::str;

use crate::pod::Bytes;
use crate::read::{Error, ReadError, ReadRef, Result, Table};
use crate::wbf;

/// The extra waveform information block.
///
/// This is free text describing the waveform, commonly the name of the
/// original waveform file. It is stored as a length byte, the text, and a
/// checksum over both.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExtraInfo<'data> {
    payload: Bytes<'data>,
    present: bool,
}

impl<'data> ExtraInfo<'data> {
    /// Parse the block at the given offset.
    ///
    /// An offset of 0 means the file has no block, and returns an empty block.
    pub fn parse<R: ReadRef<'data>>(data: R, offset: usize) -> Result<Self> {
        if offset == 0 {
            return Ok(ExtraInfo::default());
        }
        let locate = |error: Error| error.table(Table::ExtraInfo).offset(offset);
        let mut tail = offset;
        let len = *data
            .read::<u8>(&mut tail)
            .read_error("Extra info offset is past end of file")
            .map_err(locate)?;
        let payload = data
            .read_bytes(&mut tail, len.into())
            .read_error("Extra info text extends past end of file")
            .map_err(locate)?;
        let checksum = *data
            .read::<u8>(&mut tail)
            .read_error("Extra info checksum extends past end of file")
            .map_err(locate)?;
        let computed = len.wrapping_add(wbf::checksum(payload));
        if computed != checksum {
            return Err(locate(Error::integrity(
                "Invalid extra info checksum",
                checksum,
                computed,
            )));
        }
        Ok(ExtraInfo {
            payload: Bytes(payload),
            present: true,
        })
    }

    /// Return true if the file contains the block.
    ///
    /// A present block may still have an empty payload.
    #[inline]
    pub fn is_present(&self) -> bool {
        self.present
    }

    /// The raw text bytes. These may not be printable.
    #[inline]
    pub fn data(&self) -> &'data [u8] {
        self.payload.0
    }

    /// The length of the text in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Return true if the text is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// The text, if it is valid UTF-8.
    #[inline]
    pub fn as_str(&self) -> Option<&'data str> {
        str::from_utf8(self.payload.0).ok()
    }

    /// The text, with invalid UTF-8 sequences replaced.
    #[inline]
    pub fn to_string_lossy(&self) -> Cow<'data, str> {
        String::from_utf8_lossy(self.payload.0)
    }
}
