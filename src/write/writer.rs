//! Helper for writing waveform files.
use alloc::string::String;
use core::convert::TryFrom;
use core::mem;

use crate::wbf;
use crate::write::{Error, Result, WritableBuffer};

/// A helper for writing waveform files.
///
/// Writing uses a two phase approach. The first phase reserves the file ranges
/// of the header, the tables and the waveform segments, in file order. This
/// determines every offset that the tables need to point at.
///
/// The second phase writes everything out in the same order. There are debug
/// asserts to assist with checking this.
#[allow(missing_debug_implementations)]
pub struct Writer<'a> {
    buffer: &'a mut dyn WritableBuffer,
    len: usize,

    range_count: usize,
    extra_info_offset: usize,
    extra_info_len: usize,

    mode_count: usize,
    mode_table_offset: usize,
    temperature_tables_offset: usize,
}

impl<'a> Writer<'a> {
    /// Create a new `Writer` for the given buffer.
    pub fn new(buffer: &'a mut dyn WritableBuffer) -> Self {
        Writer {
            buffer,
            len: 0,

            range_count: 0,
            extra_info_offset: 0,
            extra_info_len: 0,

            mode_count: 0,
            mode_table_offset: 0,
            temperature_tables_offset: 0,
        }
    }

    /// Return the current file length that has been reserved.
    pub fn reserved_len(&self) -> usize {
        self.len
    }

    /// Return the current file length that has been written.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Reserve a file range with the given size.
    ///
    /// Returns the offset of the start of the range.
    pub fn reserve(&mut self, len: usize) -> usize {
        let offset = self.len;
        self.len += len;
        offset
    }

    /// Write data.
    ///
    /// This is typically used to write waveform segments.
    pub fn write(&mut self, data: &[u8]) {
        self.buffer.write_bytes(data);
    }

    /// Reserve the range for the file header.
    ///
    /// This must be at the start of the file.
    pub fn reserve_header(&mut self) {
        debug_assert_eq!(self.len, 0);
        self.reserve(mem::size_of::<wbf::Header>());
    }

    /// Write the file header.
    ///
    /// This must be at the start of the file, and all ranges must have been reserved.
    ///
    /// The file size, table offsets and table counts are set by this function.
    /// All other fields are copied from `header`.
    pub fn write_header(&mut self, header: &wbf::Header) -> Result<()> {
        debug_assert_eq!(self.buffer.len(), 0);

        self.buffer
            .reserve(self.len)
            .map_err(|_| Error(String::from("Cannot allocate buffer")))?;

        let filesize = u32::try_from(self.len)
            .map_err(|_| Error(format!("File size {:#x} is too large", self.len)))?;
        let mut header = *header;
        header.filesize = filesize.to_le_bytes();
        header.xwia = address_bytes(self.extra_info_offset)?;
        header.wmta = address_bytes(self.mode_table_offset)?;
        header.mc = count_byte(self.mode_count, "modes")?;
        header.trc = count_byte(self.range_count, "temperature ranges")?;
        self.buffer.write(&header);
        Ok(())
    }

    /// Reserve the range for a temperature range table with the given number of ranges.
    ///
    /// This must directly follow the header.
    pub fn reserve_temperature_ranges(&mut self, range_count: usize) {
        debug_assert_eq!(self.len, wbf::TEMPERATURE_TABLE_OFFSET);
        self.range_count = range_count;
        // Shared bounds and a checksum.
        self.reserve(range_count + 2);
    }

    /// Write the temperature range table.
    ///
    /// `bounds` must contain one more value than the number of ranges.
    pub fn write_temperature_ranges(&mut self, bounds: &[u8]) -> Result<()> {
        debug_assert_eq!(self.buffer.len(), wbf::TEMPERATURE_TABLE_OFFSET);
        if bounds.len() != self.range_count + 1 {
            return Err(Error(format!(
                "Expected {} temperature bounds, found {}",
                self.range_count + 1,
                bounds.len()
            )));
        }
        self.buffer.write_bytes(bounds);
        self.buffer.write_bytes(&[wbf::checksum(bounds)]);
        Ok(())
    }

    /// Reserve the range for an extra information block with the given text length.
    pub fn reserve_extra_info(&mut self, len: usize) -> Result<()> {
        if len > usize::from(u8::MAX) {
            return Err(Error(format!(
                "Extra info length {} is larger than {}",
                len,
                u8::MAX
            )));
        }
        self.extra_info_len = len;
        // Length byte, text, and checksum.
        self.extra_info_offset = self.reserve(len + 2);
        Ok(())
    }

    /// Write the extra information block.
    pub fn write_extra_info(&mut self, text: &[u8]) {
        debug_assert_eq!(self.buffer.len(), self.extra_info_offset);
        debug_assert_eq!(text.len(), self.extra_info_len);
        let len = text.len() as u8;
        self.buffer.write_bytes(&[len]);
        self.buffer.write_bytes(text);
        self.buffer
            .write_bytes(&[len.wrapping_add(wbf::checksum(text))]);
    }

    /// Reserve the range for the mode table and the temperature tables of each mode.
    ///
    /// This must be called after [`Self::reserve_temperature_ranges`].
    pub fn reserve_mode_tables(&mut self, mode_count: usize) {
        self.mode_count = mode_count;
        self.mode_table_offset = self.reserve(mode_count * wbf::POINTER_SIZE);
        self.temperature_tables_offset =
            self.reserve(mode_count * self.range_count * wbf::POINTER_SIZE);
    }

    /// Return the file offset of the temperature table for the given mode.
    pub fn temperature_table_offset(&self, mode: usize) -> usize {
        self.temperature_tables_offset + mode * self.range_count * wbf::POINTER_SIZE
    }

    /// Write the mode table.
    pub fn write_mode_table(&mut self) -> Result<()> {
        debug_assert_eq!(self.buffer.len(), self.mode_table_offset);
        for mode in 0..self.mode_count {
            let pointer = pointer(self.temperature_table_offset(mode))?;
            self.buffer.write(&pointer);
        }
        Ok(())
    }

    /// Write the temperature table for the next mode.
    ///
    /// `addresses` contains the waveform offset for each temperature range.
    pub fn write_temperature_table(&mut self, addresses: &[usize]) -> Result<()> {
        if addresses.len() != self.range_count {
            return Err(Error(format!(
                "Expected {} waveforms per mode, found {}",
                self.range_count,
                addresses.len()
            )));
        }
        for address in addresses {
            let pointer = pointer(*address)?;
            self.buffer.write(&pointer);
        }
        Ok(())
    }
}

fn address_bytes(address: usize) -> Result<[u8; 3]> {
    Ok(pointer(address)?.addr)
}

fn pointer(address: usize) -> Result<wbf::Pointer> {
    u32::try_from(address)
        .ok()
        .and_then(wbf::Pointer::new)
        .ok_or_else(|| Error(format!("Address {:#x} does not fit in 24 bits", address)))
}

fn count_byte(count: usize, what: &str) -> Result<u8> {
    match count.checked_sub(1).map(u8::try_from) {
        Some(Ok(byte)) => Ok(byte),
        _ => Err(Error(format!(
            "Invalid number of {}: {}, must be between 1 and 256",
            what, count
        ))),
    }
}
