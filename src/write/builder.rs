use alloc::vec::Vec;

#[cfg(feature = "read")]
use crate::read::{self, ReadRef};
use crate::wbf;
use crate::write::{Error, Result, WritableBuffer, Writer};

/// The parts of a waveform file.
///
/// The file is laid out as the header, the temperature range table, the extra
/// information block, the mode table, the temperature tables of each mode, and
/// then the waveforms in the order they were added. Each waveform is written
/// once, however many temperature table entries refer to it. Waveforms that
/// are not referenced are not written.
#[derive(Debug, Clone, Default)]
pub struct Builder<'data> {
    /// The header fields.
    ///
    /// `filesize`, `xwia`, `wmta`, `mc` and `trc` are replaced when writing.
    /// The checksum fields are written unchanged.
    pub header: wbf::Header,
    /// The shared bounds of the temperature ranges.
    ///
    /// This has one more entry than the number of ranges.
    pub temperature_bounds: Vec<u8>,
    /// The extra information text, if any.
    pub extra_info: Option<&'data [u8]>,
    /// The waveform index for each temperature range of each mode.
    pub modes: Vec<Vec<usize>>,
    /// The waveform segments, including their trailers.
    pub waveforms: Vec<&'data [u8]>,
}

impl<'data> Builder<'data> {
    /// Create an empty builder with the given header fields.
    pub fn new(header: wbf::Header) -> Self {
        Builder {
            header,
            ..Default::default()
        }
    }

    /// Copy the parts of a parsed file.
    #[cfg(feature = "read")]
    pub fn read<R: ReadRef<'data>>(file: &read::WbfFile<'data, R>) -> Self {
        let extra_info = file.extra_info();
        Builder {
            header: *file.raw_header(),
            temperature_bounds: file.temperature_ranges().bounds().to_vec(),
            extra_info: if extra_info.is_present() {
                Some(extra_info.data())
            } else {
                None
            },
            modes: file
                .modes()
                .map(|mode| mode.waveform_indices().to_vec())
                .collect(),
            waveforms: file.waveforms().iter().map(|waveform| waveform.data()).collect(),
        }
    }

    /// Add a waveform segment and return its index.
    pub fn add_waveform(&mut self, data: &'data [u8]) -> usize {
        self.waveforms.push(data);
        self.waveforms.len() - 1
    }

    /// Add a mode and return its index.
    ///
    /// `waveforms` contains a waveform index for each temperature range.
    pub fn add_mode(&mut self, waveforms: Vec<usize>) -> usize {
        self.modes.push(waveforms);
        self.modes.len() - 1
    }

    /// Write the file to a new buffer.
    pub fn write(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.emit(&mut buffer)?;
        Ok(buffer)
    }

    /// Write the file to the given buffer.
    pub fn emit(&self, buffer: &mut dyn WritableBuffer) -> Result<()> {
        let range_count = self
            .temperature_bounds
            .len()
            .checked_sub(1)
            .filter(|count| *count > 0)
            .ok_or_else(|| Error("At least two temperature bounds are required".into()))?;
        if self.modes.is_empty() {
            return Err(Error("At least one mode is required".into()));
        }

        let mut used = vec![false; self.waveforms.len()];
        for (mode, waveforms) in self.modes.iter().enumerate() {
            if waveforms.len() != range_count {
                return Err(Error(format!(
                    "Mode {} has {} waveforms, expected {}",
                    mode,
                    waveforms.len(),
                    range_count
                )));
            }
            for index in waveforms {
                match self.waveforms.get(*index) {
                    Some(data) if data.is_empty() => {
                        return Err(Error(format!("Waveform {} is empty", index)));
                    }
                    Some(_) => used[*index] = true,
                    None => {
                        return Err(Error(format!(
                            "Mode {} refers to missing waveform {}",
                            mode, index
                        )));
                    }
                }
            }
        }

        let mut writer = Writer::new(buffer);

        // Calculate offsets of everything.
        writer.reserve_header();
        writer.reserve_temperature_ranges(range_count);
        if let Some(text) = self.extra_info {
            writer.reserve_extra_info(text.len())?;
        }
        writer.reserve_mode_tables(self.modes.len());
        let mut offsets = vec![0; self.waveforms.len()];
        for (index, data) in self.waveforms.iter().enumerate() {
            if used[index] {
                offsets[index] = writer.reserve(data.len());
            }
        }

        // Start writing.
        writer.write_header(&self.header)?;
        writer.write_temperature_ranges(&self.temperature_bounds)?;
        if let Some(text) = self.extra_info {
            writer.write_extra_info(text);
        }
        writer.write_mode_table()?;
        let mut addresses = Vec::with_capacity(range_count);
        for waveforms in &self.modes {
            addresses.clear();
            addresses.extend(waveforms.iter().map(|index| offsets[*index]));
            writer.write_temperature_table(&addresses)?;
        }
        for (index, data) in self.waveforms.iter().enumerate() {
            if used[index] {
                writer.write(data);
            }
        }
        debug_assert_eq!(writer.len(), writer.reserved_len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> Builder<'static> {
        let mut builder = Builder::new(wbf::Header {
            serial: 0x1234u32.to_le_bytes(),
            cs1: 0xaa,
            ..Default::default()
        });
        builder.temperature_bounds = vec![0, 25, 50];
        builder.extra_info = Some(&b"abc"[..]);
        let a = builder.add_waveform(&[0xe4, 0x00, 0xff, 0x00]);
        let b = builder.add_waveform(&[0x55, 0x01, 0xff, 0x01]);
        builder.add_waveform(&[0x00, 0x00, 0xff, 0x02]);
        builder.add_mode(vec![a, b]);
        builder.add_mode(vec![b, b]);
        builder
    }

    #[test]
    fn layout() {
        let data = builder().write().unwrap();
        // Header, 3 bounds and checksum, 3 text bytes with length and checksum,
        // 2 mode pointers, 4 temperature pointers, 2 waveforms.
        assert_eq!(data.len(), 44 + 4 + 5 + 8 + 16 + 8);
        assert_eq!(&data[4..8], &(data.len() as u32).to_le_bytes());
        assert_eq!(&data[8..12], &[0x34, 0x12, 0, 0]);
        assert_eq!(data[27], 0xaa);
        assert_eq!(data[33], 1);
        assert_eq!(data[34], 1);
        assert_eq!(&data[48..53], &[3, b'a', b'b', b'c', 41]);
        // The unused waveform is not written.
        assert_eq!(&data[data.len() - 4..], &[0x55, 0x01, 0xff, 0x01]);
    }

    #[test]
    fn errors() {
        let mut invalid = builder();
        invalid.temperature_bounds = vec![0];
        assert!(invalid.write().is_err());

        let mut invalid = builder();
        invalid.modes.clear();
        assert!(invalid.write().is_err());

        let mut invalid = builder();
        invalid.add_mode(vec![0]);
        assert!(invalid.write().is_err());

        let mut invalid = builder();
        invalid.add_mode(vec![0, 7]);
        assert!(invalid.write().is_err());

        let mut invalid = builder();
        let empty = invalid.add_waveform(&[]);
        invalid.add_mode(vec![0, empty]);
        assert!(invalid.write().is_err());

        let text = [b'x'; 256];
        let mut invalid = builder();
        invalid.extra_info = Some(&text[..]);
        assert!(invalid.write().is_err());
    }
}
