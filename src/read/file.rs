use alloc::vec::Vec;
use core::iter::FusedIterator;

#[cfg(feature = "logging")]
use log::{debug, trace};

use crate::read::{
    Error, ErrorKind, ExtraInfo, PointerTable, ReadError, ReadRef, Result, Table,
    TemperatureRangeTable, Waveform, WaveformRegistry, WbfHeader,
};
use crate::wbf;

/// A validated waveform file.
///
/// Parsing checks the file size, every checksum, and every pointer in the
/// mode graph, and resolves the address and length of every waveform segment.
#[derive(Debug)]
pub struct WbfFile<'data, R = &'data [u8]>
where
    R: ReadRef<'data>,
{
    data: R,
    header: WbfHeader<'data>,
    temperature_ranges: TemperatureRangeTable<'data>,
    extra_info: ExtraInfo<'data>,
    mode_table: PointerTable<'data>,
    registry: WaveformRegistry,
    waveforms: Vec<Waveform<'data>>,
    modes: Vec<ModeEntry<'data>>,
}

#[derive(Debug)]
struct ModeEntry<'data> {
    table: PointerTable<'data>,
    // Indices into `WbfFile::waveforms`, one per temperature range.
    waveforms: Vec<usize>,
}

impl<'data, R: ReadRef<'data>> WbfFile<'data, R> {
    /// Parse and validate the raw file data.
    pub fn parse(data: R) -> Result<Self> {
        let header = WbfHeader::parse(data)?;
        let file_len = data.len().read_error("Unknown file length")?;
        if header.filesize as usize != file_len {
            return Err(Error::new(
                ErrorKind::SizeMismatch,
                "File size does not match header",
            )
            .table(Table::Header)
            .offset(4)
            .values(header.filesize as usize, file_len));
        }

        let temperature_ranges = TemperatureRangeTable::parse(
            data,
            wbf::TEMPERATURE_TABLE_OFFSET,
            header.temperature_range_count(),
        )?;
        let extra_info = match header.extra_info_offset() {
            Some(offset) => ExtraInfo::parse(data, offset)?,
            None => ExtraInfo::default(),
        };
        let mode_table = PointerTable::parse(
            data,
            header.mode_table_offset(),
            header.mode_count(),
            Table::ModeTable,
        )?;

        let graph = ModeGraph {
            data,
            mode_table,
            range_count: header.temperature_range_count(),
            file_len,
        };
        let registry = graph.discover(header.filesize)?;
        let waveforms = graph.segments(&registry)?;
        let modes = graph.resolve(&registry)?;

        Ok(WbfFile {
            data,
            header,
            temperature_ranges,
            extra_info,
            mode_table,
            registry,
            waveforms,
            modes,
        })
    }

    /// The raw file data.
    #[inline]
    pub fn data(&self) -> R {
        self.data
    }

    /// The decoded header.
    #[inline]
    pub fn header(&self) -> &WbfHeader<'data> {
        &self.header
    }

    /// The raw header.
    #[inline]
    pub fn raw_header(&self) -> &'data wbf::Header {
        self.header.raw()
    }

    /// The temperature range table.
    #[inline]
    pub fn temperature_ranges(&self) -> &TemperatureRangeTable<'data> {
        &self.temperature_ranges
    }

    /// The extra information block. This is empty if the file has none.
    #[inline]
    pub fn extra_info(&self) -> &ExtraInfo<'data> {
        &self.extra_info
    }

    /// The mode table.
    #[inline]
    pub fn mode_table(&self) -> &PointerTable<'data> {
        &self.mode_table
    }

    /// The finalized registry of waveform addresses.
    #[inline]
    pub fn registry(&self) -> &WaveformRegistry {
        &self.registry
    }

    /// The distinct waveform segments, in ascending address order.
    #[inline]
    pub fn waveforms(&self) -> &[Waveform<'data>] {
        &self.waveforms
    }

    /// The number of modes.
    #[inline]
    pub fn mode_count(&self) -> usize {
        self.modes.len()
    }

    /// Return the mode at the given index.
    pub fn mode<'file>(&'file self, index: usize) -> Option<Mode<'data, 'file>> {
        let entry = self.modes.get(index)?;
        Some(Mode {
            index,
            entry,
            waveforms: &self.waveforms,
        })
    }

    /// Iterate over the modes.
    #[inline]
    pub fn modes<'file>(&'file self) -> ModeIterator<'data, 'file> {
        ModeIterator {
            entries: self.modes.iter().enumerate(),
            waveforms: &self.waveforms,
        }
    }

    /// Return the waveform for the given mode and temperature range index.
    pub fn waveform(&self, mode: usize, range: usize) -> Option<&Waveform<'data>> {
        let index = *self.modes.get(mode)?.waveforms.get(range)?;
        self.waveforms.get(index)
    }

    /// Return the waveform for the given mode and temperature in degrees Celsius.
    pub fn waveform_for_temperature(
        &self,
        mode: usize,
        temperature: u8,
    ) -> Option<&Waveform<'data>> {
        let range = self.temperature_ranges.range_index(temperature)?;
        self.waveform(mode, range)
    }
}

/// A mode of a [`WbfFile`].
///
/// A mode has one waveform for each temperature range. Modes commonly share
/// waveforms.
#[derive(Debug, Clone, Copy)]
pub struct Mode<'data, 'file> {
    index: usize,
    entry: &'file ModeEntry<'data>,
    waveforms: &'file [Waveform<'data>],
}

impl<'data, 'file> Mode<'data, 'file> {
    /// The index of the mode in the mode table.
    ///
    /// The `wbf::UPDATE_MODE_*` constants give the conventional meanings.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The temperature table of the mode.
    #[inline]
    pub fn temperature_table(&self) -> &'file PointerTable<'data> {
        &self.entry.table
    }

    /// The number of waveforms, which is the number of temperature ranges.
    #[inline]
    pub fn len(&self) -> usize {
        self.entry.waveforms.len()
    }

    /// Return true if the mode has no waveforms.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entry.waveforms.is_empty()
    }

    /// The indices into [`WbfFile::waveforms`], in temperature range order.
    #[inline]
    pub fn waveform_indices(&self) -> &'file [usize] {
        &self.entry.waveforms
    }

    /// Return the index into [`WbfFile::waveforms`] for the given temperature range.
    #[inline]
    pub fn waveform_index(&self, range: usize) -> Option<usize> {
        self.entry.waveforms.get(range).copied()
    }

    /// Return the waveform for the given temperature range.
    #[inline]
    pub fn waveform(&self, range: usize) -> Option<&'file Waveform<'data>> {
        self.waveforms.get(self.waveform_index(range)?)
    }

    /// Iterate over the waveforms, in temperature range order.
    #[inline]
    pub fn waveforms(&self) -> ModeWaveformIterator<'data, 'file> {
        ModeWaveformIterator {
            indices: self.entry.waveforms.iter(),
            waveforms: self.waveforms,
        }
    }
}

/// An iterator over the modes of a [`WbfFile`].
#[derive(Debug)]
pub struct ModeIterator<'data, 'file> {
    entries: core::iter::Enumerate<core::slice::Iter<'file, ModeEntry<'data>>>,
    waveforms: &'file [Waveform<'data>],
}

impl<'data, 'file> Iterator for ModeIterator<'data, 'file> {
    type Item = Mode<'data, 'file>;

    fn next(&mut self) -> Option<Self::Item> {
        let (index, entry) = self.entries.next()?;
        Some(Mode {
            index,
            entry,
            waveforms: self.waveforms,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<'data, 'file> ExactSizeIterator for ModeIterator<'data, 'file> {}

impl<'data, 'file> FusedIterator for ModeIterator<'data, 'file> {}

/// An iterator over the waveforms of a [`Mode`].
#[derive(Debug)]
pub struct ModeWaveformIterator<'data, 'file> {
    indices: core::slice::Iter<'file, usize>,
    waveforms: &'file [Waveform<'data>],
}

impl<'data, 'file> Iterator for ModeWaveformIterator<'data, 'file> {
    type Item = &'file Waveform<'data>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = *self.indices.next()?;
        self.waveforms.get(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}

/// A reference to a waveform from a temperature table.
#[derive(Debug, Clone, Copy)]
struct Slot<'data> {
    mode: usize,
    table: PointerTable<'data>,
    range: usize,
    address: u32,
}

/// The pointer graph from the mode table through the temperature tables.
struct ModeGraph<'data, R: ReadRef<'data>> {
    data: R,
    mode_table: PointerTable<'data>,
    range_count: usize,
    file_len: usize,
}

impl<'data, R: ReadRef<'data>> ModeGraph<'data, R> {
    /// Visit every temperature table entry of every mode, in order.
    ///
    /// Every pointer checksum is validated, and every waveform address must be
    /// inside the file.
    fn walk<F>(&self, mut visit: F) -> Result<()>
    where
        F: FnMut(Slot<'data>) -> Result<()>,
    {
        for entry in self.mode_table.iter() {
            let (mode, offset) = entry?;
            let table = PointerTable::parse(
                self.data,
                offset as usize,
                self.range_count,
                Table::TemperatureTable { mode },
            )?;
            for entry in table.iter() {
                let (range, address) = entry?;
                if address as usize >= self.file_len {
                    return Err(Error::truncated("Waveform address is past end of file")
                        .table(table.table())
                        .index(range)
                        .offset(table.entry_offset(range))
                        .values(self.file_len, address as usize));
                }
                visit(Slot {
                    mode,
                    table,
                    range,
                    address,
                })?;
            }
        }
        Ok(())
    }

    /// Collect the waveform addresses and finalize the registry.
    fn discover(&self, file_len: u32) -> Result<WaveformRegistry> {
        let mut registry = WaveformRegistry::new();
        self.walk(|slot| {
            if registry.insert(slot.address)? {
                #[cfg(feature = "logging")]
                trace!(
                    "Mode {} range {}: new waveform at {:#x}",
                    slot.mode,
                    slot.range,
                    slot.address
                );
            }
            Ok(())
        })?;
        registry.finalize(file_len)?;
        #[cfg(feature = "logging")]
        debug!(
            "Discovered {} waveforms in {} modes",
            registry.len(),
            self.mode_table.len()
        );
        Ok(registry)
    }

    /// Read the bytes of every registered waveform.
    fn segments(&self, registry: &WaveformRegistry) -> Result<Vec<Waveform<'data>>> {
        let mut waveforms = Vec::with_capacity(registry.len());
        for &address in registry.waveform_addresses() {
            let (_, len) = registry.resolve(address)?;
            let bytes = self
                .data
                .read_bytes_at(address as usize, len)
                .read_error("Waveform extends past end of file")
                .map_err(|error| error.table(Table::Waveforms).offset(address as usize))?;
            waveforms.push(Waveform::new(address, bytes));
        }
        Ok(waveforms)
    }

    /// Resolve every temperature table entry to its waveform index.
    fn resolve(&self, registry: &WaveformRegistry) -> Result<Vec<ModeEntry<'data>>> {
        let mut modes: Vec<ModeEntry<'data>> = Vec::with_capacity(self.mode_table.len());
        self.walk(|slot| {
            let (index, _len) = registry.resolve(slot.address)?;
            if modes.len() == slot.mode {
                modes.push(ModeEntry {
                    table: slot.table,
                    waveforms: Vec::with_capacity(self.range_count),
                });
            }
            #[cfg(feature = "logging")]
            trace!(
                "Mode {} range {}: waveform {} at {:#x}, {} bytes",
                slot.mode,
                slot.range,
                index,
                slot.address,
                _len
            );
            match modes.last_mut() {
                Some(entry) if entry.waveforms.len() == slot.range => {
                    entry.waveforms.push(index);
                    Ok(())
                }
                _ => Err(
                    Error::new(ErrorKind::Invariant, "Temperature table visited out of order")
                        .table(slot.table.table())
                        .index(slot.range),
                ),
            }
        })?;
        #[cfg(feature = "logging")]
        debug!("Resolved {} modes", modes.len());
        Ok(modes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_pointer(data: &mut Vec<u8>, address: u32) {
        let pointer = wbf::Pointer::new(address).unwrap();
        data.extend_from_slice(&pointer.addr);
        data.push(pointer.checksum);
    }

    // Two modes and two temperature ranges, with a waveform shared by both modes.
    //
    // 0x00  header
    // 0x2c  temperature ranges 0, 25, 50 + checksum
    // 0x30  mode table (2 pointers)
    // 0x38  temperature table of mode 0
    // 0x40  temperature table of mode 1
    // 0x48  waveform A (4 bytes)
    // 0x4c  waveform B (6 bytes)
    // 0x52  waveform C (3 bytes)
    // 0x55  end
    fn sample() -> Vec<u8> {
        let mut header = wbf::Header::default();
        header.filesize = 0x55u32.to_le_bytes();
        header.wmta = wbf::u24_to_bytes(0x30);
        header.mc = 1;
        header.trc = 1;
        let mut data = crate::pod::bytes_of(&header).to_vec();
        data.extend_from_slice(&[0, 25, 50, 75]);
        push_pointer(&mut data, 0x38);
        push_pointer(&mut data, 0x40);
        push_pointer(&mut data, 0x48);
        push_pointer(&mut data, 0x4c);
        push_pointer(&mut data, 0x52);
        push_pointer(&mut data, 0x48);
        data.extend_from_slice(&[0xe4, 0x00, 0xff, 0x00]);
        data.extend_from_slice(&[0x55, 0x01, 0xaa, 0x02, 0xff, 0x00]);
        data.extend_from_slice(&[0x00, 0xff, 0x01]);
        assert_eq!(data.len(), 0x55);
        data
    }

    #[test]
    fn parse_sample() {
        let data = sample();
        let file = WbfFile::parse(&*data).unwrap();
        assert_eq!(file.mode_count(), 2);
        assert!(!file.extra_info().is_present());
        assert_eq!(file.temperature_ranges().len(), 2);
        assert_eq!(
            file.registry().addresses().iter().copied().collect::<Vec<_>>(),
            [0x48, 0x4c, 0x52, 0x55]
        );
        assert_eq!(
            file.waveforms()
                .iter()
                .map(|w| (w.address(), w.len()))
                .collect::<Vec<_>>(),
            [(0x48, 4), (0x4c, 6), (0x52, 3)]
        );

        let modes = file.modes().collect::<Vec<_>>();
        assert_eq!(modes[0].index(), 0);
        assert_eq!(
            modes[0].waveforms().map(|w| w.address()).collect::<Vec<_>>(),
            [0x48, 0x4c]
        );
        assert_eq!(
            modes[1].waveforms().map(|w| w.address()).collect::<Vec<_>>(),
            [0x52, 0x48]
        );
        assert_eq!(modes[1].waveform_index(1), Some(0));
        assert_eq!(
            modes[1].temperature_table().table(),
            Table::TemperatureTable { mode: 1 }
        );

        assert_eq!(file.waveform(0, 1).map(|w| w.step_count()), Some(2));
        assert_eq!(file.waveform(1, 0).map(|w| w.steps().remainder()), Some(&[0x00][..]));
        assert_eq!(
            file.waveform_for_temperature(1, 30).map(|w| w.address()),
            Some(0x48)
        );
        assert!(file.waveform(2, 0).is_none());
        assert!(file.waveform_for_temperature(0, 80).is_none());
    }

    #[test]
    fn size_mismatch() {
        let mut data = sample();
        data.push(0);
        let error = WbfFile::parse(&*data).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::SizeMismatch);
        assert_eq!(error.mismatch(), Some((0x55, 0x56)));
    }

    #[test]
    fn corrupt_temperature_pointer() {
        let mut data = sample();
        data[0x40 + 4 + 3] ^= 0x01;
        let error = WbfFile::parse(&*data).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Integrity);
        assert_eq!(error.location(), Some(Table::TemperatureTable { mode: 1 }));
        assert_eq!(error.entry(), Some(1));
        assert_eq!(error.file_offset(), Some(0x44));
    }

    #[test]
    fn corrupt_mode_pointer() {
        let mut data = sample();
        data[0x34] ^= 0x80;
        let error = WbfFile::parse(&*data).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Integrity);
        assert_eq!(error.location(), Some(Table::ModeTable));
        assert_eq!(error.entry(), Some(1));
    }

    #[test]
    fn waveform_past_end() {
        let mut data = sample();
        data[0x38..0x3c].copy_from_slice(&[0x55, 0x00, 0x00, 0x55]);
        let error = WbfFile::parse(&*data).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::TruncatedInput);
        assert_eq!(error.location(), Some(Table::TemperatureTable { mode: 0 }));
        assert_eq!(error.entry(), Some(0));
    }

    #[test]
    fn temperature_table_past_end() {
        let mut data = sample();
        data[0x34..0x38].copy_from_slice(&[0x50, 0x00, 0x00, 0x50]);
        let error = WbfFile::parse(&*data).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::TruncatedInput);
        assert_eq!(error.location(), Some(Table::TemperatureTable { mode: 1 }));
    }

    #[test]
    fn walk_is_repeatable() {
        let data = sample();
        let graph = ModeGraph {
            data: &*data,
            mode_table: PointerTable::parse(&*data, 0x30, 2, Table::ModeTable).unwrap(),
            range_count: 2,
            file_len: data.len(),
        };
        let first = graph.discover(0x55).unwrap();
        let second = graph.discover(0x55).unwrap();
        assert_eq!(first.addresses(), second.addresses());

        let mut slots = vec![];
        graph
            .walk(|slot| {
                slots.push((slot.mode, slot.range, slot.address));
                Ok(())
            })
            .unwrap();
        assert_eq!(
            slots,
            [(0, 0, 0x48), (0, 1, 0x4c), (1, 0, 0x52), (1, 1, 0x48)]
        );
    }
}
