use core::iter::FusedIterator;

use crate::pod::Bytes;
use crate::read::{Error, ReadError, ReadRef, Result, Table};
use crate::wbf;

/// An inclusive range of temperatures in degrees Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TemperatureRange {
    /// The lowest temperature of the range.
    pub from: u8,
    /// The highest temperature of the range.
    pub to: u8,
}

impl TemperatureRange {
    /// Return true if the temperature is within the range.
    #[inline]
    pub fn contains(&self, temperature: u8) -> bool {
        self.from <= temperature && temperature <= self.to
    }
}

/// The temperature range table that follows the header.
///
/// The table stores `count + 1` bounds followed by a checksum byte. Range
/// `i` spans bounds `i` and `i + 1`, so adjacent ranges share a bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemperatureRangeTable<'data> {
    bounds: Bytes<'data>,
    checksum: u8,
}

impl<'data> TemperatureRangeTable<'data> {
    /// Parse a table of `count` temperature ranges at the given offset.
    ///
    /// Validates the trailing checksum.
    pub fn parse<R: ReadRef<'data>>(data: R, offset: usize, count: usize) -> Result<Self> {
        let locate = |error: Error| error.table(Table::TemperatureRanges).offset(offset);
        let bound_count = count.checked_add(1).read_error("Invalid temperature range count")?;
        let mut tail = offset;
        let bounds = data
            .read_bytes(&mut tail, bound_count)
            .read_error("Temperature range table extends past end of file")
            .map_err(locate)?;
        let checksum = *data
            .read::<u8>(&mut tail)
            .read_error("Temperature range checksum extends past end of file")
            .map_err(locate)?;
        let computed = wbf::checksum(bounds);
        if computed != checksum {
            return Err(locate(Error::integrity(
                "Invalid temperature range checksum",
                checksum,
                computed,
            )));
        }
        Ok(TemperatureRangeTable {
            bounds: Bytes(bounds),
            checksum,
        })
    }

    /// The number of ranges in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.bounds.len().saturating_sub(1)
    }

    /// Return true if the table contains no ranges.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The shared bounds of the ranges.
    #[inline]
    pub fn bounds(&self) -> &'data [u8] {
        self.bounds.0
    }

    /// The stored checksum.
    #[inline]
    pub fn checksum(&self) -> u8 {
        self.checksum
    }

    /// Return the range at the given index.
    pub fn get(&self, index: usize) -> Option<TemperatureRange> {
        let bounds = self.bounds.0;
        let from = *bounds.get(index)?;
        let to = *bounds.get(index.checked_add(1)?)?;
        Some(TemperatureRange { from, to })
    }

    /// Iterate over the ranges.
    #[inline]
    pub fn iter(&self) -> TemperatureRangeIterator<'data> {
        TemperatureRangeIterator {
            bounds: self.bounds.0,
        }
    }

    /// Return the index of the first range containing the temperature.
    ///
    /// This is the index of the waveform to use in each mode's temperature table.
    pub fn range_index(&self, temperature: u8) -> Option<usize> {
        self.iter().position(|range| range.contains(temperature))
    }
}

impl<'data> IntoIterator for &TemperatureRangeTable<'data> {
    type Item = TemperatureRange;
    type IntoIter = TemperatureRangeIterator<'data>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the ranges of a [`TemperatureRangeTable`].
#[derive(Debug, Clone)]
pub struct TemperatureRangeIterator<'data> {
    bounds: &'data [u8],
}

impl<'data> Iterator for TemperatureRangeIterator<'data> {
    type Item = TemperatureRange;

    fn next(&mut self) -> Option<Self::Item> {
        match *self.bounds {
            [from, to, ..] => {
                self.bounds = &self.bounds[1..];
                Some(TemperatureRange { from, to })
            }
            _ => None,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.bounds.len().saturating_sub(1);
        (len, Some(len))
    }
}

impl<'data> ExactSizeIterator for TemperatureRangeIterator<'data> {}

impl<'data> FusedIterator for TemperatureRangeIterator<'data> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read::ErrorKind;
    use alloc::vec::Vec;

    #[test]
    fn two_ranges() {
        let data: &[u8] = &[10, 20, 30, 60];
        let table = TemperatureRangeTable::parse(data, 0, 2).unwrap();
        assert_eq!(table.len(), 2);
        assert!(!table.is_empty());
        assert_eq!(table.checksum(), 60);
        assert_eq!(table.bounds(), &[10, 20, 30]);
        assert_eq!(
            table.iter().collect::<Vec<_>>(),
            [
                TemperatureRange { from: 10, to: 20 },
                TemperatureRange { from: 20, to: 30 },
            ]
        );
        assert_eq!(table.get(1), Some(TemperatureRange { from: 20, to: 30 }));
        assert_eq!(table.get(2), None);
        assert_eq!(table.iter().len(), 2);
    }

    #[test]
    fn bad_checksum() {
        let data: &[u8] = &[10, 20, 30, 61];
        let error = TemperatureRangeTable::parse(data, 0, 2).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Integrity);
        assert_eq!(error.location(), Some(Table::TemperatureRanges));
        assert_eq!(error.mismatch(), Some((61, 60)));
    }

    #[test]
    fn checksum_wraps() {
        // 0xff + 0x80 + 0x01 = 0x180
        let data: &[u8] = &[0, 0xff, 0x80, 0x01, 0x80];
        let table = TemperatureRangeTable::parse(data, 0, 3).unwrap();
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn truncated() {
        let data: &[u8] = &[0xaa, 10, 20, 30];
        let error = TemperatureRangeTable::parse(data, 1, 2).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::TruncatedInput);
        assert_eq!(error.file_offset(), Some(1));

        let error = TemperatureRangeTable::parse(data, 1, 3).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::TruncatedInput);
    }

    #[test]
    fn range_index() {
        let data: &[u8] = &[0, 10, 20, 30, 60];
        let table = TemperatureRangeTable::parse(data, 0, 3).unwrap();
        assert_eq!(table.range_index(0), Some(0));
        assert_eq!(table.range_index(5), Some(0));
        // Shared bounds select the lower range.
        assert_eq!(table.range_index(10), Some(0));
        assert_eq!(table.range_index(11), Some(1));
        assert_eq!(table.range_index(30), Some(2));
        assert_eq!(table.range_index(31), None);
    }
}
