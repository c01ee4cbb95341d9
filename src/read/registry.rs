use hashbrown::DefaultHashBuilder;
use indexmap::IndexSet;

use crate::read::{Error, ErrorKind, Result, Table};
use crate::wbf;

/// The set of waveform segment addresses referenced by a file.
///
/// Segments have no length field. Instead, every address reachable from the
/// mode graph is collected, the set is sorted, and the file length is appended
/// as a sentinel. The length of a segment is then the distance to the next
/// address in the set.
///
/// The registry is filled by [`Self::insert`], then [`Self::finalize`] is
/// called once, after which it is read-only.
#[derive(Debug, Clone)]
pub struct WaveformRegistry {
    addresses: IndexSet<u32, DefaultHashBuilder>,
    // Number of entries that are waveform addresses, excluding the sentinel.
    waveform_count: usize,
    finalized: bool,
}

impl Default for WaveformRegistry {
    fn default() -> Self {
        WaveformRegistry::new()
    }
}

impl WaveformRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        WaveformRegistry {
            addresses: IndexSet::default(),
            waveform_count: 0,
            finalized: false,
        }
    }

    /// Add a waveform address.
    ///
    /// Returns `true` if the address was not already present.
    ///
    /// Returns an error if the registry already holds [`wbf::MAX_WAVEFORMS`]
    /// other addresses, or if it has been finalized.
    pub fn insert(&mut self, address: u32) -> Result<bool> {
        if self.finalized {
            return Err(Error::new(
                ErrorKind::Invariant,
                "Waveform registry is already finalized",
            )
            .table(Table::Waveforms));
        }
        if self.addresses.contains(&address) {
            return Ok(false);
        }
        if self.addresses.len() >= wbf::MAX_WAVEFORMS {
            return Err(Error::new(
                ErrorKind::CapacityExceeded,
                "Too many distinct waveform addresses",
            )
            .table(Table::Waveforms)
            .values(wbf::MAX_WAVEFORMS, self.addresses.len() + 1));
        }
        self.addresses.insert(address);
        self.waveform_count += 1;
        Ok(true)
    }

    /// Sort the addresses and append the file length as the end sentinel.
    ///
    /// Returns an error if any address is not below `file_len`, since the
    /// segment at that address would have no bytes. Calling this again after
    /// it has succeeded has no effect.
    pub fn finalize(&mut self, file_len: u32) -> Result<()> {
        if self.finalized {
            return Ok(());
        }
        self.addresses.sort_unstable();
        if let Some(&last) = self.addresses.last() {
            if last >= file_len {
                return Err(Error::truncated("Waveform address is past end of file")
                    .table(Table::Waveforms)
                    .offset(last as usize)
                    .values(file_len as usize, last as usize));
            }
        }
        self.addresses.insert(file_len);
        self.finalized = true;
        Ok(())
    }

    /// Return true if [`Self::finalize`] has been called.
    #[inline]
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// The number of distinct waveform addresses, excluding the sentinel.
    #[inline]
    pub fn len(&self) -> usize {
        self.waveform_count
    }

    /// Return true if no waveform addresses have been added.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.waveform_count == 0
    }

    /// All entries, including the sentinel once finalized.
    ///
    /// The entries are in ascending order once finalized, and in insertion
    /// order before that.
    #[inline]
    pub fn addresses(&self) -> &indexmap::set::Slice<u32> {
        self.addresses.as_slice()
    }

    /// The waveform addresses, excluding the sentinel.
    #[inline]
    pub fn waveform_addresses(&self) -> &indexmap::set::Slice<u32> {
        &self.addresses.as_slice()[..self.waveform_count]
    }

    /// Return the index of the given address in the sorted order.
    ///
    /// Returns `None` until the registry is finalized.
    #[inline]
    pub fn index_of(&self, address: u32) -> Option<usize> {
        if !self.finalized {
            return None;
        }
        self.addresses.get_index_of(&address)
    }

    /// Return the index and length of the segment at the given address.
    ///
    /// Returns an error if the registry is not finalized or the address was
    /// never added.
    pub fn resolve(&self, address: u32) -> Result<(usize, usize)> {
        let missing = || {
            Error::new(ErrorKind::Invariant, "Waveform address is not registered")
                .table(Table::Waveforms)
                .offset(address as usize)
        };
        let index = self.index_of(address).ok_or_else(missing)?;
        let next = *self.addresses.get_index(index + 1).ok_or_else(missing)?;
        let len = next.checked_sub(address).ok_or_else(missing)?;
        Ok((index, len as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn registry(addresses: &[u32], file_len: u32) -> WaveformRegistry {
        let mut registry = WaveformRegistry::new();
        for address in addresses {
            registry.insert(*address).unwrap();
        }
        registry.finalize(file_len).unwrap();
        registry
    }

    #[test]
    fn sorted_with_sentinel() {
        let registry = registry(&[0x300, 0x100, 0x200, 0x100, 0x300], 0x400);
        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.addresses().iter().copied().collect::<Vec<_>>(),
            [0x100, 0x200, 0x300, 0x400]
        );
        assert_eq!(
            registry.waveform_addresses().iter().copied().collect::<Vec<_>>(),
            [0x100, 0x200, 0x300]
        );
        assert_eq!(registry.resolve(0x100), Ok((0, 0x100)));
        assert_eq!(registry.resolve(0x300), Ok((2, 0x100)));
    }

    #[test]
    fn strictly_ascending() {
        let registry = registry(&[90, 7, 55, 7, 1000, 3, 55], 2000);
        let addresses = registry.addresses();
        for pair in addresses.iter().collect::<Vec<_>>().windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert_eq!(addresses.last(), Some(&2000));
    }

    #[test]
    fn idempotent() {
        let input = [0x50, 0x10, 0x30, 0x10];
        let first = registry(&input, 0x60);
        let second = registry(&input, 0x60);
        assert_eq!(first.addresses(), second.addresses());

        let mut again = first.clone();
        assert_eq!(again.finalize(0x60), Ok(()));
        assert_eq!(again.addresses(), first.addresses());
    }

    #[test]
    fn duplicate_insert() {
        let mut registry = WaveformRegistry::new();
        assert_eq!(registry.insert(5), Ok(true));
        assert_eq!(registry.insert(5), Ok(false));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn address_at_or_past_file_len() {
        let mut registry = WaveformRegistry::new();
        registry.insert(0x100).unwrap();
        registry.insert(0x80).unwrap();
        let error = registry.finalize(0x90).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::TruncatedInput);
        assert_eq!(error.location(), Some(Table::Waveforms));
        assert_eq!(error.file_offset(), Some(0x100));
        assert_eq!(error.mismatch(), Some((0x90, 0x100)));
        assert!(!registry.is_finalized());
        assert_eq!(registry.index_of(0x80), None);
        assert_eq!(registry.resolve(0x100).unwrap_err().kind(), ErrorKind::Invariant);
        assert_eq!(registry.resolve(0x80).unwrap_err().kind(), ErrorKind::Invariant);

        let mut registry = WaveformRegistry::new();
        registry.insert(0x20).unwrap();
        assert!(registry.finalize(0x20).is_err());
        registry.finalize(0x21).unwrap();
        assert_eq!(registry.resolve(0x20), Ok((0, 1)));
    }

    #[test]
    fn capacity() {
        let mut registry = WaveformRegistry::new();
        for address in 0..wbf::MAX_WAVEFORMS as u32 {
            registry.insert(address).unwrap();
        }
        // Re-inserting at capacity is not an error.
        assert_eq!(registry.insert(0), Ok(false));
        let error = registry.insert(wbf::MAX_WAVEFORMS as u32).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::CapacityExceeded);
        assert_eq!(error.location(), Some(Table::Waveforms));
        assert_eq!(error.mismatch(), Some((4096, 4097)));

        // The sentinel does not count against the capacity.
        registry.finalize(0x10000).unwrap();
        assert_eq!(registry.addresses().len(), wbf::MAX_WAVEFORMS + 1);
        assert_eq!(registry.resolve(4095), Ok((4095, 0x10000 - 4095)));
    }

    #[test]
    fn resolve_misses() {
        let mut registry = WaveformRegistry::new();
        registry.insert(0x10).unwrap();
        assert_eq!(
            registry.resolve(0x10).unwrap_err().kind(),
            ErrorKind::Invariant
        );
        registry.finalize(0x20).unwrap();
        let error = registry.resolve(0x18).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Invariant);
        assert_eq!(error.file_offset(), Some(0x18));
        assert_eq!(
            registry.insert(0x18).unwrap_err().kind(),
            ErrorKind::Invariant
        );
    }
}
