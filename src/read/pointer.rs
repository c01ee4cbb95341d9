use core::mem;

use crate::read::{Error, ReadError, ReadRef, Result, Table};
use crate::wbf;

/// A table of checksummed pointers.
///
/// This is used for both the mode table and the per-mode temperature tables.
/// The pointer checksums are validated when entries are accessed, so that
/// errors can report the index of the corrupt entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerTable<'data> {
    entries: &'data [wbf::Pointer],
    offset: usize,
    table: Table,
}

impl<'data> PointerTable<'data> {
    /// Parse a table of `count` pointers at the given offset.
    ///
    /// `table` identifies the table in errors.
    pub fn parse<R: ReadRef<'data>>(
        data: R,
        offset: usize,
        count: usize,
        table: Table,
    ) -> Result<Self> {
        let entries = data
            .read_slice_at::<wbf::Pointer>(offset, count)
            .read_error("Pointer table extends past end of file")
            .map_err(|error| error.table(table).offset(offset))?;
        Ok(PointerTable {
            entries,
            offset,
            table,
        })
    }

    /// The table this is.
    #[inline]
    pub fn table(&self) -> Table {
        self.table
    }

    /// The file offset of the table.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The number of entries in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return true if the table has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The raw entries, without checksum validation.
    #[inline]
    pub fn raw(&self) -> &'data [wbf::Pointer] {
        self.entries
    }

    /// The file offset of the entry at the given index.
    #[inline]
    pub fn entry_offset(&self, index: usize) -> usize {
        self.offset + index * mem::size_of::<wbf::Pointer>()
    }

    /// Return the address stored in the entry at the given index.
    ///
    /// Returns an error if the index is out of bounds or the checksum is invalid.
    pub fn get(&self, index: usize) -> Result<u32> {
        let pointer = self
            .entries
            .get(index)
            .read_error("Pointer index out of bounds")
            .map_err(|error| error.table(self.table).index(index))?;
        if !pointer.is_valid() {
            return Err(Error::integrity(
                "Invalid pointer checksum",
                pointer.checksum,
                wbf::checksum(&pointer.addr),
            )
            .table(self.table)
            .index(index)
            .offset(self.entry_offset(index)));
        }
        Ok(pointer.address())
    }

    /// Iterate over the validated addresses in the table.
    #[inline]
    pub fn iter(&self) -> PointerIterator<'data> {
        PointerIterator {
            table: *self,
            index: 0,
        }
    }
}

/// An iterator over the addresses in a [`PointerTable`].
///
/// Yields the index and the address of each entry, or an error for an entry
/// with an invalid checksum.
#[derive(Debug, Clone)]
pub struct PointerIterator<'data> {
    table: PointerTable<'data>,
    index: usize,
}

impl<'data> Iterator for PointerIterator<'data> {
    type Item = Result<(usize, u32)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.table.len() {
            return None;
        }
        let index = self.index;
        self.index += 1;
        Some(self.table.get(index).map(|address| (index, address)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.table.len().saturating_sub(self.index);
        (len, Some(len))
    }
}
