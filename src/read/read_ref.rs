use core::mem;

use crate::pod::{from_bytes, slice_from_bytes, Pod};

/// A trait for reading references to [`Pod`] types from a block of data.
///
/// This allows parsers to handle both of these cases:
/// - the block of data exists in memory, and it is desirable
///   to use references to this block instead of copying it,
/// - the block of data is memory mapped by the caller.
///
/// Both cases are covered by the implementation for `&[u8]`; the trait is the
/// seam for data sources that need to track their own lifetime.
///
/// The methods use `()` for the error type, and callers convert this to a
/// [`read::Error`](super::Error) that describes the structure being read.
#[allow(clippy::len_without_is_empty)]
pub trait ReadRef<'data>: Clone + Copy {
    /// The total size of the block of data.
    fn len(self) -> Result<usize, ()>;

    /// Get a reference to a `u8` slice at the given offset.
    ///
    /// Returns an error if offset or size are out of bounds.
    fn read_bytes_at(self, offset: usize, size: usize) -> Result<&'data [u8], ()>;

    /// Get a reference to a `u8` slice at the given offset, and update the offset.
    ///
    /// Returns an error if offset or size are out of bounds.
    fn read_bytes(self, offset: &mut usize, size: usize) -> Result<&'data [u8], ()> {
        let bytes = self.read_bytes_at(*offset, size)?;
        *offset = offset.wrapping_add(size);
        Ok(bytes)
    }

    /// Get a reference to a `Pod` type at the given offset, and update the offset.
    ///
    /// Returns an error if offset or size are out of bounds.
    fn read<T: Pod>(self, offset: &mut usize) -> Result<&'data T, ()> {
        let size = mem::size_of::<T>();
        let bytes = self.read_bytes(offset, size)?;
        let (t, _) = from_bytes(bytes).ok_or(())?;
        Ok(t)
    }

    /// Get a reference to a `Pod` type at the given offset.
    ///
    /// Returns an error if offset or size are out of bounds.
    fn read_at<T: Pod>(self, mut offset: usize) -> Result<&'data T, ()> {
        self.read(&mut offset)
    }

    /// Get a reference to a slice of a `Pod` type at the given offset, and update the offset.
    ///
    /// Returns an error if offset or size are out of bounds.
    fn read_slice<T: Pod>(self, offset: &mut usize, count: usize) -> Result<&'data [T], ()> {
        let size = count.checked_mul(mem::size_of::<T>()).ok_or(())?;
        let bytes = self.read_bytes(offset, size)?;
        let (t, _) = slice_from_bytes(bytes, count).ok_or(())?;
        Ok(t)
    }

    /// Get a reference to a slice of a `Pod` type at the given offset.
    ///
    /// Returns an error if offset or size are out of bounds.
    fn read_slice_at<T: Pod>(self, mut offset: usize, count: usize) -> Result<&'data [T], ()> {
        self.read_slice(&mut offset, count)
    }
}

impl<'data> ReadRef<'data> for &'data [u8] {
    fn len(self) -> Result<usize, ()> {
        Ok(self.len())
    }

    fn read_bytes_at(self, offset: usize, size: usize) -> Result<&'data [u8], ()> {
        self.get(offset..).ok_or(())?.get(..size).ok_or(())
    }
}
