//! Interface for writing waveform files.
//!
//! [`Builder`] holds the parts of a file and lays them out, and [`Writer`] is
//! the lower level helper it uses to reserve file ranges and compute checksums.

use alloc::string::String;
use core::{fmt, result};
#[cfg(feature = "std")]
use std::error;

mod builder;
pub use builder::*;

mod util;
pub use util::*;

mod writer;
pub use writer::*;

/// The error type used within the write module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error(pub(crate) String);

impl fmt::Display for Error {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(feature = "std")]
impl error::Error for Error {}

/// The result type used within the write module.
pub type Result<T> = result::Result<T, Error>;
