//! # `wbf`
//!
//! The `wbf` crate decodes, validates and writes the waveform binary files
//! used to drive electrophoretic (e-ink) display controllers.
//!
//! A waveform file is a fixed header followed by a temperature range table, an
//! optional block of free text, a mode table of checksummed pointers, one
//! temperature table per mode, and the waveform segments those tables point at.
//! Segments carry no length field; their lengths are recovered from the gaps
//! between the sorted set of every segment address referenced by the file.
//!
//! ## Raw struct definitions
//!
//! The [`wbf`] module contains the on-disk layout of the fixed size records
//! and the known values of the enumerated header fields. These definitions
//! are independent of read/write support.
//!
//! ## Reading
//!
//! The [`read`] module decodes and validates a complete file. Use
//! [`read::WbfFile::parse`] to run both resolution passes over a byte slice.
//!
//! ## Writing
//!
//! The [`write`] module lays out a file from decoded parts and computes every
//! pointer and table checksum.
//!
//! ## Example for reading a file
//! ```no_run
//! # #[cfg(feature = "std")] {
//! use wbf::read::WbfFile;
//! use std::error::Error;
//! use std::fs;
//!
//! fn main() -> Result<(), Box<dyn Error>> {
//!     let data = fs::read("path/to/waveform.wbf")?;
//!     let file = WbfFile::parse(&*data)?;
//!     for mode in file.modes() {
//!         for waveform in mode.waveforms() {
//!             println!("{:#x} {}", waveform.address(), waveform.len());
//!         }
//!     }
//!     Ok(())
//! }
//! # }
//! ```

#![deny(missing_docs)]
#![deny(missing_debug_implementations)]
#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[allow(unused_imports)]
#[macro_use]
extern crate alloc;

#[cfg(feature = "std")]
#[allow(unused_imports)]
#[macro_use]
extern crate std;

#[macro_use]
pub mod pod;

pub mod wbf;

#[cfg(feature = "read")]
pub mod read;

#[cfg(feature = "write")]
pub mod write;
