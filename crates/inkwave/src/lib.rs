//! Printing of waveform files.
//!
//! This is the library part of the `inkwave` tool.

use std::fmt;
use std::io::{self, Write};

use wbf::read::{Mode, WbfFile, WbfHeader};
use wbf::write::{Builder, StreamingBuffer};

mod error;
pub use error::{Error, ErrorKind, Result};

pub mod names;
use names::Flag;

/// Print a description of the file.
pub fn print(w: &mut dyn Write, file: &WbfFile<'_>) -> io::Result<()> {
    let mut p = Printer::new(w);
    print_header(&mut p, file.header())?;
    p.blank()?;
    print_temperature_ranges(&mut p, file)?;
    print_extra_info(&mut p, file)?;
    p.blank()?;
    p.field("Number of waveforms", file.waveforms().len())?;
    for mode in file.modes() {
        print_mode(&mut p, file, mode)?;
    }
    Ok(())
}

/// An output format for [`rewrite`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum OutputFormat {
    /// The waveform binary format that was read.
    Wbf,
}

impl OutputFormat {
    /// Look up a format by its command line name.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "wbf" => Ok(OutputFormat::Wbf),
            _ => Err(Error::format(name)),
        }
    }
}

/// Re-encode the file in the given format with every checksum recomputed.
pub fn rewrite(w: &mut dyn Write, file: &WbfFile<'_>, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Wbf => {
            let mut buffer = StreamingBuffer::new(w);
            Builder::read(file)
                .emit(&mut buffer)
                .map_err(Error::write)?;
            buffer.result().map_err(Error::io)?;
        }
    }
    Ok(())
}

struct Printer<'a> {
    w: &'a mut dyn Write,
    indent: usize,
}

impl<'a> Printer<'a> {
    fn new(w: &'a mut dyn Write) -> Self {
        Self { w, indent: 0 }
    }

    fn blank(&mut self) -> io::Result<()> {
        writeln!(self.w)
    }

    fn print_indent(&mut self) -> io::Result<()> {
        if self.indent != 0 {
            write!(self.w, "{:-1$}", " ", self.indent * 4)?;
        }
        Ok(())
    }

    fn group<F>(&mut self, name: &str, f: F) -> io::Result<()>
    where
        F: FnOnce(&mut Self) -> io::Result<()>,
    {
        self.print_indent()?;
        writeln!(self.w, "{} {{", name)?;
        self.indent += 1;
        let result = f(self);
        self.indent -= 1;
        result?;
        self.print_indent()?;
        writeln!(self.w, "}}")
    }

    fn field_name(&mut self, name: &str) -> io::Result<()> {
        self.print_indent()?;
        write!(self.w, "{}: ", name)
    }

    fn field<T: fmt::Display>(&mut self, name: &str, value: T) -> io::Result<()> {
        self.field_name(name)?;
        writeln!(self.w, "{}", value)
    }

    fn field_unknown(&mut self, name: &str) -> io::Result<()> {
        self.field(name, "Unknown")
    }

    fn field_desc(&mut self, name: &str, value: u8, desc: &str) -> io::Result<()> {
        self.field_name(name)?;
        writeln!(self.w, "0x{:x} | {}", value, desc)
    }

    fn field_enum(&mut self, name: &str, value: u8, flags: &[Flag<u8>]) -> io::Result<()> {
        let desc = names::describe(flags, value).unwrap_or("Unknown");
        self.field_desc(name, value, desc)
    }
}

fn print_header(p: &mut Printer<'_>, header: &WbfHeader<'_>) -> io::Result<()> {
    p.field(
        "File size (according to header)",
        format!("{} bytes", header.filesize),
    )?;
    p.field("Serial number", header.serial)?;
    p.field_enum("Run type", header.run_type, names::RUN_TYPES)?;
    p.field_desc(
        "Manufacturer code",
        header.mfg_code,
        names::mfg_code(header.mfg_code),
    )?;
    p.blank()?;

    p.field_enum(
        "Frontplane Laminate (FPL) platform",
        header.fpl_platform,
        names::FPL_PLATFORMS,
    )?;
    p.field("Frontplane Laminate (FPL) lot", header.fpl_lot)?;
    p.field_enum(
        "Frontplane Laminate (FPL) size",
        header.fpl_size,
        names::FPL_SIZES,
    )?;
    p.field_enum(
        "Frontplane Laminate (FPL) rate",
        header.fpl_rate,
        names::FPL_RATES,
    )?;
    p.blank()?;

    p.field("Waveform version", header.waveform_version)?;
    p.field("Waveform sub-version", header.waveform_subversion)?;
    p.blank()?;

    p.field_enum("Waveform type", header.waveform_type, names::WAVEFORM_TYPES)?;
    let tuning = header.tuning_bias_or_revision();
    match tuning.tuning_bias() {
        Some(bias) => p.field_enum("Waveform tuning bias", bias, names::TUNING_BIASES)?,
        None => p.field_unknown("Waveform tuning bias")?,
    }
    match tuning.revision() {
        Some(revision) => p.field("Waveform revision", revision)?,
        None => p.field_unknown("Waveform revision")?,
    }
    p.blank()?;

    let mode_version = header.mode_version_or_adhesive_run();
    match mode_version.adhesive_run_num() {
        Some(run) => p.field("Adhesive run number", run)?,
        None => p.field_unknown("Adhesive run number")?,
    }
    match mode_version.mode_version() {
        Some(version) => p.field_enum("Mode version", version, names::MODE_VERSIONS)?,
        None => p.field_unknown("Mode version")?,
    }
    p.blank()?;

    p.field("Number of modes in this waveform", header.mode_count())?;
    p.field(
        "Number of temperature ranges in this waveform",
        header.temperature_range_count(),
    )
}

fn print_temperature_ranges(p: &mut Printer<'_>, file: &WbfFile<'_>) -> io::Result<()> {
    p.group("Temperature ranges", |p| {
        for (index, range) in file.temperature_ranges().iter().enumerate() {
            p.field(
                &format!("Range {}", index),
                format!("{} - {} C", range.from, range.to),
            )?;
        }
        Ok(())
    })
}

fn print_extra_info(p: &mut Printer<'_>, file: &WbfFile<'_>) -> io::Result<()> {
    let info = file.extra_info();
    if info.is_present() {
        p.field("Extra info", format!("\"{}\"", info.to_string_lossy()))?;
    }
    Ok(())
}

fn print_mode(p: &mut Printer<'_>, file: &WbfFile<'_>, mode: Mode<'_, '_>) -> io::Result<()> {
    let name = match names::update_mode(mode.index()) {
        Some(desc) => format!("Mode {} | {}", mode.index(), desc),
        None => format!("Mode {}", mode.index()),
    };
    p.group(&name, |p| {
        for (range, waveform) in mode.waveforms().enumerate() {
            let temperature = match file.temperature_ranges().get(range) {
                Some(t) => format!(" ({} - {} C)", t.from, t.to),
                None => String::new(),
            };
            p.field(
                &format!("Range {}{}", range, temperature),
                format!(
                    "address 0x{:x}, {} bytes, {} steps, {} frames",
                    waveform.address(),
                    waveform.len(),
                    waveform.step_count(),
                    waveform.frame_count()
                ),
            )?;
        }
        Ok(())
    })
}
