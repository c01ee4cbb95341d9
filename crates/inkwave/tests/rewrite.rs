use std::io::{self, Write};

use inkwave::{ErrorKind, OutputFormat};
use wbf::read::WbfFile;
use wbf::{wbf as raw, write};

fn build() -> Vec<u8> {
    let mut builder = write::Builder::new(raw::Header {
        serial: 77u32.to_le_bytes(),
        fpl_platform: raw::FPL_PLATFORM_V220,
        ..Default::default()
    });
    builder.temperature_bounds = vec![0, 25, 50];
    builder.extra_info = Some(&b"ED060SCG"[..]);
    let a = builder.add_waveform(&[0xe4, 0x00, 0xff, 0x00]);
    let b = builder.add_waveform(&[0x55, 0x01, 0xfc, 0x00, 0xaa, 0x02, 0xff, 0x00]);
    builder.add_mode(vec![a, b]);
    builder.add_mode(vec![b, b]);
    builder.write().unwrap()
}

struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn format_names() {
    assert_eq!(OutputFormat::from_name("wbf").unwrap(), OutputFormat::Wbf);

    let error = OutputFormat::from_name("wrf").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::UnsupportedFormat);
    assert_eq!(error.to_string(), "Unsupported output format 'wrf'");

    let error = OutputFormat::from_name("").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::UnsupportedFormat);
}

#[test]
fn rewrite_wbf() {
    let data = build();
    let file = WbfFile::parse(&*data).unwrap();
    let mut out = Vec::new();
    inkwave::rewrite(&mut out, &file, OutputFormat::Wbf).unwrap();
    assert_eq!(out, data);
}

#[test]
fn rewrite_write_error() {
    let data = build();
    let file = WbfFile::parse(&*data).unwrap();
    let error = inkwave::rewrite(&mut BrokenPipe, &file, OutputFormat::Wbf).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Io(io::ErrorKind::BrokenPipe));
}
