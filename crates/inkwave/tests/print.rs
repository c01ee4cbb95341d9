use wbf::read::WbfFile;
use wbf::{wbf as raw, write};

const WAVEFORM_A: &[u8] = &[0xe4, 0x00, 0xff, 0x00];
const WAVEFORM_B: &[u8] = &[0x55, 0x01, 0xfc, 0x00, 0xaa, 0x02, 0xff, 0x00];

fn build(header: raw::Header, extra_info: Option<&'static [u8]>) -> Vec<u8> {
    let mut builder = write::Builder::new(header);
    builder.temperature_bounds = vec![0, 25, 50];
    builder.extra_info = extra_info;
    let a = builder.add_waveform(WAVEFORM_A);
    let b = builder.add_waveform(WAVEFORM_B);
    builder.add_mode(vec![a, b]);
    builder.add_mode(vec![b, b]);
    builder.write().unwrap()
}

fn print(data: &[u8]) -> String {
    let file = WbfFile::parse(data).unwrap();
    let mut out = Vec::new();
    inkwave::print(&mut out, &file).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn print_revision_header() {
    let data = build(
        raw::Header {
            serial: 4321u32.to_le_bytes(),
            run_type: raw::RUN_TYPE_PRODUCTION,
            fpl_platform: raw::FPL_PLATFORM_V220,
            fpl_lot: 258u16.to_le_bytes(),
            mode_version_or_adhesive_run_num: raw::MODE_VERSION_V220_50HZ,
            waveform_version: 1,
            waveform_subversion: 2,
            waveform_type: raw::WAVEFORM_TYPE_WR,
            fpl_size: raw::FPL_SIZE_6_0,
            mfg_code: 0xa7,
            waveform_tuning_bias_or_rev: 5,
            fpl_rate: raw::FPL_RATE_60HZ,
            ..Default::default()
        },
        Some(&b"ED060SCG_V220.wbf"[..]),
    );
    let out = print(&data);

    for line in [
        format!("File size (according to header): {} bytes", data.len()),
        "Serial number: 4321".to_string(),
        "Run type: 0x2 | [P]roduction".to_string(),
        "Manufacturer code: 0xa7 | LGD panel".to_string(),
        "Frontplane Laminate (FPL) platform: 0x6 | V220".to_string(),
        "Frontplane Laminate (FPL) lot: 258".to_string(),
        "Frontplane Laminate (FPL) size: 0x3c | 6\", 800x600".to_string(),
        "Frontplane Laminate (FPL) rate: 0x60 | 60Hz".to_string(),
        "Waveform version: 1".to_string(),
        "Waveform sub-version: 2".to_string(),
        "Waveform type: 0x2b | WR".to_string(),
        "Waveform tuning bias: Unknown".to_string(),
        "Waveform revision: 5".to_string(),
        "Adhesive run number: Unknown".to_string(),
        "Mode version: 0x3 | DU/GC16/GC4/AU (V220, 50Hz/85Hz modes)".to_string(),
        "Number of modes in this waveform: 2".to_string(),
        "Number of temperature ranges in this waveform: 2".to_string(),
        "Extra info: \"ED060SCG_V220.wbf\"".to_string(),
        "Number of waveforms: 2".to_string(),
    ] {
        assert!(out.contains(&line), "missing {:?} in:\n{}", line, out);
    }

    assert!(out.contains("Temperature ranges {\n    Range 0: 0 - 25 C\n    Range 1: 25 - 50 C\n}\n"));
}

#[test]
fn print_modes() {
    let data = build(raw::Header::default(), None);
    let out = print(&data);

    // Header, temperature ranges and the two mode tables come first.
    let a = 44 + 4 + 8 + 16;
    let b = a + WAVEFORM_A.len();
    let expected = format!(
        "Mode 0 | INIT (panel initialization) {{\n\
         \x20   Range 0 (0 - 25 C): address 0x{:x}, 4 bytes, 1 steps, 1 frames\n\
         \x20   Range 1 (25 - 50 C): address 0x{:x}, 8 bytes, 2 steps, 5 frames\n\
         }}\n\
         Mode 1 | DU (direct update, 1bpp) {{\n\
         \x20   Range 0 (0 - 25 C): address 0x{:x}, 8 bytes, 2 steps, 5 frames\n\
         \x20   Range 1 (25 - 50 C): address 0x{:x}, 8 bytes, 2 steps, 5 frames\n\
         }}\n",
        a, b, b, b
    );
    assert!(out.ends_with(&expected), "unexpected output:\n{}", out);
    assert!(!out.contains("Extra info"));
}

#[test]
fn print_tuning_bias_header() {
    let data = build(
        raw::Header {
            fpl_platform: raw::FPL_PLATFORM_2_1,
            mode_version_or_adhesive_run_num: 7,
            waveform_type: raw::WAVEFORM_TYPE_TE,
            waveform_tuning_bias_or_rev: raw::TUNING_BIAS_DS_BLOOMING_V110,
            mfg_code: 0x00,
            run_type: 0x20,
            ..Default::default()
        },
        None,
    );
    let out = print(&data);

    for line in [
        "Run type: 0x20 | Unknown",
        "Manufacturer code: 0x0 | Unknown code",
        "Frontplane Laminate (FPL) platform: 0x1 | 2.1",
        "Waveform type: 0xb | TE",
        "Waveform tuning bias: 0x1 | Increased DS Blooming V110/V110E",
        "Waveform revision: Unknown",
        "Adhesive run number: 7",
        "Mode version: Unknown",
    ] {
        assert!(out.contains(line), "missing {:?} in:\n{}", line, out);
    }
}

#[test]
fn print_ambiguous_tuning_byte() {
    let data = build(
        raw::Header {
            waveform_type: raw::WAVEFORM_TYPE_WK,
            waveform_tuning_bias_or_rev: 1,
            ..Default::default()
        },
        None,
    );
    let out = print(&data);
    assert!(out.contains("Waveform tuning bias: Unknown\n"));
    assert!(out.contains("Waveform revision: Unknown\n"));
}
