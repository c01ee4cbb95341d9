//! Waveform binary file definitions.
//!
//! These definitions are independent of read/write support, although we do implement
//! some traits useful for those.
//!
//! All multi-byte fields are stored little-endian as byte arrays, so every
//! record has an alignment of 1 and can be cast from any offset.

use crate::pod::Pod;

/// The size in bytes of [`Header`].
pub const HEADER_SIZE: usize = 44;

/// The size in bytes of [`Pointer`].
pub const POINTER_SIZE: usize = 4;

/// The offset of the temperature range table, which directly follows the header.
pub const TEMPERATURE_TABLE_OFFSET: usize = HEADER_SIZE;

/// The maximum number of distinct waveform segments in a file.
pub const MAX_WAVEFORMS: usize = 4096;

/// The largest file offset that fits in a 24-bit address field.
pub const MAX_ADDRESS: u32 = 0x00ff_ffff;

/// The first byte of a step pair that marks the pair as carrying no state.
pub const WAVEFORM_SKIP_MARKER: u8 = 0xfc;

/// The number of trailing bytes at the end of each waveform segment.
///
/// The first of these is normally `0xff`. Neither byte is decoded.
pub const WAVEFORM_TRAILER_SIZE: usize = 2;

/// The fixed size header at the start of the file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct Header {
    /// Whole file checksum. Not validated.
    pub checksum: [u8; 4],
    /// File size in bytes. Must equal the real file size.
    pub filesize: [u8; 4],
    /// Serial number.
    pub serial: [u8; 4],
    /// Run type. One of the `RUN_TYPE_*` constants.
    pub run_type: u8,
    /// Frontplane laminate platform. One of the `FPL_PLATFORM_*` constants.
    pub fpl_platform: u8,
    /// Frontplane laminate lot.
    pub fpl_lot: [u8; 2],
    /// Adhesive run number if `fpl_platform < 3`, otherwise mode version.
    pub mode_version_or_adhesive_run_num: u8,
    /// Waveform version.
    pub waveform_version: u8,
    /// Waveform sub-version.
    pub waveform_subversion: u8,
    /// Waveform type. One of the `WAVEFORM_TYPE_*` constants.
    pub waveform_type: u8,
    /// Frontplane laminate size. One of the `FPL_SIZE_*` constants.
    pub fpl_size: u8,
    /// Manufacturer code. One of the `MFG_CODE_*` constants.
    pub mfg_code: u8,
    /// Tuning bias if `waveform_type <= 0x15`, revision if `waveform_type >= 0x2b`.
    pub waveform_tuning_bias_or_rev: u8,
    /// Frontplane laminate frame rate. One of the `FPL_RATE_*` constants.
    pub fpl_rate: u8,
    /// Offset of the extra waveform information block, or 0 if absent.
    pub xwia: [u8; 3],
    /// Checksum 1. Not validated.
    pub cs1: u8,
    /// Offset of the mode table.
    pub wmta: [u8; 3],
    /// Unknown.
    pub fvsn: u8,
    /// Unknown.
    pub luts: u8,
    /// Number of modes minus one.
    pub mc: u8,
    /// Number of temperature ranges minus one.
    pub trc: u8,
    /// Reserved.
    pub reserved0_0: u8,
    /// Unknown.
    pub eb: u8,
    /// Unknown.
    pub sb: u8,
    /// Reserved.
    pub reserved0_1: [u8; 5],
    /// Checksum 2. Not validated.
    pub cs2: u8,
}

/// A checksummed 24-bit file offset.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct Pointer {
    /// Little-endian file offset.
    pub addr: [u8; 3],
    /// Sum of the address bytes, modulo 256.
    pub checksum: u8,
}

unsafe_impl_pod!(Header, Pointer);

impl Header {
    /// Number of entries in the mode table.
    #[inline]
    pub fn mode_count(&self) -> usize {
        usize::from(self.mc) + 1
    }

    /// Number of temperature ranges, and of entries in each temperature table.
    #[inline]
    pub fn temperature_range_count(&self) -> usize {
        usize::from(self.trc) + 1
    }
}

impl Pointer {
    /// Create a pointer to the given offset, with a valid checksum.
    ///
    /// Returns `None` if the offset does not fit in 24 bits.
    pub fn new(address: u32) -> Option<Self> {
        if address > MAX_ADDRESS {
            return None;
        }
        let addr = u24_to_bytes(address);
        Some(Pointer {
            addr,
            checksum: checksum(&addr),
        })
    }

    /// The file offset this pointer refers to.
    ///
    /// This does not check the checksum.
    #[inline]
    pub fn address(&self) -> u32 {
        u24_from_bytes(self.addr)
    }

    /// Return true if the stored checksum matches the address bytes.
    #[inline]
    pub fn is_valid(&self) -> bool {
        checksum(&self.addr) == self.checksum
    }
}

/// Calculate the checksum used by pointers and tables.
///
/// This is the sum of the bytes, modulo 256.
#[inline]
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |sum, byte| sum.wrapping_add(*byte))
}

/// Decode a little-endian 24-bit value.
#[inline]
pub fn u24_from_bytes(bytes: [u8; 3]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], 0])
}

/// Encode the low 24 bits of a value as little-endian bytes.
#[inline]
pub fn u24_to_bytes(value: u32) -> [u8; 3] {
    let [b0, b1, b2, _] = value.to_le_bytes();
    [b0, b1, b2]
}

// Values for `Header::run_type`.
/// Baseline.
pub const RUN_TYPE_BASELINE: u8 = 0x00;
/// Test/trial.
pub const RUN_TYPE_TEST: u8 = 0x01;
/// Production.
pub const RUN_TYPE_PRODUCTION: u8 = 0x02;
/// Qualification.
pub const RUN_TYPE_QUALIFICATION: u8 = 0x03;
/// V110A.
pub const RUN_TYPE_V110A: u8 = 0x04;
/// V220C.
pub const RUN_TYPE_V220C: u8 = 0x05;
/// D.
pub const RUN_TYPE_D: u8 = 0x06;
/// V220E.
pub const RUN_TYPE_V220E: u8 = 0x07;
/// F.
pub const RUN_TYPE_F: u8 = 0x08;
/// G.
pub const RUN_TYPE_G: u8 = 0x09;
/// H.
pub const RUN_TYPE_H: u8 = 0x0a;
/// I.
pub const RUN_TYPE_I: u8 = 0x0b;
/// J.
pub const RUN_TYPE_J: u8 = 0x0c;
/// K.
pub const RUN_TYPE_K: u8 = 0x0d;
/// L.
pub const RUN_TYPE_L: u8 = 0x0e;
/// M.
pub const RUN_TYPE_M: u8 = 0x0f;
/// N.
pub const RUN_TYPE_N: u8 = 0x10;

// Values for `Header::fpl_platform`.
/// 2.0
pub const FPL_PLATFORM_2_0: u8 = 0x00;
/// 2.1
pub const FPL_PLATFORM_2_1: u8 = 0x01;
/// 2.3
pub const FPL_PLATFORM_2_3: u8 = 0x02;
/// V110
pub const FPL_PLATFORM_V110: u8 = 0x03;
/// V110A
pub const FPL_PLATFORM_V110A: u8 = 0x04;
/// V220
pub const FPL_PLATFORM_V220: u8 = 0x06;
/// V250
pub const FPL_PLATFORM_V250: u8 = 0x07;
/// V220E
pub const FPL_PLATFORM_V220E: u8 = 0x08;

/// Platforms below this value store an adhesive run number instead of a mode version.
pub const FPL_PLATFORM_MODE_VERSION_MIN: u8 = FPL_PLATFORM_V110;

// Values for `Header::fpl_size`.
/// 5", unknown resolution.
pub const FPL_SIZE_5_0: u8 = 0x32;
/// 6", 800x600.
pub const FPL_SIZE_6_0: u8 = 0x3c;
/// 6.1", 1024x768.
pub const FPL_SIZE_6_1: u8 = 0x3d;
/// 6", 800x600.
pub const FPL_SIZE_6_0_B: u8 = 0x3f;
/// 8", unknown resolution.
pub const FPL_SIZE_8_0: u8 = 0x50;
/// 9.7", 1200x825.
pub const FPL_SIZE_9_7: u8 = 0x61;
/// 9.7", 1600x1200.
pub const FPL_SIZE_9_7_B: u8 = 0x63;

// Values for `Header::fpl_rate`.
/// 50Hz.
pub const FPL_RATE_50HZ: u8 = 0x50;
/// 60Hz.
pub const FPL_RATE_60HZ: u8 = 0x60;
/// 85Hz.
pub const FPL_RATE_85HZ: u8 = 0x85;

// Values for the mode version interpretation of `Header::mode_version_or_adhesive_run_num`.
/// MU/GU/GC/PU (V100 modes).
pub const MODE_VERSION_V100: u8 = 0x00;
/// DU/GC16/GC4 (V110/V110A modes).
pub const MODE_VERSION_V110: u8 = 0x01;
/// DU/GC16/GC4 (V110/V110A modes).
pub const MODE_VERSION_V110A: u8 = 0x02;
/// DU/GC16/GC4/AU (V220, 50Hz/85Hz modes).
pub const MODE_VERSION_V220_50HZ: u8 = 0x03;
/// DU/GC16/AU (V220, 85Hz modes).
pub const MODE_VERSION_V220_85HZ: u8 = 0x04;
/// V220, 210 dpi, 85Hz modes.
pub const MODE_VERSION_V220_210DPI: u8 = 0x06;
/// V220, 210 dpi, 85Hz modes.
pub const MODE_VERSION_V220_210DPI_B: u8 = 0x07;

// Values for `Header::waveform_type`.
/// TE.
pub const WAVEFORM_TYPE_TE: u8 = 0x0b;
/// WE.
pub const WAVEFORM_TYPE_WE: u8 = 0x0e;
/// WJ.
pub const WAVEFORM_TYPE_WJ: u8 = 0x15;
/// WK.
pub const WAVEFORM_TYPE_WK: u8 = 0x16;
/// WL.
pub const WAVEFORM_TYPE_WL: u8 = 0x17;
/// VJ.
pub const WAVEFORM_TYPE_VJ: u8 = 0x18;
/// WR.
pub const WAVEFORM_TYPE_WR: u8 = 0x2b;

/// Waveform types up to and including this value store a tuning bias.
pub const WAVEFORM_TYPE_TUNING_BIAS_MAX: u8 = WAVEFORM_TYPE_WJ;
/// Waveform types from this value onwards store a revision.
pub const WAVEFORM_TYPE_REVISION_MIN: u8 = WAVEFORM_TYPE_WR;

// Values for the tuning bias interpretation of `Header::waveform_tuning_bias_or_rev`.
/// Standard.
pub const TUNING_BIAS_STANDARD: u8 = 0x00;
/// Increased DS blooming V110/V110E.
pub const TUNING_BIAS_DS_BLOOMING_V110: u8 = 0x01;
/// Increased DS blooming V220/V220E.
pub const TUNING_BIAS_DS_BLOOMING_V220: u8 = 0x02;

// Values for `Header::mfg_code`.
/// ED060SCF (V220 6" Tequila).
pub const MFG_CODE_ED060SCF: u8 = 0x33;
/// ED060SCFH1 (V220 Tequila Hydis, line 2).
pub const MFG_CODE_ED060SCFH1_L2: u8 = 0x34;
/// ED060SCFH1 (V220 Tequila Hydis, line 3).
pub const MFG_CODE_ED060SCFH1_L3: u8 = 0x35;
/// ED060SCFC1 (V220 Tequila CMO).
pub const MFG_CODE_ED060SCFC1: u8 = 0x36;
/// ED060SCFT1 (V220 Tequila CPT).
pub const MFG_CODE_ED060SCFT1: u8 = 0x37;
/// ED060SCG (V220 Whitney).
pub const MFG_CODE_ED060SCG: u8 = 0x38;
/// ED060SCGH1 (V220 Whitney Hydis, line 2).
pub const MFG_CODE_ED060SCGH1_L2: u8 = 0x39;
/// ED060SCGH1 (V220 Whitney Hydis, line 3).
pub const MFG_CODE_ED060SCGH1_L3: u8 = 0x3a;
/// ED060SCGC1 (V220 Whitney CMO).
pub const MFG_CODE_ED060SCGC1: u8 = 0x3b;
/// ED060SCGT1 (V220 Whitney CPT).
pub const MFG_CODE_ED060SCGT1: u8 = 0x3c;
/// LB060S03-RD02 (LGD Tequila line 1).
pub const MFG_CODE_LB060S03_RD02: u8 = 0xa3;
/// Second LGD Tequila line.
pub const MFG_CODE_LGD_TEQUILA_L2: u8 = 0xa4;
/// LB060S05-RD02 (LGD Whitney line 1).
pub const MFG_CODE_LB060S05_RD02: u8 = 0xa5;
/// Second LGD Whitney line.
pub const MFG_CODE_LGD_WHITNEY_L2: u8 = 0xa6;

/// Manufacturer codes in this range are PVI/EIH panels.
pub const MFG_CODE_PVI_RANGE: core::ops::Range<u8> = 0x33..0x3c;
/// Manufacturer codes in this range are LGD panels.
pub const MFG_CODE_LGD_RANGE: core::ops::Range<u8> = 0xa0..0xa8;

// Update mode indices in the mode table.
/// Panel initialization.
pub const UPDATE_MODE_INIT: u8 = 0x00;
/// Direct update, 1bpp.
pub const UPDATE_MODE_DU: u8 = 0x01;
/// Grayscale update or clear, 2bpp or 4bpp.
pub const UPDATE_MODE_GC16: u8 = 0x02;
/// Fast grayscale clear, 4bpp.
pub const UPDATE_MODE_GC16_FAST: u8 = 0x03;
/// Animation update, 1bpp.
pub const UPDATE_MODE_A2: u8 = 0x04;
/// White transition grayscale clear, 4bpp.
pub const UPDATE_MODE_GL16: u8 = 0x05;
/// Fast white transition grayscale clear, 4bpp.
pub const UPDATE_MODE_GL16_FAST: u8 = 0x06;
/// Text to text.
pub const UPDATE_MODE_DU4: u8 = 0x07;
/// Non-flashing update.
pub const UPDATE_MODE_REAGL: u8 = 0x08;
/// Non-flashing update with dithering.
pub const UPDATE_MODE_REAGLD: u8 = 0x09;

#[cfg(test)]
mod tests {
    use super::*;
    use core::mem;

    #[test]
    fn record_sizes() {
        assert_eq!(mem::size_of::<Header>(), HEADER_SIZE);
        assert_eq!(mem::align_of::<Header>(), 1);
        assert_eq!(mem::size_of::<Pointer>(), POINTER_SIZE);
    }

    #[test]
    fn checksum_wraps() {
        assert_eq!(checksum(&[]), 0);
        assert_eq!(checksum(&[10, 20, 30]), 60);
        assert_eq!(checksum(&[0xff, 0x02]), 0x01);
        assert_eq!(checksum(&[3, b'a', b'b', b'c']), 41);
    }

    #[test]
    fn pointer() {
        let pointer = Pointer::new(0x0012_34f0).unwrap();
        assert_eq!(pointer.addr, [0xf0, 0x34, 0x12]);
        assert_eq!(pointer.checksum, 0x36);
        assert_eq!(pointer.address(), 0x0012_34f0);
        assert!(pointer.is_valid());

        assert_eq!(Pointer::new(MAX_ADDRESS).map(|p| p.address()), Some(MAX_ADDRESS));
        assert_eq!(Pointer::new(MAX_ADDRESS + 1), None);
    }

    #[test]
    fn pointer_single_byte_corruption() {
        let pointer = Pointer::new(0x0001_0203).unwrap();
        for byte in 0..POINTER_SIZE {
            for bit in 0..8 {
                let mut corrupt = pointer;
                match byte {
                    3 => corrupt.checksum ^= 1 << bit,
                    _ => corrupt.addr[byte] ^= 1 << bit,
                }
                assert!(!corrupt.is_valid(), "byte {} bit {}", byte, bit);
            }
        }
    }

    #[test]
    fn u24() {
        assert_eq!(u24_from_bytes([0x01, 0x02, 0x03]), 0x0003_0201);
        assert_eq!(u24_to_bytes(0x0003_0201), [0x01, 0x02, 0x03]);
        assert_eq!(u24_to_bytes(0xff00_0001), [0x01, 0x00, 0x00]);
    }

    #[test]
    fn mfg_code_ranges() {
        assert!(MFG_CODE_PVI_RANGE.contains(&MFG_CODE_ED060SCGC1));
        assert!(!MFG_CODE_PVI_RANGE.contains(&MFG_CODE_ED060SCGT1));
        assert!(MFG_CODE_LGD_RANGE.contains(&MFG_CODE_LGD_WHITNEY_L2));
    }
}
