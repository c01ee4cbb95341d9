use crate::read::{ReadError, ReadRef, Result, Table};
use crate::wbf;

/// A decoded file header.
///
/// Multi-byte fields are converted to native integers. The raw record is
/// available via [`WbfHeader::raw`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WbfHeader<'data> {
    raw: &'data wbf::Header,
    /// Whole file checksum. Not validated.
    pub checksum: u32,
    /// File size in bytes, as declared by the header.
    pub filesize: u32,
    /// Serial number.
    pub serial: u32,
    /// Run type.
    pub run_type: u8,
    /// Frontplane laminate platform.
    pub fpl_platform: u8,
    /// Frontplane laminate lot.
    pub fpl_lot: u16,
    /// Waveform version.
    pub waveform_version: u8,
    /// Waveform sub-version.
    pub waveform_subversion: u8,
    /// Waveform type.
    pub waveform_type: u8,
    /// Frontplane laminate size.
    pub fpl_size: u8,
    /// Manufacturer code.
    pub mfg_code: u8,
    /// Frontplane laminate frame rate.
    pub fpl_rate: u8,
    /// Offset of the extra waveform information block, or 0 if absent.
    pub xwia: u32,
    /// Checksum 1. Not validated.
    pub cs1: u8,
    /// Offset of the mode table.
    pub wmta: u32,
    /// Unknown.
    pub fvsn: u8,
    /// Unknown.
    pub luts: u8,
    /// Number of modes minus one.
    pub mc: u8,
    /// Number of temperature ranges minus one.
    pub trc: u8,
    /// Unknown.
    pub eb: u8,
    /// Unknown.
    pub sb: u8,
    /// Checksum 2. Not validated.
    pub cs2: u8,
}

impl<'data> WbfHeader<'data> {
    /// Read the header at the start of the data.
    pub fn parse<R: ReadRef<'data>>(data: R) -> Result<Self> {
        let raw = data
            .read_at::<wbf::Header>(0)
            .read_error("Data too short for header")
            .map_err(|error| error.table(Table::Header).offset(0))?;
        Ok(Self::from_raw(raw))
    }

    /// Decode the fields of a raw header.
    pub fn from_raw(raw: &'data wbf::Header) -> Self {
        WbfHeader {
            raw,
            checksum: u32::from_le_bytes(raw.checksum),
            filesize: u32::from_le_bytes(raw.filesize),
            serial: u32::from_le_bytes(raw.serial),
            run_type: raw.run_type,
            fpl_platform: raw.fpl_platform,
            fpl_lot: u16::from_le_bytes(raw.fpl_lot),
            waveform_version: raw.waveform_version,
            waveform_subversion: raw.waveform_subversion,
            waveform_type: raw.waveform_type,
            fpl_size: raw.fpl_size,
            mfg_code: raw.mfg_code,
            fpl_rate: raw.fpl_rate,
            xwia: wbf::u24_from_bytes(raw.xwia),
            cs1: raw.cs1,
            wmta: wbf::u24_from_bytes(raw.wmta),
            fvsn: raw.fvsn,
            luts: raw.luts,
            mc: raw.mc,
            trc: raw.trc,
            eb: raw.eb,
            sb: raw.sb,
            cs2: raw.cs2,
        }
    }

    /// The raw header record.
    #[inline]
    pub fn raw(&self) -> &'data wbf::Header {
        self.raw
    }

    /// Number of entries in the mode table.
    #[inline]
    pub fn mode_count(&self) -> usize {
        self.raw.mode_count()
    }

    /// Number of temperature ranges.
    #[inline]
    pub fn temperature_range_count(&self) -> usize {
        self.raw.temperature_range_count()
    }

    /// The offset of the extra waveform information block, if present.
    #[inline]
    pub fn extra_info_offset(&self) -> Option<usize> {
        match self.xwia {
            0 => None,
            xwia => Some(xwia as usize),
        }
    }

    /// The offset of the mode table.
    #[inline]
    pub fn mode_table_offset(&self) -> usize {
        self.wmta as usize
    }

    /// The byte at offset 22, with the interpretation selected by `waveform_type`.
    #[inline]
    pub fn tuning_bias_or_revision(&self) -> TuningBiasOrRevision {
        TuningBiasOrRevision::new(self.raw.waveform_tuning_bias_or_rev, self.waveform_type)
    }

    /// The byte at offset 16, with the interpretation selected by `fpl_platform`.
    #[inline]
    pub fn mode_version_or_adhesive_run(&self) -> ModeVersionOrAdhesiveRun {
        ModeVersionOrAdhesiveRun::new(
            self.raw.mode_version_or_adhesive_run_num,
            self.fpl_platform,
        )
    }
}

/// A header byte that is either a tuning bias or a revision.
///
/// Waveform types up to `WJ` store a tuning bias, waveform types from `WR`
/// onwards store a revision. For the types in between, neither is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TuningBiasOrRevision {
    raw: u8,
    tuning_bias: Option<u8>,
    revision: Option<u8>,
}

impl TuningBiasOrRevision {
    /// Interpret `raw` for the given waveform type.
    pub fn new(raw: u8, waveform_type: u8) -> Self {
        let (tuning_bias, revision) = if waveform_type <= wbf::WAVEFORM_TYPE_TUNING_BIAS_MAX {
            (Some(raw), None)
        } else if waveform_type >= wbf::WAVEFORM_TYPE_REVISION_MIN {
            (None, Some(raw))
        } else {
            (None, None)
        };
        TuningBiasOrRevision {
            raw,
            tuning_bias,
            revision,
        }
    }

    /// The stored byte.
    #[inline]
    pub fn raw(&self) -> u8 {
        self.raw
    }

    /// The tuning bias, one of the `wbf::TUNING_BIAS_*` values.
    #[inline]
    pub fn tuning_bias(&self) -> Option<u8> {
        self.tuning_bias
    }

    /// The waveform revision.
    #[inline]
    pub fn revision(&self) -> Option<u8> {
        self.revision
    }

    /// Return true if the waveform type does not select either meaning.
    #[inline]
    pub fn is_ambiguous(&self) -> bool {
        self.tuning_bias.is_none() && self.revision.is_none()
    }
}

/// A header byte that is either a mode version or an adhesive run number.
///
/// Platforms before V110 store an adhesive run number, later platforms store
/// a mode version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeVersionOrAdhesiveRun {
    raw: u8,
    mode_version: Option<u8>,
    adhesive_run_num: Option<u8>,
}

impl ModeVersionOrAdhesiveRun {
    /// Interpret `raw` for the given frontplane laminate platform.
    pub fn new(raw: u8, fpl_platform: u8) -> Self {
        if fpl_platform < wbf::FPL_PLATFORM_MODE_VERSION_MIN {
            ModeVersionOrAdhesiveRun {
                raw,
                mode_version: None,
                adhesive_run_num: Some(raw),
            }
        } else {
            ModeVersionOrAdhesiveRun {
                raw,
                mode_version: Some(raw),
                adhesive_run_num: None,
            }
        }
    }

    /// The stored byte.
    #[inline]
    pub fn raw(&self) -> u8 {
        self.raw
    }

    /// The mode version, one of the `wbf::MODE_VERSION_*` values.
    #[inline]
    pub fn mode_version(&self) -> Option<u8> {
        self.mode_version
    }

    /// The adhesive run number.
    #[inline]
    pub fn adhesive_run_num(&self) -> Option<u8> {
        self.adhesive_run_num
    }
}
