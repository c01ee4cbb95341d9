//! Human readable descriptions of header values.
use wbf::wbf::*;

/// A known value of an enumerated field.
#[derive(Debug, Clone, Copy)]
pub struct Flag<T> {
    /// The raw value.
    pub value: T,
    /// The description of the value.
    pub name: &'static str,
}

macro_rules! flags {
    ($($value:expr => $name:expr),+ $(,)?) => ( &[ $(Flag { value: $value, name: $name, }),+ ] )
}

/// Return the description of `value` in the table, if known.
pub fn describe<T: Copy + Eq>(flags: &[Flag<T>], value: T) -> Option<&'static str> {
    flags
        .iter()
        .find(|flag| flag.value == value)
        .map(|flag| flag.name)
}

/// Descriptions of `Header::run_type`.
pub static RUN_TYPES: &[Flag<u8>] = flags!(
    RUN_TYPE_BASELINE => "[B]aseline",
    RUN_TYPE_TEST => "[T]est/trial",
    RUN_TYPE_PRODUCTION => "[P]roduction",
    RUN_TYPE_QUALIFICATION => "[Q]ualification",
    RUN_TYPE_V110A => "V110[A]",
    RUN_TYPE_V220C => "V220[C]",
    RUN_TYPE_D => "D",
    RUN_TYPE_V220E => "V220[E]",
    RUN_TYPE_F => "F",
    RUN_TYPE_G => "G",
    RUN_TYPE_H => "H",
    RUN_TYPE_I => "I",
    RUN_TYPE_J => "J",
    RUN_TYPE_K => "K",
    RUN_TYPE_L => "L",
    RUN_TYPE_M => "M",
    RUN_TYPE_N => "N",
);

/// Descriptions of `Header::fpl_platform`.
pub static FPL_PLATFORMS: &[Flag<u8>] = flags!(
    FPL_PLATFORM_2_0 => "2.0",
    FPL_PLATFORM_2_1 => "2.1",
    FPL_PLATFORM_2_3 => "2.3",
    FPL_PLATFORM_V110 => "V110",
    FPL_PLATFORM_V110A => "V110A",
    FPL_PLATFORM_V220 => "V220",
    FPL_PLATFORM_V250 => "V250",
    FPL_PLATFORM_V220E => "V220E",
);

/// Descriptions of `Header::fpl_size`.
pub static FPL_SIZES: &[Flag<u8>] = flags!(
    FPL_SIZE_5_0 => "5\", unknown resolution",
    FPL_SIZE_6_0 => "6\", 800x600",
    FPL_SIZE_6_1 => "6.1\", 1024x768",
    FPL_SIZE_6_0_B => "6\", 800x600",
    FPL_SIZE_8_0 => "8\", unknown resolution",
    FPL_SIZE_9_7 => "9.7\", 1200x825",
    FPL_SIZE_9_7_B => "9.7\", 1600x1200",
);

/// Descriptions of `Header::fpl_rate`.
pub static FPL_RATES: &[Flag<u8>] = flags!(
    FPL_RATE_50HZ => "50Hz",
    FPL_RATE_60HZ => "60Hz",
    FPL_RATE_85HZ => "85Hz",
);

/// Descriptions of the mode version.
pub static MODE_VERSIONS: &[Flag<u8>] = flags!(
    MODE_VERSION_V100 => "MU/GU/GC/PU (V100 modes)",
    MODE_VERSION_V110 => "DU/GC16/GC4 (V110/V110A modes)",
    MODE_VERSION_V110A => "DU/GC16/GC4 (V110/V110A modes)",
    MODE_VERSION_V220_50HZ => "DU/GC16/GC4/AU (V220, 50Hz/85Hz modes)",
    MODE_VERSION_V220_85HZ => "DU/GC16/AU (V220, 85Hz modes)",
    MODE_VERSION_V220_210DPI => "? (V220, 210 dpi, 85Hz modes)",
    MODE_VERSION_V220_210DPI_B => "? (V220, 210 dpi, 85Hz modes)",
);

/// Descriptions of `Header::waveform_type`.
pub static WAVEFORM_TYPES: &[Flag<u8>] = flags!(
    WAVEFORM_TYPE_TE => "TE",
    WAVEFORM_TYPE_WE => "WE",
    WAVEFORM_TYPE_WJ => "WJ",
    WAVEFORM_TYPE_WK => "WK",
    WAVEFORM_TYPE_WL => "WL",
    WAVEFORM_TYPE_VJ => "VJ",
    WAVEFORM_TYPE_WR => "WR",
);

/// Descriptions of the tuning bias.
pub static TUNING_BIASES: &[Flag<u8>] = flags!(
    TUNING_BIAS_STANDARD => "Standard",
    TUNING_BIAS_DS_BLOOMING_V110 => "Increased DS Blooming V110/V110E",
    TUNING_BIAS_DS_BLOOMING_V220 => "Increased DS Blooming V220/V220E",
);

/// Descriptions of `Header::mfg_code`.
pub static MFG_CODES: &[Flag<u8>] = flags!(
    MFG_CODE_ED060SCF => "ED060SCF (V220 6\" Tequila)",
    MFG_CODE_ED060SCFH1_L2 => "ED060SCFH1 (V220 Tequila Hydis - Line 2)",
    MFG_CODE_ED060SCFH1_L3 => "ED060SCFH1 (V220 Tequila Hydis - Line 3)",
    MFG_CODE_ED060SCFC1 => "ED060SCFC1 (V220 Tequila CMO)",
    MFG_CODE_ED060SCFT1 => "ED060SCFT1 (V220 Tequila CPT)",
    MFG_CODE_ED060SCG => "ED060SCG (V220 Whitney)",
    MFG_CODE_ED060SCGH1_L2 => "ED060SCGH1 (V220 Whitney Hydis - Line 2)",
    MFG_CODE_ED060SCGH1_L3 => "ED060SCGH1 (V220 Whitney Hydis - Line 3)",
    MFG_CODE_ED060SCGC1 => "ED060SCGC1 (V220 Whitney CMO)",
    MFG_CODE_ED060SCGT1 => "ED060SCGT1 (V220 Whitney CPT)",
    MFG_CODE_LB060S03_RD02 => "LB060S03-RD02 (LGD Tequila Line 1)",
    MFG_CODE_LGD_TEQUILA_L2 => "2nd LGD Tequila Line",
    MFG_CODE_LB060S05_RD02 => "LB060S05-RD02 (LGD Whitney Line 1)",
    MFG_CODE_LGD_WHITNEY_L2 => "2nd LGD Whitney Line",
);

/// Names and descriptions of the update modes, by mode table index.
pub static UPDATE_MODES: &[Flag<u8>] = flags!(
    UPDATE_MODE_INIT => "INIT (panel initialization)",
    UPDATE_MODE_DU => "DU (direct update, 1bpp)",
    UPDATE_MODE_GC16 => "GC16 (grayscale clear, 2bpp or 4bpp)",
    UPDATE_MODE_GC16_FAST => "GC16_FAST (grayscale clear, 4bpp)",
    UPDATE_MODE_A2 => "A2 (animation update, 1bpp)",
    UPDATE_MODE_GL16 => "GL16 (white transition grayscale clear, 4bpp)",
    UPDATE_MODE_GL16_FAST => "GL16_FAST (text to text grayscale clear, 4bpp)",
    UPDATE_MODE_DU4 => "DU4 (text to text)",
    UPDATE_MODE_REAGL => "REAGL (non-flashing update)",
    UPDATE_MODE_REAGLD => "REAGLD (non-flashing update with dithering)",
);

/// Describe a manufacturer code, falling back to the panel family for unlisted codes.
pub fn mfg_code(value: u8) -> &'static str {
    if let Some(name) = describe(MFG_CODES, value) {
        name
    } else if MFG_CODE_PVI_RANGE.contains(&value) {
        "PVI/EIH panel"
    } else if MFG_CODE_LGD_RANGE.contains(&value) {
        "LGD panel"
    } else {
        "Unknown code"
    }
}

/// Describe the update mode at the given mode table index.
pub fn update_mode(index: usize) -> Option<&'static str> {
    let index = u8::try_from(index).ok()?;
    describe(UPDATE_MODES, index)
}
