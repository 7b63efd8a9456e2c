//! Sample formats and sound descriptions, numbered as FMOD numbers them.

/// Sample format of a sound, with FMOD's `FMOD_SOUND_FORMAT` values.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundFormat {
    /// Unitialized or unknown.
    None = 0,
    /// 8-bit integer PCM.
    Pcm8 = 1,
    /// 16-bit integer PCM.
    Pcm16 = 2,
    /// 24-bit integer PCM.
    Pcm24 = 3,
    /// 32-bit integer PCM.
    Pcm32 = 4,
    /// 32-bit float PCM.
    PcmFloat = 5,
    /// Compressed bitstream.
    Bitstream = 6,
}

impl SoundFormat {
    /// Looks up a format by its FMOD value.
    pub const fn from_raw(value: i32) -> Option<Self> {
        Some(match value {
            0 => SoundFormat::None,
            1 => SoundFormat::Pcm8,
            2 => SoundFormat::Pcm16,
            3 => SoundFormat::Pcm24,
            4 => SoundFormat::Pcm32,
            5 => SoundFormat::PcmFloat,
            6 => SoundFormat::Bitstream,
            _ => return None,
        })
    }

    /// Bits per sample, for PCM formats.
    pub const fn bits(self) -> Option<u16> {
        match self {
            SoundFormat::Pcm8 => Some(8),
            SoundFormat::Pcm16 => Some(16),
            SoundFormat::Pcm24 => Some(24),
            SoundFormat::Pcm32 | SoundFormat::PcmFloat => Some(32),
            SoundFormat::None | SoundFormat::Bitstream => None,
        }
    }

    /// Lowercase name, as accepted on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            SoundFormat::None => "none",
            SoundFormat::Pcm8 => "pcm8",
            SoundFormat::Pcm16 => "pcm16",
            SoundFormat::Pcm24 => "pcm24",
            SoundFormat::Pcm32 => "pcm32",
            SoundFormat::PcmFloat => "pcmfloat",
            SoundFormat::Bitstream => "bitstream",
        }
    }
}

impl core::str::FromStr for SoundFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            SoundFormat::Pcm8,
            SoundFormat::Pcm16,
            SoundFormat::Pcm24,
            SoundFormat::Pcm32,
            SoundFormat::PcmFloat,
        ]
        .into_iter()
        .find(|format| format.name().eq_ignore_ascii_case(s))
        .ok_or_else(|| format!("unknown sample format '{s}', expected pcm8, pcm16, pcm24, pcm32 or pcmfloat"))
    }
}

/// What a decoder reports about one (sub)sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundInfo {
    /// Sample format.
    pub format: SoundFormat,
    /// Interleaved channel count.
    pub channels: u16,
    /// Samples per second.
    pub sample_rate: u32,
    /// Length of the PCM data in bytes.
    pub pcm_bytes: u32,
}

impl SoundInfo {
    /// Describes a sound.
    pub const fn new(format: SoundFormat, channels: u16, sample_rate: u32, pcm_bytes: u32) -> Self {
        Self {
            format,
            channels,
            sample_rate,
            pcm_bytes,
        }
    }
}
