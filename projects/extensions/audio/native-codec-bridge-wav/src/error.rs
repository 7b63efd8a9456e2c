//! Errors raised while packaging PCM data.

use crate::format::SoundFormat;
use native_codec_bridge::{CodecError, ErrorKind};
use thiserror::Error;

/// Errors that can occur while building a WAV file.
#[derive(Debug, Error)]
pub enum WavError {
    /// The sound is not PCM.
    #[error("sound format {0:?} not supported")]
    UnsupportedFormat(SoundFormat),

    /// The sound reports no channels.
    #[error("sound has no channels")]
    NoChannels,

    /// The PCM chunks do not add up to the sound's PCM length.
    #[error("PCM data holds {actual} bytes, the sound reports {expected}")]
    PcmLengthMismatch {
        /// Length the sound reports
        expected: usize,
        /// Total length of the chunks
        actual: usize,
    },

    /// A float PCM chunk is not a whole number of 32-bit samples.
    #[error("float PCM chunk of {0} bytes is not a whole number of samples")]
    UnalignedFloatData(usize),

    /// The data does not fit a RIFF container.
    #[error("{0} bytes of PCM data exceed the WAV size limit")]
    TooLarge(usize),

    /// The block alignment or byte rate do not fit their WAV header fields.
    #[error("{channels} channels of {bits}-bit samples at {sample_rate} Hz overflow the WAV header")]
    HeaderOverflow {
        /// Channel count
        channels: u16,
        /// Bits per written sample
        bits: u16,
        /// Sample rate in Hz
        sample_rate: u32,
    },

    /// An FMOD call reported failure.
    #[error("{call} failed with FMOD_RESULT {result}")]
    Fmod {
        /// The FMOD function
        call: &'static str,
        /// The `FMOD_RESULT` it returned
        result: i32,
    },

    /// An FMOD call succeeded without producing a handle.
    #[error("{0} returned no handle")]
    NullHandle(&'static str),

    /// A sound or its parameters cannot be described as WAV.
    #[error("invalid sound: {0}")]
    InvalidSound(String),

    /// The FMOD runtime is not available.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl WavError {
    /// Classifies this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            WavError::UnsupportedFormat(_) | WavError::NoChannels => ErrorKind::UnsupportedFormat,
            WavError::PcmLengthMismatch { .. }
            | WavError::UnalignedFloatData(_)
            | WavError::TooLarge(_)
            | WavError::HeaderOverflow { .. } => ErrorKind::SizeMismatch,
            WavError::InvalidSound(_) => ErrorKind::UnsupportedFormat,
            WavError::Fmod { .. } | WavError::NullHandle(_) => ErrorKind::NativeCallFailed,
            WavError::Codec(e) => e.kind(),
        }
    }
}
