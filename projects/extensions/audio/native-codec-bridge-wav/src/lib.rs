#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![warn(missing_docs)]

pub mod error;
pub mod fmod;
pub mod format;
pub mod wav;

/// In-process FMOD runtime for tests
#[cfg(test)]
pub(crate) mod test_prelude;

pub use error::WavError;
pub use fmod::FmodToolkit;
pub use format::{SoundFormat, SoundInfo};
pub use wav::{sound_to_wav, subsound_to_wav, wav_file_name, PcmSound, WavFile, WAV_HEADER_SIZE};
