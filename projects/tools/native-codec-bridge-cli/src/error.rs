use native_codec_bridge::CodecError;
use native_codec_bridge_wav::WavError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("failed to map '{path}': {reason}")]
    Mmap { path: String, reason: String },
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Wav(#[from] WavError),
    #[error("path '{0}' is not valid UTF-8")]
    NonUtf8Path(String),
}
