//! Error types for codec operations.

use crate::native::LibraryKind;
use core::fmt;
use native_codec_bridge_common::allocate::AllocateError;
use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of a [`CodecError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Width or height not positive, or a missing/invalid ASTC block footprint.
    InvalidDimensions,
    /// The codec requires dimensions that are multiples of its block footprint.
    UnalignedDimensions,
    /// The input length differs from the length the codec requires.
    SizeMismatch,
    /// The native routine reported failure, or was never called because its input was truncated.
    NativeCallFailed,
    /// The library backing the codec is not loaded.
    LibraryUnavailable,
    /// The requested data layout is not supported.
    UnsupportedFormat,
    /// The output buffer could not be allocated.
    AllocationFailed,
    /// No codec with the requested name exists for the requested direction.
    UnknownCodec,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidDimensions => "invalid dimensions",
            ErrorKind::UnalignedDimensions => "unaligned dimensions",
            ErrorKind::SizeMismatch => "size mismatch",
            ErrorKind::NativeCallFailed => "native call failed",
            ErrorKind::LibraryUnavailable => "library unavailable",
            ErrorKind::UnsupportedFormat => "unsupported format",
            ErrorKind::AllocationFailed => "allocation failed",
            ErrorKind::UnknownCodec => "unknown codec",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while compressing, decompressing or unpacking.
///
/// Every variant names the codec it concerns. Validation errors are raised before
/// any native code runs; a failed call never yields a partially filled buffer.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Width or height is zero or negative.
    #[error("{codec}: invalid dimensions {width}x{height}, both must be greater than zero")]
    InvalidDimensions {
        /// The codec name
        codec: &'static str,
        /// The requested width
        width: i64,
        /// The requested height
        height: i64,
    },

    /// The image is too large to describe to the native routine.
    #[error("{codec}: dimensions {width}x{height} exceed what the native routine accepts")]
    DimensionsTooLarge {
        /// The codec name
        codec: &'static str,
        /// The requested width
        width: i64,
        /// The requested height
        height: i64,
    },

    /// A variable-footprint codec was called without a block footprint.
    #[error("{codec}: a block footprint is required")]
    MissingBlockFootprint {
        /// The codec name
        codec: &'static str,
    },

    /// The block footprint is not one the format defines.
    #[error("{codec}: {x}x{y} is not a valid 2D ASTC block footprint")]
    InvalidBlockFootprint {
        /// The codec name
        codec: &'static str,
        /// Block width
        x: u8,
        /// Block height
        y: u8,
    },

    /// The dimensions are not multiples of the codec's block footprint.
    #[error("{codec}: dimensions {width}x{height} must be multiples of {block_width}x{block_height}")]
    UnalignedDimensions {
        /// The codec name
        codec: &'static str,
        /// The requested width
        width: u32,
        /// The requested height
        height: u32,
        /// Block width
        block_width: u8,
        /// Block height
        block_height: u8,
    },

    /// The input length differs from the required length.
    #[error("{codec}: input holds {actual} bytes, expected {expected}")]
    SizeMismatch {
        /// The codec name
        codec: &'static str,
        /// The required size in bytes
        expected: usize,
        /// The actual size in bytes
        actual: usize,
    },

    /// Compressed input is shorter than what the native decoder reads for the given dimensions.
    #[error("{codec}: compressed input is truncated, the decoder reads {needed} bytes but only {actual} are available")]
    TruncatedInput {
        /// The codec name
        codec: &'static str,
        /// The size the decoder reads
        needed: usize,
        /// The actual size in bytes
        actual: usize,
    },

    /// The native routine reported failure.
    #[error("{codec}: native call failed (status {status}{})", status_detail(*.status, *.is_error_code))]
    NativeCallFailed {
        /// The codec name
        codec: &'static str,
        /// The raw status returned by the native routine
        status: i32,
        /// Whether the status is an error code (ASTC) rather than a success flag
        is_error_code: bool,
    },

    /// The native routine reported success but handed back no buffer.
    #[error("{codec}: native call returned a null buffer")]
    NullOutput {
        /// The codec name
        codec: &'static str,
    },

    /// The native routine could not create a context.
    #[error("{codec}: native context creation failed")]
    ContextCreationFailed {
        /// The codec name
        codec: &'static str,
    },

    /// The library backing the codec is not loaded.
    #[error("{codec}: library {library} is unavailable: {reason}")]
    LibraryUnavailable {
        /// The codec name
        codec: &'static str,
        /// The library backing the codec
        library: LibraryKind,
        /// Why the library or entry point is missing
        reason: String,
    },

    /// The requested data layout is not supported.
    #[error("{codec}: unsupported format: {detail}")]
    UnsupportedFormat {
        /// The codec name
        codec: &'static str,
        /// What was requested
        detail: String,
    },

    /// The input is larger than the native routine can be told about.
    #[error("{codec}: input of {len} bytes exceeds what the native routine accepts")]
    InputTooLarge {
        /// The codec name
        codec: &'static str,
        /// The input length
        len: usize,
    },

    /// The output buffer could not be allocated.
    #[error("{codec}: output allocation failed: {source}")]
    AllocationFailed {
        /// The codec name
        codec: &'static str,
        /// The underlying allocation error
        #[source]
        source: AllocateError,
    },

    /// No codec with this name exists for the requested direction.
    #[error("unknown codec '{0}'")]
    UnknownCodec(String),

    /// The process-wide bridge has not been initialized.
    #[error("native libraries have not been initialized")]
    NotInitialized,
}

fn status_detail(status: i32, is_error_code: bool) -> &'static str {
    if !is_error_code {
        return "";
    }
    match status {
        1 => ", invalid arguments",
        2 => ", codec error",
        _ => "",
    }
}

impl CodecError {
    /// Classifies this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodecError::InvalidDimensions { .. }
            | CodecError::DimensionsTooLarge { .. }
            | CodecError::MissingBlockFootprint { .. }
            | CodecError::InvalidBlockFootprint { .. } => ErrorKind::InvalidDimensions,
            CodecError::UnalignedDimensions { .. } => ErrorKind::UnalignedDimensions,
            CodecError::SizeMismatch { .. } | CodecError::InputTooLarge { .. } => {
                ErrorKind::SizeMismatch
            }
            CodecError::TruncatedInput { .. }
            | CodecError::NativeCallFailed { .. }
            | CodecError::NullOutput { .. }
            | CodecError::ContextCreationFailed { .. } => ErrorKind::NativeCallFailed,
            CodecError::LibraryUnavailable { .. } | CodecError::NotInitialized => {
                ErrorKind::LibraryUnavailable
            }
            CodecError::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            CodecError::AllocationFailed { .. } => ErrorKind::AllocationFailed,
            CodecError::UnknownCodec(_) => ErrorKind::UnknownCodec,
        }
    }

    /// The codec this error concerns, when known.
    pub fn codec(&self) -> Option<&str> {
        match self {
            CodecError::InvalidDimensions { codec, .. }
            | CodecError::DimensionsTooLarge { codec, .. }
            | CodecError::MissingBlockFootprint { codec }
            | CodecError::InvalidBlockFootprint { codec, .. }
            | CodecError::UnalignedDimensions { codec, .. }
            | CodecError::SizeMismatch { codec, .. }
            | CodecError::TruncatedInput { codec, .. }
            | CodecError::NativeCallFailed { codec, .. }
            | CodecError::NullOutput { codec }
            | CodecError::ContextCreationFailed { codec }
            | CodecError::LibraryUnavailable { codec, .. }
            | CodecError::UnsupportedFormat { codec, .. }
            | CodecError::InputTooLarge { codec, .. }
            | CodecError::AllocationFailed { codec, .. } => Some(*codec),
            CodecError::UnknownCodec(name) => Some(name.as_str()),
            CodecError::NotInitialized => None,
        }
    }
}

/// Errors raised while loading a native library or resolving its entry points.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// The shared library could not be opened.
    #[error("failed to open {library} from '{}': {source}", path.display())]
    Open {
        /// The library being loaded
        library: LibraryKind,
        /// Where it was loaded from
        path: PathBuf,
        /// The loader error
        #[source]
        source: libloading::Error,
    },

    /// The shared library does not export a required symbol.
    #[error("{library} does not export '{symbol}': {source}")]
    MissingSymbol {
        /// The library being loaded
        library: LibraryKind,
        /// The missing symbol
        symbol: &'static str,
        /// The loader error
        #[source]
        source: libloading::Error,
    },

    /// An entry point was registered under a name the registry does not know.
    #[error("no codec named '{0}' exists")]
    UnknownCodec(String),

    /// An entry point was registered for a codec with a different call shape.
    #[error("entry point registered for '{codec}' does not match its call shape")]
    ShapeMismatch {
        /// The codec name
        codec: &'static str,
    },
}
