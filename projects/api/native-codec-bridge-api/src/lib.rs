#![doc = include_str!("../README.MD")]
#![warn(missing_docs)]

pub mod global;
pub mod operations;

#[cfg(feature = "c-exports")]
pub mod c_api;

pub use global::{bridge, init, init_from_env, install, is_initialized, shutdown};
pub use operations::{
    compress, compress_with_footprint, decompress, decompress_with_footprint, unpack_crunch,
};

// Re-export the types callers of the by-name functions need
pub use native_codec_bridge::{
    AstcBlock, CodecBridge, CodecError, CodecOutput, ErrorKind, LibraryConfig, LibraryKind,
    PixelFormat, bgra_to_rgba,
};

/// Common test prelude for avoiding duplicate imports in test modules
#[cfg(test)]
pub(crate) mod test_prelude;
