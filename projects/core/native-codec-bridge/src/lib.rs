#![doc = include_str!(concat!("../", core::env!("CARGO_PKG_README")))]
#![warn(missing_docs)]

pub mod adapter;
pub mod bc7;
mod bridge;
pub mod contract;
pub mod descriptor;
pub mod error;
pub mod native;
pub mod output;
pub mod registry;
pub mod translate;

pub use adapter::{AstcConfig, AstcContext, AstcDataType, AstcFlags, AstcProfile};
pub use bc7::Bc7Params;
pub use bridge::{CodecBridge, CodecBridgeBuilder};
pub use contract::{validate, AstcBlock, BufferSpec, ImageDimensions};
pub use descriptor::{CodecDescriptor, DataFormat, Direction};
pub use error::{CodecError, ErrorKind, LibraryError};
pub use native::{LibraryConfig, LibraryKind};
pub use output::CodecOutput;

// Re-export pixel helpers for convenience
pub use native_codec_bridge_common::pixels::{bgra_to_rgba, rgba_to_bgra, PixelFormat};

/// Common test prelude for avoiding duplicate imports in test modules
#[cfg(test)]
pub(crate) mod test_prelude;
