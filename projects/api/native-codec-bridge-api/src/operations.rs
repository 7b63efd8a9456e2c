//! By-name codec operations on the process-wide bridge.
//!
//! Each function fetches the shared bridge and performs one synchronous call; see
//! [`CodecBridge`](native_codec_bridge::CodecBridge) for the buffer contracts.

use crate::global::bridge;
use native_codec_bridge::{AstcBlock, CodecError, CodecOutput, ImageDimensions};

/// Compresses `width * height` RGBA8 pixels with the named codec.
///
/// # Errors
///
/// [`CodecError::NotInitialized`] if no bridge is installed, otherwise the errors of
/// [`CodecBridge::compress`](native_codec_bridge::CodecBridge::compress).
pub fn compress(codec: &str, rgba: &[u8], width: i32, height: i32) -> Result<CodecOutput, CodecError> {
    bridge()?.compress(codec, rgba, ImageDimensions::new(width, height))
}

/// Decompresses block data with the named codec into 32-bit pixels.
///
/// # Errors
///
/// [`CodecError::NotInitialized`] if no bridge is installed, otherwise the errors of
/// [`CodecBridge::decompress`](native_codec_bridge::CodecBridge::decompress).
pub fn decompress(
    codec: &str,
    data: &[u8],
    width: i32,
    height: i32,
) -> Result<CodecOutput, CodecError> {
    bridge()?.decompress(codec, data, ImageDimensions::new(width, height))
}

/// [`compress`] for variable-footprint codecs such as ASTC.
pub fn compress_with_footprint(
    codec: &str,
    rgba: &[u8],
    width: i32,
    height: i32,
    block: AstcBlock,
) -> Result<CodecOutput, CodecError> {
    let dims = ImageDimensions::new(width, height).with_block(block);
    bridge()?.compress(codec, rgba, dims)
}

/// [`decompress`] for variable-footprint codecs such as ASTC.
pub fn decompress_with_footprint(
    codec: &str,
    data: &[u8],
    width: i32,
    height: i32,
    block: AstcBlock,
) -> Result<CodecOutput, CodecError> {
    let dims = ImageDimensions::new(width, height).with_block(block);
    bridge()?.decompress(codec, data, dims)
}

/// Unpacks mip level `level_index` of a crunch container with `crunch` or `unity_crunch`.
pub fn unpack_crunch(codec: &str, data: &[u8], level_index: u32) -> Result<CodecOutput, CodecError> {
    bridge()?.unpack(codec, data, level_index)
}
