//! Buffer contract: derives and checks buffer sizes before any native call.
//!
//! Everything here is arithmetic over a [`CodecDescriptor`] and [`ImageDimensions`];
//! no native library is needed to evaluate it.

use crate::descriptor::{BlockFootprint, CodecDescriptor, Direction};
use crate::error::CodecError;

/// Largest buffer a native routine can be told about; sizes travel as C `int`.
pub const MAX_NATIVE_BUFFER: usize = i32::MAX as usize;

/// Bytes per pixel of the uncompressed side.
const BYTES_PER_PIXEL: usize = 4;

/// The 2D block footprints ASTC defines, as `(x, y)`.
pub const ASTC_2D_FOOTPRINTS: [(u8, u8); 14] = [
    (4, 4),
    (5, 4),
    (5, 5),
    (6, 5),
    (6, 6),
    (8, 5),
    (8, 6),
    (8, 8),
    (10, 5),
    (10, 6),
    (10, 8),
    (10, 10),
    (12, 10),
    (12, 12),
];

/// An ASTC block footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AstcBlock {
    /// Block width in pixels.
    pub x: u8,
    /// Block height in pixels.
    pub y: u8,
}

impl AstcBlock {
    /// Creates a footprint. Validity is checked by [`validate`].
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Whether ASTC defines this footprint.
    pub fn is_valid(self) -> bool {
        ASTC_2D_FOOTPRINTS.contains(&(self.x, self.y))
    }
}

/// Image dimensions for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageDimensions {
    /// Width in pixels; must be greater than zero.
    pub width: i32,
    /// Height in pixels; must be greater than zero.
    pub height: i32,
    /// Block footprint for variable-footprint codecs. Ignored by fixed-footprint codecs.
    pub block: Option<AstcBlock>,
}

impl ImageDimensions {
    /// Dimensions without a block footprint.
    pub const fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            block: None,
        }
    }

    /// Attaches an ASTC block footprint.
    pub const fn with_block(mut self, block: AstcBlock) -> Self {
        self.block = Some(block);
        self
    }
}

/// Buffer shapes derived for one call. Computed per call, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferSpec {
    /// Validated width in pixels.
    pub width: u32,
    /// Validated height in pixels.
    pub height: u32,
    /// Block width in pixels.
    pub block_width: u8,
    /// Block height in pixels.
    pub block_height: u8,
    /// Input length in bytes. For compression this is the required length, for
    /// decompression the caller's length, accepted as-is.
    pub input_size: usize,
    /// Bytes the native routine reads from the input.
    pub min_input_size: usize,
    /// Output length in bytes.
    pub output_size: usize,
}

impl BufferSpec {
    /// Number of blocks covering the image.
    pub fn block_count(&self) -> usize {
        blocks_along(self.width, self.block_width) * blocks_along(self.height, self.block_height)
    }
}

fn blocks_along(pixels: u32, block: u8) -> usize {
    (pixels as usize).div_ceil(block as usize)
}

/// Validates `dims` against `descriptor` and derives the buffer sizes of the call.
///
/// `input_len` is the length of the caller's input; compression requires it to equal
/// `width * height * 4`, decompression accepts any length.
///
/// # Errors
///
/// - [`CodecError::InvalidDimensions`] if width or height is not positive
/// - [`CodecError::MissingBlockFootprint`] / [`CodecError::InvalidBlockFootprint`] for
///   variable-footprint codecs without a valid footprint
/// - [`CodecError::UnalignedDimensions`] if the codec needs aligned dimensions
/// - [`CodecError::DimensionsTooLarge`] if a buffer size does not fit a C `int`
/// - [`CodecError::SizeMismatch`] if a compression input has the wrong length
/// - [`CodecError::UnsupportedFormat`] for unpack descriptors, whose output is sized natively
pub fn validate(
    descriptor: &CodecDescriptor,
    dims: ImageDimensions,
    input_len: usize,
) -> Result<BufferSpec, CodecError> {
    let codec = descriptor.name;
    if dims.width <= 0 || dims.height <= 0 {
        return Err(CodecError::InvalidDimensions {
            codec,
            width: dims.width.into(),
            height: dims.height.into(),
        });
    }
    let (width, height) = (dims.width as u32, dims.height as u32);

    let (block_width, block_height) = match descriptor.footprint {
        BlockFootprint::Fixed { width, height } => (width, height),
        BlockFootprint::Variable => {
            let block = dims
                .block
                .ok_or(CodecError::MissingBlockFootprint { codec })?;
            if !block.is_valid() {
                return Err(CodecError::InvalidBlockFootprint {
                    codec,
                    x: block.x,
                    y: block.y,
                });
            }
            (block.x, block.y)
        }
    };

    if descriptor.requires_alignment
        && (width % block_width as u32 != 0 || height % block_height as u32 != 0)
    {
        return Err(CodecError::UnalignedDimensions {
            codec,
            width,
            height,
            block_width,
            block_height,
        });
    }

    let too_large = || CodecError::DimensionsTooLarge {
        codec,
        width: dims.width.into(),
        height: dims.height.into(),
    };
    let pixel_bytes = (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(BYTES_PER_PIXEL))
        .filter(|&len| len <= MAX_NATIVE_BUFFER)
        .ok_or_else(too_large)?;
    let block_bytes = blocks_along(width, block_width)
        .checked_mul(blocks_along(height, block_height))
        .and_then(|blocks| blocks.checked_mul(descriptor.bytes_per_block))
        .filter(|&len| len <= MAX_NATIVE_BUFFER)
        .ok_or_else(too_large)?;

    let (input_size, min_input_size, output_size) = match descriptor.direction {
        Direction::Compress => {
            if input_len != pixel_bytes {
                return Err(CodecError::SizeMismatch {
                    codec,
                    expected: pixel_bytes,
                    actual: input_len,
                });
            }
            (pixel_bytes, pixel_bytes, block_bytes)
        }
        Direction::Decompress => (input_len, block_bytes, pixel_bytes),
        Direction::Unpack => {
            return Err(CodecError::UnsupportedFormat {
                codec,
                detail: "unpack output is sized by the native library".into(),
            })
        }
    };

    Ok(BufferSpec {
        width,
        height,
        block_width,
        block_height,
        input_size,
        min_input_size,
        output_size,
    })
}
