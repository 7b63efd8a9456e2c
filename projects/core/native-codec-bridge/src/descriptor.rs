//! Static descriptions of the codec operations exposed by the native libraries.
//!
//! A [`CodecDescriptor`] carries everything the buffer contract and the call adapter
//! need to know about one entry point: which library exports it, under which symbol,
//! which call shape it uses and how its buffers are sized.

use crate::native::LibraryKind;
use crate::translate::StatusConvention;
use native_codec_bridge_common::pixels::PixelFormat;

/// Which way data flows through a codec operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Pixels in, compressed blocks out.
    Compress,
    /// Compressed blocks in, pixels out.
    Decompress,
    /// Crunched data in, block-compressed data out. Output size is decided by native code.
    Unpack,
}

impl Direction {
    /// Lowercase name, as printed by tools.
    pub const fn name(self) -> &'static str {
        match self {
            Direction::Compress => "compress",
            Direction::Decompress => "decompress",
            Direction::Unpack => "unpack",
        }
    }
}

/// Block-compressed formats understood by at least one native library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum BlockFormat {
    Bc1,
    Bc3,
    Bc4,
    Bc5,
    Bc6h,
    Bc7,
    Etc1,
    Etc2Rgb,
    Etc2Rgba,
    Etc2Rgba1,
    EacR,
    EacRSigned,
    EacRg,
    EacRgSigned,
    AtcRgb4,
    AtcRgba8,
    Astc,
    Pvrtc4,
    Pvrtc2,
}

/// The layout of the bytes on one side of a codec operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataFormat {
    /// 32-bit pixels.
    Pixels(PixelFormat),
    /// Block-compressed data.
    Blocks(BlockFormat),
    /// Crunch container wrapping block-compressed data.
    Crunched,
    /// Block data whose format is recorded by the container it was unpacked from.
    UnpackedBlocks,
}

/// Pixel footprint of one compressed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockFootprint {
    /// Every block covers `width` x `height` pixels.
    Fixed {
        /// Block width in pixels.
        width: u8,
        /// Block height in pixels.
        height: u8,
    },
    /// The footprint is chosen per call (ASTC).
    Variable,
}

/// How the size of the output buffer is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputSizing {
    /// `ceil(w / bw) * ceil(h / bh) * bytes_per_block`.
    FixedRatio,
    /// `w * h * 4`.
    FixedSize,
    /// Allocated by the native library and released through its paired free.
    NativeAllocated,
}

/// The C signature family of a native entry point.
///
/// Every variant maps to one entry in [`crate::native::NativeEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallShape {
    /// `int f(const u8* rgba, int w, int h, u8* out, int out_size)`, non-zero on success.
    Encode,
    /// `int f(const u8* rgba, int w, int h, const bc7_params* p, u8* out, int out_size)`.
    EncodeWithParams,
    /// `int f(const u8* data, int w, int h, u8* out_bgra, int out_size)`, non-zero on success.
    Decode,
    /// `int f(const u8* data, long w, long h, u32* out)`, non-zero on success.
    DecodeLongDims,
    /// `int f(const u8* data, u32 w, u32 h, u32* out)`, non-zero on success.
    DecodeU32Dims,
    /// `int f(const u8* data, long w, long h, int bw, int bh, u32* out)`, non-zero on success.
    DecodeAstcBlocks,
    /// `int f(const u8* data, long w, long h, u32* out, int is2bpp)`, non-zero on success.
    DecodePvrtc {
        /// Value passed as `is2bpp`.
        two_bpp: bool,
    },
    /// Compression through an ASTC context handle, `0` on success.
    ContextEncode,
    /// Decompression through an ASTC context handle, `0` on success.
    ContextDecode,
    /// `int f(const u8* in, u32 len, u32 index, u8** out, u32* out_len)` plus a paired free.
    UnpackAllocated,
}

impl CallShape {
    /// How the status returned by this shape is interpreted.
    pub const fn status_convention(self) -> StatusConvention {
        match self {
            CallShape::ContextEncode | CallShape::ContextDecode => StatusConvention::ZeroSuccess,
            _ => StatusConvention::NonZeroSuccess,
        }
    }

    /// Whether the entry point receives the length of its input buffer.
    ///
    /// Entry points that do not are trusted to read exactly one block stream for the
    /// given dimensions, so shorter inputs must never reach them.
    pub const fn receives_input_len(self) -> bool {
        matches!(
            self,
            CallShape::Encode
                | CallShape::EncodeWithParams
                | CallShape::ContextEncode
                | CallShape::ContextDecode
                | CallShape::UnpackAllocated
        )
    }
}

/// Describes one codec operation. Immutable, lives in the static registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodecDescriptor {
    /// Fully qualified name, `library:codec`.
    pub name: &'static str,
    /// Codec name without the library prefix.
    pub codec: &'static str,
    /// Library exporting the entry point.
    pub library: LibraryKind,
    /// Exported symbol name.
    pub symbol: &'static str,
    /// Direction of the operation.
    pub direction: Direction,
    /// Layout of the input bytes.
    pub input: DataFormat,
    /// Layout of the output bytes.
    pub output: DataFormat,
    /// Pixel footprint of one block.
    pub footprint: BlockFootprint,
    /// Bytes per compressed block.
    pub bytes_per_block: usize,
    /// Whether width and height must be multiples of the block footprint.
    pub requires_alignment: bool,
    /// C signature family of the entry point.
    pub shape: CallShape,
}

impl CodecDescriptor {
    /// How the output buffer of this operation is sized.
    pub const fn output_sizing(&self) -> OutputSizing {
        match self.direction {
            Direction::Compress => OutputSizing::FixedRatio,
            Direction::Decompress => OutputSizing::FixedSize,
            Direction::Unpack => OutputSizing::NativeAllocated,
        }
    }

    /// The block format on the compressed side of the operation, if any.
    pub const fn block_format(&self) -> Option<BlockFormat> {
        match (self.input, self.output) {
            (_, DataFormat::Blocks(format)) | (DataFormat::Blocks(format), _) => Some(format),
            _ => None,
        }
    }

    /// The pixel layout on the uncompressed side of the operation, if any.
    pub const fn pixel_format(&self) -> Option<PixelFormat> {
        match (self.input, self.output) {
            (_, DataFormat::Pixels(format)) | (DataFormat::Pixels(format), _) => Some(format),
            _ => None,
        }
    }

    /// Bits per pixel of the compressed format, for fixed footprints.
    pub const fn bits_per_pixel(&self) -> Option<usize> {
        match self.footprint {
            BlockFootprint::Fixed { width, height } => {
                Some(self.bytes_per_block * 8 / (width as usize * height as usize))
            }
            BlockFootprint::Variable => None,
        }
    }
}
