//! The process-wide, read-only set of codec descriptors.
//!
//! Names are `library:codec` (`etcpak:bc1`, `t2d:bc1`, `astcenc:astc`). An unqualified
//! name resolves to the first descriptor in registry order for the requested direction,
//! so `bc1` compresses with etcpak and decompresses with etcpak as well.

use crate::descriptor::{
    BlockFootprint, BlockFormat, CallShape, CodecDescriptor, DataFormat, Direction,
};
use crate::native::LibraryKind;
use native_codec_bridge_common::pixels::PixelFormat;

const BLOCK_4X4: BlockFootprint = BlockFootprint::Fixed {
    width: 4,
    height: 4,
};

const RGBA8: DataFormat = DataFormat::Pixels(PixelFormat::Rgba8);
const BGRA8: DataFormat = DataFormat::Pixels(PixelFormat::Bgra8);

const fn etcpak_encode(
    name: &'static str,
    codec: &'static str,
    symbol: &'static str,
    format: BlockFormat,
    bytes_per_block: usize,
    shape: CallShape,
) -> CodecDescriptor {
    CodecDescriptor {
        name,
        codec,
        library: LibraryKind::Etcpak,
        symbol,
        direction: Direction::Compress,
        input: RGBA8,
        output: DataFormat::Blocks(format),
        footprint: BLOCK_4X4,
        bytes_per_block,
        requires_alignment: true,
        shape,
    }
}

const fn etcpak_decode(
    name: &'static str,
    codec: &'static str,
    symbol: &'static str,
    format: BlockFormat,
    bytes_per_block: usize,
) -> CodecDescriptor {
    CodecDescriptor {
        name,
        codec,
        library: LibraryKind::Etcpak,
        symbol,
        direction: Direction::Decompress,
        input: DataFormat::Blocks(format),
        output: BGRA8,
        footprint: BLOCK_4X4,
        bytes_per_block,
        requires_alignment: true,
        shape: CallShape::Decode,
    }
}

const fn t2d_decode(
    name: &'static str,
    codec: &'static str,
    symbol: &'static str,
    format: BlockFormat,
    footprint: BlockFootprint,
    bytes_per_block: usize,
    shape: CallShape,
) -> CodecDescriptor {
    CodecDescriptor {
        name,
        codec,
        library: LibraryKind::Texture2dDecoder,
        symbol,
        direction: Direction::Decompress,
        input: DataFormat::Blocks(format),
        output: BGRA8,
        footprint,
        bytes_per_block,
        requires_alignment: false,
        shape,
    }
}

const fn t2d_unpack(
    name: &'static str,
    codec: &'static str,
    symbol: &'static str,
) -> CodecDescriptor {
    CodecDescriptor {
        name,
        codec,
        library: LibraryKind::Texture2dDecoder,
        symbol,
        direction: Direction::Unpack,
        input: DataFormat::Crunched,
        output: DataFormat::UnpackedBlocks,
        footprint: BLOCK_4X4,
        bytes_per_block: 0,
        requires_alignment: false,
        shape: CallShape::UnpackAllocated,
    }
}

/// ASTC compression through an encoder context.
pub const ASTCENC_COMPRESS: CodecDescriptor = CodecDescriptor {
    name: "astcenc:astc",
    codec: "astc",
    library: LibraryKind::AstcEncoder,
    symbol: "astc_compress_rgba8",
    direction: Direction::Compress,
    input: RGBA8,
    output: DataFormat::Blocks(BlockFormat::Astc),
    footprint: BlockFootprint::Variable,
    bytes_per_block: 16,
    requires_alignment: false,
    shape: CallShape::ContextEncode,
};

/// ASTC decompression through an encoder context. Produces RGBA8.
pub const ASTCENC_DECOMPRESS: CodecDescriptor = CodecDescriptor {
    name: "astcenc:astc",
    codec: "astc",
    library: LibraryKind::AstcEncoder,
    symbol: "astc_decompress_rgba8",
    direction: Direction::Decompress,
    input: DataFormat::Blocks(BlockFormat::Astc),
    output: RGBA8,
    footprint: BlockFootprint::Variable,
    bytes_per_block: 16,
    requires_alignment: false,
    shape: CallShape::ContextDecode,
};

use BlockFormat::*;
use CallShape::{DecodeLongDims, DecodeU32Dims, Encode};

#[rustfmt::skip]
static CODECS: [CodecDescriptor; 45] = [
    // etcpak, compression
    etcpak_encode("etcpak:bc1", "bc1", "etcpak_compress_bc1", Bc1, 8, Encode),
    etcpak_encode("etcpak:bc1_dither", "bc1_dither", "etcpak_compress_bc1_dither", Bc1, 8, Encode),
    etcpak_encode("etcpak:bc3", "bc3", "etcpak_compress_bc3", Bc3, 16, Encode),
    etcpak_encode("etcpak:bc4", "bc4", "etcpak_compress_bc4", Bc4, 8, Encode),
    etcpak_encode("etcpak:bc5", "bc5", "etcpak_compress_bc5", Bc5, 16, Encode),
    etcpak_encode("etcpak:bc7", "bc7", "etcpak_compress_bc7", Bc7, 16, CallShape::EncodeWithParams),
    etcpak_encode("etcpak:etc1_rgb", "etc1_rgb", "etcpak_compress_etc1_rgb", Etc1, 8, Encode),
    etcpak_encode("etcpak:etc1_rgb_dither", "etc1_rgb_dither", "etcpak_compress_etc1_rgb_dither", Etc1, 8, Encode),
    etcpak_encode("etcpak:etc2_rgb", "etc2_rgb", "etcpak_compress_etc2_rgb", Etc2Rgb, 8, Encode),
    etcpak_encode("etcpak:etc2_rgba", "etc2_rgba", "etcpak_compress_etc2_rgba", Etc2Rgba, 16, Encode),
    etcpak_encode("etcpak:eac_r", "eac_r", "etcpak_compress_eac_r", EacR, 8, Encode),
    etcpak_encode("etcpak:eac_rg", "eac_rg", "etcpak_compress_eac_rg", EacRg, 16, Encode),
    // etcpak, decompression (BGRA8 out)
    etcpak_decode("etcpak:etc1_rgb", "etc1_rgb", "etcpak_decompress_etc1_rgb", Etc1, 8),
    etcpak_decode("etcpak:etc2_rgb", "etc2_rgb", "etcpak_decompress_etc2_rgb", Etc2Rgb, 8),
    etcpak_decode("etcpak:etc2_rgba", "etc2_rgba", "etcpak_decompress_etc2_rgba", Etc2Rgba, 16),
    etcpak_decode("etcpak:etc2_r11", "etc2_r11", "etcpak_decompress_etc2_r11", EacR, 8),
    etcpak_decode("etcpak:etc2_rg11", "etc2_rg11", "etcpak_decompress_etc2_rg11", EacRg, 16),
    etcpak_decode("etcpak:bc1", "bc1", "etcpak_decompress_bc1", Bc1, 8),
    etcpak_decode("etcpak:bc3", "bc3", "etcpak_decompress_bc3", Bc3, 16),
    etcpak_decode("etcpak:bc4", "bc4", "etcpak_decompress_bc4", Bc4, 8),
    etcpak_decode("etcpak:bc5", "bc5", "etcpak_decompress_bc5", Bc5, 16),
    etcpak_decode("etcpak:bc7", "bc7", "etcpak_decompress_bc7", Bc7, 16),
    // texture2ddecoder, `long` dimensions
    t2d_decode("t2d:bc1", "bc1", "t2d_decode_bc1", Bc1, BLOCK_4X4, 8, DecodeLongDims),
    t2d_decode("t2d:bc3", "bc3", "t2d_decode_bc3", Bc3, BLOCK_4X4, 16, DecodeLongDims),
    t2d_decode("t2d:etc1", "etc1", "t2d_decode_etc1", Etc1, BLOCK_4X4, 8, DecodeLongDims),
    t2d_decode("t2d:etc2", "etc2", "t2d_decode_etc2", Etc2Rgb, BLOCK_4X4, 8, DecodeLongDims),
    t2d_decode("t2d:etc2a1", "etc2a1", "t2d_decode_etc2a1", Etc2Rgba1, BLOCK_4X4, 8, DecodeLongDims),
    t2d_decode("t2d:etc2a8", "etc2a8", "t2d_decode_etc2a8", Etc2Rgba, BLOCK_4X4, 16, DecodeLongDims),
    t2d_decode("t2d:eacr", "eacr", "t2d_decode_eacr", EacR, BLOCK_4X4, 8, DecodeLongDims),
    t2d_decode("t2d:eacr_signed", "eacr_signed", "t2d_decode_eacr_signed", EacRSigned, BLOCK_4X4, 8, DecodeLongDims),
    t2d_decode("t2d:eacrg", "eacrg", "t2d_decode_eacrg", EacRg, BLOCK_4X4, 16, DecodeLongDims),
    t2d_decode("t2d:eacrg_signed", "eacrg_signed", "t2d_decode_eacrg_signed", EacRgSigned, BLOCK_4X4, 16, DecodeLongDims),
    // texture2ddecoder, `uint32_t` dimensions
    t2d_decode("t2d:bc4", "bc4", "t2d_decode_bc4", Bc4, BLOCK_4X4, 8, DecodeU32Dims),
    t2d_decode("t2d:bc5", "bc5", "t2d_decode_bc5", Bc5, BLOCK_4X4, 16, DecodeU32Dims),
    t2d_decode("t2d:bc6", "bc6", "t2d_decode_bc6", Bc6h, BLOCK_4X4, 16, DecodeU32Dims),
    t2d_decode("t2d:bc7", "bc7", "t2d_decode_bc7", Bc7, BLOCK_4X4, 16, DecodeU32Dims),
    t2d_decode("t2d:atc_rgb4", "atc_rgb4", "t2d_decode_atc_rgb4", AtcRgb4, BLOCK_4X4, 8, DecodeU32Dims),
    t2d_decode("t2d:atc_rgba8", "atc_rgba8", "t2d_decode_atc_rgba8", AtcRgba8, BLOCK_4X4, 16, DecodeU32Dims),
    // texture2ddecoder, variable footprints
    t2d_decode("t2d:astc", "astc", "t2d_decode_astc", Astc, BlockFootprint::Variable, 16, CallShape::DecodeAstcBlocks),
    t2d_decode("t2d:pvrtc4", "pvrtc4", "t2d_decode_pvrtc", Pvrtc4, BLOCK_4X4, 8, CallShape::DecodePvrtc { two_bpp: false }),
    t2d_decode("t2d:pvrtc2", "pvrtc2", "t2d_decode_pvrtc", Pvrtc2, BlockFootprint::Fixed { width: 8, height: 4 }, 8, CallShape::DecodePvrtc { two_bpp: true }),
    // texture2ddecoder, crunch (native allocated, released with `t2d_free`)
    t2d_unpack("t2d:crunch", "crunch", "t2d_unpack_crunch"),
    t2d_unpack("t2d:unity_crunch", "unity_crunch", "t2d_unpack_unity_crunch"),
    // astc encoder, context based
    ASTCENC_COMPRESS,
    ASTCENC_DECOMPRESS,
];

/// Legacy codec names and the names they stand for.
const ALIASES: [(&str, &str); 7] = [
    ("dxt1", "bc1"),
    ("dxt1_dither", "bc1_dither"),
    ("dxt5", "bc3"),
    ("etc1", "etc1_rgb"),
    ("etc1_dither", "etc1_rgb_dither"),
    ("etc2", "etc2_rgb"),
    ("etc_rgba", "etc2_rgba"),
];

/// Iterates over every known descriptor in registry order.
pub fn codecs() -> impl Iterator<Item = &'static CodecDescriptor> {
    CODECS.iter()
}

/// Resolves a legacy alias; returns the name unchanged if it is not one.
pub fn resolve_alias(codec: &str) -> &str {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == codec)
        .map_or(codec, |(_, target)| target)
}

/// Looks up the descriptor for `name` in the given direction.
///
/// `name` is either `library:codec` or a bare codec name. Aliases apply to the codec
/// part only when no descriptor carries the name verbatim, so `t2d:etc1` still finds
/// the texture2ddecoder routine rather than etcpak's `etc1_rgb`.
pub fn find(direction: Direction, name: &str) -> Option<&'static CodecDescriptor> {
    let (library, codec) = match name.split_once(':') {
        Some((prefix, codec)) => (Some(LibraryKind::from_prefix(prefix)?), codec),
        None => (None, name),
    };

    let matches = |wanted: &str| {
        codecs().find(|d| {
            d.direction == direction
                && d.codec == wanted
                && library.is_none_or(|library| d.library == library)
        })
    };

    matches(codec).or_else(|| {
        let resolved = resolve_alias(codec);
        (resolved != codec).then(|| matches(resolved)).flatten()
    })
}
