use crate::error::CliError;
use argh::FromArgs;
use native_codec_bridge::registry::find;
use native_codec_bridge::{
    validate, AstcBlock, BufferSpec, CodecDescriptor, CodecError, Direction, ImageDimensions,
};

#[derive(FromArgs, Debug)]
/// Print the buffer sizes a codec requires for the given dimensions
#[argh(subcommand, name = "sizes")]
pub struct SizesCmd {
    /// codec name, e.g. etcpak:bc1 or astc
    #[argh(positional)]
    pub codec: String,

    /// image width in pixels
    #[argh(option)]
    pub width: i32,

    /// image height in pixels
    #[argh(option)]
    pub height: i32,

    /// block footprint for ASTC, e.g. 6x6
    #[argh(option, from_str_fn(crate::util::parse_block))]
    pub block: Option<AstcBlock>,

    /// report decompression sizes instead of compression sizes
    #[argh(switch)]
    pub decompress: bool,
}

pub fn handle_sizes_command(cmd: &SizesCmd) -> Result<(), CliError> {
    let (descriptor, spec) = sizes(cmd)?;

    println!("codec:         {} ({})", descriptor.name, descriptor.symbol);
    println!("blocks:        {} of {}x{}", spec.block_count(), spec.block_width, spec.block_height);
    println!("input bytes:   {}", spec.min_input_size);
    println!("output bytes:  {}", spec.output_size);
    Ok(())
}

fn sizes(cmd: &SizesCmd) -> Result<(&'static CodecDescriptor, BufferSpec), CodecError> {
    let direction = match cmd.decompress {
        true => Direction::Decompress,
        false => Direction::Compress,
    };
    let descriptor =
        find(direction, &cmd.codec).ok_or_else(|| CodecError::UnknownCodec(cmd.codec.clone()))?;

    let mut dims = ImageDimensions::new(cmd.width, cmd.height);
    if let Some(block) = cmd.block {
        dims = dims.with_block(block);
    }
    // Compression inputs must match exactly, so ask for the exact RGBA8 size.
    let input_len = match direction {
        Direction::Compress => rgba8_len(descriptor, cmd.width, cmd.height)?,
        _ => 0,
    };
    let spec = validate(descriptor, dims, input_len)?;
    Ok((descriptor, spec))
}

/// `width * height * 4`, with negative dimensions counted as zero.
fn rgba8_len(descriptor: &CodecDescriptor, width: i32, height: i32) -> Result<usize, CodecError> {
    let pixels = usize::try_from(width.max(0))
        .ok()
        .zip(usize::try_from(height.max(0)).ok())
        .and_then(|(w, h)| w.checked_mul(h))
        .and_then(|pixels| pixels.checked_mul(4));
    pixels.ok_or(CodecError::DimensionsTooLarge {
        codec: descriptor.name,
        width: width.into(),
        height: height.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use native_codec_bridge::ErrorKind;
    use rstest::rstest;

    fn cmd(codec: &str, width: i32, height: i32) -> SizesCmd {
        SizesCmd {
            codec: codec.to_owned(),
            width,
            height,
            block: None,
            decompress: false,
        }
    }

    #[rstest]
    #[case("etcpak:bc1", 8, 8, 256, 32)]
    #[case("etcpak:bc7", 4, 4, 64, 16)]
    #[case("etcpak:etc2_rgba", 16, 4, 256, 64)]
    fn compression_asks_for_exact_rgba8(
        #[case] codec: &str,
        #[case] width: i32,
        #[case] height: i32,
        #[case] input: usize,
        #[case] output: usize,
    ) {
        let (descriptor, spec) = sizes(&cmd(codec, width, height)).unwrap();
        assert_eq!(descriptor.name, codec);
        assert_eq!(spec.min_input_size, input);
        assert_eq!(spec.output_size, output);
    }

    #[test]
    fn decompression_reports_block_bytes() {
        let cmd = SizesCmd {
            decompress: true,
            ..cmd("t2d:bc1", 8, 8)
        };
        let (_, spec) = sizes(&cmd).unwrap();
        assert_eq!(spec.min_input_size, 32);
        assert_eq!(spec.output_size, 256);
    }

    #[test]
    fn astc_uses_the_given_footprint() {
        let cmd = SizesCmd {
            block: Some(AstcBlock::new(6, 6)),
            ..cmd("astcenc:astc", 12, 12)
        };
        let (_, spec) = sizes(&cmd).unwrap();
        assert_eq!((spec.block_width, spec.block_height), (6, 6));
        assert_eq!(spec.output_size, 64);
    }

    #[test]
    fn unknown_codecs_are_reported() {
        let err = handle_sizes_command(&cmd("nope", 4, 4)).unwrap_err();
        assert!(matches!(err, CliError::Codec(CodecError::UnknownCodec(ref name)) if name == "nope"));
    }

    #[test]
    fn oversized_images_are_rejected() {
        let err = sizes(&cmd("etcpak:bc1", 65_536, 65_536)).unwrap_err();
        assert!(matches!(err, CodecError::DimensionsTooLarge { .. }));
        assert_eq!(err.kind(), ErrorKind::InvalidDimensions);
    }

    #[rstest]
    #[case(4, 4, 64)]
    #[case(-4, 4, 0)]
    #[case(0, 100, 0)]
    fn rgba8_len_counts_negative_as_zero(
        #[case] width: i32,
        #[case] height: i32,
        #[case] expected: usize,
    ) {
        let descriptor = find(Direction::Compress, "etcpak:bc1").unwrap();
        assert_eq!(rgba8_len(descriptor, width, height).unwrap(), expected);
    }
}
