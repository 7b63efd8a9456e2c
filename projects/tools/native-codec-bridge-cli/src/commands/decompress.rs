use crate::error::CliError;
use crate::util::{with_input, write_output};
use argh::FromArgs;
use log::info;
use native_codec_bridge::{bgra_to_rgba, AstcBlock, CodecBridge, ImageDimensions, PixelFormat};
use std::path::PathBuf;

#[derive(FromArgs, Debug)]
/// Decompress block data into raw 32-bit pixels
#[argh(subcommand, name = "decompress")]
pub struct DecompressCmd {
    /// codec name, e.g. t2d:bc1 or astc
    #[argh(option)]
    pub codec: String,

    /// compressed input file
    #[argh(option)]
    pub input: PathBuf,

    /// output file for the pixels
    #[argh(option)]
    pub output: PathBuf,

    /// image width in pixels
    #[argh(option)]
    pub width: i32,

    /// image height in pixels
    #[argh(option)]
    pub height: i32,

    /// block footprint for ASTC, e.g. 6x6
    #[argh(option, from_str_fn(crate::util::parse_block))]
    pub block: Option<AstcBlock>,

    /// write RGBA rather than the decoder's native BGRA order
    #[argh(switch)]
    pub rgba: bool,
}

pub fn handle_decompress_command(
    cmd: &DecompressCmd,
    bridge: &CodecBridge,
) -> Result<(), CliError> {
    let mut dims = ImageDimensions::new(cmd.width, cmd.height);
    if let Some(block) = cmd.block {
        dims = dims.with_block(block);
    }

    let output = with_input(&cmd.input, |data| Ok(bridge.decompress(&cmd.codec, data, dims)?))?;
    let format = output.pixel_format();
    let mut pixels = output.into_vec();
    reorder_channels(&mut pixels, format, cmd.rgba);

    write_output(&cmd.output, &pixels)?;
    info!("{}: wrote {} bytes to '{}'", cmd.codec, pixels.len(), cmd.output.display());
    Ok(())
}

/// Swizzles BGRA8 output to RGBA8 when asked to; other layouts are left alone.
fn reorder_channels(pixels: &mut [u8], format: Option<PixelFormat>, rgba: bool) {
    if rgba && format == Some(PixelFormat::Bgra8) {
        bgra_to_rgba(pixels);
    }
}
