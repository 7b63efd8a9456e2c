use crate::error::CliError;
use crate::util::{with_input, write_output};
use argh::FromArgs;
use log::info;
use native_codec_bridge::registry::find;
use native_codec_bridge::{AstcBlock, Bc7Params, CodecBridge, Direction, ImageDimensions};
use std::path::PathBuf;

#[derive(FromArgs, Debug)]
/// Compress raw RGBA8 pixels into block data
#[argh(subcommand, name = "compress")]
pub struct CompressCmd {
    /// codec name, e.g. etcpak:bc1 or astc
    #[argh(option)]
    pub codec: String,

    /// raw RGBA8 input file
    #[argh(option)]
    pub input: PathBuf,

    /// output file for the compressed blocks
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

    /// BC7 search thoroughness, 0-4 (only for bc7)
    #[argh(option)]
    pub uber_level: Option<u32>,

    /// use linear rather than perceptual BC7 channel weights (only for bc7)
    #[argh(switch)]
    pub linear: bool,
}

impl CompressCmd {
    fn bc7_params(&self) -> Option<Bc7Params> {
        let is_bc7 = find(Direction::Compress, &self.codec)
            .is_some_and(|descriptor| descriptor.name == "etcpak:bc7");
        if !is_bc7 || (self.uber_level.is_none() && !self.linear) {
            return None;
        }
        let params = match self.linear {
            true => Bc7Params::linear(),
            false => Bc7Params::perceptual(),
        };
        Some(params.with_uber_level(self.uber_level.unwrap_or(0)))
    }
}

pub fn handle_compress_command(cmd: &CompressCmd, bridge: &CodecBridge) -> Result<(), CliError> {
    let mut dims = ImageDimensions::new(cmd.width, cmd.height);
    if let Some(block) = cmd.block {
        dims = dims.with_block(block);
    }

    let output = with_input(&cmd.input, |rgba| {
        Ok(match cmd.bc7_params() {
            Some(params) => bridge.compress_bc7_with_params(rgba, dims, &params)?,
            None => bridge.compress(&cmd.codec, rgba, dims)?,
        })
    })?;

    write_output(&cmd.output, &output)?;
    info!("{}: wrote {} bytes to '{}'", cmd.codec, output.len(), cmd.output.display());
    Ok(())
}
