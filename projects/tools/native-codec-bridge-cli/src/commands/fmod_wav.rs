use crate::error::CliError;
use crate::util::{with_input, write_output};
use argh::FromArgs;
use log::info;
use native_codec_bridge::CodecBridge;
use native_codec_bridge_wav::FmodToolkit;
use std::path::PathBuf;

#[derive(FromArgs, Debug)]
/// Decode a sound with the FMOD runtime and write every subsound as a WAV file
#[argh(subcommand, name = "fmod-wav")]
pub struct FmodWavCmd {
    /// sound file FMOD can open (FSB, raw PCM, ...)
    #[argh(option)]
    pub input: PathBuf,

    /// directory to write the WAV files to
    #[argh(option)]
    pub output_dir: PathBuf,

    /// sound name, used for the file names [default: input file stem]
    #[argh(option)]
    pub name: Option<String>,

    /// channel count of raw input
    #[argh(option, default = "2")]
    pub channels: u16,

    /// sample rate of raw input
    #[argh(option, default = "44_100")]
    pub rate: u32,

    /// keep float samples as IEEE float instead of converting to 16-bit
    #[argh(switch)]
    pub keep_float: bool,
}

pub fn handle_fmod_wav_command(cmd: &FmodWavCmd, bridge: &CodecBridge) -> Result<(), CliError> {
    let toolkit = FmodToolkit::new(bridge)?;
    let name = match &cmd.name {
        Some(name) => name.clone(),
        None => cmd
            .input
            .file_stem()
            .map_or_else(|| "sound".to_owned(), |stem| stem.to_string_lossy().into_owned()),
    };

    let files = with_input(&cmd.input, |raw| {
        Ok(toolkit.raw_to_wav(raw, &name, cmd.channels, cmd.rate, !cmd.keep_float)?)
    })?;

    for file in files {
        let path = cmd.output_dir.join(&file.name);
        write_output(&path, &file.data)?;
        info!("wrote '{}' ({} bytes)", path.display(), file.data.len());
    }
    Ok(())
}
