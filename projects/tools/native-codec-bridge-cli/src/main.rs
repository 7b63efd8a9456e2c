#![cfg(not(tarpaulin_include))]

mod commands;
mod error;
mod util;
use argh::FromArgs;
use core::error::Error;
use native_codec_bridge::{CodecBridge, LibraryConfig};
use std::path::PathBuf;

#[derive(FromArgs, Debug)]
/// Runs texture codecs from pre-built native libraries, and packages raw PCM as WAV
struct TopLevel {
    /// path to the etcpak library [default: $NCB_ETCPAK_LIB]
    #[argh(option)]
    etcpak: Option<PathBuf>,

    /// path to the texture2ddecoder library [default: $NCB_T2D_LIB]
    #[argh(option)]
    t2d: Option<PathBuf>,

    /// path to the ASTC encoder library [default: $NCB_ASTC_LIB]
    #[argh(option)]
    astc: Option<PathBuf>,

    /// path to the FMOD runtime library [default: $NCB_FMOD_LIB]
    #[argh(option)]
    fmod: Option<PathBuf>,

    #[argh(subcommand)]
    command: Commands,
}

impl TopLevel {
    fn library_config(&self) -> LibraryConfig {
        let mut config = LibraryConfig::from_env();
        if let Some(path) = &self.etcpak {
            config = config.with_etcpak(path);
        }
        if let Some(path) = &self.t2d {
            config = config.with_texture2ddecoder(path);
        }
        if let Some(path) = &self.astc {
            config = config.with_astc_encoder(path);
        }
        if let Some(path) = &self.fmod {
            config = config.with_fmod(path);
        }
        config
    }
}

#[derive(FromArgs, Debug)]
#[argh(subcommand)]
enum Commands {
    List(commands::list::ListCmd),
    Sizes(commands::sizes::SizesCmd),
    Compress(commands::compress::CompressCmd),
    Decompress(commands::decompress::DecompressCmd),
    UnpackCrunch(commands::unpack_crunch::UnpackCrunchCmd),
    Wav(commands::wav::WavCmd),
    FmodWav(commands::fmod_wav::FmodWavCmd),
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli: TopLevel = argh::from_env();

    // Commands that never touch native code skip loading.
    let bridge = || CodecBridge::load(&cli.library_config());

    match cli.command {
        Commands::List(ref cmd) => commands::list::handle_list_command(cmd, &bridge())?,
        Commands::Sizes(ref cmd) => commands::sizes::handle_sizes_command(cmd)?,
        Commands::Compress(ref cmd) => {
            commands::compress::handle_compress_command(cmd, &bridge())?
        }
        Commands::Decompress(ref cmd) => {
            commands::decompress::handle_decompress_command(cmd, &bridge())?
        }
        Commands::UnpackCrunch(ref cmd) => {
            commands::unpack_crunch::handle_unpack_crunch_command(cmd, &bridge())?
        }
        Commands::Wav(ref cmd) => commands::wav::handle_wav_command(cmd)?,
        Commands::FmodWav(ref cmd) => {
            commands::fmod_wav::handle_fmod_wav_command(cmd, &bridge())?
        }
    }

    Ok(())
}
