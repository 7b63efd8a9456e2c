use crate::error::CliError;
use crate::util::{with_input, write_output};
use argh::FromArgs;
use log::info;
use native_codec_bridge::CodecBridge;
use std::path::PathBuf;

#[derive(FromArgs, Debug)]
/// Unpack one mip level of a crunch container into block data
#[argh(subcommand, name = "unpack-crunch")]
pub struct UnpackCrunchCmd {
    /// crunch container file
    #[argh(option)]
    pub input: PathBuf,

    /// output file for the block data
    #[argh(option)]
    pub output: PathBuf,

    /// mip level to unpack [default: 0]
    #[argh(option, default = "0")]
    pub level: u32,

    /// unpack Unity's crunch variant
    #[argh(switch)]
    pub unity: bool,
}

pub fn handle_unpack_crunch_command(
    cmd: &UnpackCrunchCmd,
    bridge: &CodecBridge,
) -> Result<(), CliError> {
    let codec = match cmd.unity {
        true => "unity_crunch",
        false => "crunch",
    };
    let output = with_input(&cmd.input, |data| Ok(bridge.unpack(codec, data, cmd.level)?))?;

    write_output(&cmd.output, &output)?;
    info!("{codec}: wrote level {} ({} bytes) to '{}'", cmd.level, output.len(), cmd.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use native_codec_bridge::CodecError;
    use rstest::rstest;
    use std::fs;

    #[rstest]
    #[case(false, "t2d:crunch")]
    #[case(true, "t2d:unity_crunch")]
    fn variant_picks_the_unpacker(#[case] unity: bool, #[case] expected: &str) {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("tex.crn");
        fs::write(&input, [1u8, 2, 3]).unwrap();
        let cmd = UnpackCrunchCmd {
            input,
            output: dir.path().join("out.bin"),
            level: 0,
            unity,
        };

        let err = handle_unpack_crunch_command(&cmd, &CodecBridge::builder().build()).unwrap_err();
        assert!(matches!(
            err,
            CliError::Codec(CodecError::LibraryUnavailable { codec, .. }) if codec == expected
        ));
        assert!(!cmd.output.exists());
    }
}
