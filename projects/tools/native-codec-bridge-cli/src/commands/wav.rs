use crate::error::CliError;
use crate::util::{with_input, write_output};
use argh::FromArgs;
use log::info;
use native_codec_bridge_wav::{sound_to_wav, PcmSound, SoundFormat, SoundInfo, WavError};
use std::path::PathBuf;

#[derive(FromArgs, Debug)]
/// Package raw interleaved PCM data as a WAV file
#[argh(subcommand, name = "wav")]
pub struct WavCmd {
    /// raw PCM input file
    #[argh(option)]
    pub input: PathBuf,

    /// directory to write the WAV file to
    #[argh(option)]
    pub output_dir: PathBuf,

    /// sound name, used for the file name [default: input file stem]
    #[argh(option)]
    pub name: Option<String>,

    /// sample format: pcm8, pcm16, pcm24, pcm32 or pcmfloat
    #[argh(option)]
    pub format: SoundFormat,

    /// interleaved channel count
    #[argh(option)]
    pub channels: u16,

    /// samples per second
    #[argh(option)]
    pub rate: u32,

    /// keep float samples as IEEE float instead of converting to 16-bit
    #[argh(switch)]
    pub keep_float: bool,
}

pub fn handle_wav_command(cmd: &WavCmd) -> Result<(), CliError> {
    let name = match &cmd.name {
        Some(name) => name.clone(),
        None => cmd
            .input
            .file_stem()
            .map_or_else(|| "sound".to_owned(), |stem| stem.to_string_lossy().into_owned()),
    };

    let files = with_input(&cmd.input, |pcm| {
        let pcm_bytes = u32::try_from(pcm.len()).map_err(|_| WavError::TooLarge(pcm.len()))?;
        let sound = PcmSound {
            info: SoundInfo::new(cmd.format, cmd.channels, cmd.rate, pcm_bytes),
            chunks: vec![pcm],
        };
        Ok(sound_to_wav(&name, &[sound], !cmd.keep_float)?)
    })?;

    for file in files {
        let path = cmd.output_dir.join(&file.name);
        write_output(&path, &file.data)?;
        info!("wrote '{}' ({} bytes)", path.display(), file.data.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use native_codec_bridge_wav::WAV_HEADER_SIZE;
    use rstest::rstest;
    use std::fs;

    fn wav_cmd(dir: &std::path::Path, format: SoundFormat, keep_float: bool) -> WavCmd {
        WavCmd {
            input: dir.join("voice.raw"),
            output_dir: dir.join("out"),
            name: None,
            format,
            channels: 1,
            rate: 22_050,
            keep_float,
        }
    }

    fn floats(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[rstest]
    #[case(SoundFormat::Pcm16, false, vec![1, 2, 3, 4], 4, 1)]
    #[case(SoundFormat::PcmFloat, true, floats(&[0.5, -0.5]), 8, 3)]
    #[case(SoundFormat::PcmFloat, false, floats(&[0.5, -0.5]), 4, 1)]
    fn writes_a_wav_named_after_the_input(
        #[case] format: SoundFormat,
        #[case] keep_float: bool,
        #[case] pcm: Vec<u8>,
        #[case] data_len: usize,
        #[case] format_tag: u16,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let cmd = wav_cmd(dir.path(), format, keep_float);
        fs::write(&cmd.input, &pcm).unwrap();

        handle_wav_command(&cmd).unwrap();

        let wav = fs::read(cmd.output_dir.join("voice.wav")).unwrap();
        assert_eq!(wav.len(), WAV_HEADER_SIZE + data_len);
        assert_eq!(&wav[..4], b"RIFF");
        assert_eq!(u16::from_le_bytes([wav[20], wav[21]]), format_tag);
    }

    #[test]
    fn explicit_name_wins() {
        let dir = tempfile::tempdir().unwrap();
        let cmd = WavCmd {
            name: Some("music".to_owned()),
            ..wav_cmd(dir.path(), SoundFormat::Pcm8, false)
        };
        fs::write(&cmd.input, [0x80u8; 3]).unwrap();

        handle_wav_command(&cmd).unwrap();
        assert!(cmd.output_dir.join("music.wav").exists());
        assert!(!cmd.output_dir.join("voice.wav").exists());
    }

    #[test]
    fn broken_float_data_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let cmd = wav_cmd(dir.path(), SoundFormat::PcmFloat, false);
        fs::write(&cmd.input, [0u8; 6]).unwrap();

        let err = handle_wav_command(&cmd).unwrap_err();
        assert!(matches!(err, CliError::Wav(WavError::UnalignedFloatData(6))));
        assert!(!dir.path().join("out").exists());
    }
}
