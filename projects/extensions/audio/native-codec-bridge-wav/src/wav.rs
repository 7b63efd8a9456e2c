//! RIFF/WAVE container writing.

use crate::error::WavError;
use crate::format::{SoundFormat, SoundInfo};
use log::debug;

/// Size of the RIFF, `fmt ` and `data` headers.
pub const WAV_HEADER_SIZE: usize = 44;

/// `WAVE_FORMAT_PCM`.
const FORMAT_TAG_PCM: u16 = 1;
/// `WAVE_FORMAT_IEEE_FLOAT`.
const FORMAT_TAG_FLOAT: u16 = 3;

/// One (sub)sound: its description and its PCM data as locked ranges.
#[derive(Debug, Clone)]
pub struct PcmSound<'a> {
    /// What the decoder reports about the sound.
    pub info: SoundInfo,
    /// The PCM bytes, in order.
    pub chunks: Vec<&'a [u8]>,
}

/// A named WAV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavFile {
    /// File name, see [`wav_file_name`].
    pub name: String,
    /// The complete file.
    pub data: Vec<u8>,
}

/// The file name of subsound `index` of the sound `name`: `name.wav` for the first,
/// `name-<index>.wav` for the rest.
pub fn wav_file_name(name: &str, index: usize) -> String {
    match index {
        0 => format!("{name}.wav"),
        _ => format!("{name}-{index}.wav"),
    }
}

/// Writes every subsound of the sound `name` as a WAV file.
///
/// A sound without subsounds is passed as a single entry.
///
/// # Errors
///
/// The first error of [`subsound_to_wav`].
pub fn sound_to_wav(
    name: &str,
    subsounds: &[PcmSound<'_>],
    convert_float: bool,
) -> Result<Vec<WavFile>, WavError> {
    subsounds
        .iter()
        .enumerate()
        .map(|(index, sound)| {
            Ok(WavFile {
                name: wav_file_name(name, index),
                data: subsound_to_wav(&sound.info, &sound.chunks, convert_float)?,
            })
        })
        .collect()
}

/// Builds a WAV file from one sound's PCM data.
///
/// Integer PCM is copied as-is. Float PCM is converted to 16-bit integers when
/// `convert_float` is set, and kept as IEEE float otherwise.
///
/// # Errors
///
/// - [`WavError::UnsupportedFormat`] for formats other than PCM
/// - [`WavError::NoChannels`] if the sound has no channels
/// - [`WavError::PcmLengthMismatch`] if the chunks do not add up to `info.pcm_bytes`
/// - [`WavError::UnalignedFloatData`] if a float chunk is not a whole number of samples
/// - [`WavError::TooLarge`] if the file would exceed the 4 GiB RIFF limit
/// - [`WavError::HeaderOverflow`] if the block alignment or byte rate do not fit the header
pub fn subsound_to_wav(
    info: &SoundInfo,
    chunks: &[&[u8]],
    convert_float: bool,
) -> Result<Vec<u8>, WavError> {
    let bits = info
        .format
        .bits()
        .ok_or(WavError::UnsupportedFormat(info.format))?;
    if info.channels == 0 {
        return Err(WavError::NoChannels);
    }

    let actual: usize = chunks.iter().map(|chunk| chunk.len()).sum();
    let pcm_bytes = info.pcm_bytes as usize;
    if actual != pcm_bytes {
        return Err(WavError::PcmLengthMismatch {
            expected: pcm_bytes,
            actual,
        });
    }

    let convert = convert_float && info.format == SoundFormat::PcmFloat;
    let (format_tag, bits, data_len) = match info.format {
        SoundFormat::PcmFloat if convert => (FORMAT_TAG_PCM, 16, pcm_bytes / 2),
        SoundFormat::PcmFloat => (FORMAT_TAG_FLOAT, bits, pcm_bytes),
        _ => (FORMAT_TAG_PCM, bits, pcm_bytes),
    };

    let riff_len = u32::try_from(data_len + WAV_HEADER_SIZE - 8)
        .map_err(|_| WavError::TooLarge(data_len))?;

    let mut wav = Vec::with_capacity(WAV_HEADER_SIZE + data_len);
    write_header(&mut wav, info, format_tag, bits, riff_len)?;
    for chunk in chunks {
        if convert {
            convert_float_to_pcm16(chunk, &mut wav)?;
        } else {
            wav.extend_from_slice(chunk);
        }
    }

    debug!(
        "wrote WAV: {:?} x{} at {} Hz, {data_len} data bytes",
        info.format, info.channels, info.sample_rate
    );
    Ok(wav)
}

fn write_header(
    wav: &mut Vec<u8>,
    info: &SoundInfo,
    format_tag: u16,
    bits: u16,
    riff_len: u32,
) -> Result<(), WavError> {
    let overflow = || WavError::HeaderOverflow {
        channels: info.channels,
        bits,
        sample_rate: info.sample_rate,
    };
    // `nBlockAlign` is 16 bits wide and `nAvgBytesPerSec` 32.
    let block_align = u16::try_from(u32::from(info.channels) * u32::from(bits) / 8)
        .map_err(|_| overflow())?;
    let byte_rate = info
        .sample_rate
        .checked_mul(u32::from(block_align))
        .ok_or_else(overflow)?;
    let data_len = riff_len - (WAV_HEADER_SIZE as u32 - 8);

    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&riff_len.to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&format_tag.to_le_bytes());
    wav.extend_from_slice(&info.channels.to_le_bytes());
    wav.extend_from_slice(&info.sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&bits.to_le_bytes());

    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    Ok(())
}

/// Appends little-endian f32 samples as i16, scaled by 32768 and saturated.
fn convert_float_to_pcm16(chunk: &[u8], out: &mut Vec<u8>) -> Result<(), WavError> {
    if chunk.len() % 4 != 0 {
        return Err(WavError::UnalignedFloatData(chunk.len()));
    }
    for sample in chunk.chunks_exact(4) {
        let value = f32::from_le_bytes([sample[0], sample[1], sample[2], sample[3]]);
        out.extend_from_slice(&float_to_pcm16(value).to_le_bytes());
    }
    Ok(())
}

fn float_to_pcm16(value: f32) -> i16 {
    // Saturating cast; NaN becomes 0.
    (value * 32768.0).clamp(-32768.0, 32767.0) as i16
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn read_u16(wav: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes([wav[offset], wav[offset + 1]])
    }

    fn read_u32(wav: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes([wav[offset], wav[offset + 1], wav[offset + 2], wav[offset + 3]])
    }

    fn floats(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn pcm16_header() {
        let pcm = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let info = SoundInfo::new(SoundFormat::Pcm16, 2, 44_100, 8);
        let wav = subsound_to_wav(&info, &[&pcm[..]], true).unwrap();

        assert_eq!(wav.len(), 52);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(read_u32(&wav, 4), 44);
        assert_eq!(&wav[8..16], b"WAVEfmt ");
        assert_eq!(read_u32(&wav, 16), 16);
        assert_eq!(read_u16(&wav, 20), FORMAT_TAG_PCM);
        assert_eq!(read_u16(&wav, 22), 2);
        assert_eq!(read_u32(&wav, 24), 44_100);
        assert_eq!(read_u32(&wav, 28), 44_100 * 4);
        assert_eq!(read_u16(&wav, 32), 4);
        assert_eq!(read_u16(&wav, 34), 16);
        assert_eq!(&wav[36..40], b"data");
        assert_eq!(read_u32(&wav, 40), 8);
        assert_eq!(&wav[44..], &pcm);
    }

    #[rstest]
    #[case(SoundFormat::Pcm8, 8)]
    #[case(SoundFormat::Pcm24, 24)]
    #[case(SoundFormat::Pcm32, 32)]
    fn integer_pcm_keeps_its_depth(#[case] format: SoundFormat, #[case] bits: u16) {
        let info = SoundInfo::new(format, 1, 8_000, 12);
        let wav = subsound_to_wav(&info, &[&[0u8; 12][..]], true).unwrap();
        assert_eq!(read_u16(&wav, 20), FORMAT_TAG_PCM);
        assert_eq!(read_u16(&wav, 34), bits);
        assert_eq!(read_u32(&wav, 40), 12);
    }

    #[test]
    fn float_is_converted_to_pcm16() {
        let pcm = floats(&[0.0, 0.5, -0.5, 1.0, -1.0, 2.0]);
        let info = SoundInfo::new(SoundFormat::PcmFloat, 1, 48_000, pcm.len() as u32);
        let wav = subsound_to_wav(&info, &[&pcm[..8], &pcm[8..]], true).unwrap();

        assert_eq!(read_u16(&wav, 20), FORMAT_TAG_PCM);
        assert_eq!(read_u16(&wav, 34), 16);
        assert_eq!(read_u32(&wav, 40), 12);
        let samples: Vec<i16> = wav[44..]
            .chunks_exact(2)
            .map(|s| i16::from_le_bytes([s[0], s[1]]))
            .collect();
        assert_eq!(samples, [0, 16384, -16384, 32767, -32768, 32767]);
    }

    #[test]
    fn float_can_be_kept() {
        let pcm = floats(&[0.25, -0.25]);
        let info = SoundInfo::new(SoundFormat::PcmFloat, 2, 48_000, 8);
        let wav = subsound_to_wav(&info, &[&pcm[..]], false).unwrap();

        assert_eq!(read_u16(&wav, 20), FORMAT_TAG_FLOAT);
        assert_eq!(read_u16(&wav, 34), 32);
        assert_eq!(&wav[44..], pcm.as_slice());
    }

    #[rstest]
    #[case(0.0, 0)]
    #[case(-0.000_01, 0)]
    #[case(f32::NAN, 0)]
    #[case(f32::INFINITY, 32767)]
    #[case(f32::NEG_INFINITY, -32768)]
    fn float_samples_saturate(#[case] value: f32, #[case] expected: i16) {
        assert_eq!(float_to_pcm16(value), expected);
    }

    #[rstest]
    #[case(SoundFormat::Bitstream)]
    #[case(SoundFormat::None)]
    fn non_pcm_is_unsupported(#[case] format: SoundFormat) {
        let info = SoundInfo::new(format, 2, 44_100, 0);
        let err = subsound_to_wav(&info, &[], true).unwrap_err();
        assert!(matches!(err, WavError::UnsupportedFormat(f) if f == format));
    }

    #[test]
    fn chunk_lengths_must_add_up() {
        let info = SoundInfo::new(SoundFormat::Pcm16, 1, 44_100, 10);
        let err = subsound_to_wav(&info, &[&[0u8; 4][..], &[0u8; 4][..]], true).unwrap_err();
        assert!(matches!(
            err,
            WavError::PcmLengthMismatch {
                expected: 10,
                actual: 8
            }
        ));
    }

    #[test]
    fn partial_float_samples_are_rejected() {
        let info = SoundInfo::new(SoundFormat::PcmFloat, 1, 44_100, 6);
        let err = subsound_to_wav(&info, &[&[0u8; 6][..]], true).unwrap_err();
        assert!(matches!(err, WavError::UnalignedFloatData(6)));
    }

    #[test]
    fn silent_channels_are_rejected() {
        let info = SoundInfo::new(SoundFormat::Pcm16, 0, 44_100, 0);
        assert!(matches!(
            subsound_to_wav(&info, &[], true),
            Err(WavError::NoChannels)
        ));
    }

    #[rstest]
    #[case(SoundFormat::Pcm32, 40_000, 200_000)]
    #[case(SoundFormat::Pcm16, 40_000, 8_000)]
    #[case(SoundFormat::Pcm32, 2, u32::MAX)]
    fn oversized_header_fields_are_rejected(
        #[case] format: SoundFormat,
        #[case] channels: u16,
        #[case] sample_rate: u32,
    ) {
        let info = SoundInfo::new(format, channels, sample_rate, 0);
        let err = subsound_to_wav(&info, &[], false).unwrap_err();
        assert!(matches!(
            err,
            WavError::HeaderOverflow { channels: c, sample_rate: r, .. }
                if c == channels && r == sample_rate
        ));
    }

    #[test]
    fn widest_block_align_still_fits() {
        // 16383 channels of 32-bit samples: a block of 65532 bytes.
        let info = SoundInfo::new(SoundFormat::Pcm32, 16_383, 1, 0);
        let wav = subsound_to_wav(&info, &[], false).unwrap();
        assert_eq!(read_u16(&wav, 32), 65_532);
        assert_eq!(read_u32(&wav, 28), 65_532);
    }

    #[rstest]
    #[case(0, "music.wav")]
    #[case(1, "music-1.wav")]
    #[case(12, "music-12.wav")]
    fn subsound_names(#[case] index: usize, #[case] expected: &str) {
        assert_eq!(wav_file_name("music", index), expected);
    }

    #[test]
    fn every_subsound_becomes_a_file() {
        let pcm = [0u8; 4];
        let info = SoundInfo::new(SoundFormat::Pcm16, 1, 22_050, 4);
        let sounds = [
            PcmSound {
                info,
                chunks: vec![&pcm[..]],
            },
            PcmSound {
                info,
                chunks: vec![&pcm[..2], &pcm[2..]],
            },
        ];

        let files = sound_to_wav("voice", &sounds, true).unwrap();
        let names: Vec<_> = files.iter().map(|file| file.name.as_str()).collect();
        assert_eq!(names, ["voice.wav", "voice-1.wav"]);
        assert!(files.iter().all(|file| file.data.len() == WAV_HEADER_SIZE + 4));
    }
}
