#![no_main]

// Packaging arbitrary PCM must either fail cleanly or produce a consistent RIFF header.

use libfuzzer_sys::{arbitrary, fuzz_target};
use native_codec_bridge_wav::{subsound_to_wav, SoundFormat, SoundInfo, WAV_HEADER_SIZE};

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct Sound {
    pub format: i32,
    pub channels: u16,
    pub sample_rate: u32,
    pub convert_float: bool,
    pub pcm: Vec<u8>,
}

fuzz_target!(|sound: Sound| {
    let Some(format) = SoundFormat::from_raw(sound.format) else {
        return;
    };
    let info = SoundInfo::new(format, sound.channels, sound.sample_rate, sound.pcm.len() as u32);

    if let Ok(wav) = subsound_to_wav(&info, &[&sound.pcm[..]], sound.convert_float) {
        assert_eq!(&wav[0..4], b"RIFF");
        let riff_len = u32::from_le_bytes([wav[4], wav[5], wav[6], wav[7]]) as usize;
        assert_eq!(riff_len + 8, wav.len());
        assert!(wav.len() >= WAV_HEADER_SIZE);
    }
});
