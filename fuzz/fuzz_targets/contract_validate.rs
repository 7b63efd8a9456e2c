#![no_main]

// Buffer sizing must never panic or overflow, whatever the dimensions.

use libfuzzer_sys::{arbitrary, fuzz_target};
use native_codec_bridge::registry::codecs;
use native_codec_bridge::{validate, AstcBlock, Direction, ImageDimensions};

#[derive(Clone, Debug, arbitrary::Arbitrary)]
pub struct Request {
    pub codec: u8,
    pub width: i32,
    pub height: i32,
    pub block: Option<(u8, u8)>,
    pub input_len: usize,
}

fuzz_target!(|request: Request| {
    let descriptors: Vec<_> = codecs().collect();
    let descriptor = descriptors[request.codec as usize % descriptors.len()];

    let mut dims = ImageDimensions::new(request.width, request.height);
    if let Some((x, y)) = request.block {
        dims = dims.with_block(AstcBlock::new(x, y));
    }

    if let Ok(spec) = validate(descriptor, dims, request.input_len) {
        assert!(spec.output_size > 0);
        if descriptor.direction == Direction::Compress {
            assert_eq!(request.input_len, spec.min_input_size);
        }
    }
});
