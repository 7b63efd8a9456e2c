//! texture2ddecoder entry points, writing 32-bit BGRA pixels through a `u32*`.
//!
//! None of these receive the input length; the adapter has already checked that the
//! input covers every block the routine reads.

use super::{allocate_output, not_a_buffer_call};
use crate::contract::BufferSpec;
use crate::descriptor::{CallShape, CodecDescriptor};
use crate::error::CodecError;
use crate::native::entry::{DecodeAstcBlocksFn, DecodeLongDimsFn, DecodePvrtcFn, DecodeU32DimsFn};
use crate::translate::RawOutcome;
use core::ffi::{c_int, c_long};

pub(super) fn long_dims(
    descriptor: &CodecDescriptor,
    func: DecodeLongDimsFn,
    input: &[u8],
    spec: &BufferSpec,
) -> Result<RawOutcome, CodecError> {
    let mut output = allocate_output(descriptor, spec.output_size)?;
    // Safety: the output is 64-byte aligned and holds `width * height` u32 pixels; the input
    // holds `min_input_size` bytes. Dimensions fit a C int, hence a C long.
    let status = unsafe {
        func(
            input.as_ptr(),
            spec.width as c_long,
            spec.height as c_long,
            output.as_mut_ptr().cast::<u32>(),
        )
    };
    Ok(RawOutcome::with_output(status, output))
}

pub(super) fn u32_dims(
    descriptor: &CodecDescriptor,
    func: DecodeU32DimsFn,
    input: &[u8],
    spec: &BufferSpec,
) -> Result<RawOutcome, CodecError> {
    let mut output = allocate_output(descriptor, spec.output_size)?;
    // Safety: as in `long_dims`.
    let status = unsafe {
        func(
            input.as_ptr(),
            spec.width,
            spec.height,
            output.as_mut_ptr().cast::<u32>(),
        )
    };
    Ok(RawOutcome::with_output(status, output))
}

pub(super) fn astc_blocks(
    descriptor: &CodecDescriptor,
    func: DecodeAstcBlocksFn,
    input: &[u8],
    spec: &BufferSpec,
) -> Result<RawOutcome, CodecError> {
    let mut output = allocate_output(descriptor, spec.output_size)?;
    // Safety: as in `long_dims`; the footprint was checked against the ASTC footprint table.
    let status = unsafe {
        func(
            input.as_ptr(),
            spec.width as c_long,
            spec.height as c_long,
            spec.block_width as c_int,
            spec.block_height as c_int,
            output.as_mut_ptr().cast::<u32>(),
        )
    };
    Ok(RawOutcome::with_output(status, output))
}

pub(super) fn pvrtc(
    descriptor: &CodecDescriptor,
    func: DecodePvrtcFn,
    input: &[u8],
    spec: &BufferSpec,
) -> Result<RawOutcome, CodecError> {
    let CallShape::DecodePvrtc { two_bpp } = descriptor.shape else {
        return Err(not_a_buffer_call(descriptor));
    };
    let mut output = allocate_output(descriptor, spec.output_size)?;
    // Safety: as in `long_dims`.
    let status = unsafe {
        func(
            input.as_ptr(),
            spec.width as c_long,
            spec.height as c_long,
            output.as_mut_ptr().cast::<u32>(),
            c_int::from(two_bpp),
        )
    };
    Ok(RawOutcome::with_output(status, output))
}
