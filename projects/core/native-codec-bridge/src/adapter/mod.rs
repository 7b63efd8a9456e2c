//! Call adapter: performs one native invocation per call.
//!
//! The input is borrowed for the whole call, the output region is allocated here,
//! zero-initialized and owned exclusively by the adapter until the result translator
//! hands it to the caller.

mod astc;
mod block;
mod crunch;
mod decode;

pub use astc::{AstcConfig, AstcContext, AstcDataType, AstcFlags, AstcProfile};
pub(crate) use crunch::unpack;

use crate::bc7::Bc7Params;
use crate::contract::BufferSpec;
use crate::descriptor::CodecDescriptor;
use crate::error::CodecError;
use crate::native::NativeEntry;
use crate::translate::RawOutcome;
use core::ffi::c_int;
use log::trace;
use native_codec_bridge_common::allocate::AlignedBuffer;

/// Invokes the native routine behind `descriptor` once.
///
/// `spec` must come from [`crate::contract::validate`] for the same descriptor and input.
/// `params` is only read by entry points that take a BC7 parameter block; `None`
/// passes null so the library applies its defaults.
pub(crate) fn invoke(
    descriptor: &CodecDescriptor,
    entry: NativeEntry,
    input: &[u8],
    spec: &BufferSpec,
    params: Option<&Bc7Params>,
) -> Result<RawOutcome, CodecError> {
    let codec = descriptor.name;
    if !descriptor.shape.receives_input_len() && input.len() < spec.min_input_size {
        return Err(CodecError::TruncatedInput {
            codec,
            needed: spec.min_input_size,
            actual: input.len(),
        });
    }

    trace!(
        "{codec}: calling {} for {}x{}, {} input bytes, {} output bytes",
        descriptor.symbol,
        spec.width,
        spec.height,
        input.len(),
        spec.output_size
    );

    match entry {
        NativeEntry::Block(func) => block::call(descriptor, func, input, spec),
        NativeEntry::BlockWithParams(func) => {
            block::call_with_params(descriptor, func, input, spec, params)
        }
        NativeEntry::DecodeLongDims(func) => decode::long_dims(descriptor, func, input, spec),
        NativeEntry::DecodeU32Dims(func) => decode::u32_dims(descriptor, func, input, spec),
        NativeEntry::DecodeAstcBlocks(func) => decode::astc_blocks(descriptor, func, input, spec),
        NativeEntry::DecodePvrtc(func) => decode::pvrtc(descriptor, func, input, spec),
        NativeEntry::AstcContext(entry) => astc::invoke_once(descriptor, entry, input, spec),
        NativeEntry::Unpack { .. } => Err(not_a_buffer_call(descriptor)),
    }
}

fn not_a_buffer_call(descriptor: &CodecDescriptor) -> CodecError {
    CodecError::UnsupportedFormat {
        codec: descriptor.name,
        detail: format!("{:?} entry points do not take a buffer spec", descriptor.shape),
    }
}

/// Allocates a zeroed output region of `len` bytes for `descriptor`.
fn allocate_output(descriptor: &CodecDescriptor, len: usize) -> Result<AlignedBuffer, CodecError> {
    AlignedBuffer::zeroed(len).map_err(|source| CodecError::AllocationFailed {
        codec: descriptor.name,
        source,
    })
}

/// Converts a length for a native `int` parameter.
fn c_len(descriptor: &CodecDescriptor, len: usize) -> Result<c_int, CodecError> {
    c_int::try_from(len).map_err(|_| CodecError::InputTooLarge {
        codec: descriptor.name,
        len,
    })
}
