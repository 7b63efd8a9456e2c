//! etcpak entry points: `(in, w, h, [params,] out, out_size) -> int`.

use super::allocate_output;
use crate::bc7::Bc7Params;
use crate::contract::BufferSpec;
use crate::descriptor::CodecDescriptor;
use crate::error::CodecError;
use crate::native::entry::{BlockFn, BlockWithParamsFn};
use crate::translate::RawOutcome;
use core::ffi::c_int;
use core::ptr;

pub(super) fn call(
    descriptor: &CodecDescriptor,
    func: BlockFn,
    input: &[u8],
    spec: &BufferSpec,
) -> Result<RawOutcome, CodecError> {
    let mut output = allocate_output(descriptor, spec.output_size)?;

    // Safety: `input` is borrowed for the whole call and holds at least the bytes the routine
    // reads, `output` holds `output_size` writable bytes. Sizes fit a C int (see `validate`).
    let status = unsafe {
        func(
            input.as_ptr(),
            spec.width as c_int,
            spec.height as c_int,
            output.as_mut_ptr(),
            spec.output_size as c_int,
        )
    };
    Ok(RawOutcome::with_output(status, output))
}

pub(super) fn call_with_params(
    descriptor: &CodecDescriptor,
    func: BlockWithParamsFn,
    input: &[u8],
    spec: &BufferSpec,
    params: Option<&Bc7Params>,
) -> Result<RawOutcome, CodecError> {
    let mut output = allocate_output(descriptor, spec.output_size)?;
    let params = params.map_or(ptr::null(), |params| params as *const Bc7Params);

    // Safety: as in `call`; `params` is null or points to a live `#[repr(C)]` parameter block.
    let status = unsafe {
        func(
            input.as_ptr(),
            spec.width as c_int,
            spec.height as c_int,
            params,
            output.as_mut_ptr(),
            spec.output_size as c_int,
        )
    };
    Ok(RawOutcome::with_output(status, output))
}
