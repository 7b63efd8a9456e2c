//! Crunch unpacking: the native library allocates the output and hands it back
//! through out-parameters; it must be released with the paired free.

use crate::descriptor::CodecDescriptor;
use crate::error::CodecError;
use crate::native::entry::{FreeFn, UnpackFn};
use crate::translate::RawOutcome;
use core::ffi::c_void;
use core::ptr;
use core::slice;
use log::trace;
use native_codec_bridge_common::allocate::AlignedBuffer;

/// A buffer owned by the native library, released exactly once on drop.
struct NativeAllocation {
    ptr: *mut u8,
    len: usize,
    free: FreeFn,
}

impl NativeAllocation {
    fn as_slice(&self) -> &[u8] {
        // Safety: the native routine reported `len` readable bytes at `ptr`, which stay
        // valid until `free` runs in `drop`.
        unsafe { slice::from_raw_parts(self.ptr, self.len) }
    }
}

impl Drop for NativeAllocation {
    fn drop(&mut self) {
        // Safety: `ptr` was handed out by the paired unpack routine and is freed only here.
        unsafe { (self.free)(self.ptr.cast::<c_void>()) };
    }
}

/// Unpacks mip level `level_index` of crunched `data`.
///
/// The native buffer is copied into an adapter-owned region before it is freed, so no
/// reference to native memory survives the call.
pub(crate) fn unpack(
    descriptor: &CodecDescriptor,
    unpack: UnpackFn,
    free: FreeFn,
    data: &[u8],
    level_index: u32,
) -> Result<RawOutcome, CodecError> {
    let codec = descriptor.name;
    let data_size = u32::try_from(data.len()).map_err(|_| CodecError::InputTooLarge {
        codec,
        len: data.len(),
    })?;

    trace!("{codec}: calling {} for level {level_index}, {data_size} input bytes", descriptor.symbol);

    let mut out_ptr: *mut u8 = ptr::null_mut();
    let mut out_size: u32 = 0;
    // Safety: `data` is borrowed for the whole call and holds `data_size` bytes; the
    // out-parameters point to live locals.
    let status = unsafe {
        unpack(
            data.as_ptr(),
            data_size,
            level_index,
            &mut out_ptr,
            &mut out_size,
        )
    };

    // Out-parameters only carry meaning when the routine reports success.
    if status == 0 {
        return Ok(RawOutcome::without_output(status));
    }
    if out_ptr.is_null() {
        return Ok(RawOutcome::null_pointer());
    }

    let native = NativeAllocation {
        ptr: out_ptr,
        len: out_size as usize,
        free,
    };
    let copied = AlignedBuffer::copy_from_slice(native.as_slice())
        .map_err(|source| CodecError::AllocationFailed { codec, source });
    drop(native);

    Ok(RawOutcome::with_output(status, copied?))
}
