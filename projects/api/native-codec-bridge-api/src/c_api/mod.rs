//! # C API (FFI)
//!
//! *Note: The C API is only available when the `c-exports` feature is enabled.*
//!
//! ## Example Usage
//!
//! ```c
//! ncb_init_from_env();
//!
//! uint8_t rgba[4 * 4 * 4] = {0};
//! NcbBuffer blocks;
//! NcbErrorCode result = ncb_compress("etcpak:bc1", rgba, sizeof(rgba), 4, 4, 0, 0, &blocks);
//! if (result == Success) {
//!     // blocks.data holds blocks.len bytes
//!     ncb_buffer_free(blocks);
//! } else {
//!     printf("%s\n", ncb_error_message(result));
//! }
//!
//! ncb_shutdown();
//! ```
//!
//! ## Functions
//!
//! - **`ncb_init_from_env()`** / **`ncb_shutdown()`** - Load and release the native libraries
//! - **`ncb_compress(...)`** / **`ncb_decompress(...)`** - Run a codec by name
//! - **`ncb_unpack_crunch(...)`** - Unpack one level of a crunch container
//! - **`ncb_buffer_free(buffer)`** - Release a buffer returned by the functions above
//! - **`ncb_error_message(code)`** - Static description of an error code
//!
//! Every buffer handed out must be released with `ncb_buffer_free` exactly once.

pub mod error;

use crate::global::{init_from_env, shutdown};
use crate::operations;
use core::ffi::{CStr, c_char};
use core::{ptr, slice};
use error::NcbErrorCode;
use native_codec_bridge::{AstcBlock, CodecError, CodecOutput};

/// A byte buffer owned by the caller once returned.
///
/// Must be released with [`ncb_buffer_free`].
#[repr(C)]
#[derive(Debug)]
pub struct NcbBuffer {
    /// Start of the buffer, null when empty
    pub data: *mut u8,
    /// Length in bytes
    pub len: usize,
}

impl NcbBuffer {
    const fn empty() -> Self {
        Self {
            data: ptr::null_mut(),
            len: 0,
        }
    }

    fn from_output(output: CodecOutput) -> Self {
        let bytes = output.into_vec().into_boxed_slice();
        let len = bytes.len();
        if len == 0 {
            return Self::empty();
        }
        Self {
            data: Box::into_raw(bytes).cast::<u8>(),
            len,
        }
    }
}

/// Loads the native libraries named by `NCB_ETCPAK_LIB`, `NCB_T2D_LIB` and `NCB_ASTC_LIB`.
///
/// Libraries that fail to load only disable their own codecs, so this always succeeds.
/// Calling it again while initialized has no effect.
#[unsafe(no_mangle)]
pub extern "C" fn ncb_init_from_env() -> NcbErrorCode {
    init_from_env();
    NcbErrorCode::Success
}

/// Releases the native libraries once every call in flight has returned.
#[unsafe(no_mangle)]
pub extern "C" fn ncb_shutdown() {
    shutdown();
}

/// Compresses `width * height` RGBA8 pixels with the named codec.
///
/// # Parameters
/// - `codec`: null-terminated codec name, such as `etcpak:bc1` or `astc`
/// - `input`, `input_len`: the pixels
/// - `block_x`, `block_y`: block footprint for variable-footprint codecs, `0` otherwise
/// - `out`: receives the compressed blocks, or an empty buffer on failure
///
/// # Safety
/// - `codec` must be a valid null-terminated string
/// - `input` must be valid for reads of `input_len` bytes, or null when `input_len` is 0
/// - `out` must be valid for writes of one [`NcbBuffer`]
#[unsafe(no_mangle)]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn ncb_compress(
    codec: *const c_char,
    input: *const u8,
    input_len: usize,
    width: i32,
    height: i32,
    block_x: u8,
    block_y: u8,
    out: *mut NcbBuffer,
) -> NcbErrorCode {
    unsafe {
        run(codec, input, input_len, out, |codec, input| {
            match footprint(block_x, block_y) {
                Some(block) => {
                    operations::compress_with_footprint(codec, input, width, height, block)
                }
                None => operations::compress(codec, input, width, height),
            }
        })
    }
}

/// Decompresses block data with the named codec into 32-bit BGRA pixels (RGBA for `astcenc:astc`).
///
/// Parameters as for [`ncb_compress`].
///
/// # Safety
/// As for [`ncb_compress`].
#[unsafe(no_mangle)]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn ncb_decompress(
    codec: *const c_char,
    input: *const u8,
    input_len: usize,
    width: i32,
    height: i32,
    block_x: u8,
    block_y: u8,
    out: *mut NcbBuffer,
) -> NcbErrorCode {
    unsafe {
        run(codec, input, input_len, out, |codec, input| {
            match footprint(block_x, block_y) {
                Some(block) => {
                    operations::decompress_with_footprint(codec, input, width, height, block)
                }
                None => operations::decompress(codec, input, width, height),
            }
        })
    }
}

/// Unpacks mip level `level_index` of a crunch container with `crunch` or `unity_crunch`.
///
/// # Safety
/// As for [`ncb_compress`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ncb_unpack_crunch(
    codec: *const c_char,
    input: *const u8,
    input_len: usize,
    level_index: u32,
    out: *mut NcbBuffer,
) -> NcbErrorCode {
    unsafe {
        run(codec, input, input_len, out, |codec, input| {
            operations::unpack_crunch(codec, input, level_index)
        })
    }
}

/// Releases a buffer returned by this API.
///
/// # Safety
/// - `buffer` must have been returned by this API and not freed already
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ncb_buffer_free(buffer: NcbBuffer) {
    if buffer.data.is_null() {
        return;
    }
    unsafe {
        drop(Box::from_raw(ptr::slice_from_raw_parts_mut(
            buffer.data,
            buffer.len,
        )));
    }
}

fn footprint(block_x: u8, block_y: u8) -> Option<AstcBlock> {
    (block_x != 0 || block_y != 0).then(|| AstcBlock::new(block_x, block_y))
}

/// Checks the common parameters, runs `operation` and hands its output to the caller.
///
/// # Safety
/// As for [`ncb_compress`].
unsafe fn run(
    codec: *const c_char,
    input: *const u8,
    input_len: usize,
    out: *mut NcbBuffer,
    operation: impl FnOnce(&str, &[u8]) -> Result<CodecOutput, CodecError>,
) -> NcbErrorCode {
    if out.is_null() || codec.is_null() || (input.is_null() && input_len != 0) {
        return NcbErrorCode::NullPointer;
    }
    unsafe { out.write(NcbBuffer::empty()) };

    let Ok(codec) = unsafe { CStr::from_ptr(codec) }.to_str() else {
        return NcbErrorCode::InvalidCodecName;
    };
    let input = if input_len == 0 {
        &[][..]
    } else {
        unsafe { slice::from_raw_parts(input, input_len) }
    };

    match operation(codec, input) {
        Ok(output) => {
            unsafe { out.write(NcbBuffer::from_output(output)) };
            NcbErrorCode::Success
        }
        Err(error) => NcbErrorCode::from(&error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::global::install;
    use crate::test_prelude::*;

    #[test]
    fn null_pointers_are_rejected() {
        let mut out = NcbBuffer::empty();
        let code = unsafe { ncb_compress(ptr::null(), ptr::null(), 0, 4, 4, 0, 0, &mut out) };
        assert_eq!(code, NcbErrorCode::NullPointer);

        let code = unsafe { ncb_compress(c"bc1".as_ptr(), ptr::null(), 64, 4, 4, 0, 0, &mut out) };
        assert_eq!(code, NcbErrorCode::NullPointer);

        let rgba = [0u8; 64];
        let code = unsafe {
            ncb_compress(c"bc1".as_ptr(), rgba.as_ptr(), 64, 4, 4, 0, 0, ptr::null_mut())
        };
        assert_eq!(code, NcbErrorCode::NullPointer);
    }

    #[test]
    fn invalid_utf8_codec_name_is_rejected() {
        let mut out = NcbBuffer::empty();
        let name = c"\xFFbc1";
        let code = unsafe { ncb_decompress(name.as_ptr(), ptr::null(), 0, 4, 4, 0, 0, &mut out) };
        assert_eq!(code, NcbErrorCode::InvalidCodecName);
    }

    #[test]
    fn compress_hands_out_a_buffer() {
        let _guard = exclusive_global();
        shutdown();
        install(fake_bc1_bridge()).unwrap();

        let rgba = [7u8; 64];
        let mut out = NcbBuffer::empty();
        let code = unsafe { ncb_compress(c"dxt1".as_ptr(), rgba.as_ptr(), 64, 4, 4, 0, 0, &mut out) };
        assert_eq!(code, NcbErrorCode::Success);
        assert_eq!(out.len, 8);
        assert_eq!(unsafe { slice::from_raw_parts(out.data, 4) }, &[7, 7, 7, 7]);
        unsafe { ncb_buffer_free(out) };

        let mut out = NcbBuffer::empty();
        let code = unsafe { ncb_compress(c"bc1".as_ptr(), rgba.as_ptr(), 60, 4, 4, 0, 0, &mut out) };
        assert_eq!(code, NcbErrorCode::SizeMismatch);
        assert!(out.data.is_null());
        ncb_shutdown();
    }

    #[test]
    fn calls_before_init_report_it() {
        let _guard = exclusive_global();
        ncb_shutdown();
        let mut out = NcbBuffer::empty();
        let data = [1u8, 2, 3];
        let code =
            unsafe { ncb_unpack_crunch(c"crunch".as_ptr(), data.as_ptr(), 3, 0, &mut out) };
        assert_eq!(code, NcbErrorCode::NotInitialized);
    }

    #[test]
    fn freeing_an_empty_buffer_is_a_no_op() {
        unsafe { ncb_buffer_free(NcbBuffer::empty()) };
    }
}
