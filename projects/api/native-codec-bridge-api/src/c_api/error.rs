//! C API error codes.

use core::ffi::c_char;
use native_codec_bridge::{CodecError, ErrorKind};

/// C-compatible error codes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NcbErrorCode {
    /// Operation succeeded
    Success = 0,
    /// Width or height not positive, or a missing/invalid block footprint
    InvalidDimensions = 1,
    /// Dimensions are not multiples of the codec's block footprint
    UnalignedDimensions = 2,
    /// Input length differs from the length the codec requires
    SizeMismatch = 3,
    /// The native routine reported failure, or the compressed input was truncated
    NativeCallFailed = 4,
    /// The library backing the codec is not loaded
    LibraryUnavailable = 5,
    /// The requested data layout is not supported
    UnsupportedFormat = 6,
    /// The output buffer could not be allocated
    AllocationFailed = 7,
    /// No codec with the requested name exists
    UnknownCodec = 8,
    /// `ncb_init_from_env` has not been called
    NotInitialized = 9,
    /// Null pointer provided for a required parameter
    NullPointer = 10,
    /// The codec name is not valid UTF-8
    InvalidCodecName = 11,
}

impl From<&CodecError> for NcbErrorCode {
    fn from(error: &CodecError) -> Self {
        if matches!(error, CodecError::NotInitialized) {
            return NcbErrorCode::NotInitialized;
        }
        match error.kind() {
            ErrorKind::InvalidDimensions => NcbErrorCode::InvalidDimensions,
            ErrorKind::UnalignedDimensions => NcbErrorCode::UnalignedDimensions,
            ErrorKind::SizeMismatch => NcbErrorCode::SizeMismatch,
            ErrorKind::NativeCallFailed => NcbErrorCode::NativeCallFailed,
            ErrorKind::LibraryUnavailable => NcbErrorCode::LibraryUnavailable,
            ErrorKind::UnsupportedFormat => NcbErrorCode::UnsupportedFormat,
            ErrorKind::AllocationFailed => NcbErrorCode::AllocationFailed,
            ErrorKind::UnknownCodec => NcbErrorCode::UnknownCodec,
        }
    }
}

/// Get a null-terminated string description of the error code.
///
/// The returned string is a static string literal that does not need to be freed.
///
/// # Safety
/// This function is safe to call with any error code value.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ncb_error_message(error_code: NcbErrorCode) -> *const c_char {
    match error_code {
        NcbErrorCode::Success => c"Success".as_ptr(),
        NcbErrorCode::InvalidDimensions => {
            c"Invalid dimensions: width and height must be positive, with a valid block footprint"
                .as_ptr()
        }
        NcbErrorCode::UnalignedDimensions => {
            c"Dimensions must be multiples of the codec's block footprint".as_ptr()
        }
        NcbErrorCode::SizeMismatch => {
            c"Input length differs from the length the codec requires".as_ptr()
        }
        NcbErrorCode::NativeCallFailed => c"Native codec call failed".as_ptr(),
        NcbErrorCode::LibraryUnavailable => {
            c"The native library backing the codec is not loaded".as_ptr()
        }
        NcbErrorCode::UnsupportedFormat => c"Unsupported data format".as_ptr(),
        NcbErrorCode::AllocationFailed => c"Memory allocation failed".as_ptr(),
        NcbErrorCode::UnknownCodec => c"Unknown codec name".as_ptr(),
        NcbErrorCode::NotInitialized => c"Native libraries have not been initialized".as_ptr(),
        NcbErrorCode::NullPointer => c"Null pointer provided for a required parameter".as_ptr(),
        NcbErrorCode::InvalidCodecName => c"Codec name is not valid UTF-8".as_ptr(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::ffi::CStr;
    use rstest::rstest;

    #[rstest]
    #[case(CodecError::NotInitialized, NcbErrorCode::NotInitialized)]
    #[case(CodecError::UnknownCodec("bc9".into()), NcbErrorCode::UnknownCodec)]
    #[case(
        CodecError::SizeMismatch { codec: "etcpak:bc1", expected: 64, actual: 60 },
        NcbErrorCode::SizeMismatch
    )]
    #[case(
        CodecError::TruncatedInput { codec: "t2d:bc1", needed: 8, actual: 7 },
        NcbErrorCode::NativeCallFailed
    )]
    fn errors_map_to_codes(#[case] error: CodecError, #[case] code: NcbErrorCode) {
        assert_eq!(NcbErrorCode::from(&error), code);
    }

    #[test]
    fn every_code_has_a_message() {
        for code in [
            NcbErrorCode::Success,
            NcbErrorCode::SizeMismatch,
            NcbErrorCode::NotInitialized,
            NcbErrorCode::InvalidCodecName,
        ] {
            let message = unsafe { CStr::from_ptr(ncb_error_message(code)) };
            assert!(!message.to_bytes().is_empty());
        }
    }
}
