//! Result translation: folds every native status convention into one result contract.

use crate::descriptor::CodecDescriptor;
use crate::error::CodecError;
use crate::output::CodecOutput;
use core::ffi::c_int;
use log::debug;
use native_codec_bridge_common::allocate::AlignedBuffer;

/// How a native routine reports success through its integer return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusConvention {
    /// Boolean style: `0` is failure, anything else is success.
    NonZeroSuccess,
    /// Error-code style: `0` is success, anything else names the failure.
    ZeroSuccess,
}

impl StatusConvention {
    /// Whether `status` reports success under this convention.
    #[inline]
    pub const fn is_success(self, status: c_int) -> bool {
        match self {
            StatusConvention::NonZeroSuccess => status != 0,
            StatusConvention::ZeroSuccess => status == 0,
        }
    }
}

/// What a native routine reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NativeStatus {
    /// An integer status, read with the descriptor's [`StatusConvention`].
    Code(c_int),
    /// A pointer-returning routine handed back null.
    NullPointer,
}

/// The raw outcome of one native invocation, before translation.
#[derive(Debug)]
pub(crate) struct RawOutcome {
    pub(crate) status: NativeStatus,
    pub(crate) output: Option<AlignedBuffer>,
}

impl RawOutcome {
    /// A call that wrote into `output` and returned `status`.
    pub(crate) fn with_output(status: c_int, output: AlignedBuffer) -> Self {
        Self {
            status: NativeStatus::Code(status),
            output: Some(output),
        }
    }

    /// A call that returned `status` and produced no buffer.
    pub(crate) fn without_output(status: c_int) -> Self {
        Self {
            status: NativeStatus::Code(status),
            output: None,
        }
    }

    /// A call whose returned pointer was null.
    pub(crate) fn null_pointer() -> Self {
        Self {
            status: NativeStatus::NullPointer,
            output: None,
        }
    }
}

/// Maps a raw outcome to the caller-facing result.
///
/// On failure the output region is dropped here, so a failed call never hands out
/// a partially written buffer.
pub(crate) fn translate(
    descriptor: &CodecDescriptor,
    outcome: RawOutcome,
) -> Result<CodecOutput, CodecError> {
    let codec = descriptor.name;
    let convention = descriptor.shape.status_convention();
    match outcome.status {
        NativeStatus::Code(status) if convention.is_success(status) => outcome
            .output
            .map(|buffer| CodecOutput::new(buffer, descriptor.output))
            .ok_or(CodecError::NullOutput { codec }),
        NativeStatus::Code(status) => {
            debug!("{codec}: native call reported failure, status {status}");
            Err(CodecError::NativeCallFailed {
                codec,
                status,
                is_error_code: convention == StatusConvention::ZeroSuccess,
            })
        }
        NativeStatus::NullPointer => {
            debug!("{codec}: native call returned null");
            Err(CodecError::NullOutput { codec })
        }
    }
}
