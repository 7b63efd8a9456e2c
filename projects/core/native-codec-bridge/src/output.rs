//! Owned, immutable results of codec operations.

use crate::descriptor::DataFormat;
use core::ops::Deref;
use native_codec_bridge_common::allocate::AlignedBuffer;
use native_codec_bridge_common::pixels::PixelFormat;

/// Bytes produced by a successful codec operation.
///
/// Ownership of the output region moves to the caller once the native call has
/// succeeded; from then on it can only be read.
#[derive(Debug)]
pub struct CodecOutput {
    buffer: AlignedBuffer,
    format: DataFormat,
}

impl CodecOutput {
    pub(crate) fn new(buffer: AlignedBuffer, format: DataFormat) -> Self {
        Self { buffer, format }
    }

    /// Layout of the bytes.
    #[inline]
    pub fn format(&self) -> DataFormat {
        self.format
    }

    /// The pixel layout, if the output holds pixels.
    #[inline]
    pub fn pixel_format(&self) -> Option<PixelFormat> {
        match self.format {
            DataFormat::Pixels(format) => Some(format),
            _ => None,
        }
    }

    /// The output bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    /// Copies the output into a [`Vec`].
    pub fn into_vec(self) -> Vec<u8> {
        self.buffer.as_slice().to_vec()
    }
}

impl Deref for CodecOutput {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl AsRef<[u8]> for CodecOutput {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}
