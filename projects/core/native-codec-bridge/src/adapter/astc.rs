//! ASTC encoder contexts.
//!
//! The native encoder keeps its configuration and scratch memory in a context handle.
//! An [`AstcContext`] owns exactly one such handle and destroys it when dropped. Every
//! call through the handle takes `&mut self`: the context may move between threads but
//! is never used from two at once.

use super::{allocate_output, c_len};
use crate::contract::{validate, AstcBlock, BufferSpec, ImageDimensions};
use crate::descriptor::{CallShape, CodecDescriptor};
use crate::error::CodecError;
use crate::native::entry::{AstcEntryPoints, AstcNativeContext};
use crate::output::CodecOutput;
use crate::registry::{ASTCENC_COMPRESS, ASTCENC_DECOMPRESS};
use crate::translate::{translate, RawOutcome};
use core::ffi::c_int;
use core::marker::PhantomData;
use core::ops::BitOr;
use core::ptr::NonNull;
use log::debug;

/// Colour profile the encoder works in.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AstcProfile {
    /// LDR with sRGB-encoded colour channels.
    LdrSrgb = 0,
    /// Linear LDR.
    #[default]
    Ldr = 1,
    /// HDR colour with LDR alpha.
    HdrRgbLdrA = 2,
    /// HDR colour and alpha.
    Hdr = 3,
}

/// Channel data type of the uncompressed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AstcDataType {
    /// 8-bit unsigned normalized channels. The only type the native bridge accepts.
    #[default]
    U8,
    /// 16-bit float channels.
    F16,
    /// 32-bit float channels.
    F32,
}

/// Encoder flags passed to `astc_create`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AstcFlags(u32);

impl AstcFlags {
    /// No flags.
    pub const NONE: AstcFlags = AstcFlags(0);
    /// Decode to 8-bit unorm rather than float.
    pub const USE_DECODE_UNORM8: AstcFlags = AstcFlags(1 << 0);
    /// Only allocate what decompression needs.
    pub const DECOMPRESS_ONLY: AstcFlags = AstcFlags(1 << 1);

    /// Raw flag bits.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether every bit of `other` is set.
    pub const fn contains(self, other: AstcFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for AstcFlags {
    type Output = AstcFlags;

    fn bitor(self, rhs: Self) -> Self {
        AstcFlags(self.0 | rhs.0)
    }
}

/// Parameters of an ASTC encoder context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AstcConfig {
    /// Colour profile.
    pub profile: AstcProfile,
    /// Block footprint used by every call through the context.
    pub block: AstcBlock,
    /// Search quality, `0.0..=1000.0`. Presets stop at 100, higher values search longer.
    pub quality: f32,
    /// Encoder flags.
    pub flags: AstcFlags,
    /// Channel type of the images passed in and out.
    pub data_type: AstcDataType,
}

impl AstcConfig {
    /// Fastest search.
    pub const QUALITY_FASTEST: f32 = 0.0;
    /// Fast search.
    pub const QUALITY_FAST: f32 = 10.0;
    /// Balanced search.
    pub const QUALITY_MEDIUM: f32 = 60.0;
    /// Thorough search.
    pub const QUALITY_THOROUGH: f32 = 98.0;
    /// Exhaustive search, the default.
    pub const QUALITY_EXHAUSTIVE: f32 = 100.0;
    /// Highest quality the encoder accepts.
    pub const QUALITY_MAX: f32 = 1000.0;

    /// A configuration with exhaustive quality, no flags and 8-bit channels.
    pub const fn new(profile: AstcProfile, block: AstcBlock) -> Self {
        Self {
            profile,
            block,
            quality: Self::QUALITY_EXHAUSTIVE,
            flags: AstcFlags::NONE,
            data_type: AstcDataType::U8,
        }
    }

    /// Sets the quality, clamped to `0.0..=1000.0`. NaN becomes the fastest setting.
    pub fn with_quality(mut self, quality: f32) -> Self {
        self.quality = if quality.is_nan() {
            Self::QUALITY_FASTEST
        } else {
            quality.clamp(Self::QUALITY_FASTEST, Self::QUALITY_MAX)
        };
        self
    }

    /// Sets the encoder flags.
    pub const fn with_flags(mut self, flags: AstcFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the channel data type.
    pub const fn with_data_type(mut self, data_type: AstcDataType) -> Self {
        self.data_type = data_type;
        self
    }
}

/// An owned native ASTC encoder context.
///
/// Borrowed from the [`crate::CodecBridge`] that resolved its entry points, so the
/// library cannot be unloaded while the context is alive.
pub struct AstcContext<'lib> {
    handle: NonNull<AstcNativeContext>,
    entry: AstcEntryPoints,
    config: AstcConfig,
    _library: PhantomData<&'lib ()>,
}

// Safety: the handle is owned exclusively and every native call goes through `&mut self`.
unsafe impl Send for AstcContext<'_> {}

impl<'lib> AstcContext<'lib> {
    pub(crate) fn create(entry: AstcEntryPoints, config: AstcConfig) -> Result<Self, CodecError> {
        let codec = ASTCENC_COMPRESS.name;
        if !config.block.is_valid() {
            return Err(CodecError::InvalidBlockFootprint {
                codec,
                x: config.block.x,
                y: config.block.y,
            });
        }

        // Safety: all arguments are plain values; a null return is handled below.
        let raw = unsafe {
            (entry.create)(
                config.profile as c_int,
                c_int::from(config.block.x),
                c_int::from(config.block.y),
                1,
                config.quality,
                config.flags.bits() as c_int,
            )
        };
        let handle = NonNull::new(raw).ok_or(CodecError::ContextCreationFailed { codec })?;
        debug!(
            "{codec}: created context for {}x{} blocks, {:?}, quality {}",
            config.block.x, config.block.y, config.profile, config.quality
        );

        Ok(Self {
            handle,
            entry,
            config,
            _library: PhantomData,
        })
    }

    /// The configuration this context was created with.
    pub fn config(&self) -> &AstcConfig {
        &self.config
    }

    /// Compresses `width * height` RGBA8 pixels into ASTC blocks of the context's footprint.
    ///
    /// # Errors
    ///
    /// - [`CodecError::UnsupportedFormat`] if the context is not configured for 8-bit channels
    /// - the buffer contract errors of [`crate::contract::validate`]
    /// - [`CodecError::NativeCallFailed`] with the encoder's error code
    pub fn compress(
        &mut self,
        rgba: &[u8],
        width: i32,
        height: i32,
    ) -> Result<CodecOutput, CodecError> {
        self.run(&ASTCENC_COMPRESS, rgba, width, height)
    }

    /// Decompresses ASTC blocks of the context's footprint into RGBA8 pixels.
    ///
    /// # Errors
    ///
    /// As for [`AstcContext::compress`].
    pub fn decompress(
        &mut self,
        blocks: &[u8],
        width: i32,
        height: i32,
    ) -> Result<CodecOutput, CodecError> {
        self.run(&ASTCENC_DECOMPRESS, blocks, width, height)
    }

    fn run(
        &mut self,
        descriptor: &'static CodecDescriptor,
        input: &[u8],
        width: i32,
        height: i32,
    ) -> Result<CodecOutput, CodecError> {
        if self.config.data_type != AstcDataType::U8 {
            return Err(CodecError::UnsupportedFormat {
                codec: descriptor.name,
                detail: format!(
                    "{:?} channels, only 8-bit channels are supported",
                    self.config.data_type
                ),
            });
        }
        let dims = ImageDimensions::new(width, height).with_block(self.config.block);
        let spec = validate(descriptor, dims, input.len())?;
        let outcome = self.call(descriptor, input, &spec)?;
        translate(descriptor, outcome)
    }

    fn call(
        &mut self,
        descriptor: &CodecDescriptor,
        input: &[u8],
        spec: &BufferSpec,
    ) -> Result<RawOutcome, CodecError> {
        let mut output = allocate_output(descriptor, spec.output_size)?;
        let (width, height) = (spec.width as c_int, spec.height as c_int);
        let out_len = spec.output_size as c_int;

        let status = match descriptor.shape {
            // Safety: the handle is live and exclusively borrowed, `input` holds
            // `width * height * 4` bytes and `output` holds `out_len` bytes.
            CallShape::ContextEncode => unsafe {
                (self.entry.compress)(
                    self.handle.as_ptr(),
                    input.as_ptr(),
                    width,
                    height,
                    output.as_mut_ptr(),
                    out_len,
                )
            },
            CallShape::ContextDecode => {
                let in_len = c_len(descriptor, input.len())?;
                // Safety: as above; the native routine is told the input length.
                unsafe {
                    (self.entry.decompress)(
                        self.handle.as_ptr(),
                        input.as_ptr(),
                        in_len,
                        width,
                        height,
                        output.as_mut_ptr(),
                        out_len,
                    )
                }
            }
            shape => {
                return Err(CodecError::UnsupportedFormat {
                    codec: descriptor.name,
                    detail: format!("{shape:?} is not an ASTC context call"),
                })
            }
        };
        Ok(RawOutcome::with_output(status, output))
    }
}

impl Drop for AstcContext<'_> {
    fn drop(&mut self) {
        // Safety: the handle came from `create` and is destroyed exactly once.
        unsafe { (self.entry.destroy)(self.handle.as_ptr()) };
    }
}

impl core::fmt::Debug for AstcContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AstcContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Runs one call through a short-lived context, for the by-name API.
///
/// The context uses the footprint from `spec`, the LDR profile and exhaustive quality.
/// Decoding contexts produce 8-bit unorm output.
pub(super) fn invoke_once(
    descriptor: &CodecDescriptor,
    entry: AstcEntryPoints,
    input: &[u8],
    spec: &BufferSpec,
) -> Result<RawOutcome, CodecError> {
    let mut context = AstcContext::create(entry, one_shot_config(descriptor, spec))?;
    context.call(descriptor, input, spec)
}

fn one_shot_config(descriptor: &CodecDescriptor, spec: &BufferSpec) -> AstcConfig {
    let block = AstcBlock::new(spec.block_width, spec.block_height);
    let flags = match descriptor.shape {
        CallShape::ContextDecode => AstcFlags::USE_DECODE_UNORM8,
        _ => AstcFlags::NONE,
    };
    AstcConfig::new(AstcProfile::Ldr, block).with_flags(flags)
}
