//! 32-bit pixel layouts.
//!
//! Encoders consume RGBA8. The etcpak and texture2ddecoder decoders emit BGRA8,
//! the ASTC encoder emits RGBA8; callers that need a single layout swizzle with
//! [`bgra_to_rgba`].

/// Byte order of a 32-bit pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Red, green, blue, alpha; one byte each.
    Rgba8,
    /// Blue, green, red, alpha; one byte each.
    Bgra8,
}

impl PixelFormat {
    /// Number of bytes per pixel.
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        4
    }

    /// Short lowercase name, as printed by tools.
    pub const fn name(self) -> &'static str {
        match self {
            PixelFormat::Rgba8 => "rgba8",
            PixelFormat::Bgra8 => "bgra8",
        }
    }
}

/// Swaps the red and blue channel of every pixel in place, converting BGRA8 to RGBA8.
///
/// Trailing bytes that do not form a whole pixel are left untouched.
#[inline]
pub fn bgra_to_rgba(pixels: &mut [u8]) {
    for pixel in pixels.chunks_exact_mut(4) {
        pixel.swap(0, 2);
    }
}

/// Converts RGBA8 to BGRA8 in place. The swizzle is its own inverse.
#[inline]
pub fn rgba_to_bgra(pixels: &mut [u8]) {
    bgra_to_rgba(pixels);
}
