//! Parameters for etcpak's BC7 compressor.

/// Number of partition patterns BC7 defines.
pub const BC7_MAX_PARTITIONS: u32 = 64;

/// Highest supported uber level; higher levels search more endpoint candidates.
pub const BC7_MAX_UBER_LEVEL: u32 = 4;

/// Mirror of the bc7enc parameter block accepted by `etcpak_compress_bc7`.
///
/// Field order and types match the C struct exactly; the value is passed by pointer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bc7Params {
    /// Bit `n` set allows BC7 mode `n`.
    pub mode_mask: u32,
    /// Partition patterns evaluated, at most [`BC7_MAX_PARTITIONS`].
    pub max_partitions: u32,
    /// Per-channel error weights (R, G, B, A).
    pub weights: [u32; 4],
    /// Search effort, `0..=`[`BC7_MAX_UBER_LEVEL`].
    pub uber_level: u32,
    /// Non-zero measures error in a perceptual colour space.
    pub perceptual: u8,
    /// Non-zero refines endpoints with a least squares pass.
    pub try_least_squares: u8,
    /// Non-zero estimates mode 1/7 partitions with a filter bank.
    pub mode17_partition_estimation_filterbank: u8,
    /// Non-zero always encodes alpha.
    pub force_alpha: u8,
    /// Non-zero uses `selectors` instead of searching for them.
    pub force_selectors: u8,
    /// Forced selectors, used when `force_selectors` is non-zero.
    pub selectors: [u8; 16],
    /// Non-zero quantizes mode 6 endpoints.
    pub quant_mode6_endpoints: u8,
    /// Non-zero biases mode 1 p-bits.
    pub bias_mode1_pbits: u8,
    /// Weight applied to p-bit 1.
    pub pbit1_weight: f32,
    /// Error weight of mode 1.
    pub mode1_error_weight: f32,
    /// Error weight of mode 5.
    pub mode5_error_weight: f32,
    /// Error weight of mode 6.
    pub mode6_error_weight: f32,
    /// Error weight of mode 7.
    pub mode7_error_weight: f32,
}

impl Bc7Params {
    /// Perceptual weighting, the native library's default.
    pub const fn perceptual() -> Self {
        Self {
            mode_mask: u32::MAX,
            max_partitions: BC7_MAX_PARTITIONS,
            weights: [128, 64, 16, 32],
            uber_level: 0,
            perceptual: 1,
            try_least_squares: 1,
            mode17_partition_estimation_filterbank: 1,
            force_alpha: 0,
            force_selectors: 0,
            selectors: [0; 16],
            quant_mode6_endpoints: 0,
            bias_mode1_pbits: 0,
            pbit1_weight: 1.0,
            mode1_error_weight: 1.0,
            mode5_error_weight: 1.0,
            mode6_error_weight: 1.0,
            mode7_error_weight: 1.0,
        }
    }

    /// Uniform channel weights, for data that is not colour (normal maps, masks).
    pub const fn linear() -> Self {
        Self {
            weights: [1, 1, 1, 1],
            perceptual: 0,
            ..Self::perceptual()
        }
    }

    /// Sets the search effort, clamped to [`BC7_MAX_UBER_LEVEL`].
    pub const fn with_uber_level(mut self, level: u32) -> Self {
        self.uber_level = if level > BC7_MAX_UBER_LEVEL {
            BC7_MAX_UBER_LEVEL
        } else {
            level
        };
        self
    }

    /// Restricts the encoder to the modes whose bits are set.
    pub const fn with_mode_mask(mut self, mask: u32) -> Self {
        self.mode_mask = mask;
        self
    }
}

impl Default for Bc7Params {
    fn default() -> Self {
        Self::perceptual()
    }
}
