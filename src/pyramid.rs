//! Pyramid depth derivation.
//!
//! A tile source exposes the full-resolution image as level 0 and each
//! following level at half the resolution of the previous one. The pyramid
//! bottoms out once a level is no larger than the preview image, because at
//! that point the preview itself is a good-enough rendition and no tiles are
//! needed. The level count is therefore the number of halvings required to
//! shrink the image width down to the preview width.

/// Smallest `i` in `[0, 31)` with `2^i >= value`, or 31 when none exists.
///
/// Probes integer powers of two against the ratio directly instead of going
/// through floating-point logarithms, so ratios that land exactly on a power
/// of two are never nudged across the boundary by rounding.
pub fn ceil_log2(value: f32) -> u32 {
    for i in 0..31 {
        if (1u32 << i) as f32 >= value {
            return i;
        }
    }
    31
}

/// Number of pyramid levels for an image of `image_width` previewed at
/// `preview_width`: `max(0, ceil(log2(image_width / preview_width)))`.
///
/// Zero when the preview is at least as wide as the image (tiles would add
/// no detail). Always recomputed from scratch on reconfiguration, never
/// patched incrementally.
pub fn level_count(image_width: u32, preview_width: u32) -> u32 {
    ceil_log2(image_width as f32 / preview_width as f32)
}

// =============================================================================
// Tests
// =============================================================================
