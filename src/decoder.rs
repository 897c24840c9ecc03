//! RegionDecoder trait for source-format-agnostic region decoding.
//!
//! This module defines the `RegionDecoder` trait, the seam between the tile
//! source and whatever library actually decodes pixels. The tile source
//! never touches file formats itself; it only asks a decoder for rectangles
//! of the original image at a given sub-sampling factor.
//!
//! Decoders are not assumed reentrant. A decoder is always handed around as
//! a [`SharedRegionDecoder`], and the tile source takes the embedded mutex
//! for exactly the duration of each `decode_region` call. Distinct decoder
//! instances are never serialized against each other, so tile sources
//! wrapping different decoders proceed fully in parallel.

use std::sync::{Arc, Mutex};

use image::RgbaImage;

use crate::error::DecodeError;
use crate::region::Region;

/// A decoder instance shared between components, serialized by its mutex.
///
/// The same decoder may back several consumers at once (a viewer and a crop
/// tool, for instance); the mutex keeps their decode calls from interleaving.
pub type SharedRegionDecoder = Arc<Mutex<dyn RegionDecoder>>;

/// Wrap a decoder for shared, serialized use.
pub fn shared<D: RegionDecoder + 'static>(decoder: D) -> SharedRegionDecoder {
    Arc::new(Mutex::new(decoder))
}

/// Capability to decode rectangular sub-regions of a large source image.
///
/// Implementations report the dimensions of the full source and decode any
/// in-bounds rectangle of it at an integer sub-sampling factor, preferring
/// quality over speed when downsampling.
///
/// # Contract
///
/// `decode_region` is called with `region` fully inside
/// `[0, width) x [0, height)` and must return a buffer of exactly
/// `ceil(region.width / subsample) x ceil(region.height / subsample)`
/// pixels. Taking `&mut self` encodes that a single instance is not
/// reentrant; serialization across threads is the caller's job (the
/// [`SharedRegionDecoder`] mutex).
pub trait RegionDecoder: Send {
    /// Width of the full source image in pixels.
    fn width(&self) -> u32;

    /// Height of the full source image in pixels.
    fn height(&self) -> u32;

    /// Decode `region` of the source at `1/subsample` scale.
    ///
    /// # Errors
    ///
    /// Any error is treated as transient by the tile source: it is logged
    /// and the affected tile request yields no tile. Implementations should
    /// not retry internally.
    fn decode_region(&mut self, region: Region, subsample: u32) -> Result<RgbaImage, DecodeError>;
}
