//! The tile consumer contract.
//!
//! This is the seam between the tile supplier and the viewer widget that
//! draws tiles. The viewer depends only on [`TileProvider`], so a real
//! decoder-backed [`TileSource`](crate::TileSource) and any test stand-in
//! are interchangeable behind it.

use std::sync::Arc;

use image::RgbaImage;

use crate::preview::PreviewImage;

/// Parameters identifying one tile of the image pyramid.
///
/// `(x, y)` is the top-left corner of the tile in original-image (level 0)
/// pixel coordinates; `tile_size` and `border_size` are expressed in pixels
/// of the requested level, so the tile covers `tile_size << level` original
/// pixels per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRequest {
    /// Pyramid level; sub-sampling factor is `2^level`, 0 = full resolution
    pub level: u32,

    /// Tile left edge in level-0 pixel coordinates
    pub x: i64,

    /// Tile top edge in level-0 pixel coordinates
    pub y: i64,

    /// Tile side length at the requested level, in pixels; must be positive
    pub tile_size: u32,

    /// Extra pixels on every side so adjacent tiles can be filtered
    /// without seams
    pub border_size: u32,
}

impl TileRequest {
    /// Create a tile request.
    pub fn new(level: u32, x: i64, y: i64, tile_size: u32, border_size: u32) -> Self {
        Self {
            level,
            x,
            y,
            tile_size,
            border_size,
        }
    }
}

/// Supplier of image metadata and tiles, as consumed by a tile viewer.
///
/// Implementations must be safe to call concurrently from a tile-prefetch
/// thread pool; each call is individually consistent.
pub trait TileProvider: Send + Sync {
    /// Produce the requested tile.
    ///
    /// Returns a square buffer of side `tile_size + 2 * border_size`
    /// (in level pixels) for fully interior tiles, a smaller buffer when
    /// the image edge clips the tile, and `None` when no decoder is
    /// configured or the decode attempt failed.
    fn get_tile(&self, request: TileRequest) -> Option<RgbaImage>;

    /// Width of the full-resolution image, 0 when unconfigured.
    fn image_width(&self) -> u32;

    /// Height of the full-resolution image, 0 when unconfigured.
    fn image_height(&self) -> u32;

    /// Number of pyramid levels above full resolution.
    fn level_count(&self) -> u32;

    /// The current preview image, if any.
    fn preview(&self) -> Option<Arc<dyn PreviewImage>>;

    /// Whether the caller has declared this source permanently unusable.
    fn is_failed(&self) -> bool;
}
