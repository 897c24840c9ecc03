//! TileSource: the decoder-backed tile supplier.
//!
//! A `TileSource` holds the image metadata (dimensions, pyramid depth), the
//! preview, and a handle to the region decoder, and produces border-padded
//! tiles on demand. The tile computation itself lives in [`TileSource::get_tile`]:
//! it translates a `(level, x, y, tile_size, border_size)` request into a
//! source-image rectangle, clips it against the image bounds, decodes it at
//! `2^level` sub-sampling, and pads the result wherever the request reached
//! past the image edge.
//!
//! # Lifecycle
//!
//! ```text
//!            set_preview /                 set_region_decoder /
//!            set_external_preview          with_decoder
//!   Empty ──────────────────────▶ PreviewOnly ──────────────▶ Tileable
//!     ▲                               │                           │
//!     └────────────── clear ──────────┴───────────────────────────┘
//! ```
//!
//! `PreviewOnly` answers metadata queries but produces no tiles; `Tileable`
//! produces tiles. A sticky failure flag sits orthogonal to these states:
//! it is declared by the caller via [`TileSource::mark_failed`] after a
//! terminal decode error and cleared by any reconfiguration. The flag is
//! advisory; it never blocks requests by itself.
//!
//! # Locking
//!
//! One mutex guards all of a source's mutable state, so configuration calls
//! and tile reads on the same source serialize against each other. The
//! decoder carries its own mutex (see [`crate::decoder`]), taken only for
//! the duration of the decode call; distinct sources wrapping distinct
//! decoders decode fully in parallel.

use std::mem;
use std::sync::{Arc, Mutex};

use image::{imageops, RgbaImage};
use tracing::{debug, warn};

use crate::decoder::SharedRegionDecoder;
use crate::preview::{BufferPreview, Preview, PreviewImage};
use crate::pyramid;
use crate::region::Region;

use super::provider::{TileProvider, TileRequest};

// =============================================================================
// Lifecycle state
// =============================================================================

/// Configuration state of a tile source.
///
/// Metadata lives inside the variant that defines it, so an unconfigured
/// source cannot carry stale dimensions and a tileable source cannot lack
/// a decoder.
enum Lifecycle {
    /// Nothing configured.
    Empty,

    /// A preview is installed but no decoder; tile requests yield nothing.
    PreviewOnly {
        preview: Preview,
        width: u32,
        height: u32,
    },

    /// Decoder installed; tiles can be produced.
    Tileable {
        preview: Preview,
        decoder: SharedRegionDecoder,
        width: u32,
        height: u32,
        level_count: u32,
    },
}

impl Lifecycle {
    fn take_preview(&mut self) -> Option<Preview> {
        match mem::replace(self, Lifecycle::Empty) {
            Lifecycle::Empty => None,
            Lifecycle::PreviewOnly { preview, .. } => Some(preview),
            Lifecycle::Tileable { preview, .. } => Some(preview),
        }
    }
}

struct State {
    lifecycle: Lifecycle,
    failed: bool,
}

// =============================================================================
// TileSource
// =============================================================================

/// Decoder-backed implementation of [`TileProvider`].
///
/// # Example
///
/// ```
/// use image::RgbaImage;
/// use tile_source::{
///     decoder, DecodeError, Region, RegionDecoder, TileProvider, TileRequest, TileSource,
/// };
///
/// struct SolidDecoder;
///
/// impl RegionDecoder for SolidDecoder {
///     fn width(&self) -> u32 {
///         4000
///     }
///
///     fn height(&self) -> u32 {
///         3000
///     }
///
///     fn decode_region(
///         &mut self,
///         region: Region,
///         subsample: u32,
///     ) -> Result<RgbaImage, DecodeError> {
///         let w = (region.width() as u32).div_ceil(subsample);
///         let h = (region.height() as u32).div_ceil(subsample);
///         Ok(RgbaImage::from_pixel(w, h, image::Rgba([255, 255, 255, 255])))
///     }
/// }
///
/// let source = TileSource::with_decoder(RgbaImage::new(512, 384), decoder::shared(SolidDecoder));
/// assert_eq!(source.level_count(), 3);
///
/// let tile = source.get_tile(TileRequest::new(0, 256, 256, 256, 1)).unwrap();
/// assert_eq!((tile.width(), tile.height()), (258, 258));
/// ```
pub struct TileSource {
    state: Mutex<State>,
}

impl TileSource {
    /// Create an empty source with no preview and no decoder.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                lifecycle: Lifecycle::Empty,
                failed: false,
            }),
        }
    }

    /// Create a tileable source from a preview buffer and a decoder.
    ///
    /// The preview is owned by the source; image dimensions come from the
    /// decoder and the pyramid depth from the image/preview width ratio.
    pub fn with_decoder(preview_buffer: RgbaImage, decoder: SharedRegionDecoder) -> Self {
        let preview: Arc<dyn PreviewImage> = Arc::new(BufferPreview::new(preview_buffer));
        let (width, height) = {
            let decoder = decoder.lock().unwrap();
            (decoder.width(), decoder.height())
        };
        let level_count = pyramid::level_count(width, preview.width());
        debug!(width, height, level_count, "tile source configured");
        Self {
            state: Mutex::new(State {
                lifecycle: Lifecycle::Tileable {
                    preview: Preview::Owned(preview),
                    decoder,
                    width,
                    height,
                    level_count,
                },
                failed: false,
            }),
        }
    }

    /// Install an owned preview with explicit dimensions.
    ///
    /// Drops any configured decoder: the source falls back to preview-only
    /// mode and produces no tiles until a decoder is installed again. A
    /// previously owned preview is released. Clears the failure flag.
    pub fn set_preview(&self, buffer: RgbaImage, width: u32, height: u32) {
        let preview: Arc<dyn PreviewImage> = Arc::new(BufferPreview::new(buffer));
        self.install_preview(Preview::Owned(preview), width, height);
    }

    /// Install an externally owned preview with explicit dimensions.
    ///
    /// Same as [`set_preview`](Self::set_preview), except the preview is
    /// only borrowed: it is never released by this source when replaced.
    pub fn set_external_preview(
        &self,
        preview: Arc<dyn PreviewImage>,
        width: u32,
        height: u32,
    ) {
        self.install_preview(Preview::Borrowed(preview), width, height);
    }

    fn install_preview(&self, preview: Preview, width: u32, height: u32) {
        let mut state = self.state.lock().unwrap();
        if let Some(old) = state.lifecycle.take_preview() {
            old.release_if_owned();
        }
        state.lifecycle = Lifecycle::PreviewOnly {
            preview,
            width,
            height,
        };
        state.failed = false;
        debug!(width, height, "preview installed, decoder cleared");
    }

    /// Install or replace the region decoder, keeping the current preview.
    ///
    /// Image dimensions are re-derived from the decoder and the pyramid
    /// depth recomputed from the current preview. Clears the failure flag.
    ///
    /// # Panics
    ///
    /// Panics if no preview is installed: the pyramid depth is defined by
    /// the image/preview width ratio, so installing a decoder first is a
    /// configuration contract violation.
    pub fn set_region_decoder(&self, decoder: SharedRegionDecoder) {
        let (width, height) = {
            let decoder = decoder.lock().unwrap();
            (decoder.width(), decoder.height())
        };
        let mut state = self.state.lock().unwrap();
        let preview = state
            .lifecycle
            .take_preview()
            .expect("set_region_decoder called with no preview installed");
        let level_count = pyramid::level_count(width, preview.handle().width());
        state.lifecycle = Lifecycle::Tileable {
            preview,
            decoder,
            width,
            height,
            level_count,
        };
        state.failed = false;
        debug!(width, height, level_count, "region decoder installed");
    }

    /// Reset to the empty state.
    ///
    /// Releases an owned preview (exactly once), drops the decoder, zeroes
    /// all metadata and clears the failure flag.
    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap();
        // take_preview leaves the lifecycle Empty behind.
        if let Some(old) = state.lifecycle.take_preview() {
            old.release_if_owned();
        }
        state.failed = false;
    }

    /// Declare the source permanently unusable.
    ///
    /// Sticky until the next configuration call. Advisory only: requests
    /// are not rejected here, the caller decides to stop issuing them.
    pub fn mark_failed(&self) {
        self.state.lock().unwrap().failed = true;
    }
}

impl Default for TileSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TileProvider for TileSource {
    /// Produce one border-padded tile.
    ///
    /// The request is first expanded to the *want region*: the tile extent
    /// plus its border, both scaled by `2^level` into level-0 coordinates.
    /// The *ask region* is the want region clipped to the image bounds; it
    /// is what the decoder is asked for, at `2^level` sub-sampling. When no
    /// clipping occurred the decoded buffer already is the tile. Otherwise
    /// the decoded pixels are composited at the clip offset into a
    /// transparent `tile_size + 2 * border_size` square, which is then cut
    /// down to the extent actually covered by decoded pixels plus one
    /// border width, so a tile at the image edge comes back smaller rather
    /// than mostly blank.
    ///
    /// Returns `None` without touching any decoder when the source is empty
    /// or preview-only, and `None` when the decode attempt fails (logged,
    /// state unchanged, caller may retry).
    ///
    /// # Panics
    ///
    /// Panics if the requested region does not overlap the image at all;
    /// callers must pre-clip requests against the image dimensions.
    fn get_tile(&self, request: TileRequest) -> Option<RgbaImage> {
        let state = self.state.lock().unwrap();
        let (decoder, width, height) = match &state.lifecycle {
            Lifecycle::Tileable {
                decoder,
                width,
                height,
                ..
            } => (Arc::clone(decoder), *width, *height),
            _ => return None,
        };

        let TileRequest {
            level,
            x,
            y,
            tile_size,
            border_size,
        } = request;

        // Both the tile extent and the border are scaled into level-0
        // coordinates; the border must cover border_size pixels at the
        // *requested* level.
        let b = (border_size as i64) << level;
        let span = (tile_size as i64) << level;
        let want = Region::new(x - b, y - b, x + span + b, y + span + b);

        let bounds = Region::new(0, 0, width as i64, height as i64);
        let ask = match bounds.intersect(&want) {
            Some(ask) => ask,
            None => panic!("tile request {want} does not overlap image bounds {bounds}"),
        };

        let subsample = 1u32 << level;
        let decoded = {
            // The decoder may be shared with other consumers; hold its lock
            // only across the decode call itself.
            let mut decoder = decoder.lock().unwrap();
            decoder.decode_region(ask, subsample)
        };
        let decoded = match decoded {
            Ok(buffer) => buffer,
            Err(err) => {
                warn!(region = %ask, subsample, "failed to decode region: {err}");
                return None;
            }
        };

        // Fast path: the tile is fully interior, the decoded buffer already
        // has side tile_size + 2 * border_size.
        if ask == want {
            return Some(decoded);
        }

        // Boundary tile: composite the decoded pixels into a transparent
        // padded buffer at the clip offset, converted back to level pixels.
        let out_size = tile_size + 2 * border_size;
        let mut out = RgbaImage::new(out_size, out_size);
        let offset_x = (ask.left - want.left) >> level;
        let offset_y = (ask.top - want.top) >> level;
        imageops::replace(&mut out, &decoded, offset_x, offset_y);

        // Beyond the decoded pixels, only one border width of padding is
        // meaningful; cut the buffer down when the edge leaves the rest
        // uncovered.
        let end_x = offset_x + decoded.width() as i64 + border_size as i64;
        let end_y = offset_y + decoded.height() as i64 + border_size as i64;
        if end_x < out_size as i64 || end_y < out_size as i64 {
            let trimmed_w = end_x.min(out_size as i64) as u32;
            let trimmed_h = end_y.min(out_size as i64) as u32;
            Some(imageops::crop_imm(&out, 0, 0, trimmed_w, trimmed_h).to_image())
        } else {
            Some(out)
        }
    }

    fn image_width(&self) -> u32 {
        match &self.state.lock().unwrap().lifecycle {
            Lifecycle::Empty => 0,
            Lifecycle::PreviewOnly { width, .. } | Lifecycle::Tileable { width, .. } => *width,
        }
    }

    fn image_height(&self) -> u32 {
        match &self.state.lock().unwrap().lifecycle {
            Lifecycle::Empty => 0,
            Lifecycle::PreviewOnly { height, .. } | Lifecycle::Tileable { height, .. } => *height,
        }
    }

    fn level_count(&self) -> u32 {
        match &self.state.lock().unwrap().lifecycle {
            Lifecycle::Empty | Lifecycle::PreviewOnly { .. } => 0,
            Lifecycle::Tileable { level_count, .. } => *level_count,
        }
    }

    fn preview(&self) -> Option<Arc<dyn PreviewImage>> {
        match &self.state.lock().unwrap().lifecycle {
            Lifecycle::Empty => None,
            Lifecycle::PreviewOnly { preview, .. } | Lifecycle::Tileable { preview, .. } => {
                Some(Arc::clone(preview.handle()))
            }
        }
    }

    fn is_failed(&self) -> bool {
        self.state.lock().unwrap().failed
    }
}

// =============================================================================
// Tests
// =============================================================================
