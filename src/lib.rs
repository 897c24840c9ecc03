//! # tile-source
//!
//! Tile supplier for multi-resolution image viewers.
//!
//! Given a large source image and a requested viewport tile at a given zoom
//! level, this library produces a fixed-size pixel buffer representing that
//! tile, padded at image boundaries. It owns the coordinate arithmetic
//! across pyramid levels, the clipping of partial regions against the image
//! bounds, and the compositing of decoded pixels into border-padded output
//! buffers. It does not decode image formats itself: decoding is delegated
//! to an external [`RegionDecoder`] capability, and tile caching and
//! on-screen rendering belong to other layers.
//!
//! ## Architecture
//!
//! The library is organized into focused modules:
//!
//! - [`tile`] - the [`TileProvider`] contract and the [`TileSource`] core
//! - [`decoder`] - the [`RegionDecoder`] seam to the decoding library
//! - [`preview`] - preview images ("screen nails") and their ownership
//! - [`region`] - rectangles in original-image pixel coordinates
//! - [`pyramid`] - pyramid depth derivation
//! - [`error`] - decode error taxonomy
//!
//! ## Coordinate model
//!
//! A request names a pyramid `level` (sub-sampling factor `2^level`), a
//! tile origin `(x, y)` in level-0 pixel coordinates, and a `tile_size` and
//! `border_size` in level pixels. The tile source scales tile and border
//! into level-0 space, clips against the image, decodes the clipped
//! rectangle at `2^level` sub-sampling, and pads or trims the result so a
//! tile is smaller than `tile_size + 2 * border_size` per side exactly when
//! the true image edge cuts into it.
//!
//! ## Concurrency
//!
//! Tile requests may arrive concurrently from a prefetch thread pool. Each
//! [`TileSource`] serializes its own state behind one mutex; each shared
//! decoder handle serializes decode calls behind its own, so sources
//! wrapping different decoders proceed fully in parallel.

pub mod decoder;
pub mod error;
pub mod preview;
pub mod pyramid;
pub mod region;
pub mod tile;

// Re-export commonly used types
pub use decoder::{shared, RegionDecoder, SharedRegionDecoder};
pub use error::DecodeError;
pub use preview::{BufferPreview, Preview, PreviewImage};
pub use region::Region;
pub use tile::{TileProvider, TileRequest, TileSource};
