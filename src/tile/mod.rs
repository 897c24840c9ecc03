//! Tile supply layer.
//!
//! This module holds the outward contract of the crate and its one
//! implementation:
//!
//! - [`TileProvider`]: the trait a tile viewer consumes — tiles plus image
//!   metadata (dimensions, pyramid depth, preview, failure flag)
//! - [`TileRequest`]: parameters identifying one tile
//! - [`TileSource`]: decoder-backed provider performing the region
//!   computation, clipping and edge padding
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          Viewer / prefetch pool         │
//! └────────────────────┬────────────────────┘
//!                      │ TileProvider
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │               TileSource                │
//! │   want region → clip → decode → pad     │
//! └────────────────────┬────────────────────┘
//!                      │ RegionDecoder
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │        external decoding library        │
//! └─────────────────────────────────────────┘
//! ```

mod provider;
mod source;

pub use provider::{TileProvider, TileRequest};
pub use source::TileSource;
