use thiserror::Error;

use crate::region::Region;

/// Errors reported by [`RegionDecoder`](crate::RegionDecoder) implementations.
///
/// All variants count as transient from the tile source's point of view:
/// a failed decode surfaces to the tile consumer as an absent tile, never
/// as an error, and leaves the source's state untouched. Callers that
/// determine a source is permanently unusable declare that separately via
/// [`TileSource::mark_failed`](crate::TileSource::mark_failed).
#[derive(Debug, Clone, Error)]
pub enum DecodeError {
    /// The decoder produced no pixel data for an in-bounds region
    #[error("no data produced for region {0}")]
    NoData(Region),

    /// The decoder does not support the requested sub-sampling factor
    #[error("unsupported sub-sampling factor {0}")]
    UnsupportedSubsample(u32),

    /// The underlying source could not be read
    #[error("source unreadable: {0}")]
    Source(String),
}
