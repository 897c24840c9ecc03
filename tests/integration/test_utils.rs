//! Shared fixtures for integration tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use image::{Rgba, RgbaImage};
use tile_source::{DecodeError, Region, RegionDecoder};

/// Initialize tracing for a test run, honoring `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs a subscriber.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// The pixel a [`GradientDecoder`] produces for source coordinate `(sx, sy)`.
pub fn gradient(sx: i64, sy: i64) -> Rgba<u8> {
    Rgba([(sx % 256) as u8, (sy % 256) as u8, 0, 255])
}

/// Deterministic decoder: every decoded pixel encodes its own source
/// coordinate, so compositing can be asserted exactly.
pub struct GradientDecoder {
    width: u32,
    height: u32,
}

impl GradientDecoder {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl RegionDecoder for GradientDecoder {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn decode_region(&mut self, region: Region, subsample: u32) -> Result<RgbaImage, DecodeError> {
        let w = (region.width() as u32).div_ceil(subsample);
        let h = (region.height() as u32).div_ceil(subsample);
        Ok(RgbaImage::from_fn(w, h, |ox, oy| {
            let sx = region.left + (ox * subsample) as i64;
            let sy = region.top + (oy * subsample) as i64;
            gradient(sx, sy)
        }))
    }
}

/// A decoder that records overlapping invocations.
///
/// The shared-decoder mutex must keep calls from interleaving even when the
/// same decoder backs several tile sources; any overlap observed here is a
/// serialization bug.
pub struct GuardedDecoder {
    inner: GradientDecoder,
    busy: AtomicBool,
    overlaps: Arc<AtomicUsize>,
    calls: Arc<AtomicUsize>,
}

impl GuardedDecoder {
    pub fn new(width: u32, height: u32) -> (Self, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let overlaps = Arc::new(AtomicUsize::new(0));
        let calls = Arc::new(AtomicUsize::new(0));
        let decoder = Self {
            inner: GradientDecoder::new(width, height),
            busy: AtomicBool::new(false),
            overlaps: Arc::clone(&overlaps),
            calls: Arc::clone(&calls),
        };
        (decoder, overlaps, calls)
    }
}

impl RegionDecoder for GuardedDecoder {
    fn width(&self) -> u32 {
        self.inner.width()
    }

    fn height(&self) -> u32 {
        self.inner.height()
    }

    fn decode_region(&mut self, region: Region, subsample: u32) -> Result<RgbaImage, DecodeError> {
        if self.busy.swap(true, Ordering::SeqCst) {
            self.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        // Stay busy long enough for an unserialized caller to collide.
        std::thread::sleep(Duration::from_millis(1));
        let result = self.inner.decode_region(region, subsample);
        self.busy.store(false, Ordering::SeqCst);
        result
    }
}
