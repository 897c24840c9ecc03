//! Preview images ("screen nails") and their ownership.
//!
//! A preview is a low-resolution stand-in for the full image: the viewer
//! shows it instantly while tiles stream in, and the tile source uses its
//! width to derive the pyramid depth. The tile source never decodes the
//! preview itself.
//!
//! Previews come from two places with different lifetimes. A preview built
//! from a plain pixel buffer belongs to the tile source, which must release
//! it when it is replaced or cleared. A preview handed in from outside (for
//! example one shared with a thumbnail cache) is only borrowed, and releasing
//! it would free someone else's resource. [`Preview`] tags which case holds
//! so the release decision is made in exactly one place.

use std::sync::{Arc, Mutex};

use image::RgbaImage;

/// A low-resolution stand-in for the full image.
///
/// Implementations must make `release` idempotent: releasing an already
/// released preview is a no-op. Dimensions stay readable after release so
/// pyramid-depth derivation never observes a zero-sized preview.
pub trait PreviewImage: Send + Sync {
    /// Width of the preview in pixels.
    fn width(&self) -> u32;

    /// Height of the preview in pixels.
    fn height(&self) -> u32;

    /// Free the pixel data. Idempotent.
    fn release(&self);
}

/// A preview backed by an owned pixel buffer.
pub struct BufferPreview {
    width: u32,
    height: u32,
    pixels: Mutex<Option<RgbaImage>>,
}

impl BufferPreview {
    /// Wrap a pixel buffer as a preview.
    pub fn new(buffer: RgbaImage) -> Self {
        Self {
            width: buffer.width(),
            height: buffer.height(),
            pixels: Mutex::new(Some(buffer)),
        }
    }

    /// Whether `release` has already dropped the pixel data.
    pub fn is_released(&self) -> bool {
        self.pixels.lock().unwrap().is_none()
    }
}

impl PreviewImage for BufferPreview {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn release(&self) {
        self.pixels.lock().unwrap().take();
    }
}

/// A preview reference tagged with who is responsible for releasing it.
pub enum Preview {
    /// The tile source owns the preview and releases it on replacement.
    Owned(Arc<dyn PreviewImage>),

    /// The preview belongs to an external holder; never released here.
    Borrowed(Arc<dyn PreviewImage>),
}

impl Preview {
    /// The underlying preview, regardless of ownership.
    pub fn handle(&self) -> &Arc<dyn PreviewImage> {
        match self {
            Preview::Owned(p) | Preview::Borrowed(p) => p,
        }
    }

    /// Release the preview if and only if it is owned.
    ///
    /// Called when the preview slot is overwritten or cleared.
    pub fn release_if_owned(&self) {
        if let Preview::Owned(p) = self {
            p.release();
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
