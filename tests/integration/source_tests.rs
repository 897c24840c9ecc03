//! End-to-end tile production and lifecycle tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use image::RgbaImage;
use tile_source::{
    shared, PreviewImage, TileProvider, TileRequest, TileSource,
};

use super::test_utils::{gradient, init_logging, GradientDecoder};

fn source_1000x800() -> TileSource {
    TileSource::with_decoder(RgbaImage::new(512, 384), shared(GradientDecoder::new(1000, 800)))
}

#[test]
fn test_representative_tiles_at_level_zero() {
    init_logging();
    let source = source_1000x800();

    // Interior: full side, exact pixels.
    let tile = source
        .get_tile(TileRequest::new(0, 256, 256, 256, 1))
        .unwrap();
    assert_eq!((tile.width(), tile.height()), (258, 258));
    assert_eq!(*tile.get_pixel(0, 0), gradient(255, 255));

    // Left edge: full side, one transparent border column.
    let tile = source.get_tile(TileRequest::new(0, 0, 256, 256, 1)).unwrap();
    assert_eq!((tile.width(), tile.height()), (258, 258));
    assert_eq!(tile.get_pixel(0, 0).0[3], 0);
    assert_eq!(*tile.get_pixel(1, 0), gradient(0, 255));

    // Right edge: trimmed to decoded width plus one border.
    let tile = source
        .get_tile(TileRequest::new(0, 768, 256, 256, 1))
        .unwrap();
    assert_eq!((tile.width(), tile.height()), (234, 258));

    // Bottom-right corner: trimmed on both axes.
    let tile = source
        .get_tile(TileRequest::new(0, 768, 768, 256, 1))
        .unwrap();
    assert_eq!((tile.width(), tile.height()), (234, 34));
    assert_eq!(*tile.get_pixel(0, 0), gradient(767, 767));
}

#[test]
fn test_clipped_tile_at_level_one() {
    init_logging();
    let source = source_1000x800();

    // Tile at (512, 0), level 1: clipped at the top and at the right.
    // want = [510, -2) .. actually [510, 1026) x [-2, 514); ask clips to
    // [510, 1000) x [0, 514): 245 x 257 decoded pixels at offset (0, 1).
    let tile = source.get_tile(TileRequest::new(1, 512, 0, 256, 1)).unwrap();
    assert_eq!((tile.width(), tile.height()), (246, 258));
    assert_eq!(tile.get_pixel(0, 0).0[3], 0);
    assert_eq!(*tile.get_pixel(0, 1), gradient(510, 0));
    assert_eq!(*tile.get_pixel(244, 1), gradient(510 + 2 * 244, 0));
    assert_eq!(tile.get_pixel(245, 1).0[3], 0);
}

#[test]
fn test_zero_border_edge_tile() {
    init_logging();
    let source = source_1000x800();

    // With no border there is nothing to pad with at the edge; the tile is
    // exactly the decoded extent.
    let tile = source
        .get_tile(TileRequest::new(0, 768, 768, 256, 0))
        .unwrap();
    assert_eq!((tile.width(), tile.height()), (232, 32));
    assert_eq!(*tile.get_pixel(0, 0), gradient(768, 768));
    assert_eq!(*tile.get_pixel(231, 31), gradient(999, 799));
}

#[test]
fn test_lifecycle_empty_to_tileable_and_back() {
    init_logging();

    struct CountingPreview {
        releases: AtomicUsize,
    }

    impl PreviewImage for CountingPreview {
        fn width(&self) -> u32 {
            512
        }

        fn height(&self) -> u32 {
            384
        }

        fn release(&self) {
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
    }

    let source = TileSource::new();
    assert_eq!(source.get_tile(TileRequest::new(0, 0, 0, 256, 1)), None);

    // Preview-only: metadata without tiles.
    let external = Arc::new(CountingPreview {
        releases: AtomicUsize::new(0),
    });
    source.set_external_preview(external.clone(), 1000, 800);
    assert_eq!(source.image_width(), 1000);
    assert_eq!(source.level_count(), 0);
    assert_eq!(source.get_tile(TileRequest::new(0, 0, 0, 256, 1)), None);

    // Tileable: decoder installed, preview kept, pyramid depth derived.
    source.set_region_decoder(shared(GradientDecoder::new(1000, 800)));
    assert_eq!(source.level_count(), 1);
    assert!(source.get_tile(TileRequest::new(0, 0, 0, 256, 1)).is_some());

    // Back to empty; the borrowed preview must not be released.
    source.clear();
    assert_eq!(source.image_width(), 0);
    assert!(source.preview().is_none());
    assert_eq!(external.releases.load(Ordering::SeqCst), 0);
}

#[test]
fn test_two_sources_share_one_decoder() {
    init_logging();
    let decoder = shared(GradientDecoder::new(1000, 800));
    let viewer = TileSource::with_decoder(RgbaImage::new(512, 384), decoder.clone());
    let cropper = TileSource::with_decoder(RgbaImage::new(256, 192), decoder);

    assert_eq!(viewer.image_width(), 1000);
    assert_eq!(cropper.image_width(), 1000);
    // Pyramid depth depends on the preview, not only the decoder.
    assert_eq!(viewer.level_count(), 1);
    assert_eq!(cropper.level_count(), 2);

    let request = TileRequest::new(0, 256, 256, 128, 1);
    assert_eq!(viewer.get_tile(request), cropper.get_tile(request));
}

#[test]
fn test_provider_as_boxed_trait_object() {
    init_logging();
    let provider: Box<dyn TileProvider> = Box::new(source_1000x800());
    let tile = provider
        .get_tile(TileRequest::new(0, 128, 128, 64, 2))
        .unwrap();
    assert_eq!((tile.width(), tile.height()), (68, 68));
    assert!(!provider.is_failed());
}
