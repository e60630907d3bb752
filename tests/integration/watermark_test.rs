// Watermark engine integration tests
// Exercise the full decode -> sample -> render -> blend -> encode path.

use super::test_harness::{assert_changes_within, changed_pixels, solid_image, solid_png};
use bytes::Bytes;
use image::Rgba;
use vestidor::codec;
use vestidor::watermark::{
    apply_watermark, apply_watermark_base64, apply_watermark_batch, watermark_raster, BrandColor,
    WatermarkError, WatermarkPosition, WatermarkSize, WatermarkSpec, WatermarkStyle,
};

fn decode(png: &[u8]) -> image::RgbaImage {
    image::load_from_memory(png).unwrap().to_rgba8()
}

// Test: Centered medium mark on a black 800x600 image only touches its own box
#[test]
fn test_center_mark_changes_only_its_box() {
    let spec = WatermarkSpec::new(
        WatermarkPosition::Center,
        1.0,
        WatermarkSize::Medium,
        WatermarkStyle::Full,
    );
    let before = solid_image(800, 600, [0, 0, 0]);

    let output = apply_watermark(&solid_png(800, 600, [0, 0, 0]), &spec).unwrap();
    let after = decode(&output);

    assert_eq!(after.dimensions(), (800, 600));
    assert_changes_within(&changed_pixels(&before, &after), 310, 270, 180, 60);
}

// Test: Bottom-right mark sits 20px from both edges
#[test]
fn test_bottom_right_mark_respects_margin() {
    let spec = WatermarkSpec::new(
        WatermarkPosition::BottomRight,
        0.6,
        WatermarkSize::Medium,
        WatermarkStyle::Full,
    );
    let before = solid_image(800, 600, [128, 128, 128]);

    let after = decode(&apply_watermark(&solid_png(800, 600, [128, 128, 128]), &spec).unwrap());

    assert_changes_within(&changed_pixels(&before, &after), 600, 520, 180, 60);
}

// Test: Each size and style renders inside the box its size dictates
#[test]
fn test_every_size_and_style_stays_in_its_box() {
    for size in [WatermarkSize::Small, WatermarkSize::Medium, WatermarkSize::Large] {
        for style in [
            WatermarkStyle::Minimal,
            WatermarkStyle::Full,
            WatermarkStyle::Isotipo,
        ] {
            let spec = WatermarkSpec::new(WatermarkPosition::TopLeft, 1.0, size, style);
            let dims = size.dimensions();
            let before = solid_image(400, 300, [30, 30, 30]);
            let mut after = before.clone();

            let applied = watermark_raster(&mut after, &spec).unwrap();

            assert_eq!((applied.position.x, applied.position.y), (20, 20));
            let changed = changed_pixels(&before, &after);
            assert!(!changed.is_empty(), "{:?}/{:?} drew nothing", size, style);
            for (x, y) in changed {
                assert!(
                    x >= 20 && x < 20 + dims.width && y >= 20 && y < 20 + dims.height,
                    "{:?}/{:?} changed ({}, {})",
                    size,
                    style,
                    x,
                    y
                );
            }
        }
    }
}

// Test: The text-only style still marks the image
#[test]
fn test_minimal_style_marks_the_image() {
    let spec = WatermarkSpec::new(
        WatermarkPosition::Center,
        1.0,
        WatermarkSize::Medium,
        WatermarkStyle::Minimal,
    );
    let before = solid_image(800, 600, [0, 0, 0]);

    let after = decode(&apply_watermark(&solid_png(800, 600, [0, 0, 0]), &spec).unwrap());
    let changed = changed_pixels(&before, &after);

    assert_changes_within(&changed, 310, 270, 180, 60);
    assert!(changed.len() > 50, "only {} pixels changed", changed.len());
}

// Test: Color adapts to the brightness under the mark
#[test]
fn test_color_follows_background_brightness() {
    let spec = WatermarkSpec::default();
    let cases = [
        ([0, 0, 0], BrandColor::Cream, false),
        ([128, 128, 128], BrandColor::Wine, true),
        ([255, 255, 255], BrandColor::Ink, true),
    ];

    for (rgb, color, shadow) in cases {
        let mut raster = solid_image(640, 480, rgb);
        let applied = watermark_raster(&mut raster, &spec).unwrap();
        assert_eq!(applied.color.color, color, "background {:?}", rgb);
        assert_eq!(applied.color.shadow, shadow, "background {:?}", rgb);
    }
}

// Test: Only the region under the mark decides the color
#[test]
fn test_brightness_is_sampled_under_the_mark_only() {
    // White image with a black bottom-right corner
    let mut raster = solid_image(400, 300, [255, 255, 255]);
    for y in 220..300 {
        for x in 200..400 {
            raster.put_pixel(x, y, Rgba([0, 0, 0, 255]));
        }
    }

    let applied = watermark_raster(&mut raster, &WatermarkSpec::default()).unwrap();
    assert_eq!(applied.color.color, BrandColor::Cream);
}

// Test: Zero opacity leaves the image untouched
#[test]
fn test_zero_opacity_is_invisible() {
    let spec = WatermarkSpec::new(
        WatermarkPosition::Center,
        0.0,
        WatermarkSize::Large,
        WatermarkStyle::Full,
    );
    let before = solid_image(500, 400, [90, 40, 200]);
    let mut after = before.clone();

    watermark_raster(&mut after, &spec).unwrap();

    assert!(changed_pixels(&before, &after).is_empty());
}

// Test: A mark larger than the image is clipped, not an error
#[test]
fn test_tiny_image_is_clipped() {
    let spec = WatermarkSpec::new(
        WatermarkPosition::BottomRight,
        1.0,
        WatermarkSize::Large,
        WatermarkStyle::Full,
    );

    let output = apply_watermark(&solid_png(64, 48, [10, 10, 10]), &spec).unwrap();
    assert_eq!(decode(&output).dimensions(), (64, 48));
}

// Test: Base64 entry point accepts data URIs and returns bare base64 PNG
#[test]
fn test_base64_entry_point_accepts_data_uri() {
    let uri = codec::to_data_uri("image/png", &solid_png(300, 200, [200, 200, 200]));

    let output = apply_watermark_base64(&uri, &WatermarkSpec::default()).unwrap();
    let bytes = codec::decode_base64(&output).unwrap();

    assert_eq!(decode(&bytes).dimensions(), (300, 200));
}

// Test: Undecodable input is reported as an image load failure
#[test]
fn test_garbage_input_is_image_load_error() {
    let result = apply_watermark(b"definitely not an image", &WatermarkSpec::default());
    assert!(matches!(result, Err(WatermarkError::ImageLoad(_))));
}

// Test: Batch output keeps input order
#[tokio::test]
async fn test_batch_preserves_order() {
    let images = vec![
        Bytes::from(solid_png(320, 240, [0, 0, 0])),
        Bytes::from(solid_png(400, 300, [128, 128, 128])),
        Bytes::from(solid_png(500, 350, [255, 255, 255])),
    ];

    let outputs = apply_watermark_batch(images, &WatermarkSpec::default())
        .await
        .unwrap();

    let dims: Vec<_> = outputs.iter().map(|png| decode(png).dimensions()).collect();
    assert_eq!(dims, vec![(320, 240), (400, 300), (500, 350)]);
}

// Test: One bad image fails the whole batch
#[tokio::test]
async fn test_batch_fails_on_any_bad_image() {
    let images = vec![
        Bytes::from(solid_png(320, 240, [0, 0, 0])),
        Bytes::from_static(b"broken"),
    ];

    let result = apply_watermark_batch(images, &WatermarkSpec::default()).await;
    assert!(matches!(result, Err(WatermarkError::ImageLoad(_))));
}
