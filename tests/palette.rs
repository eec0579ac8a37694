use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use palette::Srgb;
use pin_palette::{
    ExtractOptions, PaletteError, compare_colors, extract_palette_bytes, match_images,
    parse_hex_list,
};

fn png(img: &RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(img.clone())
        .write_to(&mut std::io::Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

/// Four horizontal bands of decreasing height on a white border.
fn pin_photo(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        if x < width / 10 || x >= width - width / 10 {
            return Rgba([255, 255, 255, 255]);
        }
        let band = y * 10 / height;
        match band {
            0..=3 => Rgba([200, 40, 40, 255]),
            4..=6 => Rgba([40, 100, 200, 255]),
            7..=8 => Rgba([220, 180, 40, 255]),
            _ => Rgba([60, 160, 80, 255]),
        }
    })
}

#[test]
fn extracts_bands_without_the_border() {
    let bytes = png(&pin_photo(60, 40));
    let palette = extract_palette_bytes(&bytes, 4).unwrap();
    assert_eq!(
        palette,
        vec![
            Srgb::new(200, 40, 40),
            Srgb::new(40, 100, 200),
            Srgb::new(220, 180, 40),
            Srgb::new(60, 160, 80),
        ]
    );
}

#[test]
fn large_photo_palette_is_bounded_and_quantized() {
    let bytes = png(&pin_photo(640, 480));
    let palette = extract_palette_bytes(&bytes, 4).unwrap();
    assert_eq!(palette.len(), 4);
    for c in &palette {
        assert!([c.red, c.green, c.blue].iter().all(|ch| ch % 20 == 0), "{c:?}");
    }
    assert_eq!(palette[0], Srgb::new(200, 40, 40));
}

#[test]
fn black_image_still_has_a_palette() {
    let bytes = png(&RgbaImage::from_pixel(16, 16, Rgba([0, 0, 0, 255])));
    let palette = extract_palette_bytes(&bytes, 4).unwrap();
    assert_eq!(palette, vec![Srgb::new(0, 0, 0)]);
}

#[test]
fn undecodable_bytes_are_rendering_unavailable() {
    let err = extract_palette_bytes(b"definitely not an image", 4).unwrap_err();
    assert!(matches!(err, PaletteError::RenderingUnavailable(_)));
}

#[test]
fn same_photo_matches_fully() {
    let photo = DynamicImage::ImageRgba8(pin_photo(60, 40));
    let matched = match_images(&photo, &photo, &ExtractOptions::default()).unwrap();
    assert_eq!(matched.score, 1.0);
    assert_eq!(matched.percentage, 100);
    assert_eq!(matched.reference, matched.candidate);
}

#[test]
fn recolored_photo_scores_lower() {
    let reference = DynamicImage::ImageRgba8(pin_photo(60, 40));
    let mut fake = pin_photo(60, 40);
    for p in fake.pixels_mut() {
        if p.0 == [200, 40, 40, 255] {
            *p = Rgba([40, 200, 200, 255]);
        }
    }
    let fake = DynamicImage::ImageRgba8(fake);
    let matched = match_images(&reference, &fake, &ExtractOptions::default()).unwrap();
    assert!(matched.score < 1.0);
    assert!(matched.score > 0.0);
}

#[test]
fn hex_reference_against_extracted_palette() {
    let reference = parse_hex_list("#C82828, 2864C8").unwrap();
    let candidate = extract_palette_bytes(&png(&pin_photo(60, 40)), 4).unwrap();
    assert_eq!(compare_colors(&reference, &candidate), 1.0);
    assert!(compare_colors(&candidate, &reference) < 1.0);
}
