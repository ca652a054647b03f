//! Tests for PNG encoding of heatmap frames.
//!
//! Covers format selection (indexed vs truecolor), chunk layout and input
//! validation.

use renderer::png::{encode_indexed, encode_rgba, encode_truecolor};
use renderer::RenderError;

// ============================================================================
// Helper functions
// ============================================================================

const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Heatmap-like frame: transparent border, white-to-darkred ramp inside.
fn heatmap_pixels(width: usize, height: usize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            if x < 4 || y < 4 || x >= width - 4 || y >= height - 4 {
                pixels.extend_from_slice(&[0, 0, 0, 0]);
            } else {
                let t = (x % 16) as f64 / 15.0;
                let g = (255.0 * (1.0 - t)).round() as u8;
                let r = (255.0 + (139.0 - 255.0) * t).round() as u8;
                pixels.extend_from_slice(&[r, g, g, 255]);
            }
        }
    }
    pixels
}

/// Names of the chunks in an encoded PNG, in order.
fn chunk_names(png: &[u8]) -> Vec<String> {
    let mut names = Vec::new();
    let mut pos = 8;
    while pos + 8 <= png.len() {
        let len = u32::from_be_bytes([png[pos], png[pos + 1], png[pos + 2], png[pos + 3]]) as usize;
        names.push(String::from_utf8_lossy(&png[pos + 4..pos + 8]).to_string());
        pos += 12 + len;
    }
    names
}

// ============================================================================
// Format selection tests
// ============================================================================

#[test]
fn test_heatmap_frame_is_indexed() {
    let pixels = heatmap_pixels(64, 48);
    let png = encode_rgba(&pixels, 64, 48).unwrap();

    assert_eq!(&png[0..8], &SIGNATURE);
    assert_eq!(png[25], 3, "color type should be indexed");
    assert_eq!(chunk_names(&png), vec!["IHDR", "PLTE", "tRNS", "IDAT", "IEND"]);
}

#[test]
fn test_many_colors_fall_back_to_truecolor() {
    let pixels: Vec<u8> = (0..(100 * 100u32))
        .flat_map(|i| [(i % 256) as u8, (i / 256) as u8, 50, 255])
        .collect();
    let png = encode_rgba(&pixels, 100, 100).unwrap();

    assert_eq!(png[25], 6, "color type should be RGBA");
    assert_eq!(chunk_names(&png), vec!["IHDR", "IDAT", "IEND"]);
}

#[test]
fn test_indexed_smaller_than_truecolor() {
    let pixels = heatmap_pixels(256, 160);
    let indexed = encode_rgba(&pixels, 256, 160).unwrap();
    let rgba = encode_truecolor(&pixels, 256, 160).unwrap();
    assert!(indexed.len() < rgba.len());
}

#[test]
fn test_opaque_palette_has_no_trns() {
    let png = encode_indexed(2, 1, &[[255, 0, 0, 255], [0, 0, 255, 255]], &[0, 1]).unwrap();
    assert_eq!(chunk_names(&png), vec!["IHDR", "PLTE", "IDAT", "IEND"]);
}

// ============================================================================
// Validation tests
// ============================================================================

#[test]
fn test_wrong_buffer_size_rejected() {
    let err = encode_rgba(&[0u8; 10], 2, 2).unwrap_err();
    assert!(matches!(
        err,
        RenderError::SizeMismatch {
            expected: 16,
            actual: 10
        }
    ));
}

#[test]
fn test_empty_palette_rejected() {
    assert!(encode_indexed(1, 1, &[], &[0]).is_err());
}

#[test]
fn test_ihdr_dimensions() {
    let pixels = heatmap_pixels(40, 30);
    let png = encode_rgba(&pixels, 40, 30).unwrap();
    assert_eq!(&png[16..20], &40u32.to_be_bytes());
    assert_eq!(&png[20..24], &30u32.to_be_bytes());
}
