//! Receipt image binarization.
//!
//! Turns a photographed receipt into a near-bilevel image that OCR engines
//! read well: downscale, luminance (+gamma), unsharp mask, per-tile adaptive
//! threshold, optional 3x3 closing. Everything runs on in-memory buffers and
//! the same input and config always give the same output.
//!
//! Binarizing twice is not a no-op: a bilevel input shifts the tile means,
//! so repeated passes may move stroke edges.

pub mod steps;

use image::{DynamicImage, GrayImage, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

use crate::config::BinarizationConfig;
use crate::types::RawImage;

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("Invalid image: {0}")]
    InvalidImage(String),
    #[error("Failed to load image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Failed to encode processed image: {0}")]
    Encode(String),
}

/// Binarize an RGBA8 bitmap. The output may be smaller than the input when
/// it was wider than `config.max_width`.
pub fn binarize(image: &RawImage, config: &BinarizationConfig) -> Result<RawImage, PreprocessError> {
    let rgba = image.to_rgba_image()?;
    Ok(RawImage::from(binarize_rgba(rgba, config)))
}

/// Same as [`binarize`] for an already decoded image of any pixel format.
pub fn binarize_dynamic(image: &DynamicImage, config: &BinarizationConfig) -> Result<RgbaImage, PreprocessError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(PreprocessError::InvalidImage(format!(
            "zero dimension ({}x{})",
            image.width(),
            image.height()
        )));
    }
    Ok(binarize_rgba(image.to_rgba8(), config))
}

fn binarize_rgba(rgba: RgbaImage, config: &BinarizationConfig) -> RgbaImage {
    let cfg = config.sanitized();
    let (src_w, src_h) = rgba.dimensions();

    let working = steps::resize::apply(rgba, cfg.max_width);
    let gray = steps::luminance::apply(&working, cfg.gamma);
    drop(working);
    let sharpened = steps::sharpen::apply(&gray, cfg.unsharp_amount);
    let binary = steps::threshold::apply(&sharpened, cfg.tile_size, cfg.tile_offset);
    let binary = if cfg.morph_close { steps::morphology::close(&binary) } else { binary };

    tracing::debug!(
        src_w,
        src_h,
        width = binary.width(),
        height = binary.height(),
        tile_size = cfg.tile_size,
        "binarized receipt image"
    );

    expand_to_rgba(&binary)
}

fn expand_to_rgba(gray: &GrayImage) -> RgbaImage {
    RgbaImage::from_fn(gray.width(), gray.height(), |x, y| {
        let v = gray.get_pixel(x, y).0[0];
        Rgba([v, v, v, 255])
    })
}

/// Load an image file, binarize it, and return PNG bytes ready for OCR.
pub fn prepare_for_ocr(path: &Path, config: &BinarizationConfig) -> Result<Vec<u8>, PreprocessError> {
    let img = image::open(path)?;
    encode_as_png(&binarize_dynamic(&img, config)?)
}

/// Decode raw image bytes (JPEG / PNG / WEBP / …), binarize, and return PNG bytes.
pub fn prepare_for_ocr_from_bytes(data: &[u8], config: &BinarizationConfig) -> Result<Vec<u8>, PreprocessError> {
    let img = image::load_from_memory(data)?;
    encode_as_png(&binarize_dynamic(&img, config)?)
}

pub fn encode_as_png(img: &RgbaImage) -> Result<Vec<u8>, PreprocessError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| PreprocessError::Encode(e.to_string()))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn receipt_like(width: u32, height: u32) -> RgbaImage {
        // Light paper with a left-to-right shadow and 3px dark strokes.
        RgbaImage::from_fn(width, height, |x, y| {
            let paper = 230 - (x * 80 / width.max(1)) as u8;
            let v = if (5..=7).contains(&(y % 12)) && x % 40 < 30 { 25 } else { paper };
            Rgba([v, v, v.saturating_sub(5), 255])
        })
    }

    #[test]
    fn rejects_malformed_buffer() {
        let raw = RawImage::new(4, 4, vec![0; 10]);
        let err = binarize(&raw, &BinarizationConfig::default()).unwrap_err();
        assert!(matches!(err, PreprocessError::InvalidImage(_)));
    }

    #[test]
    fn rejects_zero_dimension() {
        let raw = RawImage::new(0, 0, vec![]);
        assert!(binarize(&raw, &BinarizationConfig::default()).is_err());
    }

    #[test]
    fn huge_dimensions_are_invalid_not_a_panic() {
        let raw = RawImage::new(u32::MAX, u32::MAX, vec![]);
        let err = binarize(&raw, &BinarizationConfig::default()).unwrap_err();
        assert!(matches!(err, PreprocessError::InvalidImage(_)));
    }

    #[test]
    fn output_is_bilevel_with_opaque_alpha() {
        let raw = RawImage::from(receipt_like(120, 80));
        let out = binarize(&raw, &BinarizationConfig::default()).unwrap();
        assert_eq!((out.width, out.height), (120, 80));
        for px in out.pixels.chunks_exact(4) {
            assert!(px[0] == 0 || px[0] == 255, "non-binary value {}", px[0]);
            assert_eq!(px[0], px[1]);
            assert_eq!(px[1], px[2]);
            assert_eq!(px[3], 255);
        }
    }

    #[test]
    fn strokes_come_out_black() {
        let raw = RawImage::from(receipt_like(120, 80));
        let out = binarize(&raw, &BinarizationConfig::default()).unwrap();
        let idx = ((6 * 120 + 10) * 4) as usize;
        assert_eq!(out.pixels[idx], 0);
        let paper = ((20 * 120 + 10) * 4) as usize;
        assert_eq!(out.pixels[paper], 255);
    }

    #[test]
    fn downscales_wide_input() {
        let raw = RawImage::from(receipt_like(300, 100));
        let cfg = BinarizationConfig { max_width: 150, ..Default::default() };
        let out = binarize(&raw, &cfg).unwrap();
        assert_eq!((out.width, out.height), (150, 50));
        assert_eq!(out.pixels.len(), 150 * 50 * 4);
    }

    #[test]
    fn deterministic() {
        let raw = RawImage::from(receipt_like(90, 60));
        let cfg = BinarizationConfig::default();
        assert_eq!(binarize(&raw, &cfg).unwrap(), binarize(&raw, &cfg).unwrap());
    }

    #[test]
    fn flat_image_is_well_formed() {
        let raw = RawImage::from(RgbaImage::from_pixel(33, 17, Rgba([12, 12, 12, 255])));
        let out = binarize(&raw, &BinarizationConfig::default()).unwrap();
        assert!(out.pixels.chunks_exact(4).all(|p| p == [255, 255, 255, 255]));
    }

    #[test]
    fn tiny_tile_size_is_clamped_not_rejected() {
        let raw = RawImage::from(receipt_like(40, 30));
        let cfg = BinarizationConfig { tile_size: 1, ..Default::default() };
        assert!(binarize(&raw, &cfg).is_ok());
    }

    #[test]
    fn binarize_dynamic_accepts_gray_input() {
        let gray = GrayImage::from_pixel(10, 10, Luma([200]));
        let out = binarize_dynamic(&DynamicImage::ImageLuma8(gray), &BinarizationConfig::default()).unwrap();
        assert_eq!(out.dimensions(), (10, 10));
    }

    #[test]
    fn prepare_from_bytes_produces_png_header() {
        let mut png = Vec::new();
        DynamicImage::ImageRgba8(receipt_like(20, 20))
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();
        let result = prepare_for_ocr_from_bytes(&png, &BinarizationConfig::default()).unwrap();
        assert_eq!(&result[..4], b"\x89PNG");
    }

    #[test]
    fn prepare_from_garbage_is_decode_error() {
        let err = prepare_for_ocr_from_bytes(b"not an image", &BinarizationConfig::default()).unwrap_err();
        assert!(matches!(err, PreprocessError::Decode(_)));
    }
}
