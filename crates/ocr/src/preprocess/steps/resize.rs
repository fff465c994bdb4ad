use image::{imageops, RgbaImage};

/// Target dimensions when `width` exceeds `max_width`: both sides scaled by
/// `max_width / width`, rounded, never below 1.
pub fn downscaled_dimensions(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width <= max_width {
        return (width, height);
    }
    let scale = max_width as f64 / width as f64;
    let w = ((width as f64 * scale).round() as u32).max(1);
    let h = ((height as f64 * scale).round() as u32).max(1);
    (w, h)
}

/// Shrink overly wide images; narrower ones are returned untouched.
pub fn apply(image: RgbaImage, max_width: u32) -> RgbaImage {
    let (width, height) = image.dimensions();
    let (w, h) = downscaled_dimensions(width, height, max_width);
    if (w, h) == (width, height) {
        return image;
    }
    imageops::resize(&image, w, h, imageops::FilterType::Triangle)
}
