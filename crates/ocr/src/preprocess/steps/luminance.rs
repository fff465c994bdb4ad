use image::{GrayImage, Luma, RgbaImage};

/// Rec. 601 luma. Alpha is ignored.
fn luma(r: u8, g: u8, b: u8) -> u8 {
    let y = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
    y.round().clamp(0.0, 255.0) as u8
}

fn gamma_table(gamma: f32) -> [u8; 256] {
    let mut table = [0u8; 256];
    for (v, out) in table.iter_mut().enumerate() {
        let y = 255.0 * (v as f32 / 255.0).powf(gamma);
        *out = y.round().clamp(0.0, 255.0) as u8;
    }
    table
}

/// Collapse RGBA to a single luminance channel, applying `gamma` when it is
/// not 1.
pub fn apply(image: &RgbaImage, gamma: f32) -> GrayImage {
    let table = ((gamma - 1.0).abs() > f32::EPSILON).then(|| gamma_table(gamma));
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, _] = image.get_pixel(x, y).0;
        let v = luma(r, g, b);
        Luma([table.map_or(v, |t| t[v as usize])])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn luma_weights() {
        assert_eq!(luma(255, 255, 255), 255);
        assert_eq!(luma(0, 0, 0), 0);
        assert_eq!(luma(255, 0, 0), 76);
        assert_eq!(luma(0, 255, 0), 150);
        assert_eq!(luma(0, 0, 255), 29);
    }

    #[test]
    fn unit_gamma_is_identity() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([100, 100, 100, 255]));
        let out = apply(&img, 1.0);
        assert_eq!(out.get_pixel(0, 0).0[0], 100);
    }

    #[test]
    fn gamma_below_one_brightens() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([64, 64, 64, 255]));
        let plain = apply(&img, 1.0).get_pixel(0, 0).0[0];
        let bright = apply(&img, 0.5).get_pixel(0, 0).0[0];
        assert!(bright > plain, "{bright} should exceed {plain}");
        // 255 * sqrt(64/255) ≈ 127.7
        assert_eq!(bright, 128);
    }

    #[test]
    fn gamma_keeps_extremes_fixed() {
        let t = gamma_table(2.2);
        assert_eq!(t[0], 0);
        assert_eq!(t[255], 255);
    }
}
