use image::{GrayImage, Luma};

/// Binomial approximation of a Gaussian, normalized by 16.
const KERNEL: [f32; 5] = [1.0, 4.0, 6.0, 4.0, 1.0];
const KERNEL_SUM: f32 = 16.0;

/// Separable 5-tap blur: horizontal pass then vertical pass, sampling
/// outside the buffer clamps to the nearest edge pixel.
pub fn blur(image: &GrayImage) -> Vec<f32> {
    let (w, h) = (image.width() as usize, image.height() as usize);
    let src = image.as_raw();

    let mut horizontal = vec![0f32; w * h];
    for y in 0..h {
        let row = &src[y * w..(y + 1) * w];
        for x in 0..w {
            let acc: f32 = KERNEL
                .iter()
                .enumerate()
                .map(|(i, k)| {
                    let sx = (x as isize + i as isize - 2).clamp(0, w as isize - 1) as usize;
                    k * row[sx] as f32
                })
                .sum();
            horizontal[y * w + x] = acc / KERNEL_SUM;
        }
    }

    let mut out = vec![0f32; w * h];
    for y in 0..h {
        for x in 0..w {
            let acc: f32 = KERNEL
                .iter()
                .enumerate()
                .map(|(i, k)| {
                    let sy = (y as isize + i as isize - 2).clamp(0, h as isize - 1) as usize;
                    k * horizontal[sy * w + x]
                })
                .sum();
            out[y * w + x] = acc / KERNEL_SUM;
        }
    }
    out
}

/// Unsharp mask: `y + amount * (y - blur(y))`, clamped to 0..=255.
pub fn apply(image: &GrayImage, amount: f32) -> GrayImage {
    if amount == 0.0 {
        return image.clone();
    }
    let blurred = blur(image);
    let width = image.width();
    GrayImage::from_fn(width, image.height(), |x, y| {
        let v = image.get_pixel(x, y).0[0] as f32;
        let b = blurred[(y * width + x) as usize];
        Luma([(v + amount * (v - b)).round().clamp(0.0, 255.0) as u8])
    })
}
