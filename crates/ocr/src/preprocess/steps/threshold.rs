use image::{GrayImage, Luma};

/// Mean luminance of each `tile_size` square; the last column and row of
/// tiles may be narrower.
#[derive(Debug, Clone)]
pub struct TileMeanGrid {
    tile_size: u32,
    cols: u32,
    rows: u32,
    means: Vec<f32>,
}

impl TileMeanGrid {
    pub fn compute(image: &GrayImage, tile_size: u32) -> Self {
        let (w, h) = image.dimensions();
        let cols = w.div_ceil(tile_size);
        let rows = h.div_ceil(tile_size);
        let mut sums = vec![0u64; (cols * rows) as usize];
        let mut counts = vec![0u32; (cols * rows) as usize];

        for (x, y, p) in image.enumerate_pixels() {
            let idx = ((y / tile_size) * cols + x / tile_size) as usize;
            sums[idx] += p.0[0] as u64;
            counts[idx] += 1;
        }

        let means = sums
            .iter()
            .zip(&counts)
            .map(|(&s, &c)| if c == 0 { 0.0 } else { s as f32 / c as f32 })
            .collect();

        Self { tile_size, cols, rows, means }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.cols, self.rows)
    }

    /// Mean of the tile containing pixel `(x, y)`.
    pub fn mean_at(&self, x: u32, y: u32) -> f32 {
        let col = x / self.tile_size;
        let row = y / self.tile_size;
        self.means[(row * self.cols + col) as usize]
    }
}

/// Per-tile adaptive threshold: white where `y >= tile_mean - offset`.
pub fn apply(image: &GrayImage, tile_size: u32, offset: i32) -> GrayImage {
    let grid = TileMeanGrid::compute(image, tile_size);
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let v = image.get_pixel(x, y).0[0] as f32;
        if v >= grid.mean_at(x, y) - offset as f32 {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}
