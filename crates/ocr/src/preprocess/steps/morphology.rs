use image::GrayImage;
use imageproc::distance_transform::Norm;
use imageproc::morphology;

/// 3x3 closing (max filter, then min filter) on a binary image. Pixels beyond
/// the border take no part, which matches clamped sampling for max/min.
pub fn close(image: &GrayImage) -> GrayImage {
    morphology::close(image, Norm::LInf, 1)
}
