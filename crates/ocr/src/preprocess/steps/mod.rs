//! Individual binarization stages, in pipeline order

pub mod resize;
pub mod luminance;
pub mod sharpen;
pub mod threshold;
pub mod morphology;
