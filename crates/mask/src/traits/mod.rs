use image::GrayImage;
use crate::types::{ComplexShape, TracedContour};

/// Trait for binary mask preprocessing (e.g. noise removal)
pub trait MaskPreprocessor: Send + Sync {
    fn preprocess(&self, mask: &GrayImage) -> GrayImage;
}

/// Trait for contour extraction algorithms
pub trait ContourExtractor: Send + Sync {
    /// Trace the borders of the filled regions of a binary mask
    fn extract_contours(&self, mask: &GrayImage) -> Vec<TracedContour>;
}

/// Trait for assembling traced borders into shapes with holes
pub trait HoleDetector: Send + Sync {
    fn detect_holes(&self, contours: Vec<TracedContour>) -> Vec<ComplexShape>;
}
