pub mod builder;

use image::GrayImage;
use crate::{
    types::{ComputedOutline, LabelMask, isolate_label},
    traits::{MaskPreprocessor, ContourExtractor, HoleDetector},
};

/// A pipeline turning a binary mask into filled-region polygons
pub struct Pipeline {
    preprocessors: Vec<Box<dyn MaskPreprocessor>>,
    contour_extractor: Box<dyn ContourExtractor>,
    hole_detector: Box<dyn HoleDetector>,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> builder::PipelineBuilder {
        builder::PipelineBuilder::new()
    }

    pub fn new(
        preprocessors: Vec<Box<dyn MaskPreprocessor>>,
        contour_extractor: Box<dyn ContourExtractor>,
        hole_detector: Box<dyn HoleDetector>,
    ) -> Self {
        Self {
            preprocessors,
            contour_extractor,
            hole_detector,
        }
    }

    /// Process a binary mask through the entire pipeline
    pub fn process(&self, mask: &GrayImage) -> ComputedOutline {
        let mut processed = mask.clone();
        for preprocessor in &self.preprocessors {
            processed = preprocessor.preprocess(&processed);
        }

        let contours = self.contour_extractor.extract_contours(&processed);

        let mut shapes = self.hole_detector.detect_holes(contours);
        shapes.retain(|shape| !shape.exterior.is_empty());

        ComputedOutline {
            shapes,
            image_width: mask.width(),
            image_height: mask.height(),
        }
    }

    /// Vectorize the pixels of a label mask equal to `value`
    pub fn process_label(&self, mask: &LabelMask, value: u16) -> ComputedOutline {
        self.process(&isolate_label(mask, value))
    }
}
