use imageproc::region_labelling::Connectivity;
use crate::{
    pipeline::Pipeline,
    traits::{MaskPreprocessor, ContourExtractor, HoleDetector},
    algorithms::{
        BinarizePreprocessor,
        BorderHoleDetector,
        ComponentContourExtractor,
        NoHoleDetector,
        SievePreprocessor,
    },
};

/// Pixel count below which a connected region is treated as noise
pub const DEFAULT_NOISE_THRESHOLD: u32 = 10;

/// Builder for creating processing pipelines with a fluent API
pub struct PipelineBuilder {
    preprocessors: Vec<Box<dyn MaskPreprocessor>>,
    contour_extractor: Option<Box<dyn ContourExtractor>>,
    hole_detector: Option<Box<dyn HoleDetector>>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            preprocessors: Vec::new(),
            contour_extractor: None,
            hole_detector: None,
        }
    }

    /// Add a preprocessor to the pipeline
    pub fn add_preprocessor<P>(mut self, preprocessor: P) -> Self
    where
        P: MaskPreprocessor + 'static,
    {
        self.preprocessors.push(Box::new(preprocessor));
        self
    }

    /// Set the contour extractor (replaces any existing one)
    pub fn set_contour_extractor<E>(mut self, extractor: E) -> Self
    where
        E: ContourExtractor + 'static,
    {
        self.contour_extractor = Some(Box::new(extractor));
        self
    }

    /// Set the hole detector (replaces any existing one)
    pub fn set_hole_detector<H>(mut self, detector: H) -> Self
    where
        H: HoleDetector + 'static,
    {
        self.hole_detector = Some(Box::new(detector));
        self
    }

    /// Drop 4-connected regions smaller than `min_size` pixels
    pub fn with_sieve(self, min_size: u32) -> Self {
        self.add_preprocessor(SievePreprocessor {
            min_size,
            connectivity: Connectivity::Four,
        })
    }

    /// Discard interior rings from the traced polygons
    pub fn exterior_only(self) -> Self {
        self.set_hole_detector(NoHoleDetector)
    }

    /// Build the pipeline with default components if not specified
    pub fn build(self) -> Pipeline {
        let contour_extractor = self.contour_extractor
            .unwrap_or_else(|| Box::new(ComponentContourExtractor::default()));

        let hole_detector = self.hole_detector
            .unwrap_or_else(|| Box::new(BorderHoleDetector));

        Pipeline::new(self.preprocessors, contour_extractor, hole_detector)
    }

    /// Sieve noise, then trace filled regions with 4-connectivity
    pub fn build_polygonizer(noise_threshold: u32) -> Pipeline {
        Self::new()
            .add_preprocessor(BinarizePreprocessor)
            .with_sieve(noise_threshold)
            .build()
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
