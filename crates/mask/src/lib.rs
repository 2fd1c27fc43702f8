//! # Label Mask Vectorization
//!
//! Turns integer-labeled segmentation rasters into vector geometry.
//! A label mask stores, per pixel, the 1-based index of the legend entry the
//! pixel belongs to; this crate isolates one label at a time and traces its
//! filled regions into polygons (with holes) or collects its pixels as points.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mask::{LabelMask, PipelineBuilder};
//!
//! let labels = LabelMask::new(100, 100);
//! let pipeline = PipelineBuilder::build_polygonizer(10);
//! let outline = pipeline.process_label(&labels, 1);
//! println!("{} regions", outline.shapes.len());
//! ```

pub mod types;
pub mod traits;
pub mod algorithms;
pub mod pipeline;
pub mod crop;

pub use types::{ComplexShape, ComputedOutline, LabelMask, TracedContour, isolate_label};
pub use traits::*;
pub use algorithms::*;
pub use pipeline::{Pipeline, builder::{PipelineBuilder, DEFAULT_NOISE_THRESHOLD}};
pub use crop::mask_and_crop;

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Area;
    use image::{GrayImage, Luma};

    fn blob_mask() -> LabelMask {
        // 8 pixel blob and 3 pixel blob, both labeled 1
        let mut mask = LabelMask::new(10, 10);
        for x in 1..5 {
            for y in 1..3 {
                mask.put_pixel(x, y, Luma([1]));
            }
        }
        for x in 6..9 {
            mask.put_pixel(x, 7, Luma([1]));
        }
        mask.put_pixel(0, 9, Luma([2]));
        mask
    }

    #[test]
    fn test_noise_threshold_filters_small_blob() {
        let pipeline = PipelineBuilder::build_polygonizer(5);
        let result = pipeline.process_label(&blob_mask(), 1);
        assert_eq!(result.shapes.len(), 1);
        assert_eq!(result.image_width, 10);
        assert_eq!(result.image_height, 10);
    }

    #[test]
    fn test_low_threshold_keeps_both_blobs() {
        let pipeline = PipelineBuilder::build_polygonizer(2);
        let result = pipeline.process_label(&blob_mask(), 1);
        assert_eq!(result.shapes.len(), 2);
    }

    #[test]
    fn test_empty_label_yields_no_shapes() {
        let pipeline = PipelineBuilder::build_polygonizer(DEFAULT_NOISE_THRESHOLD);
        let result = pipeline.process_label(&blob_mask(), 7);
        assert!(result.shapes.is_empty());
    }

    #[test]
    fn test_holes_are_kept_unless_exterior_only() {
        let mut mask = GrayImage::new(12, 12);
        for x in 1..10 {
            for y in 1..10 {
                if !(4..7).contains(&x) || !(4..7).contains(&y) {
                    mask.put_pixel(x, y, Luma([255]));
                }
            }
        }

        let with_holes = Pipeline::builder().build().process(&mask);
        assert_eq!(with_holes.shapes.len(), 1);
        assert!(with_holes.shapes[0].has_holes());

        let exterior = Pipeline::builder().exterior_only().build().process(&mask);
        assert_eq!(exterior.shapes.len(), 1);
        assert!(!exterior.shapes[0].has_holes());
    }

    #[test]
    fn test_polygon_area_matches_pixel_count() {
        let mut labels = LabelMask::new(6, 6);
        for x in 1..3 {
            for y in 1..3 {
                labels.put_pixel(x, y, Luma([1]));
            }
        }
        for x in 0..6 {
            labels.put_pixel(x, 5, Luma([2]));
        }

        let pipeline = PipelineBuilder::build_polygonizer(1);
        let block = pipeline.process_label(&labels, 1).to_geo_polygons();
        assert_eq!(block.len(), 1);
        assert_eq!(block[0].unsigned_area(), 4.0);

        let strip = pipeline.process_label(&labels, 2).to_geo_polygons();
        assert_eq!(strip.len(), 1);
        assert_eq!(strip[0].unsigned_area(), 6.0);
    }

    #[test]
    fn test_single_pixel_becomes_closed_square() {
        let mut labels = LabelMask::new(5, 5);
        labels.put_pixel(2, 2, Luma([1]));

        let polygons = PipelineBuilder::build_polygonizer(1).process_label(&labels, 1).to_geo_polygons();
        assert_eq!(polygons.len(), 1);
        let exterior = polygons[0].exterior();
        assert_eq!(exterior.0.len(), 5);
        assert!(exterior.is_closed());
        assert_eq!(polygons[0].unsigned_area(), 1.0);
    }
}
