//! Mask to vector geometry generation for legend features.

use geo_types::{Geometry, Point};
use mask::{foreground_points, isolate_label, LabelMask, PipelineBuilder};
use tracing::{debug, warn};

use crate::types::{CmaasMap, Legend, MapUnitType, Provenance};

/// A label mask for one feature type, with the producer of the mask.
#[derive(Debug, Clone)]
pub struct MapSegmentation {
    pub provenance: Provenance,
    pub confidence: Option<f64>,
    /// Pixel value is the 1-based index among the legend's features of one type
    pub mask: LabelMask,
}

impl MapSegmentation {
    pub fn new(provenance: Provenance, confidence: Option<f64>, mask: LabelMask) -> Self {
        Self { provenance, confidence, mask }
    }
}

/// Label value of each feature of `unit_type`, in legend order.
fn labelled_features(legend: &Legend, unit_type: MapUnitType) -> Vec<(usize, u16)> {
    let mut labelled = Vec::new();
    let matching = legend
        .features
        .iter()
        .enumerate()
        .filter(|(_, feature)| feature.unit_type == unit_type);
    for (running, (position, _)) in matching.enumerate() {
        match u16::try_from(running + 1) {
            Ok(value) => labelled.push((position, value)),
            Err(_) => {
                warn!(%unit_type, position, "legend has more features than the mask can label");
                break;
            }
        }
    }
    labelled
}

fn polygonize_into(
    mask: &LabelMask,
    provenance: &Provenance,
    confidence: Option<f64>,
    legend: &mut Legend,
    noise_threshold: u32,
) {
    let pipeline = PipelineBuilder::build_polygonizer(noise_threshold);
    for (position, value) in labelled_features(legend, MapUnitType::Polygon) {
        let outline = pipeline.process_label(mask, value);
        let geometry: Vec<Geometry<f64>> = outline.to_geo_polygons().into_iter().map(Geometry::Polygon).collect();
        debug!(label = value, polygons = geometry.len(), "vectorized polygon feature");
        legend.features[position].set_geometry(provenance, confidence, geometry);
    }
}

fn collect_points_into(mask: &LabelMask, provenance: &Provenance, confidence: Option<f64>, legend: &mut Legend) {
    for (position, value) in labelled_features(legend, MapUnitType::Point) {
        let geometry: Vec<Geometry<f64>> = foreground_points(&isolate_label(mask, value))
            .into_iter()
            .map(|[x, y]| Geometry::Point(Point::new(x, y)))
            .collect();
        debug!(label = value, points = geometry.len(), "collected point feature");
        legend.features[position].set_geometry(provenance, confidence, geometry);
    }
}

/// Trace the polygons of every polygon feature in `legend`.
///
/// Connected regions smaller than `noise_threshold` pixels are discarded
/// before tracing. Rings follow pixel edges, so each polygon covers exactly
/// the pixels of its region.
pub fn generate_poly_geometry(segmentation: &MapSegmentation, legend: &mut Legend, noise_threshold: u32) {
    polygonize_into(
        &segmentation.mask,
        &segmentation.provenance,
        segmentation.confidence,
        legend,
        noise_threshold,
    )
}

/// Every labelled pixel of a point feature becomes one point.
pub fn generate_point_geometry(segmentation: &MapSegmentation, legend: &mut Legend) {
    collect_points_into(&segmentation.mask, &segmentation.provenance, segmentation.confidence, legend);
}

impl CmaasMap {
    /// Vectorize the polygon segmentation mask into the legend's polygon features.
    ///
    /// # Panics
    /// If the map has no polygon segmentation mask or no legend.
    pub fn generate_poly_geometry(&mut self, provenance: &Provenance, noise_threshold: u32) {
        let mask = self
            .poly_segmentation_mask
            .as_ref()
            .unwrap_or_else(|| panic!("map '{}' has no polygon segmentation mask", self.name));
        let legend = self
            .legend
            .as_mut()
            .unwrap_or_else(|| panic!("map '{}' has no legend", self.name));
        polygonize_into(mask, provenance, None, legend, noise_threshold)
    }

    /// Collect point geometry from the point segmentation mask.
    ///
    /// # Panics
    /// If the map has no point segmentation mask or no legend.
    pub fn generate_point_geometry(&mut self, provenance: &Provenance) {
        let mask = self
            .point_segmentation_mask
            .as_ref()
            .unwrap_or_else(|| panic!("map '{}' has no point segmentation mask", self.name));
        let legend = self
            .legend
            .as_mut()
            .unwrap_or_else(|| panic!("map '{}' has no legend", self.name));
        collect_points_into(mask, provenance, None, legend);
    }
}
