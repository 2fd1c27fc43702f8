use image::{GrayImage, ImageBuffer, Luma};
use serde::{Deserialize, Serialize};
use geo_types::{Coord, LineString, Polygon};

/// Single band raster whose pixel values are 1-based legend indices (0 is background).
pub type LabelMask = ImageBuffer<Luma<u16>, Vec<u16>>;

/// Value written for foreground pixels in binary masks.
pub const FOREGROUND: u8 = 255;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputedOutline {
    /// Separate filled regions found in the mask
    pub shapes: Vec<ComplexShape>,
    /// Original mask dimensions
    pub image_width: u32,
    pub image_height: u32,
}

impl ComputedOutline {
    /// Convert every shape to a geo-types polygon in pixel space
    pub fn to_geo_polygons(&self) -> Vec<Polygon<f64>> {
        self.shapes.iter().map(ComplexShape::to_geo_polygon).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexShape {
    /// The exterior boundary of the region (outer contour)
    pub exterior: Vec<[f64; 2]>,
    /// Interior boundaries (background enclosed by the region)
    pub holes: Vec<Vec<[f64; 2]>>,
}

/// A traced border, tagged with its role in the region topology.
#[derive(Debug, Clone, PartialEq)]
pub struct TracedContour {
    pub points: Vec<[f64; 2]>,
    pub is_hole: bool,
    /// Index of the enclosing contour in the same extraction result
    pub parent: Option<usize>,
}

fn ring(points: &[[f64; 2]]) -> LineString<f64> {
    LineString::new(points.iter().map(|&[x, y]| Coord { x, y }).collect())
}

impl ComplexShape {
    /// Convert to geo-types Polygon for geometric operations
    pub fn to_geo_polygon(&self) -> Polygon<f64> {
        let holes = self.holes.iter().map(|hole| ring(hole)).collect();
        Polygon::new(ring(&self.exterior), holes)
    }

    pub fn has_holes(&self) -> bool {
        !self.holes.is_empty()
    }
}

/// Binary mask of the pixels in `mask` equal to `value`.
pub fn isolate_label(mask: &LabelMask, value: u16) -> GrayImage {
    GrayImage::from_fn(mask.width(), mask.height(), |x, y| {
        if mask.get_pixel(x, y)[0] == value {
            Luma([FOREGROUND])
        } else {
            Luma([0])
        }
    })
}
