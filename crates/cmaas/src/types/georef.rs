use geo::{AffineOps, AffineTransform};
use geo_types::Geometry;
use serde::{Deserialize, Serialize};

use super::map_unit::Provenance;

/// Six-parameter affine transform in GDAL/rasterio order:
/// `x' = a*x + b*y + c`, `y' = d*x + e*y + f`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Affine {
    pub fn identity() -> Self {
        Self { a: 1.0, b: 0.0, c: 0.0, d: 0.0, e: 1.0, f: 0.0 }
    }

    pub fn to_geo(self) -> AffineTransform<f64> {
        AffineTransform::new(self.a, self.b, self.c, self.d, self.e, self.f)
    }
}

/// Georeferencing information for a map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoReference {
    pub provenance: Provenance,
    /// Coordinate reference system identifier, e.g. `EPSG:4326`
    #[serde(default)]
    pub crs: Option<String>,
    #[serde(default)]
    pub transform: Option<Affine>,
}

impl GeoReference {
    pub fn new(provenance: Provenance, crs: Option<String>, transform: Option<Affine>) -> Self {
        Self { provenance, crs, transform }
    }

    fn is_complete(&self) -> bool {
        self.crs.is_some() && self.transform.is_some()
    }

    /// Map pixel geometry into world coordinates. `None` without a transform.
    pub fn to_world(&self, geometry: &Geometry<f64>) -> Option<Geometry<f64>> {
        let transform = self.transform?.to_geo();
        Some(geometry.affine_transform(&transform))
    }
}

/// Null tolerant: references are only compared when both carry a crs and a
/// transform. Anything less complete is considered equal.
impl PartialEq for GeoReference {
    fn eq(&self, other: &Self) -> bool {
        if self.is_complete() && other.is_complete() {
            return self.crs == other.crs && self.transform == other.transform;
        }
        true
    }
}
