//! Canonical in-memory representation of a processed map.

mod georef;
mod layout;
mod legend;
mod map;
mod map_unit;

pub use georef::{Affine, GeoReference};
pub use layout::{AreaBoundary, Layout, LayoutZone};
pub use legend::Legend;
pub use map::{image_shape, CmaasMap, CmaasMapMetadata, OcrText, TextUnit};
pub use map_unit::{MapUnit, MapUnitSegmentation, MapUnitType, Provenance};
