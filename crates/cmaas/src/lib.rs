//! # CMAAS map data model
//!
//! Canonical representation of a processed geological map (image, legend,
//! layout, georeference, OCR text and segmentation masks), with loaders for
//! the historical legend and layout dialects and converters to and from the
//! CDR results exchange schema.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cmaas::{export_map_to_cdr, load_cmaas_map_from_files, save_cdr_feature_results};
//! use std::path::Path;
//!
//! let map = load_cmaas_map_from_files(
//!     "maps/AK_Dillingham.tif",
//!     Some(Path::new("legends/AK_Dillingham.json")),
//!     None,
//! )?;
//! let results = export_map_to_cdr(&map, "cog-id", "uiuc", "0.1");
//! save_cdr_feature_results("AK_Dillingham_cdr.json", &results)?;
//! # Ok::<(), cmaas::CmaasError>(())
//! ```

pub mod cdr;
pub mod error;
pub mod geometry;
pub mod io;
pub mod legacy;
pub mod raster;
pub mod types;

pub use cdr::{
    convert_cdr_area_extraction_to_layout, convert_cdr_feature_results_to_cmaas_map,
    convert_cdr_legend_items_to_legend, export_map_to_cdr, load_cdr_feature_results, save_cdr_feature_results,
    FeatureResults,
};
pub use error::{CmaasError, Result};
pub use geometry::{generate_point_geometry, generate_poly_geometry, MapSegmentation};
pub use io::{load_cmaas_map_from_files, load_layouts, load_legends};
pub use legacy::{load_layout_json, load_legend_json};
pub use mask::{LabelMask, DEFAULT_NOISE_THRESHOLD};
pub use raster::{load_image, load_label_mask, save_label_mask, GeoRaster, ImageRasterIo, RasterIo};
pub use types::*;
