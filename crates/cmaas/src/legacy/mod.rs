//! Loaders for on-disk legend and layout dialects.
//!
//! Each loader sniffs the dialect first and then dispatches to one pure
//! parser per dialect, so every format normalizes into the same
//! [`Legend`](crate::Legend) or [`Layout`](crate::Layout).

mod layout;
mod legend;

pub use layout::{load_layout_json, parse_layout_json, LayoutFormat};
pub use legend::{load_legend_json, parse_legend_json, LegendFormat, USGS_LEGACY_VERSIONS};
