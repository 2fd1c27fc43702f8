//! Wire types of the CDR results exchange schema.
//!
//! Field names follow the external schema exactly; absent optional text is
//! written as `""` and never as `null` by the exporter.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::features::CdrFeatureCollection;

/// Identifier written on every record the exporter creates.
pub const UNSET_ID: &str = "unset";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ModelProvenance {
    pub model: String,
    #[serde(default)]
    pub model_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PointProperties {
    pub model: String,
    #[serde(default)]
    pub model_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub bbox: Option<Vec<f64>>,
    #[serde(default)]
    pub dip: Option<i32>,
    #[serde(default)]
    pub dip_direction: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LineProperty {
    pub model: String,
    #[serde(default)]
    pub model_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub dash_pattern: String,
    #[serde(default)]
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PolygonProperty {
    pub model: String,
    #[serde(default)]
    pub model_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl PolygonProperty {
    pub fn new(model: impl Into<String>, model_version: impl Into<String>, confidence: Option<f64>) -> Self {
        Self {
            model: model.into(),
            model_version: model_version.into(),
            confidence,
        }
    }
}

pub type PointFeatureCollection = CdrFeatureCollection<PointProperties>;
pub type LineFeatureCollection = CdrFeatureCollection<LineProperty>;
pub type PolygonFeatureCollection = CdrFeatureCollection<PolygonProperty>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PointLegendAndFeaturesResult {
    pub id: String,
    #[serde(default)]
    pub legend_provenance: Option<ModelProvenance>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub abbreviation: String,
    #[serde(default)]
    pub description: String,
    /// `[x1, y1, x2, y2]` or empty
    #[serde(default)]
    pub legend_bbox: Vec<f64>,
    #[serde(default)]
    #[schemars(with = "Option<Value>")]
    pub point_features: Option<PointFeatureCollection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LineLegendAndFeaturesResult {
    pub id: String,
    #[serde(default)]
    pub legend_provenance: Option<ModelProvenance>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub abbreviation: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub legend_bbox: Vec<f64>,
    #[serde(default)]
    #[schemars(with = "Option<Value>")]
    pub line_features: Option<LineFeatureCollection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PolygonLegendAndFeaturesResult {
    pub id: String,
    #[serde(default)]
    pub legend_provenance: Option<ModelProvenance>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub abbreviation: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub legend_bbox: Vec<f64>,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub pattern: String,
    /// Associated geologic map units; never populated by the exporter
    #[serde(default)]
    pub map_units: Vec<Value>,
    #[serde(default)]
    #[schemars(with = "Option<Value>")]
    pub polygon_features: Option<PolygonFeatureCollection>,
}

/// Area categories understood by the converters. Anything else parses as
/// [`CdrAreaCategory::Other`] and is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CdrAreaCategory {
    MapArea,
    LinePointLegendArea,
    LineLegendArea,
    PointLegendArea,
    PolygonLegendArea,
    CrossSection,
    CorrelationDiagram,
    #[serde(other)]
    Other,
}

/// One area extraction embedded in a [`FeatureResults`] document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AreaExtraction {
    #[serde(rename = "type", default = "area_type")]
    pub area_type: String,
    /// Polygon rings in pixel space
    pub coordinates: Vec<Vec<[f64; 2]>>,
    #[serde(default)]
    pub bbox: Vec<f64>,
    pub category: CdrAreaCategory,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub model_version: String,
    #[serde(default)]
    pub text: Option<String>,
}

fn area_type() -> String {
    "area".to_string()
}

/// Top-level results document for one COG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FeatureResults {
    pub cog_id: String,
    #[serde(default)]
    pub line_feature_results: Option<Vec<LineLegendAndFeaturesResult>>,
    #[serde(default)]
    pub point_feature_results: Option<Vec<PointLegendAndFeaturesResult>>,
    #[serde(default)]
    pub polygon_feature_results: Option<Vec<PolygonLegendAndFeaturesResult>>,
    #[serde(default)]
    pub cog_area_extractions: Option<Vec<AreaExtraction>>,
    #[serde(default)]
    pub cog_metadata_extractions: Option<Vec<Value>>,
    pub system: String,
    pub system_version: String,
}

/// A single area extraction as returned by the CDR query endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AreaExtractionResponse {
    #[serde(default)]
    pub area_extraction_id: String,
    #[serde(default)]
    pub cog_id: String,
    pub category: CdrAreaCategory,
    #[serde(default)]
    pub px_bbox: Vec<f64>,
    #[serde(default)]
    #[schemars(with = "Option<Value>")]
    pub px_geojson: Option<geojson::Geometry>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
    pub system: String,
    #[serde(default)]
    pub system_version: String,
    #[serde(default)]
    pub validated: bool,
}

/// A single legend item as returned by the CDR query endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LegendItemResponse {
    #[serde(default)]
    pub legend_id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub abbreviation: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub pattern: String,
    /// `point`, `line` or `polygon`
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub px_bbox: Vec<f64>,
    #[serde(default)]
    #[schemars(with = "Option<Value>")]
    pub px_geojson: Option<geojson::Geometry>,
    #[serde(default)]
    pub confidence: Option<f64>,
    pub system: String,
    #[serde(default)]
    pub system_version: String,
    #[serde(default)]
    pub validated: bool,
}
