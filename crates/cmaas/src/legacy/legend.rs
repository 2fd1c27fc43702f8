use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{CmaasError, Result};
use crate::types::{Legend, MapUnit, MapUnitType, Provenance};

/// Legend file versions written by the USGS labelling tool.
pub const USGS_LEGACY_VERSIONS: [&str; 2] = ["5.0.1", "5.0.2"];

/// Legend document dialect, sniffed from the `version` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegendFormat {
    /// Flat list of labelled shapes with the unit type encoded in the label
    UsgsLegacy { version: String },
    /// Serialized [`Legend`]
    Current,
}

impl LegendFormat {
    pub fn sniff(document: &Value) -> Self {
        match document.get("version").and_then(Value::as_str) {
            Some(version) if USGS_LEGACY_VERSIONS.contains(&version) => Self::UsgsLegacy {
                version: version.to_string(),
            },
            _ => Self::Current,
        }
    }
}

#[derive(Debug, Deserialize)]
struct UsgsLegendFile {
    #[serde(default)]
    shapes: Vec<UsgsShape>,
}

#[derive(Debug, Deserialize)]
struct UsgsShape {
    label: String,
    #[serde(default)]
    points: Vec<[f64; 2]>,
    #[serde(default)]
    aliases: Option<Vec<String>>,
}

/// Load a legend file of any supported dialect.
///
/// `type_filter` only applies to the legacy dialect, where it is applied
/// while the shapes are normalized.
pub fn load_legend_json(path: impl AsRef<Path>, type_filter: &[MapUnitType]) -> Result<Legend> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(CmaasError::file_io(path))?;
    let legend = parse_legend_json(&content, type_filter)?;
    debug!(path = %path.display(), features = legend.len(), "loaded legend");
    Ok(legend)
}

/// Parse a legend document of any supported dialect.
pub fn parse_legend_json(content: &str, type_filter: &[MapUnitType]) -> Result<Legend> {
    let document: Value = serde_json::from_str(content).map_err(CmaasError::schema("legend"))?;
    match LegendFormat::sniff(&document) {
        LegendFormat::UsgsLegacy { version } => {
            debug!(%version, "parsing legacy USGS legend");
            parse_usgs_legend(document, &version, type_filter)
        }
        LegendFormat::Current => serde_json::from_value(document).map_err(CmaasError::schema("legend")),
    }
}

fn parse_usgs_legend(document: Value, version: &str, type_filter: &[MapUnitType]) -> Result<Legend> {
    let file: UsgsLegendFile = serde_json::from_value(document).map_err(CmaasError::schema("USGS legend"))?;

    let mut legend = Legend::new(Provenance::new("USGS", Some(version)));
    for shape in file.shapes {
        let unit_type = MapUnitType::from_token(shape.label.rsplit('_').next().unwrap_or_default());
        if !type_filter.contains(&unit_type) {
            continue;
        }

        let aliases = shape
            .aliases
            .map(|aliases| aliases.iter().map(|alias| strip_type_suffix(alias, unit_type)).collect());

        legend.features.push(MapUnit {
            label: Some(strip_type_suffix(&shape.label, unit_type)),
            aliases,
            label_bbox: Some(shape.points.iter().map(|&[x, y]| [x.trunc(), y.trunc()]).collect()),
            ..MapUnit::new(unit_type)
        });
    }
    Ok(legend)
}

/// `Sand_and_gravel_poly` becomes `Sand and gravel`. Labels without a
/// recognised type code are returned unchanged.
fn strip_type_suffix(label: &str, unit_type: MapUnitType) -> String {
    if !unit_type.is_known() {
        return label.to_string();
    }
    let tokens: Vec<&str> = label.split('_').collect();
    tokens[..tokens.len() - 1].join(" ")
}
