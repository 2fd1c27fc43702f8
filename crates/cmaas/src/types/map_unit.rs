use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use geo_types::Geometry;
use mask::LabelMask;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoStaticStr};

/// The kind of map feature a legend entry describes.
///
/// Parsing never fails: upstream label vocabularies are uncontrolled, so any
/// token that is not a recognised spelling becomes [`MapUnitType::Unknown`].
#[derive(
    Debug, Clone, Copy, Default,
    PartialEq, Eq, Hash,
    Serialize, Deserialize,
    EnumIter, IntoStaticStr,
)]
#[serde(from = "String", into = "&'static str")]
#[strum(serialize_all = "lowercase")]
pub enum MapUnitType {
    #[strum(serialize = "pt")]
    Point,
    Line,
    #[strum(serialize = "poly")]
    Polygon,
    #[default]
    Unknown,
}

impl MapUnitType {
    /// Every type, including `Unknown`. The default type filter.
    pub const ALL: [MapUnitType; 4] = [Self::Point, Self::Line, Self::Polygon, Self::Unknown];

    /// The three geometric types.
    pub const ALL_KNOWN: [MapUnitType; 3] = [Self::Point, Self::Line, Self::Polygon];

    /// Case-insensitive parse of either the short or the long spelling.
    pub fn from_token(token: &str) -> Self {
        match token.to_ascii_lowercase().as_str() {
            "pt" | "point" => Self::Point,
            "line" => Self::Line,
            "poly" | "polygon" => Self::Polygon,
            _ => Self::Unknown,
        }
    }

    /// Short token: `pt`, `line`, `poly` or `unknown`.
    pub fn to_str(self) -> &'static str {
        self.into()
    }

    /// Long token: `point`, `line`, `polygon` or `unknown`.
    pub fn to_long_str(self) -> &'static str {
        match self {
            Self::Point => "point",
            Self::Line => "line",
            Self::Polygon => "polygon",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }
}

impl FromStr for MapUnitType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_token(s))
    }
}

impl From<&str> for MapUnitType {
    fn from(token: &str) -> Self {
        Self::from_token(token)
    }
}

impl From<String> for MapUnitType {
    fn from(token: String) -> Self {
        Self::from_token(&token)
    }
}

impl fmt::Display for MapUnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// The producing model or system of a derived datum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Provenance {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
}

impl Provenance {
    pub fn new(name: impl Into<String>, version: Option<&str>) -> Self {
        Self {
            name: name.into(),
            version: version.map(str::to_string),
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{} {}", self.name, version),
            None => f.write_str(&self.name),
        }
    }
}

/// Segmentation result attached to one legend entry.
///
/// Normally only one of `mask` or `geometry` is populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapUnitSegmentation {
    pub provenance: Provenance,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(skip)]
    pub mask: Option<LabelMask>,
    /// Polygons or points in pixel space
    #[serde(default)]
    pub geometry: Option<Vec<Geometry<f64>>>,
}

impl MapUnitSegmentation {
    pub fn new(provenance: Provenance, confidence: Option<f64>) -> Self {
        Self {
            provenance,
            confidence,
            mask: None,
            geometry: None,
        }
    }
}

/// One legend entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapUnit {
    #[serde(rename = "type")]
    pub unit_type: MapUnitType,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub label_confidence: Option<f64>,
    /// Pixel polygon around the label, origin top left
    #[serde(default)]
    pub label_bbox: Option<Vec<[f64; 2]>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub description_confidence: Option<f64>,
    #[serde(default)]
    pub description_bbox: Option<Vec<[f64; 2]>>,
    #[serde(default)]
    pub abbreviation: Option<String>,
    #[serde(default)]
    pub aliases: Option<Vec<String>>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub overlay: bool,
    #[serde(default)]
    pub segmentation: Option<MapUnitSegmentation>,
}

impl MapUnit {
    pub fn new(unit_type: MapUnitType) -> Self {
        Self {
            unit_type,
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Attach geometry, keeping an existing segmentation's provenance and confidence.
    pub fn set_geometry(&mut self, provenance: &Provenance, confidence: Option<f64>, geometry: Vec<Geometry<f64>>) {
        match &mut self.segmentation {
            Some(segmentation) => segmentation.geometry = Some(geometry),
            None => {
                let mut segmentation = MapUnitSegmentation::new(provenance.clone(), confidence);
                segmentation.geometry = Some(geometry);
                self.segmentation = Some(segmentation);
            }
        }
    }
}

/// Compares the descriptive fields only; segmentation and confidences are ignored.
impl PartialEq for MapUnit {
    fn eq(&self, other: &Self) -> bool {
        self.unit_type == other.unit_type
            && self.label == other.label
            && self.abbreviation == other.abbreviation
            && self.description == other.description
            && self.color == other.color
            && self.pattern == other.pattern
            && self.overlay == other.overlay
            && self.label_bbox == other.label_bbox
    }
}

impl fmt::Display for MapUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MapUnit{{'{}' ({})}}", self.label.as_deref().unwrap_or(""), self.unit_type)
    }
}
