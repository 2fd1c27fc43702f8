use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{CmaasError, Result};
use crate::types::{AreaBoundary, Layout, LayoutZone, Provenance};

/// Layout document dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutFormat {
    /// Single JSON array of `{name, bounds, confidence}` sections
    UnchartedV1,
    /// Newline-delimited records tagged `"name": "segmentation"`
    UnchartedV2,
    /// Serialized [`Layout`]
    Current,
}

impl LayoutFormat {
    /// Decide the dialect from the first non-blank line.
    pub fn sniff(content: &str) -> Self {
        let first_line = content.lines().map(str::trim).find(|line| !line.is_empty());
        let Some(first_line) = first_line else {
            return Self::UnchartedV1;
        };

        if let Ok(Value::Object(record)) = serde_json::from_str::<Value>(first_line) {
            if record.get("name").and_then(Value::as_str) == Some("segmentation") {
                return Self::UnchartedV2;
            }
        }

        if content.trim_start().starts_with('{') {
            Self::Current
        } else {
            Self::UnchartedV1
        }
    }
}

#[derive(Debug, Deserialize)]
struct V1Section {
    name: String,
    bounds: Vec<[f64; 2]>,
    #[serde(default)]
    confidence: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct V2Record {
    model: V2Model,
    bounds: Vec<[f64; 2]>,
    #[serde(default)]
    confidence: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct V2Model {
    field: String,
}

pub fn load_layout_json(path: impl AsRef<Path>) -> Result<Layout> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(CmaasError::file_io(path))?;
    let layout = parse_layout_json(&content)?;
    debug!(path = %path.display(), provenance = %layout.provenance, "loaded layout");
    Ok(layout)
}

pub fn parse_layout_json(content: &str) -> Result<Layout> {
    let format = LayoutFormat::sniff(content);
    let (provenance, sections) = match format {
        LayoutFormat::Current => {
            return serde_json::from_str(content).map_err(CmaasError::schema("layout"));
        }
        LayoutFormat::UnchartedV1 => (
            Provenance::new("Uncharted", Some("0.1")),
            serde_json::from_str::<Vec<V1Section>>(content)
                .map_err(CmaasError::schema("uncharted layout v1"))?
                .into_iter()
                .map(|section| (section.name, section.bounds, section.confidence))
                .collect::<Vec<_>>(),
        ),
        LayoutFormat::UnchartedV2 => (
            Provenance::new("Uncharted", Some("0.2")),
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(|line| {
                    serde_json::from_str::<V2Record>(line)
                        .map(|record| (record.model.field, record.bounds, record.confidence))
                        .map_err(CmaasError::schema("uncharted layout v2"))
                })
                .collect::<Result<Vec<_>>>()?,
        ),
    };

    let mut layout = Layout::new(provenance);
    for (name, bounds, confidence) in sections {
        match LayoutZone::from_legacy_name(&name) {
            Some(zone) => layout.push_zone(zone, AreaBoundary::new(vec![bounds], confidence)),
            None => warn!(zone = %name, "dropping unrecognised layout zone"),
        }
    }
    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const V1: &str = r#"[
        {"name": "map", "bounds": [[0, 0], [100, 0], [100, 100], [0, 100]], "confidence": 0.95},
        {"name": "legend_points_lines", "bounds": [[110, 0], [150, 0], [150, 40]], "confidence": 0.8},
        {"name": "legend_polygons", "bounds": [[110, 50], [150, 50], [150, 90]], "confidence": 0.7},
        {"name": "legend_polygons", "bounds": [[160, 50], [190, 50], [190, 90]], "confidence": 0.6},
        {"name": "title", "bounds": [[0, 0], [1, 1]], "confidence": 0.5}
    ]"#;

    const V2: &str = concat!(
        r#"{"name": "segmentation", "model": {"field": "map"}, "bounds": [[0, 0], [10, 0], [10, 10]], "confidence": 0.9}"#,
        "\n",
        r#"{"name": "segmentation", "model": {"field": "cross_section"}, "bounds": [[20, 20], [30, 20], [30, 30]], "confidence": 0.4}"#,
        "\n\n",
    );

    #[test]
    fn test_sniffing() {
        assert_eq!(LayoutFormat::sniff(V1), LayoutFormat::UnchartedV1);
        assert_eq!(LayoutFormat::sniff(V2), LayoutFormat::UnchartedV2);
        assert_eq!(
            LayoutFormat::sniff("{\n  \"provenance\": {\"name\": \"x\"}\n}"),
            LayoutFormat::Current
        );
    }

    #[test]
    fn test_v1_zone_aliasing_and_accumulation() {
        let layout = parse_layout_json(V1).expect("Should parse v1");
        assert_eq!(layout.provenance, Provenance::new("Uncharted", Some("0.1")));

        assert_eq!(layout.point_legend.len(), 1);
        assert_eq!(layout.point_legend, layout.line_legend);
        assert_eq!(layout.point_legend[0].confidence, Some(0.8));

        assert_eq!(layout.polygon_legend.len(), 2);
        assert_eq!(layout.map.len(), 1);
        assert_eq!(layout.map[0].geometry[0].len(), 4);
        assert!(layout.correlation_diagram.is_empty());
    }

    #[test]
    fn test_v2_records() {
        let layout = parse_layout_json(V2).expect("Should parse v2");
        assert_eq!(layout.provenance, Provenance::new("Uncharted", Some("0.2")));
        assert_eq!(layout.map.len(), 1);
        assert_eq!(layout.cross_section[0].confidence, Some(0.4));
    }

    #[test]
    fn test_current_schema_roundtrip() {
        let original = parse_layout_json(V1).expect("Should parse v1");
        let json = serde_json::to_string_pretty(&original).expect("Should serialize");
        let reloaded = parse_layout_json(&json).expect("Should parse current");
        assert_eq!(original, reloaded);
    }

    #[test]
    fn test_malformed_v2_line_is_schema_error() {
        let content = format!("{V2}{{\"name\": \"segmentation\", \"bounds\": []}}\n");
        let err = parse_layout_json(&content).expect_err("Should reject record without model");
        assert!(matches!(err, CmaasError::Schema { kind: "uncharted layout v2", .. }));
    }

    #[test]
    fn test_load_layout_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("Should create temp file");
        file.write_all(V1.as_bytes()).expect("Should write fixture");
        let layout = load_layout_json(file.path()).expect("Should load");
        assert_eq!(layout.polygon_legend.len(), 2);
    }
}
