use serde::{Deserialize, Serialize};

use super::map_unit::Provenance;

/// One detected region of a layout zone, in pixel space (origin top left).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaBoundary {
    /// Polygons, each a ring of `[x, y]` pairs
    pub geometry: Vec<Vec<[f64; 2]>>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl AreaBoundary {
    pub fn new(geometry: Vec<Vec<[f64; 2]>>, confidence: Option<f64>) -> Self {
        Self { geometry, confidence }
    }
}

/// Semantic zones of a map image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutZone {
    Map,
    CorrelationDiagram,
    CrossSection,
    /// Shared legend area for points and lines; feeds both legends
    PointLineLegend,
    PointLegend,
    LineLegend,
    PolygonLegend,
}

impl LayoutZone {
    /// Zone names used by both generations of the legacy area-segmentation files.
    pub fn from_legacy_name(name: &str) -> Option<Self> {
        match name {
            "map" => Some(Self::Map),
            "correlation_diagram" => Some(Self::CorrelationDiagram),
            "cross_section" => Some(Self::CrossSection),
            "legend_points_lines" => Some(Self::PointLineLegend),
            "legend_points" => Some(Self::PointLegend),
            "legend_lines" => Some(Self::LineLegend),
            "legend_polygons" => Some(Self::PolygonLegend),
            _ => None,
        }
    }
}

/// Area segmentation of a map image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layout {
    pub provenance: Provenance,
    #[serde(default)]
    pub map: Vec<AreaBoundary>,
    #[serde(default)]
    pub point_legend: Vec<AreaBoundary>,
    #[serde(default)]
    pub line_legend: Vec<AreaBoundary>,
    #[serde(default)]
    pub polygon_legend: Vec<AreaBoundary>,
    #[serde(default)]
    pub correlation_diagram: Vec<AreaBoundary>,
    #[serde(default)]
    pub cross_section: Vec<AreaBoundary>,
}

impl Layout {
    pub fn new(provenance: Provenance) -> Self {
        Self {
            provenance,
            map: Vec::new(),
            point_legend: Vec::new(),
            line_legend: Vec::new(),
            polygon_legend: Vec::new(),
            correlation_diagram: Vec::new(),
            cross_section: Vec::new(),
        }
    }

    /// Append a boundary to the zone's list(s). Every zone accumulates,
    /// including `Map`; see [`Layout::offer_map_area`] for best-only selection.
    pub fn push_zone(&mut self, zone: LayoutZone, boundary: AreaBoundary) {
        match zone {
            LayoutZone::Map => self.map.push(boundary),
            LayoutZone::CorrelationDiagram => self.correlation_diagram.push(boundary),
            LayoutZone::CrossSection => self.cross_section.push(boundary),
            LayoutZone::PointLineLegend => {
                self.point_legend.push(boundary.clone());
                self.line_legend.push(boundary);
            }
            LayoutZone::PointLegend => self.point_legend.push(boundary),
            LayoutZone::LineLegend => self.line_legend.push(boundary),
            LayoutZone::PolygonLegend => self.polygon_legend.push(boundary),
        }
    }

    /// Keep only the highest-confidence map area. A candidate replaces the
    /// kept boundary only when its confidence is strictly greater; missing
    /// confidences count as 0.
    pub fn offer_map_area(&mut self, boundary: AreaBoundary) {
        let incoming = boundary.confidence.unwrap_or(0.0);
        match self.map.first() {
            Some(kept) if incoming <= kept.confidence.unwrap_or(0.0) => {}
            _ => self.map = vec![boundary],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
            && self.point_legend.is_empty()
            && self.line_legend.is_empty()
            && self.polygon_legend.is_empty()
            && self.correlation_diagram.is_empty()
            && self.cross_section.is_empty()
    }
}

/// Compares every zone in order. Provenance is not compared.
impl PartialEq for Layout {
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
            && self.correlation_diagram == other.correlation_diagram
            && self.cross_section == other.cross_section
            && self.point_legend == other.point_legend
            && self.line_legend == other.line_legend
            && self.polygon_legend == other.polygon_legend
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boundary(confidence: Option<f64>) -> AreaBoundary {
        AreaBoundary::new(vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]], confidence)
    }

    #[test]
    fn test_point_line_legend_feeds_both() {
        let mut layout = Layout::new(Provenance::new("test", None));
        layout.push_zone(LayoutZone::PointLineLegend, boundary(Some(0.7)));
        assert_eq!(layout.point_legend, layout.line_legend);
        assert_eq!(layout.point_legend.len(), 1);
        assert!(layout.polygon_legend.is_empty());
    }

    #[test]
    fn test_offer_map_area_keeps_strictly_greater() {
        let mut layout = Layout::new(Provenance::new("test", None));
        layout.offer_map_area(boundary(Some(0.5)));
        layout.offer_map_area(boundary(Some(0.9)));
        layout.offer_map_area(boundary(Some(0.3)));
        assert_eq!(layout.map, vec![boundary(Some(0.9))]);

        // Equal confidence does not replace
        let mut tied = AreaBoundary::new(vec![vec![[5.0, 5.0]]], Some(0.9));
        layout.offer_map_area(tied.clone());
        assert_eq!(layout.map, vec![boundary(Some(0.9))]);

        tied.confidence = Some(0.95);
        layout.offer_map_area(tied.clone());
        assert_eq!(layout.map, vec![tied]);
    }

    #[test]
    fn test_offer_map_area_missing_confidence_is_zero() {
        let mut layout = Layout::new(Provenance::new("test", None));
        layout.offer_map_area(boundary(None));
        assert_eq!(layout.map.len(), 1);
        layout.offer_map_area(boundary(Some(0.0)));
        assert_eq!(layout.map, vec![boundary(None)]);
        layout.offer_map_area(boundary(Some(0.1)));
        assert_eq!(layout.map, vec![boundary(Some(0.1))]);
    }

    #[test]
    fn test_legacy_zone_names() {
        assert_eq!(LayoutZone::from_legacy_name("legend_polygons"), Some(LayoutZone::PolygonLegend));
        assert_eq!(LayoutZone::from_legacy_name("map"), Some(LayoutZone::Map));
        assert_eq!(LayoutZone::from_legacy_name("title"), None);
    }

    #[test]
    fn test_layout_equality_ignores_provenance() {
        let mut a = Layout::new(Provenance::new("Uncharted", Some("0.1")));
        a.push_zone(LayoutZone::Map, boundary(Some(0.9)));
        let mut b = Layout::new(Provenance::new("uiuc", Some("0.4.6")));
        b.push_zone(LayoutZone::Map, boundary(Some(0.9)));
        assert_eq!(a, b);

        b.push_zone(LayoutZone::PolygonLegend, boundary(None));
        assert_ne!(a, b);
    }
}
