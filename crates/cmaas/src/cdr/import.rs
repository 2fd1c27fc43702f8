use tracing::{debug, warn};

use super::schema::{AreaExtraction, AreaExtractionResponse, CdrAreaCategory, FeatureResults, LegendItemResponse};
use crate::types::{AreaBoundary, CmaasMap, Layout, LayoutZone, Legend, MapUnit, MapUnitType, Provenance};

impl CdrAreaCategory {
    pub fn zone(self) -> Option<LayoutZone> {
        match self {
            Self::MapArea => Some(LayoutZone::Map),
            Self::LinePointLegendArea => Some(LayoutZone::PointLineLegend),
            Self::LineLegendArea => Some(LayoutZone::LineLegend),
            Self::PointLegendArea => Some(LayoutZone::PointLegend),
            Self::PolygonLegendArea => Some(LayoutZone::PolygonLegend),
            Self::CrossSection => Some(LayoutZone::CrossSection),
            Self::CorrelationDiagram => Some(LayoutZone::CorrelationDiagram),
            Self::Other => None,
        }
    }
}

/// Route one boundary into the layout. Map areas compete on confidence,
/// every other zone accumulates.
fn place_area(layout: &mut Layout, category: CdrAreaCategory, boundary: AreaBoundary) {
    match category.zone() {
        Some(LayoutZone::Map) => layout.offer_map_area(boundary),
        Some(zone) => layout.push_zone(zone, boundary),
        None => warn!(?category, "dropping area of unrecognised category"),
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Split a flattened `[x1, y1, x2, y2]` back into two corners.
fn corners(bbox: &[f64]) -> Option<Vec<[f64; 2]>> {
    match bbox {
        [x1, y1, x2, y2] => Some(vec![[*x1, *y1], [*x2, *y2]]),
        [] => None,
        other => {
            warn!(len = other.len(), "ignoring malformed legend bbox");
            None
        }
    }
}

fn rectangle(bbox: &[f64]) -> Option<Vec<[f64; 2]>> {
    match bbox {
        [x1, y1, x2, y2] => Some(vec![[*x1, *y1], [*x2, *y1], [*x2, *y2], [*x1, *y2], [*x1, *y1]]),
        _ => None,
    }
}

/// Pixel rings of a response geometry. Falls back to the bbox rectangle.
fn response_rings(px_geojson: Option<&geojson::Geometry>, px_bbox: &[f64]) -> Vec<Vec<[f64; 2]>> {
    let to_ring = |ring: &Vec<Vec<f64>>| -> Vec<[f64; 2]> {
        ring.iter()
            .filter_map(|position| match position.as_slice() {
                [x, y, ..] => Some([*x, *y]),
                _ => None,
            })
            .collect()
    };

    match px_geojson.map(|g| &g.value) {
        Some(geojson::Value::Polygon(rings)) => rings.iter().map(to_ring).collect(),
        Some(geojson::Value::MultiPolygon(polygons)) => polygons.iter().flatten().map(to_ring).collect(),
        _ => rectangle(px_bbox).into_iter().collect(),
    }
}

fn layout_from_area_extractions(provenance: Provenance, areas: &[AreaExtraction]) -> Layout {
    let mut layout = Layout::new(provenance);
    for area in areas {
        place_area(
            &mut layout,
            area.category,
            AreaBoundary::new(area.coordinates.clone(), area.confidence),
        );
    }
    layout
}

fn unit_from_parts(
    unit_type: MapUnitType,
    label: &str,
    abbreviation: &str,
    description: &str,
    legend_bbox: &[f64],
) -> MapUnit {
    MapUnit {
        label: non_empty(label),
        abbreviation: non_empty(abbreviation),
        description: non_empty(description),
        label_bbox: corners(legend_bbox),
        ..MapUnit::new(unit_type)
    }
}

/// Rebuild a map from a CDR results document.
///
/// The legend is taken from the three result buckets, each bucket fixing the
/// feature type. Segmentation geometry is not carried over.
pub fn convert_cdr_feature_results_to_cmaas_map(results: &FeatureResults) -> CmaasMap {
    let provenance = Provenance::new(results.system.clone(), Some(&results.system_version));

    let mut legend = Legend::new(provenance.clone());
    for point in results.point_feature_results.iter().flatten() {
        legend.features.push(unit_from_parts(
            MapUnitType::Point,
            &point.name,
            &point.abbreviation,
            &point.description,
            &point.legend_bbox,
        ));
    }
    for line in results.line_feature_results.iter().flatten() {
        legend.features.push(unit_from_parts(
            MapUnitType::Line,
            &line.name,
            &line.abbreviation,
            &line.description,
            &line.legend_bbox,
        ));
    }
    for polygon in results.polygon_feature_results.iter().flatten() {
        legend.features.push(MapUnit {
            color: non_empty(&polygon.color),
            pattern: non_empty(&polygon.pattern),
            ..unit_from_parts(
                MapUnitType::Polygon,
                &polygon.label,
                &polygon.abbreviation,
                &polygon.description,
                &polygon.legend_bbox,
            )
        });
    }

    let mut map = CmaasMap::new(results.cog_id.clone())
        .with_cog_id(results.cog_id.clone())
        .with_legend(legend);
    if let Some(areas) = &results.cog_area_extractions {
        map = map.with_layout(layout_from_area_extractions(provenance, areas));
    }

    debug!(cog_id = %results.cog_id, features = map.legend.as_ref().map_or(0, Legend::len), "imported CDR results");
    map
}

/// Build a layout from standalone area extraction records.
///
/// Provenance comes from the first record. `None` for an empty list.
pub fn convert_cdr_area_extraction_to_layout(responses: &[AreaExtractionResponse]) -> Option<Layout> {
    let first = responses.first()?;
    let mut layout = Layout::new(Provenance::new(first.system.clone(), Some(&first.system_version)));
    for response in responses {
        let geometry = response_rings(response.px_geojson.as_ref(), &response.px_bbox);
        place_area(&mut layout, response.category, AreaBoundary::new(geometry, response.confidence));
    }
    Some(layout)
}

/// Build a legend from standalone legend item records.
///
/// Provenance comes from the first record. `None` for an empty list.
pub fn convert_cdr_legend_items_to_legend(items: &[LegendItemResponse]) -> Option<Legend> {
    let first = items.first()?;
    let mut legend = Legend::new(Provenance::new(first.system.clone(), Some(&first.system_version)));
    for item in items {
        legend.features.push(MapUnit {
            label_confidence: item.confidence,
            color: non_empty(&item.color),
            pattern: non_empty(&item.pattern),
            ..unit_from_parts(
                MapUnitType::from_token(&item.category),
                &item.label,
                &item.abbreviation,
                &item.description,
                &item.px_bbox,
            )
        });
    }
    Some(legend)
}
