use geo_types::{Coord, Geometry, LineString, Polygon};
use tracing::{debug, warn};

use super::features::{CdrFeature, CdrFeatureCollection};
use super::schema::{
    FeatureResults, LineFeatureCollection, LineLegendAndFeaturesResult, LineProperty, ModelProvenance,
    PointLegendAndFeaturesResult, PolygonFeatureCollection, PolygonLegendAndFeaturesResult, PolygonProperty,
    UNSET_ID,
};
use crate::types::{CmaasMap, MapUnit, MapUnitSegmentation, MapUnitType, Provenance};

/// Serialize the map's legend into a CDR results document.
///
/// Features are partitioned by type, in legend order. Layout is not exported
/// and point geometry is always written as an empty collection.
pub fn export_map_to_cdr(map: &CmaasMap, cog_id: &str, system: &str, system_version: &str) -> FeatureResults {
    let mut point_results = Vec::new();
    let mut line_results = Vec::new();
    let mut polygon_results = Vec::new();

    if let Some(legend) = &map.legend {
        let legend_provenance = model_provenance(&legend.provenance);
        for feature in &legend.features {
            match feature.unit_type {
                MapUnitType::Point => point_results.push(point_result(feature, &legend_provenance)),
                MapUnitType::Line => line_results.push(line_result(feature, &legend_provenance)),
                MapUnitType::Polygon => polygon_results.push(polygon_result(feature, &legend_provenance)),
                MapUnitType::Unknown => debug!(%feature, "skipping feature of unknown type"),
            }
        }
    }

    debug!(
        map = %map.name,
        points = point_results.len(),
        lines = line_results.len(),
        polygons = polygon_results.len(),
        "exported map to CDR"
    );

    FeatureResults {
        cog_id: cog_id.to_string(),
        line_feature_results: Some(line_results),
        point_feature_results: Some(point_results),
        polygon_feature_results: Some(polygon_results),
        cog_area_extractions: None,
        cog_metadata_extractions: None,
        system: system.to_string(),
        system_version: system_version.to_string(),
    }
}

pub(crate) fn model_provenance(provenance: &Provenance) -> ModelProvenance {
    ModelProvenance {
        model: provenance.name.clone(),
        model_version: provenance.version.clone().unwrap_or_default(),
    }
}

/// Two corners are written verbatim; longer outlines collapse to their envelope.
pub(crate) fn flatten_bbox(bbox: Option<&[[f64; 2]]>) -> Vec<f64> {
    match bbox {
        None | Some([]) => Vec::new(),
        Some([[x1, y1], [x2, y2]]) => vec![*x1, *y1, *x2, *y2],
        Some(points) => {
            let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
            let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
            for &[x, y] in points {
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
            }
            vec![min_x, min_y, max_x, max_y]
        }
    }
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn legend_bbox(feature: &MapUnit) -> Vec<f64> {
    flatten_bbox(feature.label_bbox.as_deref())
}

fn point_result(feature: &MapUnit, legend_provenance: &ModelProvenance) -> PointLegendAndFeaturesResult {
    PointLegendAndFeaturesResult {
        id: UNSET_ID.to_string(),
        legend_provenance: Some(legend_provenance.clone()),
        name: text(&feature.label),
        abbreviation: text(&feature.abbreviation),
        description: text(&feature.description),
        legend_bbox: legend_bbox(feature),
        // The point feature contract is not settled; never emit point geometry.
        point_features: Some(CdrFeatureCollection::default()),
    }
}

fn line_result(feature: &MapUnit, legend_provenance: &ModelProvenance) -> LineLegendAndFeaturesResult {
    LineLegendAndFeaturesResult {
        id: UNSET_ID.to_string(),
        legend_provenance: Some(legend_provenance.clone()),
        name: text(&feature.label),
        abbreviation: text(&feature.abbreviation),
        description: text(&feature.description),
        legend_bbox: legend_bbox(feature),
        line_features: feature.segmentation.as_ref().and_then(line_collection),
    }
}

fn polygon_result(feature: &MapUnit, legend_provenance: &ModelProvenance) -> PolygonLegendAndFeaturesResult {
    PolygonLegendAndFeaturesResult {
        id: UNSET_ID.to_string(),
        legend_provenance: Some(legend_provenance.clone()),
        label: text(&feature.label),
        abbreviation: text(&feature.abbreviation),
        description: text(&feature.description),
        legend_bbox: legend_bbox(feature),
        color: text(&feature.color),
        pattern: text(&feature.pattern),
        map_units: Vec::new(),
        polygon_features: feature.segmentation.as_ref().and_then(polygon_collection),
    }
}

fn positions(coords: impl Iterator<Item = Coord<f64>>) -> Vec<Vec<f64>> {
    coords.map(|c| vec![c.x, c.y]).collect()
}

fn line_value(line: &LineString<f64>) -> geojson::Value {
    geojson::Value::LineString(positions(line.coords().copied()))
}

/// `[exterior, interior...]`, rings in their stored order.
fn polygon_value(polygon: &Polygon<f64>) -> geojson::Value {
    let rings = std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(|ring| positions(ring.coords().copied()))
        .collect();
    geojson::Value::Polygon(rings)
}

fn line_collection(segmentation: &MapUnitSegmentation) -> Option<LineFeatureCollection> {
    let geometry = segmentation.geometry.as_ref()?;
    let provenance = model_provenance(&segmentation.provenance);
    let property = || LineProperty {
        model: provenance.model.clone(),
        model_version: provenance.model_version.clone(),
        confidence: segmentation.confidence,
        dash_pattern: String::new(),
        symbol: String::new(),
    };

    let mut features = Vec::new();
    for geom in geometry {
        let lines: Vec<&LineString<f64>> = match geom {
            Geometry::LineString(line) => vec![line],
            Geometry::MultiLineString(multi) => multi.0.iter().collect(),
            other => {
                warn!(geometry = ?other, "line feature carries non-line geometry");
                continue;
            }
        };
        for line in lines {
            features.push(CdrFeature::new(UNSET_ID, geojson::Geometry::new(line_value(line)), property()));
        }
    }
    Some(CdrFeatureCollection::new(features))
}

fn polygon_collection(segmentation: &MapUnitSegmentation) -> Option<PolygonFeatureCollection> {
    let geometry = segmentation.geometry.as_ref()?;
    let provenance = model_provenance(&segmentation.provenance);
    let property = || {
        PolygonProperty::new(
            provenance.model.clone(),
            provenance.model_version.clone(),
            segmentation.confidence,
        )
    };

    let mut features = Vec::new();
    for geom in geometry {
        let polygons: Vec<&Polygon<f64>> = match geom {
            Geometry::Polygon(polygon) => vec![polygon],
            Geometry::MultiPolygon(multi) => multi.0.iter().collect(),
            other => {
                warn!(geometry = ?other, "polygon feature carries non-polygon geometry");
                continue;
            }
        };
        for polygon in polygons {
            features.push(CdrFeature::new(
                UNSET_ID,
                geojson::Geometry::new(polygon_value(polygon)),
                property(),
            ));
        }
    }
    Some(CdrFeatureCollection::new(features))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Legend;
    use geo_types::{line_string, polygon, Point};

    fn prov() -> Provenance {
        Provenance::new("uiuc-icy-resin", Some("0.4.6"))
    }

    fn mock_map() -> CmaasMap {
        let mut point = MapUnit::new(MapUnitType::Point).with_label("Mine");
        point.label_bbox = Some(vec![[1.0, 2.0], [3.0, 4.0]]);
        point.set_geometry(&prov(), Some(0.9), vec![Geometry::Point(Point::new(5.0, 5.0))]);

        let mut line = MapUnit::new(MapUnitType::Line).with_label("Fault");
        line.set_geometry(
            &prov(),
            None,
            vec![Geometry::LineString(line_string![(x: 0.0, y: 0.0), (x: 10.0, y: 10.0)])],
        );

        let mut poly = MapUnit::new(MapUnitType::Polygon).with_label("Water");
        poly.color = Some("blue".to_string());
        poly.set_geometry(
            &prov(),
            Some(0.75),
            vec![Geometry::Polygon(polygon!(
                exterior: [(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 10.0), (x: 0.0, y: 10.0)],
                interiors: [[(x: 2.0, y: 2.0), (x: 4.0, y: 2.0), (x: 4.0, y: 4.0)]],
            ))],
        );

        let unknown = MapUnit::new(MapUnitType::Unknown).with_label("Random_Label");

        let legend = Legend {
            provenance: Provenance::new("polymer", None),
            features: vec![point, line, poly, unknown],
        };
        CmaasMap::new("mock").with_legend(legend)
    }

    #[test]
    fn test_export_partitions_by_type_and_stamps() {
        let results = export_map_to_cdr(&mock_map(), "cog-123", "uiuc", "1.2");
        assert_eq!(results.cog_id, "cog-123");
        assert_eq!(results.system, "uiuc");
        assert_eq!(results.system_version, "1.2");
        assert!(results.cog_area_extractions.is_none());

        let points = results.point_feature_results.expect("Should have point results");
        let lines = results.line_feature_results.expect("Should have line results");
        let polygons = results.polygon_feature_results.expect("Should have polygon results");
        assert_eq!((points.len(), lines.len(), polygons.len()), (1, 1, 1));

        assert_eq!(points[0].id, UNSET_ID);
        assert_eq!(points[0].name, "Mine");
        assert_eq!(points[0].abbreviation, "");
        assert_eq!(points[0].legend_bbox, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(
            points[0].legend_provenance,
            Some(ModelProvenance { model: "polymer".into(), model_version: String::new() })
        );

        assert_eq!(lines[0].legend_bbox, Vec::<f64>::new());
        assert_eq!(polygons[0].color, "blue");
        assert_eq!(polygons[0].pattern, "");
        assert!(polygons[0].map_units.is_empty());
    }

    #[test]
    fn test_point_geometry_is_never_exported() {
        let results = export_map_to_cdr(&mock_map(), "", "uiuc", "1.2");
        let points = results.point_feature_results.expect("Should have point results");
        let collection = points[0].point_features.as_ref().expect("Should emit a collection");
        assert!(collection.is_empty());
    }

    #[test]
    fn test_line_and_polygon_geometry() {
        let results = export_map_to_cdr(&mock_map(), "", "uiuc", "1.2");

        let lines = results.line_feature_results.expect("Should have line results");
        let line_features = lines[0].line_features.as_ref().expect("Should have line features");
        assert_eq!(line_features.len(), 1);
        assert_eq!(
            line_features.features[0].geometry(),
            Some(&geojson::Value::LineString(vec![vec![0.0, 0.0], vec![10.0, 10.0]]))
        );

        let polygons = results.polygon_feature_results.expect("Should have polygon results");
        let poly_features = polygons[0].polygon_features.as_ref().expect("Should have polygon features");
        let Some(geojson::Value::Polygon(rings)) = poly_features.features[0].geometry() else {
            panic!("Should be a polygon");
        };
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[0].first(), rings[0].last());

        let props = poly_features.features[0].properties().expect("Should have properties");
        assert_eq!(props.model, "uiuc-icy-resin");
        assert_eq!(props.model_version, "0.4.6");
        assert_eq!(props.confidence, Some(0.75));
    }

    #[test]
    fn test_flatten_bbox() {
        assert!(flatten_bbox(None).is_empty());
        assert_eq!(
            flatten_bbox(Some(&[[5.0, 1.0], [2.0, 8.0], [3.0, 0.0]])),
            vec![2.0, 0.0, 5.0, 8.0]
        );
    }

    #[test]
    fn test_export_without_legend() {
        let results = export_map_to_cdr(&CmaasMap::new("empty"), "id", "uiuc", "1.2");
        assert_eq!(results.point_feature_results, Some(Vec::new()));
        assert_eq!(results.polygon_feature_results, Some(Vec::new()));
    }
}
