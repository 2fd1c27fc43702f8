//! Conversion to and from the CDR results exchange schema.

mod export;
mod features;
mod import;
mod schema;

use std::path::Path;

use tracing::debug;

use crate::error::{CmaasError, Result};

pub use export::export_map_to_cdr;
pub use features::{CdrFeature, CdrFeatureCollection, FeatureCollectionTag};
pub use import::{
    convert_cdr_area_extraction_to_layout, convert_cdr_feature_results_to_cmaas_map,
    convert_cdr_legend_items_to_legend,
};
pub use schema::*;

pub fn load_cdr_feature_results(path: impl AsRef<Path>) -> Result<FeatureResults> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(CmaasError::file_io(path))?;
    serde_json::from_str(&content).map_err(CmaasError::schema("CDR feature results"))
}

pub fn save_cdr_feature_results(path: impl AsRef<Path>, results: &FeatureResults) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string(results)?;
    std::fs::write(path, json).map_err(CmaasError::file_io(path))?;
    debug!(path = %path.display(), cog_id = %results.cog_id, "saved CDR feature results");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CmaasMap, Legend, MapUnit, MapUnitType, Provenance};

    #[test]
    fn test_save_then_load_feature_results() {
        let mut water = MapUnit::new(MapUnitType::Polygon).with_label("Water");
        water.label_bbox = Some(vec![[1.0, 2.0], [3.0, 4.0]]);
        let map = CmaasMap::new("m").with_legend(Legend {
            provenance: Provenance::new("uiuc", Some("0.1")),
            features: vec![water],
        });
        let results = export_map_to_cdr(&map, "cog", "uiuc", "0.1");

        let dir = tempfile::tempdir().expect("Should create temp dir");
        let path = dir.path().join("cog_results.json");
        save_cdr_feature_results(&path, &results).expect("Should save");
        let loaded = load_cdr_feature_results(&path).expect("Should load");
        assert_eq!(loaded, results);
    }

    #[test]
    fn test_load_invalid_feature_results() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"system": "uiuc"}"#).expect("Should write fixture");
        let err = load_cdr_feature_results(&path).expect_err("Should reject missing cog_id");
        assert!(matches!(err, CmaasError::Schema { .. }));
    }
}
