//! Assembling maps from the files of one map, and bulk loading.

use std::collections::HashMap;
use std::path::Path;

use tracing::info;

use crate::error::{CmaasError, Result};
use crate::legacy::{load_layout_json, load_legend_json};
use crate::raster::{ImageRasterIo, RasterIo};
use crate::types::{CmaasMap, GeoReference, Layout, Legend, MapUnitType, Provenance};

/// Map name derived from a file path: the file name without its extension.
pub fn map_name(path: &Path) -> Result<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| CmaasError::UnsupportedFormat(format!("{} has no file name", path.display())))
}

/// Build a map from its image and optional legend and layout files.
pub fn load_cmaas_map_from_files(
    image_path: impl AsRef<Path>,
    legend_path: Option<&Path>,
    layout_path: Option<&Path>,
) -> Result<CmaasMap> {
    load_cmaas_map_with(&ImageRasterIo, image_path.as_ref(), legend_path, layout_path, &MapUnitType::ALL)
}

/// [`load_cmaas_map_from_files`] over any raster backend and type filter.
pub fn load_cmaas_map_with(
    raster_io: &dyn RasterIo,
    image_path: &Path,
    legend_path: Option<&Path>,
    layout_path: Option<&Path>,
    type_filter: &[MapUnitType],
) -> Result<CmaasMap> {
    let name = map_name(image_path)?;
    let raster = raster_io.read_image(image_path)?;
    let georef = GeoReference::new(Provenance::new("GeoTIFF", None), raster.crs, raster.transform);

    let mut map = CmaasMap::new(name).with_image(raster.image).with_georef(georef);
    if let Some(path) = legend_path {
        map = map.with_legend(load_legend_json(path, type_filter)?);
    }
    if let Some(path) = layout_path {
        map = map.with_layout(load_layout_json(path)?);
    }

    info!(map = %map, "loaded map");
    Ok(map)
}

/// Load many legend files, keyed by file stem.
pub fn load_legends<P: AsRef<Path>>(paths: &[P], type_filter: &[MapUnitType]) -> Result<HashMap<String, Legend>> {
    paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            Ok((map_name(path)?, load_legend_json(path, type_filter)?))
        })
        .collect()
}

/// Load many layout files, keyed by file stem.
pub fn load_layouts<P: AsRef<Path>>(paths: &[P]) -> Result<HashMap<String, Layout>> {
    paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            Ok((map_name(path)?, load_layout_json(path)?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    const LEGEND: &str = r#"{"version": "5.0.2", "shapes": [
        {"label": "Water_poly", "points": [[1, 1], [2, 2]]},
        {"label": "Random_Label", "points": [[3, 3], [4, 4]]}
    ]}"#;

    const LAYOUT: &str = r#"[{"name": "map", "bounds": [[0, 0], [8, 0], [8, 8]], "confidence": 0.9}]"#;

    #[test]
    fn test_load_map_from_files() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let image_path = dir.path().join("AK_Dillingham.png");
        let legend_path = dir.path().join("AK_Dillingham.json");
        let layout_path = dir.path().join("AK_Dillingham_layout.json");
        RgbImage::new(8, 8).save(&image_path).expect("Should save image");
        std::fs::write(&legend_path, LEGEND).expect("Should write legend");
        std::fs::write(&layout_path, LAYOUT).expect("Should write layout");

        let map = load_cmaas_map_from_files(&image_path, Some(legend_path.as_path()), Some(layout_path.as_path()))
            .expect("Should load map");
        assert_eq!(map.name, "AK_Dillingham");
        assert_eq!(map.legend.as_ref().map(Legend::len), Some(2));
        assert_eq!(map.layout.as_ref().map(|l| l.map.len()), Some(1));
        assert_eq!(
            map.georef.as_ref().map(|g| g.provenance.clone()),
            Some(Provenance::new("GeoTIFF", None))
        );
    }

    #[test]
    fn test_bulk_loaders_key_by_stem() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let a = dir.path().join("map_a.json");
        let b = dir.path().join("map_b.json");
        std::fs::write(&a, LEGEND).expect("Should write legend");
        std::fs::write(&b, LEGEND).expect("Should write legend");

        let legends = load_legends(&[&a, &b], &MapUnitType::ALL_KNOWN).expect("Should load legends");
        assert_eq!(legends.len(), 2);
        assert_eq!(legends["map_a"].len(), 1);

        let layout_path = dir.path().join("map_c.json");
        std::fs::write(&layout_path, LAYOUT).expect("Should write layout");
        let layouts = load_layouts(&[layout_path]).expect("Should load layouts");
        assert!(layouts.contains_key("map_c"));
    }
}
