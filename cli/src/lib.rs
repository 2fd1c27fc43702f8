use cmaas::{
    export_map_to_cdr, load_label_mask, load_layout_json, load_legend_json, save_cdr_feature_results, CmaasError,
    CmaasMap, FeatureResults, MapUnitType, Provenance, DEFAULT_NOISE_THRESHOLD,
};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    TomlSerError(#[from] toml::ser::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    Cmaas(#[from] CmaasError),
    #[error("No legend files found in {0}")]
    NoLegends(PathBuf),
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}

const MASK_EXTENSIONS: [&str; 3] = ["tif", "tiff", "png"];

fn default_system() -> String {
    "uiuc".to_string()
}

fn default_system_version() -> String {
    "0.1".to_string()
}

fn default_type_filter() -> Vec<String> {
    MapUnitType::ALL.iter().map(|t| t.to_long_str().to_string()).collect()
}

fn default_noise_threshold() -> u32 {
    DEFAULT_NOISE_THRESHOLD
}

/// Batch conversion of a directory of legends into CDR results
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct BatchConfig {
    /// Directory of legend json files, one per map
    pub legend_dir: PathBuf,
    /// Directory of layout json files named after the legend they belong to
    #[serde(default)]
    pub layout_dir: Option<PathBuf>,
    /// Directory of polygon label masks named `<map>_poly.{tif,png}`
    #[serde(default)]
    pub mask_dir: Option<PathBuf>,
    pub output_dir: PathBuf,
    #[serde(default = "default_system")]
    pub system: String,
    #[serde(default = "default_system_version")]
    pub system_version: String,
    /// Unit types to keep from legacy legends
    #[serde(default = "default_type_filter")]
    pub type_filter: Vec<String>,
    /// Smallest polygon region kept when vectorizing masks, in pixels
    #[serde(default = "default_noise_threshold")]
    pub noise_threshold: u32,
}

/// Everything needed to convert one map
#[derive(Debug, Clone, PartialEq)]
pub struct ExportJob {
    pub name: String,
    pub legend_path: PathBuf,
    pub layout_path: Option<PathBuf>,
    pub poly_mask_path: Option<PathBuf>,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    pub system: String,
    pub system_version: String,
    pub type_filter: Vec<MapUnitType>,
    pub noise_threshold: u32,
    /// Defaults to the map name
    pub cog_id: Option<String>,
}

impl BatchConfig {
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, CliError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, CliError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(CliError::UnsupportedFileFormat),
        }
    }

    pub fn to_toml(&self) -> Result<String, CliError> {
        Ok(toml::to_string_pretty(&self)?)
    }

    pub fn to_json(&self) -> Result<String, CliError> {
        Ok(serde_json::to_string_pretty(&self)?)
    }

    pub fn settings(&self) -> ExportSettings {
        ExportSettings {
            system: self.system.clone(),
            system_version: self.system_version.clone(),
            type_filter: self.type_filter.iter().map(|t| MapUnitType::from_token(t)).collect(),
            noise_threshold: self.noise_threshold,
            cog_id: None,
        }
    }

    /// One job per legend file, sorted by map name
    pub fn jobs(&self) -> Result<Vec<ExportJob>, CliError> {
        let mut jobs = Vec::new();
        for entry in fs::read_dir(&self.legend_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let name = cmaas::io::map_name(&path)?;

            let layout_path = self
                .layout_dir
                .as_ref()
                .map(|dir| dir.join(format!("{name}.json")))
                .filter(|p| p.is_file());
            let poly_mask_path = self.mask_dir.as_ref().and_then(|dir| {
                MASK_EXTENSIONS
                    .iter()
                    .map(|ext| dir.join(format!("{name}_poly.{ext}")))
                    .find(|p| p.is_file())
            });

            jobs.push(ExportJob {
                name,
                legend_path: path,
                layout_path,
                poly_mask_path,
                output_dir: self.output_dir.clone(),
            });
        }

        if jobs.is_empty() {
            return Err(CliError::NoLegends(self.legend_dir.clone()));
        }
        jobs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(jobs)
    }
}

impl ExportJob {
    pub fn cdr_output_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}_cdr.json", self.name))
    }

    pub fn map_output_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}_map.json", self.name))
    }

    /// Assemble the map, vectorize its polygon mask if any, and write the CDR
    /// results plus the assembled map next to each other.
    pub fn run(&self, settings: &ExportSettings) -> Result<FeatureResults, CliError> {
        let legend = load_legend_json(&self.legend_path, &settings.type_filter)?;
        let mut map = CmaasMap::new(self.name.clone()).with_legend(legend);

        if let Some(layout_path) = &self.layout_path {
            map = map.with_layout(load_layout_json(layout_path)?);
        }

        if let Some(mask_path) = &self.poly_mask_path {
            map = map.with_poly_segmentation_mask(load_label_mask(mask_path)?);
            let provenance = Provenance::new(settings.system.clone(), Some(&settings.system_version));
            map.generate_poly_geometry(&provenance, settings.noise_threshold);
        }

        let cog_id = settings.cog_id.clone().unwrap_or_else(|| self.name.clone());
        let results = export_map_to_cdr(&map, &cog_id, &settings.system, &settings.system_version);

        fs::create_dir_all(&self.output_dir)?;
        save_cdr_feature_results(self.cdr_output_path(), &results)?;
        fs::write(self.map_output_path(), serde_json::to_string_pretty(&map)?)?;
        Ok(results)
    }
}
