use std::marker::PhantomData;

use geojson::feature::Id;
use geojson::Geometry;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A GeoJSON feature whose `properties` object has the shape of `P`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CdrFeature<P> {
    #[serde(flatten)]
    pub feature: geojson::Feature,
    #[serde(skip)]
    _properties: PhantomData<P>,
}

impl<P> CdrFeature<P>
where
    P: Serialize + DeserializeOwned,
{
    pub fn new(id: impl Into<String>, geometry: Geometry, properties: P) -> Self {
        let feature = geojson::Feature {
            bbox: None,
            geometry: Some(geometry),
            id: Some(Id::String(id.into())),
            properties: serde_json::to_value(properties).ok().and_then(|v| v.as_object().cloned()),
            foreign_members: None,
        };
        Self {
            feature,
            _properties: PhantomData,
        }
    }

    /// Typed view of the properties. `None` when absent or of another shape.
    pub fn properties(&self) -> Option<P> {
        self.feature
            .properties
            .as_ref()
            .and_then(|p| serde_json::from_value(serde_json::Value::Object(p.clone())).ok())
    }

    pub fn geometry(&self) -> Option<&geojson::Value> {
        self.feature.geometry.as_ref().map(|g| &g.value)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FeatureCollectionTag {
    #[default]
    FeatureCollection,
}

/// A GeoJSON feature collection of [`CdrFeature`]s.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CdrFeatureCollection<P> {
    #[serde(rename = "type", default)]
    pub tag: FeatureCollectionTag,
    #[serde(default = "Vec::new")]
    pub features: Vec<CdrFeature<P>>,
}

impl<P> Default for CdrFeatureCollection<P> {
    fn default() -> Self {
        Self {
            tag: FeatureCollectionTag::FeatureCollection,
            features: Vec::new(),
        }
    }
}

impl<P> CdrFeatureCollection<P> {
    pub fn new(features: Vec<CdrFeature<P>>) -> Self {
        Self {
            tag: FeatureCollectionTag::FeatureCollection,
            features,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
