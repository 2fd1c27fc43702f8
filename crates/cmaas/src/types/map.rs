use std::fmt;

use image::{DynamicImage, GenericImageView};
use mask::LabelMask;
use serde::{Deserialize, Serialize};

use super::{GeoReference, Layout, Legend, Provenance};

/// A single unit of OCR text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextUnit {
    pub label: String,
    pub geometry: Vec<[f64; 2]>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrText {
    pub provenance: Provenance,
    #[serde(default)]
    pub features: Vec<TextUnit>,
}

/// Bibliographic metadata for a map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CmaasMapMetadata {
    pub provenance: Provenance,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Option<Vec<String>>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    /// E.g. `1:24,000`
    #[serde(default)]
    pub scale: Option<String>,
    /// full color, monocolor or greyscale
    #[serde(default)]
    pub map_color: Option<String>,
    /// rectangle or non-rectangle
    #[serde(default)]
    pub map_shape: Option<String>,
    #[serde(default)]
    pub physiographic_region: Option<String>,
}

impl CmaasMapMetadata {
    pub fn new(provenance: Provenance) -> Self {
        Self {
            provenance,
            title: None,
            authors: None,
            publisher: None,
            source_url: None,
            year: None,
            scale: None,
            map_color: None,
            map_shape: None,
            physiographic_region: None,
        }
    }
}

/// Everything known about one map.
///
/// Built from a name and filled in by independent loaders. Each `with_*`
/// transition replaces exactly one field and leaves the others untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CmaasMap {
    pub name: String,
    #[serde(default)]
    pub cog_id: Option<String>,
    #[serde(skip)]
    pub image: Option<DynamicImage>,
    #[serde(default)]
    pub metadata: Option<CmaasMapMetadata>,
    #[serde(default)]
    pub layout: Option<Layout>,
    #[serde(default)]
    pub legend: Option<Legend>,
    #[serde(default)]
    pub georef: Option<GeoReference>,
    #[serde(default)]
    pub ocrtext: Option<OcrText>,
    /// Pixel value is the 1-based index among the legend's point features
    #[serde(skip)]
    pub point_segmentation_mask: Option<LabelMask>,
    /// Pixel value is the 1-based index among the legend's polygon features
    #[serde(skip)]
    pub poly_segmentation_mask: Option<LabelMask>,
}

/// `(channels, height, width)` of an image, channel-first like the source rasters.
pub fn image_shape(image: &DynamicImage) -> (u8, u32, u32) {
    let (width, height) = image.dimensions();
    (image.color().channel_count(), height, width)
}

impl CmaasMap {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_cog_id(mut self, cog_id: impl Into<String>) -> Self {
        self.cog_id = Some(cog_id.into());
        self
    }

    pub fn with_image(mut self, image: DynamicImage) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_metadata(mut self, metadata: CmaasMapMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn with_legend(mut self, legend: Legend) -> Self {
        self.legend = Some(legend);
        self
    }

    pub fn with_georef(mut self, georef: GeoReference) -> Self {
        self.georef = Some(georef);
        self
    }

    pub fn with_ocrtext(mut self, ocrtext: OcrText) -> Self {
        self.ocrtext = Some(ocrtext);
        self
    }

    /// Attach the polygon label mask.
    ///
    /// # Panics
    /// If an image is present and its dimensions differ from the mask's.
    pub fn with_poly_segmentation_mask(mut self, mask: LabelMask) -> Self {
        self.assert_matches_image(&mask, "polygon");
        self.poly_segmentation_mask = Some(mask);
        self
    }

    /// Attach the point label mask.
    ///
    /// # Panics
    /// If an image is present and its dimensions differ from the mask's.
    pub fn with_point_segmentation_mask(mut self, mask: LabelMask) -> Self {
        self.assert_matches_image(&mask, "point");
        self.point_segmentation_mask = Some(mask);
        self
    }

    /// The image masked to the layout's map area and cropped around it, with
    /// the crop's `(x, y)` offset. `None` without an image, a map area, or
    /// when the map area covers no pixels.
    pub fn crop_to_map_area(&self) -> Option<(DynamicImage, (u32, u32))> {
        let image = self.image.as_ref()?;
        let areas: Vec<Vec<[f64; 2]>> = self
            .layout
            .as_ref()?
            .map
            .iter()
            .flat_map(|boundary| boundary.geometry.iter().cloned())
            .collect();
        mask::mask_and_crop(image, &areas)
    }

    fn assert_matches_image(&self, mask: &LabelMask, kind: &str) {
        if let Some(image) = &self.image {
            assert_eq!(
                image.dimensions(),
                mask.dimensions(),
                "{kind} segmentation mask does not match the dimensions of map '{}'",
                self.name
            );
        }
    }
}

/// Compares name, image shape, legend, layout and metadata. The
/// georeference is deliberately left out.
impl PartialEq for CmaasMap {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.image.as_ref().map(image_shape) == other.image.as_ref().map(image_shape)
            && self.legend == other.legend
            && self.layout == other.layout
            && self.metadata == other.metadata
    }
}

impl fmt::Display for CmaasMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CmaasMap{{name : '{}', ", self.name)?;
        match &self.image {
            Some(image) => write!(f, "image : {:?}, ", image_shape(image))?,
            None => write!(f, "image : None, ")?,
        }
        match &self.legend {
            Some(legend) => write!(f, "legend : {legend}")?,
            None => write!(f, "legend : None")?,
        }
        write!(f, "}}")
    }
}
