//! Raster input and output.
//!
//! Map images and label masks are read through [`RasterIo`] so that a
//! georeferencing-aware backend can stand in for the plain image backend.

use std::path::Path;

use image::DynamicImage;
use mask::LabelMask;
use tracing::debug;

use crate::error::{CmaasError, Result};
use crate::types::Affine;

/// A decoded raster with whatever georeferencing the file carried.
#[derive(Debug, Clone)]
pub struct GeoRaster {
    pub image: DynamicImage,
    pub crs: Option<String>,
    pub transform: Option<Affine>,
}

pub trait RasterIo: Send + Sync {
    fn read_image(&self, path: &Path) -> Result<GeoRaster>;

    /// Read a single band integer label mask.
    fn read_label_mask(&self, path: &Path) -> Result<LabelMask>;

    fn write_label_mask(&self, path: &Path, mask: &LabelMask) -> Result<()>;
}

/// Backend over the `image` crate. Does not read georeferencing tags, so
/// `crs` and `transform` are always `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageRasterIo;

impl ImageRasterIo {
    fn open(path: &Path) -> Result<DynamicImage> {
        if !path.exists() {
            return Err(CmaasError::FileIo {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "raster not found"),
            });
        }
        Ok(image::open(path)?)
    }
}

impl RasterIo for ImageRasterIo {
    fn read_image(&self, path: &Path) -> Result<GeoRaster> {
        let image = Self::open(path)?;
        debug!(path = %path.display(), width = image.width(), height = image.height(), "read raster");
        Ok(GeoRaster {
            image,
            crs: None,
            transform: None,
        })
    }

    fn read_label_mask(&self, path: &Path) -> Result<LabelMask> {
        let image = Self::open(path)?;
        if image.color().channel_count() != 1 {
            return Err(CmaasError::UnsupportedFormat(format!(
                "label mask {} has {} bands, expected 1",
                path.display(),
                image.color().channel_count()
            )));
        }
        Ok(image.to_luma16())
    }

    fn write_label_mask(&self, path: &Path, mask: &LabelMask) -> Result<()> {
        mask.save(path)?;
        debug!(path = %path.display(), "wrote label mask");
        Ok(())
    }
}

pub fn load_image(path: impl AsRef<Path>) -> Result<GeoRaster> {
    ImageRasterIo.read_image(path.as_ref())
}

pub fn load_label_mask(path: impl AsRef<Path>) -> Result<LabelMask> {
    ImageRasterIo.read_label_mask(path.as_ref())
}

pub fn save_label_mask(path: impl AsRef<Path>, mask: &LabelMask) -> Result<()> {
    ImageRasterIo.write_label_mask(path.as_ref(), mask)
}
