use image::{GrayImage, Luma};
use imageproc::region_labelling::{connected_components, Connectivity};
use crate::{traits::MaskPreprocessor, types::FOREGROUND};

/// Maps every nonzero pixel to foreground
#[derive(Debug, Clone, Default)]
pub struct BinarizePreprocessor;

impl MaskPreprocessor for BinarizePreprocessor {
    fn preprocess(&self, mask: &GrayImage) -> GrayImage {
        GrayImage::from_fn(mask.width(), mask.height(), |x, y| {
            if mask.get_pixel(x, y)[0] != 0 {
                Luma([FOREGROUND])
            } else {
                Luma([0])
            }
        })
    }
}

/// Removes connected foreground components smaller than `min_size` pixels
#[derive(Debug, Clone)]
pub struct SievePreprocessor {
    pub min_size: u32,
    pub connectivity: Connectivity,
}

impl Default for SievePreprocessor {
    fn default() -> Self {
        Self {
            min_size: 10,
            connectivity: Connectivity::Four,
        }
    }
}

impl MaskPreprocessor for SievePreprocessor {
    fn preprocess(&self, mask: &GrayImage) -> GrayImage {
        let labels = connected_components(mask, self.connectivity, Luma([0u8]));

        let component_count = labels.pixels().map(|p| p[0]).max().unwrap_or(0) as usize;
        let mut sizes = vec![0u32; component_count + 1];
        for pixel in labels.pixels() {
            sizes[pixel[0] as usize] += 1;
        }

        let sieved = GrayImage::from_fn(mask.width(), mask.height(), |x, y| {
            let label = labels.get_pixel(x, y)[0] as usize;
            if label != 0 && sizes[label] >= self.min_size {
                Luma([FOREGROUND])
            } else {
                Luma([0])
            }
        });

        let removed = sizes[1..].iter().filter(|&&s| s < self.min_size).count();
        if removed > 0 {
            tracing::debug!(removed, min_size = self.min_size, "sieved noise components");
        }

        sieved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sieve_removes_small_components() {
        let mut mask = GrayImage::new(10, 10);
        for x in 0..4 {
            for y in 0..2 {
                mask.put_pixel(x, y, Luma([FOREGROUND]));
            }
        }
        mask.put_pixel(8, 8, Luma([FOREGROUND]));

        let sieve = SievePreprocessor { min_size: 5, connectivity: Connectivity::Four };
        let result = sieve.preprocess(&mask);
        assert_eq!(result.get_pixel(8, 8)[0], 0);
        assert_eq!(result.pixels().filter(|p| p[0] != 0).count(), 8);
    }

    #[test]
    fn test_sieve_uses_four_connectivity() {
        // Two diagonal pixels are separate components under 4-connectivity
        let mut mask = GrayImage::new(4, 4);
        mask.put_pixel(1, 1, Luma([FOREGROUND]));
        mask.put_pixel(2, 2, Luma([FOREGROUND]));

        let sieve = SievePreprocessor { min_size: 2, connectivity: Connectivity::Four };
        let result = sieve.preprocess(&mask);
        assert_eq!(result.pixels().filter(|p| p[0] != 0).count(), 0);

        let sieve = SievePreprocessor { min_size: 2, connectivity: Connectivity::Eight };
        let result = sieve.preprocess(&mask);
        assert_eq!(result.pixels().filter(|p| p[0] != 0).count(), 2);
    }

    #[test]
    fn test_binarize_preprocessor() {
        let mut mask = GrayImage::new(2, 1);
        mask.put_pixel(0, 0, Luma([3]));
        let result = BinarizePreprocessor.preprocess(&mask);
        assert_eq!(result.get_pixel(0, 0)[0], FOREGROUND);
        assert_eq!(result.get_pixel(1, 0)[0], 0);
    }
}
