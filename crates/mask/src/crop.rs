use image::{DynamicImage, GenericImageView, GrayImage, Luma, RgbaImage};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;

use crate::types::FOREGROUND;

/// Rasterize `areas` (pixel-space polygons) into a binary mask of the given size.
pub fn rasterize_areas(width: u32, height: u32, areas: &[Vec<[f64; 2]>]) -> GrayImage {
    let mut mask = GrayImage::new(width, height);
    for area in areas {
        let mut points: Vec<Point<i32>> = area
            .iter()
            .map(|&[x, y]| Point::new(x.round() as i32, y.round() as i32))
            .collect();
        points.dedup();
        // imageproc rejects explicitly closed rings
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        match points.len() {
            0 => {}
            1 => {
                let p = points[0];
                if p.x >= 0 && p.y >= 0 && (p.x as u32) < width && (p.y as u32) < height {
                    mask.put_pixel(p.x as u32, p.y as u32, Luma([FOREGROUND]));
                }
            }
            _ => draw_polygon_mut(&mut mask, &points, Luma([FOREGROUND])),
        }
    }
    mask
}

/// Mask `image` to the union of `areas` and crop to their bounding rectangle.
///
/// Returns the cropped image and the `(x, y)` offset of the crop from the top
/// left of the original, or `None` when the areas cover no pixels.
pub fn mask_and_crop(image: &DynamicImage, areas: &[Vec<[f64; 2]>]) -> Option<(DynamicImage, (u32, u32))> {
    let (width, height) = image.dimensions();
    let mask = rasterize_areas(width, height, areas);

    let mut min = (u32::MAX, u32::MAX);
    let mut max = (0u32, 0u32);
    let mut any = false;
    for (x, y, pixel) in mask.enumerate_pixels() {
        if pixel[0] != 0 {
            any = true;
            min = (min.0.min(x), min.1.min(y));
            max = (max.0.max(x), max.1.max(y));
        }
    }
    if !any {
        return None;
    }

    let crop_width = max.0 - min.0 + 1;
    let crop_height = max.1 - min.1 + 1;
    let cropped = RgbaImage::from_fn(crop_width, crop_height, |x, y| {
        let (sx, sy) = (min.0 + x, min.1 + y);
        if mask.get_pixel(sx, sy)[0] != 0 {
            image.get_pixel(sx, sy)
        } else {
            image::Rgba([0, 0, 0, 0])
        }
    });

    let cropped = match image {
        DynamicImage::ImageLuma8(_) => DynamicImage::ImageLuma8(DynamicImage::ImageRgba8(cropped).to_luma8()),
        DynamicImage::ImageRgb8(_) => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(cropped).to_rgb8()),
        _ => DynamicImage::ImageRgba8(cropped),
    };

    Some((cropped, min))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn test_mask_and_crop_offsets_and_masks() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(20, 20, image::Rgb([200, 100, 50])));
        let areas = vec![vec![[5.0, 4.0], [9.0, 4.0], [9.0, 8.0], [5.0, 8.0], [5.0, 4.0]]];

        let (cropped, offset) = mask_and_crop(&image, &areas).expect("Should crop");
        assert_eq!(offset, (5, 4));
        assert_eq!(cropped.dimensions(), (5, 5));
        assert_eq!(cropped.get_pixel(2, 2), image::Rgba([200, 100, 50, 255]));
    }

    #[test]
    fn test_mask_and_crop_without_coverage() {
        let image = DynamicImage::ImageLuma8(GrayImage::new(4, 4));
        assert!(mask_and_crop(&image, &[]).is_none());
    }
}
