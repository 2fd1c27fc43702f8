use image::GrayImage;

/// Every foreground pixel as an `[x, y]` coordinate, in row-major order.
pub fn foreground_points(mask: &GrayImage) -> Vec<[f64; 2]> {
    mask.enumerate_pixels()
        .filter(|(_, _, pixel)| pixel[0] != 0)
        .map(|(x, y, _)| [x as f64, y as f64])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_foreground_points_row_major() {
        let mut mask = GrayImage::new(5, 5);
        mask.put_pixel(4, 0, Luma([1]));
        mask.put_pixel(1, 2, Luma([1]));
        mask.put_pixel(2, 2, Luma([1]));

        let points = foreground_points(&mask);
        assert_eq!(points, vec![[4.0, 0.0], [1.0, 2.0], [2.0, 2.0]]);
    }
}
