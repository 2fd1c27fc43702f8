use image::{GrayImage, Luma};
use imageproc::contours::{find_contours, BorderType};
use imageproc::point::Point;
use imageproc::region_labelling::{connected_components, Connectivity};
use crate::{traits::ContourExtractor, types::{TracedContour, FOREGROUND}};

/// Traces each connected component separately, so regions that only touch
/// diagonally stay distinct polygons under 4-connectivity.
///
/// Rings follow pixel edges: an N pixel region without holes yields a closed
/// ring enclosing an area of N, and a single pixel yields its unit square.
#[derive(Debug, Clone)]
pub struct ComponentContourExtractor {
    pub connectivity: Connectivity,
}

impl Default for ComponentContourExtractor {
    fn default() -> Self {
        Self { connectivity: Connectivity::Four }
    }
}

#[derive(Debug, Clone, Copy)]
struct Extent {
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
}

impl ContourExtractor for ComponentContourExtractor {
    fn extract_contours(&self, mask: &GrayImage) -> Vec<TracedContour> {
        let labels = connected_components(mask, self.connectivity, Luma([0u8]));

        let mut extents: Vec<Option<Extent>> = Vec::new();
        for (x, y, pixel) in labels.enumerate_pixels() {
            let label = pixel[0] as usize;
            if label == 0 {
                continue;
            }
            if extents.len() < label {
                extents.resize(label, None);
            }
            let slot = &mut extents[label - 1];
            *slot = Some(match *slot {
                None => Extent { min_x: x, min_y: y, max_x: x, max_y: y },
                Some(e) => Extent {
                    min_x: e.min_x.min(x),
                    min_y: e.min_y.min(y),
                    max_x: e.max_x.max(x),
                    max_y: e.max_y.max(y),
                },
            });
        }

        let mut contours = Vec::new();
        for (index, extent) in extents.iter().enumerate() {
            let Some(extent) = extent else { continue };
            let label = (index + 1) as u32;

            // Pixel (x, y) of the component, shifted by one pixel of padding,
            // covers cells 2x..=2x+2 of the doubled grid, so pixel corners
            // land on even cells and borders never touch the grid edge.
            let width = 2 * (extent.max_x - extent.min_x + 3) + 1;
            let height = 2 * (extent.max_y - extent.min_y + 3) + 1;
            let mut cells = GrayImage::new(width, height);
            for y in extent.min_y..=extent.max_y {
                for x in extent.min_x..=extent.max_x {
                    if labels.get_pixel(x, y)[0] != label {
                        continue;
                    }
                    let cx = 2 * (x - extent.min_x + 1);
                    let cy = 2 * (y - extent.min_y + 1);
                    for dy in 0..3 {
                        for dx in 0..3 {
                            cells.put_pixel(cx + dx, cy + dy, Luma([FOREGROUND]));
                        }
                    }
                }
            }

            let origin = [extent.min_x as f64 - 1.0, extent.min_y as f64 - 1.0];
            let base = contours.len();
            contours.extend(trace_edges(&cells, origin, base));
        }

        contours
    }
}

fn trace_edges(cells: &GrayImage, origin: [f64; 2], base: usize) -> Vec<TracedContour> {
    find_contours::<i32>(cells)
        .into_iter()
        .map(|contour| {
            let mut points: Vec<[f64; 2]> = corners(&restore_corners(&contour.points))
                .into_iter()
                .map(|(cx, cy)| [origin[0] + cx as f64 / 2.0, origin[1] + cy as f64 / 2.0])
                .collect();
            if let Some(&first) = points.first() {
                points.push(first);
            }
            TracedContour {
                points,
                is_hole: contour.border_type == BorderType::Hole,
                parent: contour.parent.map(|parent| parent + base),
            }
        })
        .collect()
}

/// Border tracing steps diagonally across concave corners; put the skipped
/// corner cell back so every step is axis aligned.
fn restore_corners(points: &[Point<i32>]) -> Vec<(i32, i32)> {
    let mut cells = Vec::with_capacity(points.len() * 2);
    for (i, p) in points.iter().enumerate() {
        let next = points[(i + 1) % points.len()];
        cells.push((p.x, p.y));
        if (next.x - p.x).abs() == 1 && (next.y - p.y).abs() == 1 {
            // Of the two candidates, the corner is the one on even cells
            if p.x % 2 == 0 {
                cells.push((p.x, next.y));
            } else {
                cells.push((next.x, p.y));
            }
        }
    }
    cells
}

/// Drop cells in the middle of straight runs, keeping the ring's vertices.
fn corners(cells: &[(i32, i32)]) -> Vec<(i32, i32)> {
    let n = cells.len();
    (0..n)
        .filter(|&i| {
            let (prev, cur, next) = (cells[(i + n - 1) % n], cells[i], cells[(i + 1) % n]);
            let vertical = prev.0 == cur.0 && cur.0 == next.0;
            let horizontal = prev.1 == cur.1 && cur.1 == next.1;
            !(vertical || horizontal)
        })
        .map(|i| cells[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Area;
    use geo_types::{Coord, LineString, Polygon};

    fn fill(mask: &mut GrayImage, xs: std::ops::Range<u32>, ys: std::ops::Range<u32>) {
        for x in xs {
            for y in ys.clone() {
                mask.put_pixel(x, y, Luma([FOREGROUND]));
            }
        }
    }

    fn ring_area(points: &[[f64; 2]]) -> f64 {
        let ring = LineString::new(points.iter().map(|&[x, y]| Coord { x, y }).collect());
        Polygon::new(ring, vec![]).unsigned_area()
    }

    fn extract(mask: &GrayImage) -> Vec<TracedContour> {
        ComponentContourExtractor::default().extract_contours(mask)
    }

    #[test]
    fn test_component_extractor_splits_diagonal_regions() {
        let mut mask = GrayImage::new(10, 10);
        fill(&mut mask, 1..4, 1..4);
        fill(&mut mask, 4..7, 4..7);

        let contours = extract(&mask);
        assert_eq!(contours.iter().filter(|c| !c.is_hole).count(), 2);
        for contour in &contours {
            assert_eq!(ring_area(&contour.points), 9.0);
        }
    }

    #[test]
    fn test_rings_follow_pixel_edges() {
        let mut mask = GrayImage::new(10, 10);
        fill(&mut mask, 5..8, 2..4);

        let contours = extract(&mask);
        assert_eq!(contours.len(), 1);
        let points = &contours[0].points;
        assert_eq!(points.len(), 5);
        assert_eq!(points.first(), points.last());
        for &[x, y] in points {
            assert!(x == 5.0 || x == 8.0, "x off a pixel edge: {x}");
            assert!(y == 2.0 || y == 4.0, "y off a pixel edge: {y}");
        }
        assert_eq!(ring_area(points), 6.0);
    }

    #[test]
    fn test_single_pixel_is_unit_square() {
        let mut mask = GrayImage::new(5, 5);
        mask.put_pixel(2, 2, Luma([FOREGROUND]));

        let contours = extract(&mask);
        assert_eq!(contours.len(), 1);
        let points = &contours[0].points;
        assert_eq!(points.len(), 5);
        assert_eq!(points.first(), points.last());
        let mut vertices = points[..4].to_vec();
        vertices.sort_by(|a, b| a.partial_cmp(b).expect("Should compare coordinates"));
        assert_eq!(vertices, vec![[2.0, 2.0], [2.0, 3.0], [3.0, 2.0], [3.0, 3.0]]);
    }

    #[test]
    fn test_thin_strip_keeps_its_area() {
        let mut mask = GrayImage::new(16, 5);
        fill(&mut mask, 2..14, 2..3);

        let contours = extract(&mask);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].points.len(), 5);
        assert_eq!(ring_area(&contours[0].points), 12.0);
    }

    #[test]
    fn test_concave_corners_are_not_cut() {
        // L shape: a 3x1 bar on top of a 1x2 stem, 5 pixels
        let mut mask = GrayImage::new(8, 8);
        fill(&mut mask, 2..5, 2..3);
        fill(&mut mask, 2..3, 3..5);

        let contours = extract(&mask);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].points.len(), 7);
        assert_eq!(ring_area(&contours[0].points), 5.0);
    }

    #[test]
    fn test_hole_contour_has_parent() {
        let mut mask = GrayImage::new(10, 10);
        fill(&mut mask, 1..8, 1..8);
        for x in 3..6 {
            for y in 3..6 {
                mask.put_pixel(x, y, Luma([0]));
            }
        }

        let contours = extract(&mask);
        let hole = contours.iter().find(|c| c.is_hole).expect("Should find a hole");
        let parent = hole.parent.expect("Hole should have a parent");
        assert!(!contours[parent].is_hole);
        assert_eq!(ring_area(&hole.points), 9.0);
        assert_eq!(ring_area(&contours[parent].points), 49.0);
    }

    #[test]
    fn test_single_pixel_hole() {
        let mut mask = GrayImage::new(6, 6);
        fill(&mut mask, 1..4, 1..4);
        mask.put_pixel(2, 2, Luma([0]));

        let contours = extract(&mask);
        let hole = contours.iter().find(|c| c.is_hole).expect("Should find a hole");
        assert_eq!(hole.points.len(), 5);
        assert_eq!(ring_area(&hole.points), 1.0);
    }
}
