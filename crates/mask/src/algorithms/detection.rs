use std::collections::HashMap;
use crate::{traits::HoleDetector, types::{ComplexShape, TracedContour}};

/// Topology-based hole detector: every outer border becomes a shape and
/// every hole border is attached to the outer border that encloses it.
#[derive(Debug, Clone, Default)]
pub struct BorderHoleDetector;

impl HoleDetector for BorderHoleDetector {
    fn detect_holes(&self, contours: Vec<TracedContour>) -> Vec<ComplexShape> {
        let mut shapes = Vec::new();
        let mut shape_of_contour = HashMap::new();

        for (index, contour) in contours.iter().enumerate() {
            if contour.is_hole {
                continue;
            }
            shape_of_contour.insert(index, shapes.len());
            shapes.push(ComplexShape {
                exterior: contour.points.clone(),
                holes: Vec::new(),
            });
        }

        for contour in contours.into_iter().filter(|c| c.is_hole) {
            let owner = contour
                .parent
                .and_then(|parent| shape_of_contour.get(&parent))
                .copied();
            match owner {
                Some(shape) => shapes[shape].holes.push(contour.points),
                None => tracing::warn!("hole contour without an enclosing border was dropped"),
            }
        }

        shapes
    }
}

/// Keeps only outer borders, discarding holes
#[derive(Debug, Clone, Default)]
pub struct NoHoleDetector;

impl HoleDetector for NoHoleDetector {
    fn detect_holes(&self, contours: Vec<TracedContour>) -> Vec<ComplexShape> {
        contours
            .into_iter()
            .filter(|contour| !contour.is_hole)
            .map(|contour| ComplexShape {
                exterior: contour.points,
                holes: Vec::new(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contours() -> Vec<TracedContour> {
        vec![
            TracedContour {
                points: vec![[0.0, 0.0], [9.0, 0.0], [9.0, 9.0], [0.0, 9.0]],
                is_hole: false,
                parent: None,
            },
            TracedContour {
                points: vec![[3.0, 3.0], [5.0, 3.0], [5.0, 5.0]],
                is_hole: true,
                parent: Some(0),
            },
            TracedContour {
                points: vec![[20.0, 20.0], [21.0, 20.0], [21.0, 21.0]],
                is_hole: false,
                parent: None,
            },
        ]
    }

    #[test]
    fn test_border_detector_attaches_holes() {
        let shapes = BorderHoleDetector.detect_holes(contours());
        assert_eq!(shapes.len(), 2);
        assert_eq!(shapes[0].holes.len(), 1);
        assert!(shapes[1].holes.is_empty());
    }

    #[test]
    fn test_no_hole_detector_drops_holes() {
        let shapes = NoHoleDetector.detect_holes(contours());
        assert_eq!(shapes.len(), 2);
        assert!(shapes.iter().all(|s| !s.has_holes()));
    }
}
