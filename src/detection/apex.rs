//! Tip detection: which triangle vertex is the pointer's apex.

use super::DetectError;
use crate::models::{Point2D, Pointer, Triangle};

const COINCIDENT_EPS: f64 = 1e-9;

/// Slope of the edge from `a` to `b`, keeping the vertical case symbolic
/// instead of dividing by zero.
#[derive(Debug, Clone, Copy)]
enum Slope {
    Vertical,
    Finite(f64),
}

fn edge_slope(a: Point2D, b: Point2D) -> Result<Slope, DetectError> {
    if a.distance(b) < COINCIDENT_EPS {
        return Err(DetectError::DegenerateTriangle);
    }
    let dx = b.x - a.x;
    if dx == 0.0 {
        Ok(Slope::Vertical)
    } else {
        Ok(Slope::Finite((b.y - a.y) / dx))
    }
}

/// Interior angle at `at` between the edges toward the other two
/// vertices, in whole degrees.
///
/// Angles are rounded before they are compared so near-ties resolve the
/// same way everywhere. The perpendicular-edge case, where the formula's
/// denominator reaches zero, is branched to exactly 90°.
fn interior_angle(at: Point2D, toward_a: Point2D, toward_b: Point2D) -> Result<i64, DetectError> {
    let first = edge_slope(at, toward_a)?;
    let second = edge_slope(at, toward_b)?;
    let degrees = match (first, second) {
        // two vertical edges at one vertex means the triple is collinear
        (Slope::Vertical, Slope::Vertical) => return Err(DetectError::DegenerateTriangle),
        (Slope::Vertical, Slope::Finite(m)) | (Slope::Finite(m), Slope::Vertical) => {
            90.0 - m.atan().to_degrees().abs()
        }
        (Slope::Finite(a), Slope::Finite(b)) => {
            let denominator = 1.0 + a * b;
            if denominator == 0.0 {
                90.0
            } else {
                ((b - a) / denominator).atan().to_degrees().abs()
            }
        }
    };
    Ok(degrees.round() as i64)
}

/// Designate the vertex with the smallest interior angle as the tip and
/// return it together with the midpoint of the opposite edge.
///
/// On a tie the first vertex in input order wins. That rule is an
/// evaluation-order artifact kept for output stability, not a geometric
/// choice: exact-tie inputs may pick a different tip if the upstream
/// fitter reorders its vertices.
pub fn find_pointer(triangle: &Triangle) -> Result<Pointer, DetectError> {
    let [p1, p2, p3] = triangle.vertices;
    if !(p1.is_finite() && p2.is_finite() && p3.is_finite()) {
        return Err(DetectError::DegenerateTriangle);
    }
    let angle1 = interior_angle(p1, p2, p3)?;
    let angle2 = interior_angle(p2, p1, p3)?;
    let angle3 = interior_angle(p3, p1, p2)?;

    let (tip, far_a, far_b) = if angle1 <= angle2 && angle1 <= angle3 {
        (p1, p2, p3)
    } else if angle2 <= angle3 {
        (p2, p1, p3)
    } else {
        (p3, p1, p2)
    };
    Ok(Pointer {
        tip,
        midpoint: far_a.midpoint(far_b),
    })
}
