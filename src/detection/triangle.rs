//! Minimum-area enclosing triangle of a point set.
//!
//! The search runs on the convex hull. In a minimum-area enclosing
//! triangle at least one side lies flush with a hull edge, and each
//! remaining side is either flush as well or touches the hull with its
//! own midpoint (the Klee–Laskowski/O'Rourke characterization), so
//! enumerating those candidate families and keeping the smallest
//! triangle that still contains the hull recovers the optimum.

use super::DetectError;
use super::contours::approx_polygon;
use crate::models::{Point2D, Triangle};

/// Hulls larger than this are thinned with a coarse polygon
/// approximation before the candidate enumeration; the dropped vertices
/// deviate from the thinned hull by a fraction of a pixel at marker
/// scale.
const HULL_LIMIT: usize = 48;

pub fn min_enclosing_triangle(points: &[Point2D]) -> Result<Triangle, DetectError> {
    let mut hull = convex_hull(points);
    if hull.len() > HULL_LIMIT {
        let mut epsilon = 0.5;
        while hull.len() > HULL_LIMIT {
            hull = approx_polygon(&hull, epsilon);
            epsilon *= 2.0;
        }
    }
    if hull.len() < 3 {
        return Err(DetectError::TriangleFit);
    }
    if hull.len() == 3 {
        return Ok(Triangle::new(hull[0], hull[1], hull[2]));
    }

    let scale = hull
        .iter()
        .fold(1.0f64, |m, p| m.max(p.x.abs()).max(p.y.abs()));
    let tolerance = 1e-6 * scale;

    let n = hull.len();
    let edges: Vec<Line> = (0..n)
        .map(|i| Line::through(hull[i], hull[(i + 1) % n]))
        .collect();
    let mut candidates: Vec<SideCandidate> = edges.iter().map(|e| SideCandidate::Flush(*e)).collect();
    candidates.extend(hull.iter().map(|&v| SideCandidate::MidTouch(v)));

    let mut best: Option<Triangle> = None;
    let mut best_area = f64::INFINITY;
    for base in &edges {
        for first in &candidates {
            for second in &candidates {
                let Some(triangle) = build_triangle(base, first, second, tolerance) else {
                    continue;
                };
                let area = triangle.area();
                if area > tolerance
                    && area < best_area
                    && contains_all(&triangle, &hull, tolerance)
                {
                    best_area = area;
                    best = Some(triangle);
                }
            }
        }
    }
    best.ok_or(DetectError::TriangleFit)
}

/// A line through `origin` with unit direction `dir`.
#[derive(Debug, Clone, Copy)]
struct Line {
    origin: Point2D,
    dir: (f64, f64),
}

impl Line {
    fn through(a: Point2D, b: Point2D) -> Self {
        let length = a.distance(b);
        Self {
            origin: a,
            dir: ((b.x - a.x) / length, (b.y - a.y) / length),
        }
    }

    fn at(&self, t: f64) -> Point2D {
        Point2D::new(self.origin.x + t * self.dir.0, self.origin.y + t * self.dir.1)
    }

    fn intersect(&self, other: &Line) -> Option<Point2D> {
        let det = self.dir.0 * other.dir.1 - other.dir.0 * self.dir.1;
        if det.abs() < 1e-9 {
            return None;
        }
        let rx = other.origin.x - self.origin.x;
        let ry = other.origin.y - self.origin.y;
        let t = (rx * other.dir.1 - other.dir.0 * ry) / det;
        Some(self.at(t))
    }

    /// Parameter of the orthogonal projection of `p` onto the line.
    fn project(&self, p: Point2D) -> f64 {
        (p.x - self.origin.x) * self.dir.0 + (p.y - self.origin.y) * self.dir.1
    }
}

/// How a non-base triangle side may touch the hull.
#[derive(Debug, Clone, Copy)]
enum SideCandidate {
    /// The side lies along this hull edge.
    Flush(Line),
    /// The side's midpoint rests on this hull vertex.
    MidTouch(Point2D),
}

fn build_triangle(
    base: &Line,
    first: &SideCandidate,
    second: &SideCandidate,
    tolerance: f64,
) -> Option<Triangle> {
    match (first, second) {
        (SideCandidate::Flush(a), SideCandidate::Flush(b)) => {
            let v1 = base.intersect(a)?;
            let v2 = base.intersect(b)?;
            let apex = a.intersect(b)?;
            Some(Triangle::new(v1, v2, apex))
        }
        (SideCandidate::Flush(flush), SideCandidate::MidTouch(q)) => {
            flush_and_midpoint(base, flush, *q)
        }
        (SideCandidate::MidTouch(p), SideCandidate::Flush(flush)) => {
            flush_and_midpoint(base, flush, *p)
        }
        (SideCandidate::MidTouch(p), SideCandidate::MidTouch(q)) => {
            // A side from P on the base to the apex X with midpoint p gives
            // X = 2p − P; the matching relation for q forces the offset
            // 2(q − p) to run along the base.
            let wx = 2.0 * (q.x - p.x);
            let wy = 2.0 * (q.y - p.y);
            if (wx * base.dir.1 - wy * base.dir.0).abs() > tolerance {
                return None;
            }
            let t = wx * base.dir.0 + wy * base.dir.1;
            let center = base.at(base.project(p.midpoint(*q)));
            let v1 = Point2D::new(center.x - 0.5 * t * base.dir.0, center.y - 0.5 * t * base.dir.1);
            let v2 = Point2D::new(center.x + 0.5 * t * base.dir.0, center.y + 0.5 * t * base.dir.1);
            let apex = Point2D::new(p.x + q.x - center.x, p.y + q.y - center.y);
            Some(Triangle::new(v1, v2, apex))
        }
    }
}

/// Triangle with one side flush with `flush`, one side on the base line
/// and the third side running from the base to the apex with its midpoint
/// pinned to `mid`.
fn flush_and_midpoint(base: &Line, flush: &Line, mid: Point2D) -> Option<Triangle> {
    // Solve flush.at(u) = 2·mid − base.at(s) for (u, s): the apex sits on
    // the flush line and mirrors the base foot through `mid`.
    let det = flush.dir.0 * base.dir.1 - base.dir.0 * flush.dir.1;
    if det.abs() < 1e-9 {
        return None;
    }
    let rx = 2.0 * mid.x - base.origin.x - flush.origin.x;
    let ry = 2.0 * mid.y - base.origin.y - flush.origin.y;
    let u = (rx * base.dir.1 - base.dir.0 * ry) / det;
    let s = (flush.dir.0 * ry - rx * flush.dir.1) / det;

    let apex = flush.at(u);
    let foot = base.at(s);
    let shared = base.intersect(flush)?;
    Some(Triangle::new(shared, foot, apex))
}

fn contains_all(triangle: &Triangle, points: &[Point2D], tolerance: f64) -> bool {
    let [a, b, c] = triangle.vertices;
    let orientation = cross(a, b, c);
    if orientation.abs() < tolerance {
        return false;
    }
    let sign = orientation.signum();
    for &p in points {
        for (va, vb) in [(a, b), (b, c), (c, a)] {
            let length = va.distance(vb);
            if length == 0.0 {
                return false;
            }
            if sign * cross(va, vb, p) / length < -tolerance {
                return false;
            }
        }
    }
    true
}

fn cross(o: Point2D, a: Point2D, b: Point2D) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (b.x - o.x) * (a.y - o.y)
}

/// Andrew's monotone chain; collinear points are dropped so the hull is
/// strictly convex.
fn convex_hull(points: &[Point2D]) -> Vec<Point2D> {
    let mut pts: Vec<Point2D> = points.to_vec();
    pts.sort_by(|a, b| {
        a.x.partial_cmp(&b.x)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal))
    });
    pts.dedup();
    if pts.len() < 3 {
        return pts;
    }

    let mut lower: Vec<Point2D> = Vec::new();
    for &p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }
    let mut upper: Vec<Point2D> = Vec::new();
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}
