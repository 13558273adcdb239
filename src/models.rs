//! Geometry types shared by the detection pipeline.

/// A point in pixel coordinates (x right, y down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Self) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Midpoint of the segment from `self` to `other`.
    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A closed polygonal boundary traced from a binary image.
///
/// Point order is a detector artifact; it only matters for the area and
/// perimeter computations, which treat the sequence as a closed polygon.
#[derive(Debug, Clone)]
pub struct Contour {
    points: Vec<Point2D>,
}

impl Contour {
    pub fn new(points: Vec<Point2D>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point2D] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Enclosed area by the shoelace formula. Degenerate contours with
    /// fewer than 3 points have zero area.
    pub fn area(&self) -> f64 {
        polygon_area(&self.points)
    }

    /// Closed-polygon perimeter.
    pub fn perimeter(&self) -> f64 {
        if self.points.len() < 2 {
            return 0.0;
        }
        let mut total = 0.0;
        for i in 0..self.points.len() {
            let next = self.points[(i + 1) % self.points.len()];
            total += self.points[i].distance(next);
        }
        total
    }
}

/// Shoelace area of a closed polygon given by its vertices.
pub fn polygon_area(points: &[Point2D]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        twice_area += a.x * b.y - b.x * a.y;
    }
    (twice_area / 2.0).abs()
}

/// Four corners in canonical order.
///
/// The ordering is always derived by [`Quadrilateral::from_unordered`],
/// never assumed from detector output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadrilateral {
    pub top_left: Point2D,
    pub top_right: Point2D,
    pub bottom_left: Point2D,
    pub bottom_right: Point2D,
}

impl Quadrilateral {
    /// Order four corner points canonically: the top-left corner minimizes
    /// x + y, the bottom-right maximizes it, the top-right minimizes y − x
    /// and the bottom-left maximizes y − x.
    pub fn from_unordered(points: [Point2D; 4]) -> Self {
        let extreme = |key: fn(Point2D) -> f64, flip: bool| {
            let mut best = points[0];
            for &p in &points[1..] {
                let better = if flip { key(p) > key(best) } else { key(p) < key(best) };
                if better {
                    best = p;
                }
            }
            best
        };
        Self {
            top_left: extreme(|p| p.x + p.y, false),
            bottom_right: extreme(|p| p.x + p.y, true),
            top_right: extreme(|p| p.y - p.x, false),
            bottom_left: extreme(|p| p.y - p.x, true),
        }
    }

    pub fn corners(&self) -> [Point2D; 4] {
        [self.top_left, self.top_right, self.bottom_left, self.bottom_right]
    }
}

/// Three triangle vertices in fitter output order (arbitrary).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Point2D; 3],
}

impl Triangle {
    pub fn new(a: Point2D, b: Point2D, c: Point2D) -> Self {
        Self { vertices: [a, b, c] }
    }

    pub fn area(&self) -> f64 {
        polygon_area(&self.vertices)
    }
}

/// The oriented marker: its tip and the midpoint of the opposite edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub tip: Point2D,
    pub midpoint: Point2D,
}

/// Marker position normalized to [0,1]², origin at the bottom-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Normalize a pixel coordinate; the vertical axis is flipped so that
    /// y grows upward from the bottom edge.
    pub fn from_pixel(tip: Point2D, width: u32, height: u32) -> Self {
        Self {
            x: tip.x / f64::from(width),
            y: (f64::from(height) - tip.y) / f64::from(height),
        }
    }
}

/// Compass-style direction in degrees, clockwise from up, in [0, 360).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bearing(f64);

impl Bearing {
    pub fn degrees(self) -> f64 {
        self.0
    }

    /// Bearing of the ray from `midpoint` to `tip` in pixel coordinates
    /// (y grows downward).
    ///
    /// The axis-aligned cases are branched explicitly so a vertical or
    /// horizontal ray never divides by zero; the coincident-point case is
    /// defined (degenerate) as 0°. Inputs must be finite — the pipeline
    /// validates vertices before calling this.
    pub fn between(midpoint: Point2D, tip: Point2D) -> Self {
        let dx = tip.x - midpoint.x;
        let dy = tip.y - midpoint.y;
        let degrees = if dx == 0.0 {
            if dy == 0.0 {
                0.0
            } else if midpoint.y > tip.y {
                0.0
            } else {
                180.0
            }
        } else if dy == 0.0 {
            if midpoint.x < tip.x { 90.0 } else { 270.0 }
        } else {
            let raw = (dy / dx).atan().to_degrees();
            // Quadrant disambiguation: arctan only covers (-90°, 90°).
            let lowering = midpoint.y < tip.y;
            if (lowering && raw < 0.0) || (!lowering && raw > 0.0) {
                raw + 270.0
            } else {
                raw + 90.0
            }
        };
        Self(degrees)
    }
}
