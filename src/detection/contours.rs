use image::GrayImage;
use imageproc::contours::{self, BorderType};

use crate::models::{Contour, Point2D, Quadrilateral};

/// Trace the external contours of the foreground (non-zero) pixels.
pub fn external_contours(binary: &GrayImage) -> Vec<Contour> {
    contours::find_contours::<i32>(binary)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer)
        .map(|c| {
            Contour::new(
                c.points
                    .iter()
                    .map(|p| Point2D::new(f64::from(p.x), f64::from(p.y)))
                    .collect(),
            )
        })
        .collect()
}

/// The contour enclosing the most area, if any exist.
pub fn largest(contours: &[Contour]) -> Option<&Contour> {
    contours.iter().max_by(|a, b| {
        a.area()
            .partial_cmp(&b.area())
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

/// Among contours enclosing more than `min_area`, pick the largest one
/// whose polygon approximation (at `tolerance` × perimeter) has exactly
/// four vertices. That contour is taken to be the map outline.
pub fn largest_quadrilateral(
    contours: &[Contour],
    min_area: f64,
    tolerance: f64,
) -> Option<Quadrilateral> {
    let mut best: Option<(f64, Quadrilateral)> = None;
    for contour in contours {
        let area = contour.area();
        if area <= min_area {
            continue;
        }
        if let Some((best_area, _)) = best {
            if area <= best_area {
                continue;
            }
        }
        let approx = approx_polygon(contour.points(), tolerance * contour.perimeter());
        if let [a, b, c, d] = approx[..] {
            best = Some((area, Quadrilateral::from_unordered([a, b, c, d])));
        }
    }
    best.map(|(_, quad)| quad)
}

/// Ramer-Douglas-Peucker simplification of a closed contour.
///
/// The curve is split at the point farthest from its start, each half is
/// simplified as an open polyline and the halves are rejoined without
/// duplicating the split points.
pub fn approx_polygon(points: &[Point2D], epsilon: f64) -> Vec<Point2D> {
    if points.len() <= 3 {
        return points.to_vec();
    }
    let mut far = 0;
    let mut far_dist = 0.0;
    for (i, p) in points.iter().enumerate() {
        let d = points[0].distance(*p);
        if d > far_dist {
            far_dist = d;
            far = i;
        }
    }
    if far == 0 {
        // every point coincides with the first
        return vec![points[0]];
    }

    let mut first = Vec::new();
    simplify_open(&points[..=far], epsilon, &mut first);
    let mut back_half: Vec<Point2D> = points[far..].to_vec();
    back_half.push(points[0]);
    let mut second = Vec::new();
    simplify_open(&back_half, epsilon, &mut second);

    first.pop();
    second.pop();
    first.extend(second);
    first
}

fn simplify_open(points: &[Point2D], epsilon: f64, out: &mut Vec<Point2D>) {
    if points.len() <= 2 {
        out.extend_from_slice(points);
        return;
    }
    let first = points[0];
    let last = points[points.len() - 1];
    let mut worst = 0;
    let mut worst_dist = 0.0;
    for (i, p) in points.iter().enumerate().take(points.len() - 1).skip(1) {
        let d = line_distance(*p, first, last);
        if d > worst_dist {
            worst_dist = d;
            worst = i;
        }
    }
    if worst_dist > epsilon {
        simplify_open(&points[..=worst], epsilon, out);
        out.pop();
        simplify_open(&points[worst..], epsilon, out);
    } else {
        out.push(first);
        out.push(last);
    }
}

/// Perpendicular distance from `p` to the line through `a` and `b`.
fn line_distance(p: Point2D, a: Point2D, b: Point2D) -> f64 {
    let length = a.distance(b);
    if length == 0.0 {
        return p.distance(a);
    }
    ((b.x - a.x) * (a.y - p.y) - (a.x - p.x) * (b.y - a.y)).abs() / length
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn filled_rect(img: &mut GrayImage, x0: u32, y0: u32, w: u32, h: u32) {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                img.put_pixel(x, y, Luma([255]));
            }
        }
    }

    #[test]
    fn blank_image_has_no_contours() {
        let img = GrayImage::new(32, 32);
        assert!(external_contours(&img).is_empty());
    }

    #[test]
    fn filled_rectangle_yields_one_external_contour() {
        let mut img = GrayImage::new(100, 100);
        filled_rect(&mut img, 20, 30, 40, 25);
        let found = external_contours(&img);
        assert_eq!(found.len(), 1);
        assert!(found[0].area() > 35.0 * 20.0);
    }

    #[test]
    fn largest_prefers_the_bigger_blob() {
        let mut img = GrayImage::new(100, 100);
        filled_rect(&mut img, 5, 5, 10, 10);
        filled_rect(&mut img, 40, 40, 30, 30);
        let found = external_contours(&img);
        assert_eq!(found.len(), 2);
        let biggest = largest(&found).unwrap();
        assert!(biggest.area() > 500.0);
    }

    #[test]
    fn largest_of_empty_set_is_none() {
        assert!(largest(&[]).is_none());
    }

    #[test]
    fn quadrilateral_found_for_a_large_rectangle() {
        let mut img = GrayImage::new(200, 200);
        filled_rect(&mut img, 20, 30, 150, 120);
        let found = external_contours(&img);
        let quad = largest_quadrilateral(&found, 5000.0, 0.02).expect("rectangle should qualify");
        // traced boundary corners sit on the outermost foreground pixels
        assert!(quad.top_left.distance(Point2D::new(20.0, 30.0)) < 3.0);
        assert!(quad.bottom_right.distance(Point2D::new(169.0, 149.0)) < 3.0);
    }

    #[test]
    fn small_rectangle_is_rejected_by_area_threshold() {
        let mut img = GrayImage::new(100, 100);
        filled_rect(&mut img, 10, 10, 20, 20);
        let found = external_contours(&img);
        assert!(largest_quadrilateral(&found, 5000.0, 0.02).is_none());
    }

    #[test]
    fn approx_polygon_reduces_a_noisy_square_to_four_corners() {
        // a 40x40 square sampled every pixel along its boundary
        let mut pts = Vec::new();
        for i in 0..40 {
            pts.push(Point2D::new(f64::from(i), 0.0));
        }
        for i in 0..40 {
            pts.push(Point2D::new(40.0, f64::from(i)));
        }
        for i in 0..40 {
            pts.push(Point2D::new(f64::from(40 - i), 40.0));
        }
        for i in 0..40 {
            pts.push(Point2D::new(0.0, f64::from(40 - i)));
        }
        let approx = approx_polygon(&pts, 2.0);
        assert_eq!(approx.len(), 4, "got {approx:?}");
    }
}
