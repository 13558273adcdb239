//! Synthetic scenes for exercising the pipeline end to end: a white
//! backdrop, a black-bordered map sheet and (optionally) a red pointer.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_polygon_mut};
use imageproc::point::Point;
use imageproc::rect::Rect;

pub const SCENE_WIDTH: u32 = 640;
pub const SCENE_HEIGHT: u32 = 480;

// Outer corners of the drawn map sheet in scene coordinates.
pub const MAP_LEFT: f64 = 40.0;
pub const MAP_TOP: f64 = 30.0;
pub const MAP_RIGHT: f64 = 600.0;
pub const MAP_BOTTOM: f64 = 450.0;
const BORDER: i32 = 8;
const CROP_MARGIN: f64 = 20.0;

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const RED: Rgb<u8> = Rgb([200, 0, 0]);

/// An isoceles pointer defined by its tip, heading and size, in scene
/// coordinates.
pub struct MarkerSpec {
    pub tip: (f64, f64),
    /// Heading the pointer faces, degrees clockwise from up.
    pub heading_deg: f64,
    pub length: f64,
    pub base_width: f64,
}

impl MarkerSpec {
    pub fn vertices(&self) -> [(f64, f64); 3] {
        let theta = self.heading_deg.to_radians();
        let dir = (theta.sin(), -theta.cos());
        let base_center = (
            self.tip.0 - self.length * dir.0,
            self.tip.1 - self.length * dir.1,
        );
        let perp = (-dir.1, dir.0);
        let half = self.base_width / 2.0;
        [
            self.tip,
            (
                base_center.0 + half * perp.0,
                base_center.1 + half * perp.1,
            ),
            (
                base_center.0 - half * perp.0,
                base_center.1 - half * perp.1,
            ),
        ]
    }

    /// Where the pipeline should report this marker once the sheet has
    /// been rectified onto the full frame and the border margin trimmed.
    pub fn expected_position(&self) -> (f64, f64) {
        let (x, y) = warp_to_cropped(self.tip);
        (
            x / f64::from(SCENE_WIDTH),
            (f64::from(SCENE_HEIGHT) - y) / f64::from(SCENE_HEIGHT),
        )
    }
}

/// The rectification maps the sheet's outer corners to the frame corners;
/// this applies the same (axis-aligned) mapping plus the crop offset.
fn warp_to_cropped(p: (f64, f64)) -> (f64, f64) {
    let x = (p.0 - MAP_LEFT) * f64::from(SCENE_WIDTH) / (MAP_RIGHT - MAP_LEFT) - CROP_MARGIN;
    let y = (p.1 - MAP_TOP) * f64::from(SCENE_HEIGHT) / (MAP_BOTTOM - MAP_TOP) - CROP_MARGIN;
    (x, y)
}

/// A frontal photo of a map sheet, optionally carrying a red pointer.
pub fn draw_scene(marker: Option<&MarkerSpec>) -> RgbImage {
    let mut img = RgbImage::from_pixel(SCENE_WIDTH, SCENE_HEIGHT, WHITE);
    draw_filled_rect_mut(
        &mut img,
        Rect::at(MAP_LEFT as i32, MAP_TOP as i32)
            .of_size((MAP_RIGHT - MAP_LEFT) as u32, (MAP_BOTTOM - MAP_TOP) as u32),
        BLACK,
    );
    draw_filled_rect_mut(
        &mut img,
        Rect::at(MAP_LEFT as i32 + BORDER, MAP_TOP as i32 + BORDER).of_size(
            (MAP_RIGHT - MAP_LEFT) as u32 - 2 * BORDER as u32,
            (MAP_BOTTOM - MAP_TOP) as u32 - 2 * BORDER as u32,
        ),
        WHITE,
    );
    if let Some(spec) = marker {
        let poly: Vec<Point<i32>> = spec
            .vertices()
            .iter()
            .map(|v| Point::new(v.0.round() as i32, v.1.round() as i32))
            .collect();
        draw_polygon_mut(&mut img, &poly, RED);
    }
    img
}

/// The marker used by most tests, placed to sit near the hand-measured
/// (0.441, 0.607, 264°) reference reading.
pub fn scene_marker() -> MarkerSpec {
    MarkerSpec {
        tip: (304.5, 212.6),
        heading_deg: 264.0,
        length: 70.0,
        base_width: 50.0,
    }
}

/// Absolute bearing difference with 0°/360° wraparound.
pub fn bearing_error(measured: f64, truth: f64) -> f64 {
    let error = (measured - truth).abs();
    if error > 270.0 { (error - 360.0).abs() } else { error }
}
