pub mod apex;
pub mod color_mask;
pub mod contours;
pub mod preprocessing;
pub mod rectify;
pub mod triangle;

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use image::RgbImage;
use tracing::{debug, warn};

use crate::models::{Bearing, Position};
use self::color_mask::HueBand;

/// Tunable pipeline parameters.
///
/// Defaults carry the values the detector was calibrated with; overrides
/// for a different camera, lighting or map size go through this struct
/// instead of edits to stage code.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Gaussian blur sigma applied before edge detection.
    pub blur_sigma: f32,
    /// Canny hysteresis thresholds.
    pub canny_low: f32,
    pub canny_high: f32,
    /// Half-width of the square morphology element ((2r+1)² pixels).
    pub morph_radius: u8,
    /// Dilation / erosion passes used to close gaps in the edge map.
    pub dilate_passes: u32,
    pub erode_passes: u32,
    /// Minimum enclosed area for a contour to count as the map outline.
    pub min_map_area: f64,
    /// Polygon approximation tolerance as a fraction of the perimeter.
    pub polygon_tolerance: f64,
    /// Pixels trimmed from each side of the rectified image.
    pub crop_margin: u32,
    /// The two hue bands that together cover red across the wraparound.
    pub red_band_low: HueBand,
    pub red_band_high: HueBand,
    /// Saturation and value floors on the 0–255 scale.
    pub min_saturation: u8,
    pub min_value: u8,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            blur_sigma: 1.0,
            canny_low: 50.0,
            canny_high: 200.0,
            morph_radius: 2,
            dilate_passes: 2,
            erode_passes: 1,
            min_map_area: 5000.0,
            polygon_tolerance: 0.02,
            crop_margin: 20,
            red_band_low: HueBand::new(0, 10),
            red_band_high: HueBand::new(170, 180),
            min_saturation: 50,
            min_value: 50,
        }
    }
}

/// A stage that cannot produce a valid result ends the run for that image
/// with one of these. They are foreseeable runtime outcomes, not faults.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DetectError {
    #[error("map outline not found: no contour approximates to four corners")]
    MapNotFound,
    #[error("map corners are collinear; cannot rectify")]
    DegenerateCorners,
    #[error("crop margin of {margin} px does not fit a {width}x{height} image")]
    CropExceedsImage { margin: u32, width: u32, height: u32 },
    #[error("marker not found: no red contour in the rectified image")]
    MarkerNotFound,
    #[error("marker contour is too degenerate to enclose in a triangle")]
    TriangleFit,
    #[error("marker triangle has coincident or collinear vertices")]
    DegenerateTriangle,
}

/// A successful reading: where the marker sits and which way it points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerReading {
    pub position: Position,
    pub bearing: Bearing,
}

/// Main detection pipeline orchestrator.
///
/// Each stage feeds the next; state is local to one `detect` call, so a
/// single pipeline value can serve many images (or many threads) at once.
pub struct DetectionPipeline {
    pub config: PipelineConfig,
    debug: Option<DebugSink>,
}

impl DetectionPipeline {
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            debug: None,
        }
    }

    pub fn with_config(config: PipelineConfig) -> Self {
        Self {
            config,
            debug: None,
        }
    }

    /// Save intermediate stage images into `dir`.
    /// The directory must be empty or non-existent.
    pub fn with_debug(mut self, dir: PathBuf) -> Result<Self> {
        self.debug = Some(DebugSink::create(dir)?);
        Ok(self)
    }

    /// Run the full pipeline on a decoded image.
    pub fn detect(&self, image: &RgbImage) -> Result<MarkerReading, DetectError> {
        let (width, height) = image.dimensions();
        let cfg = &self.config;

        let gray = preprocessing::to_grayscale(image);
        let blurred = preprocessing::apply_blur(&gray, cfg.blur_sigma);
        let edges = preprocessing::detect_edges(&blurred, cfg.canny_low, cfg.canny_high);
        let closed = preprocessing::close_edges(
            &edges,
            cfg.morph_radius,
            cfg.dilate_passes,
            cfg.erode_passes,
        );
        if let Some(sink) = &self.debug {
            sink.save_gray("01_edges", &closed);
        }

        let outlines = contours::external_contours(&closed);
        debug!("found {} edge contours", outlines.len());
        let map = contours::largest_quadrilateral(&outlines, cfg.min_map_area, cfg.polygon_tolerance)
            .ok_or(DetectError::MapNotFound)?;
        debug!(?map, "map outline");

        let rectified = rectify::rectify(image, &map, cfg.crop_margin)?;
        if let Some(sink) = &self.debug {
            sink.save_rgb("02_rectified", &rectified);
        }

        let red = color_mask::isolate_red(
            &rectified,
            [cfg.red_band_low, cfg.red_band_high],
            cfg.min_saturation,
            cfg.min_value,
        );
        if let Some(sink) = &self.debug {
            sink.save_gray("03_mask", &red.mask);
            sink.save_rgb("04_marker", &red.isolated);
        }

        let marker_gray = preprocessing::to_grayscale(&red.isolated);
        let blobs = contours::external_contours(&marker_gray);
        let marker = contours::largest(&blobs).ok_or(DetectError::MarkerNotFound)?;
        debug!("marker contour has {} points", marker.len());

        let fitted = triangle::min_enclosing_triangle(marker.points())?;
        let pointer = apex::find_pointer(&fitted)?;
        debug!(?pointer, "marker pointer");

        // Normalized against the source photograph's dimensions; the tip is
        // measured in the cropped rectified frame, which shares them apart
        // from the trimmed margin.
        Ok(MarkerReading {
            position: Position::from_pixel(pointer.tip, width, height),
            bearing: Bearing::between(pointer.midpoint, pointer.tip),
        })
    }
}

impl Default for DetectionPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes intermediate stage images for inspection.
struct DebugSink {
    dir: PathBuf,
}

impl DebugSink {
    fn create(dir: PathBuf) -> Result<Self> {
        if dir.exists() {
            if fs::read_dir(&dir)?.count() > 0 {
                anyhow::bail!("debug directory is not empty: {}", dir.display());
            }
        } else {
            fs::create_dir_all(&dir)?;
        }
        Ok(Self { dir })
    }

    fn save_gray(&self, name: &str, image: &image::GrayImage) {
        self.save(name, image.save(self.path(name)));
    }

    fn save_rgb(&self, name: &str, image: &RgbImage) {
        self.save(name, image.save(self.path(name)));
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.png"))
    }

    fn save(&self, name: &str, outcome: image::ImageResult<()>) {
        if let Err(err) = outcome {
            // debug output is best-effort; never fail the pipeline over it
            warn!("could not save debug image {name}: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_match_the_calibrated_constants() {
        let config = PipelineConfig::default();
        assert!((config.blur_sigma - 1.0).abs() < f32::EPSILON);
        assert!((config.canny_low - 50.0).abs() < f32::EPSILON);
        assert!((config.canny_high - 200.0).abs() < f32::EPSILON);
        assert_eq!(config.morph_radius, 2);
        assert_eq!(config.dilate_passes, 2);
        assert_eq!(config.erode_passes, 1);
        assert!((config.min_map_area - 5000.0).abs() < f64::EPSILON);
        assert!((config.polygon_tolerance - 0.02).abs() < f64::EPSILON);
        assert_eq!(config.crop_margin, 20);
        assert_eq!(config.red_band_low, HueBand::new(0, 10));
        assert_eq!(config.red_band_high, HueBand::new(170, 180));
        assert_eq!(config.min_saturation, 50);
        assert_eq!(config.min_value, 50);
    }
}
