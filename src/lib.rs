pub mod detection;
pub mod models;

pub use detection::{DetectError, DetectionPipeline, MarkerReading, PipelineConfig};
pub use models::{Bearing, Contour, Point2D, Pointer, Position, Quadrilateral, Triangle};
