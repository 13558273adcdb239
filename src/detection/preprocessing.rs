use image::{GrayImage, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::{dilate, erode};

/// Convert image to grayscale
pub fn to_grayscale(img: &RgbImage) -> GrayImage {
    image::imageops::grayscale(img)
}

/// Apply Gaussian blur to reduce noise
pub fn apply_blur(img: &GrayImage, sigma: f32) -> GrayImage {
    gaussian_blur_f32(img, sigma)
}

/// Detect edges using Canny edge detector
pub fn detect_edges(img: &GrayImage, low_threshold: f32, high_threshold: f32) -> GrayImage {
    canny(img, low_threshold, high_threshold)
}

/// Close small gaps in the edge map: dilate to bridge broken strokes, then
/// erode to thin them back while keeping the closure. `radius` is the
/// half-width of the square structuring element.
pub fn close_edges(img: &GrayImage, radius: u8, dilate_passes: u32, erode_passes: u32) -> GrayImage {
    let mut out = img.clone();
    for _ in 0..dilate_passes {
        out = dilate(&out, Norm::LInf, radius);
    }
    for _ in 0..erode_passes {
        out = erode(&out, Norm::LInf, radius);
    }
    out
}
