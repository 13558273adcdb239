use image::{Rgb, RgbImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp};

use super::DetectError;
use crate::models::Quadrilateral;

/// Warp the photograph so the detected map corners land on the image
/// corners, then trim `margin` pixels from every side to discard the
/// resampling artifacts that collect along the warped border.
pub fn rectify(
    image: &RgbImage,
    corners: &Quadrilateral,
    margin: u32,
) -> Result<RgbImage, DetectError> {
    let (width, height) = image.dimensions();
    if width <= 2 * margin || height <= 2 * margin {
        return Err(DetectError::CropExceedsImage {
            margin,
            width,
            height,
        });
    }

    let src = corners.corners().map(|p| (p.x as f32, p.y as f32));
    let dst = [
        (0.0, 0.0),
        (width as f32, 0.0),
        (0.0, height as f32),
        (width as f32, height as f32),
    ];
    // from_control_points rejects collinear corner sets, which would
    // otherwise produce an unstable transform.
    let projection =
        Projection::from_control_points(src, dst).ok_or(DetectError::DegenerateCorners)?;
    let warped = warp(image, &projection, Interpolation::Bilinear, Rgb([0, 0, 0]));

    Ok(
        image::imageops::crop_imm(&warped, margin, margin, width - 2 * margin, height - 2 * margin)
            .to_image(),
    )
}
