use image::{GrayImage, Luma, Rgb, RgbImage};
use palette::{FromColor, Hsv, Srgb};

/// Binary marker mask plus the rectified image with everything outside
/// the mask blacked out.
pub struct RedMask {
    pub mask: GrayImage,
    pub isolated: RgbImage,
}

/// An inclusive hue interval on the 0–180 half-degree hue scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HueBand {
    pub lo: u8,
    pub hi: u8,
}

impl HueBand {
    pub const fn new(lo: u8, hi: u8) -> Self {
        Self { lo, hi }
    }

    fn contains(self, hue: f32) -> bool {
        hue >= f32::from(self.lo) && hue <= f32::from(self.hi)
    }
}

/// Isolate the red marker. Red straddles the hue wraparound, so two bands
/// are OR-ed together; the saturation and value floors reject washed-out
/// and near-black pixels whose hue is red only numerically.
pub fn isolate_red(
    image: &RgbImage,
    bands: [HueBand; 2],
    min_saturation: u8,
    min_value: u8,
) -> RedMask {
    let (width, height) = image.dimensions();
    let mut mask = GrayImage::new(width, height);
    let mut isolated = RgbImage::new(width, height);
    for (x, y, pixel) in image.enumerate_pixels() {
        let (hue, saturation, value) = hue_saturation_value(*pixel);
        let red = (bands[0].contains(hue) || bands[1].contains(hue))
            && saturation >= f32::from(min_saturation)
            && value >= f32::from(min_value);
        if red {
            mask.put_pixel(x, y, Luma([255]));
            isolated.put_pixel(x, y, *pixel);
        }
    }
    RedMask { mask, isolated }
}

/// Hue on the 0–180 scale, saturation and value on 0–255, matching the
/// ranges the thresholds are expressed in.
fn hue_saturation_value(pixel: Rgb<u8>) -> (f32, f32, f32) {
    let [r, g, b] = pixel.0;
    let srgb = Srgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
    );
    let hsv = Hsv::from_color(srgb);
    (
        hsv.hue.into_positive_degrees() / 2.0,
        hsv.saturation * 255.0,
        hsv.value * 255.0,
    )
}
