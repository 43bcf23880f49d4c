use crate::geometry::CropShape;
use image::imageops::{self, FilterType};
use image::RgbImage;

/// Stretch the source image directly to the crop shape. Aspect ratio is not
/// preserved here: the validator already fixed the target shape.
pub fn stretch_to_crop(image: &RgbImage, shape: CropShape) -> RgbImage {
    imageops::resize(image, shape.width, shape.height, FilterType::Triangle)
}

/// Compute the downsampled dimensions, one pixel per mosaic brick.
/// `brick_size` is a positive fraction (typically < 1); smaller values mean
/// fewer, larger bricks. Rounding is round-half-to-even, matching the
/// crop-shape rounding.
pub fn brick_dimensions(shape: CropShape, brick_size: f64) -> (u32, u32) {
    let new_w = (f64::from(shape.width) * brick_size).round_ties_even() as u32;
    let new_h = (f64::from(shape.height) * brick_size).round_ties_even() as u32;
    (new_w, new_h)
}

/// Downsample the cropped image so each output pixel becomes one brick's
/// source color.
pub fn downsample(image: &RgbImage, new_w: u32, new_h: u32) -> RgbImage {
    imageops::resize(image, new_w, new_h, FilterType::Triangle)
}

/// Upsample the color-replaced raster back to the crop shape for viewing.
/// Runs only after color replacement.
pub fn upsample(image: &RgbImage, shape: CropShape) -> RgbImage {
    imageops::resize(image, shape.width, shape.height, FilterType::CatmullRom)
}
