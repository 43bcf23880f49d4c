//! brick_mosaic converts a photographic image into a brick mosaic: the
//! image is cropped to one of three recognized shapes, downsampled so each
//! pixel corresponds to one brick, every pixel is replaced by a palette
//! color, and the result is upsampled for viewing. Alongside the image the
//! run produces a positional map of palette IDs and a legend counting how
//! many bricks of each color are needed.

pub mod error;
pub mod geometry;
pub mod matcher;
pub mod mosaic;
pub mod palette;
pub mod quantize;
pub mod report;
pub mod resample;

pub use error::{MosaicError, Result};
pub use geometry::CropShape;
pub use mosaic::{ColorCount, Mode, MosaicRun};
pub use palette::{default_palette, load_palette_file, Palette, PaletteEntry};

use image::io::Reader as ImageReader;
use image::{DynamicImage, RgbImage};
use log::info;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Tunable pipeline options.
#[derive(Debug, Clone)]
pub struct Options {
    /// Minimum size in pixels of the image's short side.
    pub min_size: u32,
    /// Brick density: fraction of crop pixels kept per axis when
    /// downsampling. Smaller values mean fewer, larger bricks.
    pub brick_size: f64,
    /// Color resolution mode.
    pub mode: Mode,
}

pub fn default_options() -> Options {
    Options { min_size: 30, brick_size: 1.0 / 3.0, mode: Mode::Direct }
}

/// A full file-to-file run.
#[derive(Debug, Clone)]
pub struct Params {
    pub input: PathBuf,
    /// Directory for the output image; defaults to the input's directory.
    pub output_dir: Option<PathBuf>,
    pub palette: Palette,
    pub options: Options,
}

/// Everything a mosaic run produces in memory.
#[derive(Debug, Clone)]
pub struct MosaicOutput {
    /// The upsampled mosaic image, sized to the crop shape.
    pub image: RgbImage,
    pub run: MosaicRun,
    pub crop: CropShape,
    /// Brick grid dimensions (the downsampled raster size).
    pub brick_w: u32,
    pub brick_h: u32,
}

/// Core pipeline operating on a provided image in memory.
///
/// Validates geometry, stretches to the crop shape, downsamples to one
/// pixel per brick, resolves every brick against the palette, and
/// upsamples back. No file is touched.
pub fn process_dynamic(
    dyn_img: &DynamicImage,
    palette: &Palette,
    options: &Options,
) -> Result<MosaicOutput> {
    let (width, height) = (dyn_img.width(), dyn_img.height());
    let crop = geometry::validate(width, height, options.min_size)?;
    info!("crop shape: {}x{}", crop.width, crop.height);

    let rgb = dyn_img.to_rgb8();
    let cropped = resample::stretch_to_crop(&rgb, crop);
    let (brick_w, brick_h) = resample::brick_dimensions(crop, options.brick_size);
    info!("brick grid: {}x{}", brick_w, brick_h);

    let mut bricks = resample::downsample(&cropped, brick_w, brick_h);
    let run = mosaic::build_mosaic(&mut bricks, palette, options.mode);
    let image = resample::upsample(&bricks, crop);

    Ok(MosaicOutput { image, run, crop, brick_w, brick_h })
}

/// File-to-file run: open the input, build the mosaic, save the output
/// image named with a run timestamp. Returns the saved path and the run's
/// in-memory output. Nothing is written if any stage fails.
pub fn process(params: &Params) -> Result<(PathBuf, MosaicOutput)> {
    info!("input image: {}", params.input.display());
    let dyn_img = ImageReader::open(&params.input)
        .map_err(|_| MosaicError::FileNotFound { path: params.input.clone() })?
        .decode()
        .map_err(|_| MosaicError::FileNotFound { path: params.input.clone() })?;

    let output = process_dynamic(&dyn_img, &params.palette, &params.options)?;

    let out_path = timestamped_output_path(&params.input, params.output_dir.as_deref());
    output.image.save(&out_path)?;
    info!("output saved: {}", out_path.display());
    Ok((out_path, output))
}

fn timestamped_output_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("mosaic");
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let dir = output_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input.parent().unwrap_or_else(|| Path::new(".")).to_path_buf());
    dir.join(format!("{stem}_{secs}.png"))
}
