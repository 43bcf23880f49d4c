use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a mosaic run. All of them are fatal: no output
/// artifact is written once any of these is raised.
#[derive(Error, Debug)]
pub enum MosaicError {
    #[error("input image not found or unreadable: {path}")]
    FileNotFound { path: PathBuf },

    #[error("image too small ({width}x{height}): minimum size on the short side is {min_size} pixels")]
    ImageTooSmall { width: u32, height: u32, min_size: u32 },

    #[error("unsupported aspect ratio for {width}x{height} image")]
    UnsupportedAspectRatio { width: u32, height: u32 },

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, MosaicError>;
