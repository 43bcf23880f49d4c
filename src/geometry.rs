use crate::error::{MosaicError, Result};

/// Target shape of the validated crop, one pixel per source pixel.
/// Immutable once computed for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropShape {
    pub width: u32,
    pub height: u32,
}

/// Aspect ratios whose short/long ratio falls strictly inside this band are
/// treated as a 2:3 (or 3:2) brick shape.
const RATIO_BAND: (f64, f64) = (0.63, 0.7);

/// Checks minimum size and classifies the image's aspect ratio into one of
/// the three recognized crop shapes.
///
/// Rounding is round-half-to-even on the `min_size / (2/3)` division,
/// then truncation to integer.
pub fn validate(width: u32, height: u32, min_size: u32) -> Result<CropShape> {
    if width < min_size || height < min_size {
        return Err(MosaicError::ImageTooSmall { width, height, min_size });
    }

    let w = f64::from(width);
    let h = f64::from(height);
    let long_side = round_div_two_thirds(min_size);

    if in_band(h / w) {
        Ok(CropShape { width: long_side, height: min_size })
    } else if in_band(w / h) {
        Ok(CropShape { width: min_size, height: long_side })
    } else if width == height {
        Ok(CropShape { width: min_size, height: min_size })
    } else {
        Err(MosaicError::UnsupportedAspectRatio { width, height })
    }
}

fn in_band(ratio: f64) -> bool {
    RATIO_BAND.0 < ratio && ratio < RATIO_BAND.1
}

fn round_div_two_thirds(min_size: u32) -> u32 {
    (f64::from(min_size) / (2.0 / 3.0)).round_ties_even() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_image_crops_to_min_size() {
        let shape = validate(100, 100, 30).unwrap();
        assert_eq!(shape, CropShape { width: 30, height: 30 });
    }

    #[test]
    fn wide_image_in_band_gets_stretched_width() {
        // 130/200 = 0.65, inside (0.63, 0.7): width becomes min_size / (2/3).
        let shape = validate(200, 130, 60).unwrap();
        assert_eq!(shape, CropShape { width: 90, height: 60 });
    }

    #[test]
    fn tall_image_in_band_gets_stretched_height() {
        let shape = validate(130, 200, 60).unwrap();
        assert_eq!(shape, CropShape { width: 60, height: 90 });
    }

    #[test]
    fn half_values_round_to_even() {
        // 35 / (2/3) = 52.5 rounds to 52, matching numpy's banker's rounding.
        let shape = validate(200, 130, 35).unwrap();
        assert_eq!(shape, CropShape { width: 52, height: 35 });
        // 25 / (2/3) = 37.5 rounds to 38.
        let shape = validate(200, 130, 25).unwrap();
        assert_eq!(shape, CropShape { width: 38, height: 25 });
    }

    #[test]
    fn too_small_image_is_rejected() {
        let err = validate(50, 50, 100).unwrap_err();
        assert!(matches!(
            err,
            MosaicError::ImageTooSmall { width: 50, height: 50, min_size: 100 }
        ));
    }

    #[test]
    fn unrecognized_ratio_is_rejected() {
        let err = validate(100, 40, 30).unwrap_err();
        assert!(matches!(err, MosaicError::UnsupportedAspectRatio { .. }));
    }

    #[test]
    fn band_bounds_are_exclusive() {
        // 63/100 = 0.63 and 70/100 = 0.7 sit exactly on the band edges.
        assert!(validate(100, 63, 30).is_err());
        assert!(validate(100, 70, 30).is_err());
    }
}
