//! Mosaic construction: resolves every brick's color against the palette
//! and records the positional map plus per-color usage counts.

use crate::matcher::{closest_one, closest_ranked};
use crate::palette::Palette;
use crate::quantize::{color_histogram, derive_palette, dither_to_palette};
use image::{Rgb, RgbImage};
use std::collections::HashMap;

/// How pixel colors are resolved against the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Nearest palette color per pixel. The legend always has one record
    /// per palette entry, possibly with zero quantity.
    Direct,
    /// Reduce the raster to at most `palette.len()` colors with dithered
    /// quantization first, then map each distinct quantized color to its
    /// own palette color. The legend only lists colors actually used.
    Quantize,
}

/// One legend record: which palette color, and how many bricks of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorCount {
    pub id: u32,
    pub rgb: [u8; 3],
    pub quantity: u64,
}

/// Per-run mosaic state, constructed fresh for every invocation.
///
/// `mosaic_map` holds one palette ID per brick in column-major traversal
/// order: all rows of column 0, then column 1, and so on.
#[derive(Debug, Clone, Default)]
pub struct MosaicRun {
    pub mosaic_map: Vec<u32>,
    pub legend: Vec<ColorCount>,
}

/// Resolve every pixel of the downsampled raster in place and return the
/// run's map and legend.
pub fn build_mosaic(image: &mut RgbImage, palette: &Palette, mode: Mode) -> MosaicRun {
    match mode {
        Mode::Direct => build_direct(image, palette),
        Mode::Quantize => build_quantized(image, palette),
    }
}

fn build_direct(image: &mut RgbImage, palette: &Palette) -> MosaicRun {
    let (w, h) = image.dimensions();
    let mut run = MosaicRun {
        mosaic_map: Vec::with_capacity((w * h) as usize),
        legend: palette
            .entries()
            .iter()
            .map(|e| ColorCount { id: e.id, rgb: e.rgb, quantity: 0 })
            .collect(),
    };
    for x in 0..w {
        for y in 0..h {
            let pixel = image.get_pixel(x, y).0;
            let entry = closest_one(palette, pixel);
            image.put_pixel(x, y, Rgb(entry.rgb));
            run.mosaic_map.push(entry.id);
            run.legend[(entry.id - 1) as usize].quantity += 1;
        }
    }
    run
}

fn build_quantized(image: &mut RgbImage, palette: &Palette) -> MosaicRun {
    let derived = derive_palette(image, palette.len());
    let dithered = dither_to_palette(image, &derived);
    let histogram = color_histogram(&dithered);

    // Assign palette colors to quantized colors in ascending brightness
    // order, each taking the first not-yet-used candidate from its ranked
    // list. Brightness sums all three channels.
    let mut order: Vec<usize> = (0..histogram.len()).collect();
    order.sort_by_key(|&i| brightness(histogram[i].0));

    let mut used = vec![false; palette.len()];
    let mut table: HashMap<[u8; 3], u32> = HashMap::new();
    let mut legend: Vec<ColorCount> = Vec::new();
    for &i in &order {
        let (quantized, quantity) = histogram[i];
        let assigned = closest_ranked(palette, quantized)
            .into_iter()
            .find(|e| !used[(e.id - 1) as usize]);
        match assigned {
            Some(entry) => {
                used[(entry.id - 1) as usize] = true;
                table.insert(quantized, entry.id);
                legend.push(ColorCount { id: entry.id, rgb: entry.rgb, quantity });
            }
            None => {
                // More distinct quantized colors than palette entries: fall
                // back to the closest already-used color and merge counts so
                // legend quantities still sum to the pixel count.
                let entry = closest_one(palette, quantized);
                table.insert(quantized, entry.id);
                if let Some(record) = legend.iter_mut().find(|r| r.id == entry.id) {
                    record.quantity += quantity;
                }
            }
        }
    }

    let (w, h) = image.dimensions();
    let mut map = Vec::with_capacity((w * h) as usize);
    for x in 0..w {
        for y in 0..h {
            let quantized = dithered.get_pixel(x, y).0;
            let id = table[&quantized];
            let entry = palette.get(id).expect("table only holds palette IDs");
            image.put_pixel(x, y, Rgb(entry.rgb));
            map.push(id);
        }
    }
    MosaicRun { mosaic_map: map, legend }
}

fn brightness(rgb: [u8; 3]) -> u32 {
    u32::from(rgb[0]) + u32::from(rgb[1]) + u32::from(rgb[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette(colors: &[[u8; 3]]) -> Palette {
        Palette::new(colors.to_vec()).unwrap()
    }

    fn quantity_sum(run: &MosaicRun) -> u64 {
        run.legend.iter().map(|r| r.quantity).sum()
    }

    #[test]
    fn direct_mode_invariants_hold() {
        let pal = palette(&[[0, 0, 0], [255, 255, 255], [200, 30, 30]]);
        let mut img = RgbImage::from_fn(5, 4, |x, y| Rgb([(x * 50) as u8, (y * 60) as u8, 10]));
        let run = build_mosaic(&mut img, &pal, Mode::Direct);

        assert_eq!(run.mosaic_map.len(), 20);
        assert_eq!(run.legend.len(), pal.len());
        assert_eq!(quantity_sum(&run), 20);
        for &id in &run.mosaic_map {
            assert!(id >= 1 && id as usize <= pal.len());
        }
    }

    #[test]
    fn direct_mode_is_idempotent_on_palette_images() {
        let pal = palette(&[[0, 0, 0], [255, 255, 255], [10, 200, 90]]);
        let mut img = RgbImage::from_fn(6, 6, |x, _| Rgb(pal.entries()[(x % 3) as usize].rgb));
        let original = img.clone();
        build_mosaic(&mut img, &pal, Mode::Direct);
        assert_eq!(img, original);
    }

    #[test]
    fn direct_mode_counts_two_pixels_on_one_entry() {
        let pal = palette(&[[0, 0, 0], [255, 255, 255]]);
        let mut img = RgbImage::from_fn(2, 1, |x, _| Rgb([10 + x as u8, 0, 0]));
        let run = build_mosaic(&mut img, &pal, Mode::Direct);
        assert_eq!(run.legend[0].quantity, 2);
        assert_eq!(run.legend[1].quantity, 0);
        assert_eq!(run.mosaic_map, vec![1, 1]);
    }

    #[test]
    fn direct_map_is_column_major() {
        // Left column black, right column white: column-major order lists
        // the whole left column before the right one.
        let pal = palette(&[[0, 0, 0], [255, 255, 255]]);
        let mut img = RgbImage::from_fn(2, 2, |x, _| {
            if x == 0 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) }
        });
        let run = build_mosaic(&mut img, &pal, Mode::Direct);
        assert_eq!(run.mosaic_map, vec![1, 1, 2, 2]);
    }

    #[test]
    fn quantize_mode_invariants_hold() {
        let pal = palette(&[
            [244, 231, 234],
            [15, 13, 16],
            [62, 28, 25],
            [254, 237, 184],
            [138, 136, 135],
            [218, 195, 159],
        ]);
        let mut img =
            RgbImage::from_fn(8, 8, |x, y| Rgb([(x * 30) as u8, (y * 30) as u8, 128]));
        let run = build_mosaic(&mut img, &pal, Mode::Quantize);

        assert_eq!(run.mosaic_map.len(), 64);
        assert!(run.legend.len() <= pal.len());
        assert_eq!(quantity_sum(&run), 64);
        for &id in &run.mosaic_map {
            assert!(pal.get(id).is_some());
            assert!(run.legend.iter().any(|r| r.id == id));
        }
        // Every resolved pixel is a palette color.
        for p in img.pixels() {
            assert!(pal.entries().iter().any(|e| e.rgb == p.0));
        }
    }

    #[test]
    fn quantize_mode_maps_distinct_colors_to_distinct_entries() {
        let pal = palette(&[[0, 0, 0], [80, 80, 80], [160, 160, 160], [255, 255, 255]]);
        // Two flat halves: exactly two distinct quantized colors.
        let mut img = RgbImage::from_fn(4, 4, |x, _| {
            if x < 2 { Rgb([5, 5, 5]) } else { Rgb([250, 250, 250]) }
        });
        let run = build_mosaic(&mut img, &pal, Mode::Quantize);
        assert_eq!(run.legend.len(), 2);
        assert_ne!(run.legend[0].id, run.legend[1].id);
        // Darker color is assigned first (brightness ordering).
        assert_eq!(run.legend[0].id, 1);
        assert_eq!(run.legend[1].id, 4);
        assert_eq!(quantity_sum(&run), 16);
    }
}
