//! Color reduction for the quantize-then-map mode: median-cut palette
//! derivation followed by Floyd–Steinberg error diffusion.

use image::{Rgb, RgbImage};
use std::collections::BTreeMap;

/// Derive a palette of at most `max_colors` colors from the image via
/// median cut. If the image already uses no more distinct colors than
/// requested, those colors are returned as-is (sorted for determinism).
pub fn derive_palette(image: &RgbImage, max_colors: usize) -> Vec<[u8; 3]> {
    assert!(max_colors > 0, "max_colors must be positive");
    let mut pixels: Vec<[u8; 3]> = image.pixels().map(|p| p.0).collect();
    pixels.sort_unstable();
    pixels.dedup();
    if pixels.len() <= max_colors {
        return pixels;
    }

    let mut buckets = vec![pixels];
    while buckets.len() < max_colors {
        let Some((idx, channel)) = widest_bucket(&buckets) else {
            break;
        };
        let mut bucket = buckets.remove(idx);
        bucket.sort_unstable_by_key(|p| p[channel]);
        let rest = bucket.split_off(bucket.len() / 2);
        buckets.push(bucket);
        buckets.push(rest);
    }

    let mut palette: Vec<[u8; 3]> = buckets.iter().map(|b| average_color(b)).collect();
    palette.sort_unstable();
    palette.dedup();
    palette
}

/// Pick the splittable bucket with the largest single-channel range,
/// together with that channel. Scans in order and keeps the first maximum
/// so the cut sequence is deterministic.
fn widest_bucket(buckets: &[Vec<[u8; 3]>]) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize, u8)> = None;
    for (i, bucket) in buckets.iter().enumerate() {
        if bucket.len() < 2 {
            continue;
        }
        let ranges = channel_ranges(bucket);
        let channel = (0..3).max_by_key(|&c| ranges[c]).unwrap_or(0);
        match best {
            Some((_, _, range)) if ranges[channel] <= range => {}
            _ => best = Some((i, channel, ranges[channel])),
        }
    }
    best.map(|(i, c, _)| (i, c))
}

fn channel_ranges(bucket: &[[u8; 3]]) -> [u8; 3] {
    let mut min = [255u8; 3];
    let mut max = [0u8; 3];
    for pixel in bucket {
        for c in 0..3 {
            min[c] = min[c].min(pixel[c]);
            max[c] = max[c].max(pixel[c]);
        }
    }
    [max[0] - min[0], max[1] - min[1], max[2] - min[2]]
}

fn average_color(bucket: &[[u8; 3]]) -> [u8; 3] {
    let mut sums = [0usize; 3];
    for pixel in bucket {
        for c in 0..3 {
            sums[c] += pixel[c] as usize;
        }
    }
    let n = bucket.len();
    [(sums[0] / n) as u8, (sums[1] / n) as u8, (sums[2] / n) as u8]
}

/// Floyd–Steinberg dither the image against a fixed palette, producing a
/// raster that only uses palette colors. Error propagates left-to-right
/// with the classic 7/16, 3/16, 5/16, 1/16 kernel.
pub fn dither_to_palette(image: &RgbImage, palette: &[[u8; 3]]) -> RgbImage {
    assert!(!palette.is_empty(), "dither palette must be non-empty");
    let (w, h) = image.dimensions();
    let width = w as usize;
    let mut out = RgbImage::new(w, h);
    // One slot of padding on each side so the kernel never bounds-checks.
    let mut this_err = vec![[0.0f32; 3]; width + 2];
    let mut next_err = vec![[0.0f32; 3]; width + 2];

    for y in 0..h {
        for x in 0..w {
            let i = x as usize;
            let p = image.get_pixel(x, y).0;
            let mut adjusted = [0.0f32; 3];
            for c in 0..3 {
                adjusted[c] = (f32::from(p[c]) + this_err[i + 1][c]).clamp(0.0, 255.0);
            }
            let chosen = nearest(palette, adjusted);
            out.put_pixel(x, y, Rgb(chosen));
            let mut err = [0.0f32; 3];
            for c in 0..3 {
                err[c] = adjusted[c] - f32::from(chosen[c]);
            }
            diffuse(&mut this_err[i + 2], 7.0 / 16.0, err);
            diffuse(&mut next_err[i], 3.0 / 16.0, err);
            diffuse(&mut next_err[i + 1], 5.0 / 16.0, err);
            diffuse(&mut next_err[i + 2], 1.0 / 16.0, err);
        }
        std::mem::swap(&mut this_err, &mut next_err);
        for e in next_err.iter_mut() {
            *e = [0.0; 3];
        }
    }
    out
}

fn diffuse(slot: &mut [f32; 3], weight: f32, err: [f32; 3]) {
    for c in 0..3 {
        slot[c] += weight * err[c];
    }
}

fn nearest(palette: &[[u8; 3]], color: [f32; 3]) -> [u8; 3] {
    let mut best = palette[0];
    let mut best_d = f32::MAX;
    for &candidate in palette {
        let mut d = 0.0f32;
        for c in 0..3 {
            let diff = color[c] - f32::from(candidate[c]);
            d += diff * diff;
        }
        if d < best_d {
            best_d = d;
            best = candidate;
        }
    }
    best
}

/// Count occurrences of each distinct color. Returned in ascending color
/// order for deterministic downstream iteration.
pub fn color_histogram(image: &RgbImage) -> Vec<([u8; 3], u64)> {
    let mut counts: BTreeMap<[u8; 3], u64> = BTreeMap::new();
    for p in image.pixels() {
        *counts.entry(p.0).or_insert(0) += 1;
    }
    counts.into_iter().collect()
}
