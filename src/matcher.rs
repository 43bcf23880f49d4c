use crate::palette::{Palette, PaletteEntry};

/// Squared Euclidean distance in RGB space. Comparing squared distances is
/// equivalent to comparing the distances themselves and stays exact in
/// integer arithmetic.
pub fn distance_sq(a: [u8; 3], b: [u8; 3]) -> u32 {
    let dr = i32::from(a[0]) - i32::from(b[0]);
    let dg = i32::from(a[1]) - i32::from(b[1]);
    let db = i32::from(a[2]) - i32::from(b[2]);
    (dr * dr + dg * dg + db * db) as u32
}

/// Return the palette entry closest to `color`.
///
/// Ties break toward the lowest palette ID: the scan keeps the first entry
/// at the minimum distance, so the choice is stable across runs.
pub fn closest_one<'a>(palette: &'a Palette, color: [u8; 3]) -> &'a PaletteEntry {
    let mut best = &palette.entries()[0];
    let mut best_d = distance_sq(best.rgb, color);
    for entry in &palette.entries()[1..] {
        let d = distance_sq(entry.rgb, color);
        if d < best_d {
            best_d = d;
            best = entry;
        }
    }
    best
}

/// Return the full palette ranked ascending by distance to `color`.
/// The sort is stable, so equidistant entries keep their palette order.
pub fn closest_ranked<'a>(palette: &'a Palette, color: [u8; 3]) -> Vec<&'a PaletteEntry> {
    let mut ranked: Vec<&PaletteEntry> = palette.entries().iter().collect();
    ranked.sort_by_key(|entry| distance_sq(entry.rgb, color));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette(colors: &[[u8; 3]]) -> Palette {
        Palette::new(colors.to_vec()).unwrap()
    }

    #[test]
    fn closest_one_is_minimal() {
        let pal = palette(&[[0, 0, 0], [255, 255, 255], [128, 0, 0]]);
        let probe = [100, 10, 10];
        let best = closest_one(&pal, probe);
        for entry in pal.entries() {
            assert!(distance_sq(best.rgb, probe) <= distance_sq(entry.rgb, probe));
        }
        assert_eq!(best.rgb, [128, 0, 0]);
    }

    #[test]
    fn exact_match_wins() {
        let pal = palette(&[[10, 20, 30], [40, 50, 60]]);
        assert_eq!(closest_one(&pal, [40, 50, 60]).id, 2);
    }

    #[test]
    fn ties_break_to_lowest_id() {
        // Two identical colors: the probe is equidistant from both.
        let pal = palette(&[[100, 100, 100], [100, 100, 100], [0, 0, 0]]);
        assert_eq!(closest_one(&pal, [90, 90, 90]).id, 1);
        // Symmetric neighbors around the probe also tie.
        let pal = palette(&[[10, 0, 0], [30, 0, 0]]);
        assert_eq!(closest_one(&pal, [20, 0, 0]).id, 1);
    }

    #[test]
    fn ranked_is_a_sorted_permutation() {
        let pal = palette(&[[0, 0, 0], [255, 255, 255], [128, 128, 128], [10, 10, 10]]);
        let probe = [120, 120, 120];
        let ranked = closest_ranked(&pal, probe);
        assert_eq!(ranked.len(), pal.len());
        let mut ids: Vec<u32> = ranked.iter().map(|e| e.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        for pair in ranked.windows(2) {
            assert!(distance_sq(pair[0].rgb, probe) <= distance_sq(pair[1].rgb, probe));
        }
        assert_eq!(ranked[0].id, closest_one(&pal, probe).id);
    }

    #[test]
    fn ranked_ties_preserve_palette_order() {
        let pal = palette(&[[50, 50, 50], [50, 50, 50], [0, 0, 0]]);
        let ranked = closest_ranked(&pal, [50, 50, 50]);
        assert_eq!(ranked[0].id, 1);
        assert_eq!(ranked[1].id, 2);
        assert_eq!(ranked[2].id, 3);
    }
}
