//! Human-facing rendering of the mosaic grid and color legend.

use crate::mosaic::MosaicRun;

/// Render the positional grid and the legend as text.
///
/// Map entries are distributed round-robin into `height` rows (entry `i`
/// goes to row `i % height`), not row-major: the printed grid's columns,
/// read top-to-bottom then left-to-right, reconstruct the column-major
/// pixel order of the mosaic map. This interleaving is a layout contract,
/// not an accident.
pub fn render(run: &MosaicRun, height: u32) -> String {
    let mut out = String::new();
    if height > 0 {
        let h = height as usize;
        let mut rows: Vec<Vec<u32>> = vec![Vec::new(); h];
        for (i, &id) in run.mosaic_map.iter().enumerate() {
            rows[i % h].push(id);
        }
        out.push_str("Color matrix\n");
        for row in &rows {
            let line: Vec<String> = row.iter().map(|id| id.to_string()).collect();
            out.push_str(&line.join(" "));
            out.push('\n');
        }
    }
    out.push_str("Colors legend\n");
    for record in &run.legend {
        let [r, g, b] = record.rgb;
        out.push_str(&format!(
            "ID: {} - color: ({}, {}, {}) qty: {}\n",
            record.id, r, g, b, record.quantity
        ));
    }
    out
}
