use anyhow::{bail, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::OnceLock;

/// One reference color a mosaic is allowed to use. IDs are 1-based and
/// assigned by palette order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteEntry {
    pub id: u32,
    pub rgb: [u8; 3],
}

/// A fixed, ordered set of reference colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    pub fn new(colors: Vec<[u8; 3]>) -> Result<Self> {
        if colors.is_empty() {
            bail!("palette must contain at least one color");
        }
        let entries = colors
            .into_iter()
            .enumerate()
            .map(|(i, rgb)| PaletteEntry { id: i as u32 + 1, rgb })
            .collect();
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by its 1-based ID.
    pub fn get(&self, id: u32) -> Option<&PaletteEntry> {
        self.entries.get(id.checked_sub(1)? as usize)
    }
}

/// Built-in palette embedded from `src/data/default_palette.txt`.
/// Lines formatted as `R,G,B`.
static DEFAULT_PALETTE: OnceLock<Palette> = OnceLock::new();

pub fn default_palette() -> &'static Palette {
    DEFAULT_PALETTE.get_or_init(|| {
        let colors = parse_palette_lines(include_str!("data/default_palette.txt"))
            .expect("embedded default palette is well-formed");
        Palette::new(colors).expect("embedded default palette is non-empty")
    })
}

/// Load a palette from a simple text file.
/// Accepted formats per line: `R,G,B` or `#RRGGBB`. Ignores blank lines and
/// comments starting with `#`.
pub fn load_palette_file(path: &Path) -> Result<Palette> {
    let f = File::open(path)?;
    let r = BufReader::new(f);
    let mut text = String::new();
    for line in r.lines() {
        text.push_str(&line?);
        text.push('\n');
    }
    let colors = parse_palette_lines(&text)?;
    if colors.is_empty() {
        bail!("no colors parsed from palette file: {}", path.display());
    }
    Palette::new(colors)
}

fn parse_palette_lines(text: &str) -> Result<Vec<[u8; 3]>> {
    let mut out = Vec::new();
    for line in text.lines() {
        let s = line.trim();
        if s.is_empty() {
            continue;
        }
        if s.starts_with('#') && s.len() != 7 {
            continue;
        }
        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() == 6 {
                let r = u8::from_str_radix(&hex[0..2], 16)?;
                let g = u8::from_str_radix(&hex[2..4], 16)?;
                let b = u8::from_str_radix(&hex[4..6], 16)?;
                out.push([r, g, b]);
                continue;
            }
        }
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() == 3 {
            let r: u8 = parts[0].trim().parse()?;
            let g: u8 = parts[1].trim().parse()?;
            let b: u8 = parts[2].trim().parse()?;
            out.push([r, g, b]);
        }
    }
    Ok(out)
}
