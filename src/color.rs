use std::collections::BTreeMap;

use palette::{Hsl, IntoColor, Srgb};
use plotters::style::RGBColor;

// ---------------------------------------------------------------------------
// Series colours
// ---------------------------------------------------------------------------

/// High-contrast colours for overlaid spectra, used in order.
const SERIES_COLORS: [(u8, u8, u8); 63] = [
    (0x00, 0x00, 0x00), (0x00, 0xFF, 0x00), (0x00, 0x00, 0xFF), (0xFF, 0x00, 0x00),
    (0x01, 0xFF, 0xFE), (0xFF, 0xA6, 0xFE), (0xFF, 0xDB, 0x66), (0x00, 0x64, 0x01),
    (0x01, 0x00, 0x67), (0x95, 0x00, 0x3A), (0x00, 0x7D, 0xB5), (0xFF, 0x00, 0xF6),
    (0x77, 0x4D, 0x00), (0x90, 0xFB, 0x92), (0x00, 0x76, 0xFF), (0xD5, 0xFF, 0x00),
    (0xFF, 0x93, 0x7E), (0x6A, 0x82, 0x6C), (0xFF, 0x02, 0x9D), (0xFE, 0x89, 0x00),
    (0x7A, 0x47, 0x82), (0x7E, 0x2D, 0xD2), (0x85, 0xA9, 0x00), (0xFF, 0x00, 0x56),
    (0xA4, 0x24, 0x00), (0x00, 0xAE, 0x7E), (0x68, 0x3D, 0x3B), (0xBD, 0xC6, 0xFF),
    (0x26, 0x34, 0x00), (0xBD, 0xD3, 0x93), (0x00, 0xB9, 0x17), (0x9E, 0x00, 0x8E),
    (0x00, 0x15, 0x44), (0xC2, 0x8C, 0x9F), (0xFF, 0x74, 0xA3), (0x01, 0xD0, 0xFF),
    (0x00, 0x47, 0x54), (0xE5, 0x6F, 0xFE), (0x78, 0x82, 0x31), (0x0E, 0x4C, 0xA1),
    (0x91, 0xD0, 0xCB), (0xBE, 0x99, 0x70), (0x96, 0x8A, 0xE8), (0xBB, 0x88, 0x00),
    (0x43, 0x00, 0x2C), (0xDE, 0xFF, 0x74), (0x00, 0xFF, 0xC6), (0xFF, 0xE5, 0x02),
    (0x62, 0x0E, 0x00), (0x00, 0x8F, 0x9C), (0x98, 0xFF, 0x52), (0x75, 0x44, 0xB1),
    (0xB5, 0x00, 0xFF), (0x00, 0xFF, 0x78), (0xFF, 0x6E, 0x41), (0x00, 0x5F, 0x39),
    (0x6B, 0x68, 0x82), (0x5F, 0xAD, 0x4E), (0xA7, 0x57, 0x40), (0xA5, 0xFF, 0xD2),
    (0xFF, 0xB1, 0x67), (0x00, 0x9B, 0xFF), (0xE8, 0x5E, 0xBE),
];

/// `n` colours for `n` overlaid series: the fixed table first, then
/// evenly spaced hues for anything beyond it.
pub fn series_colors(n: usize) -> Vec<RGBColor> {
    let fixed = SERIES_COLORS
        .iter()
        .take(n)
        .map(|&(r, g, b)| RGBColor(r, g, b));
    let extra = generate_palette(n.saturating_sub(SERIES_COLORS.len()));
    fixed.chain(extra).collect()
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<RGBColor> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            RGBColor(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: class label → RGBColor
// ---------------------------------------------------------------------------

/// Maps the distinct class labels of a table to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, RGBColor>,
    default_color: RGBColor,
}

impl ColorMap {
    /// Build a colour map from labels; duplicates are collapsed and colours
    /// are assigned in sorted label order so they are stable across windows.
    pub fn new<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let mut mapping: BTreeMap<String, RGBColor> = labels
            .into_iter()
            .map(|l| (l.to_string(), RGBColor(0, 0, 0)))
            .collect();
        let palette = generate_palette(mapping.len());
        for (slot, c) in mapping.values_mut().zip(palette) {
            *slot = c;
        }

        ColorMap {
            mapping,
            default_color: RGBColor(128, 128, 128),
        }
    }

    /// Look up the colour for a label.
    pub fn color_for(&self, label: &str) -> RGBColor {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Return the legend entries (label → colour).
    pub fn legend_entries(&self) -> Vec<(String, RGBColor)> {
        self.mapping
            .iter()
            .map(|(l, c)| (l.clone(), *c))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_colors_extend_past_fixed_table() {
        let colors = series_colors(70);
        assert_eq!(colors.len(), 70);
        assert_eq!(colors[0], RGBColor(0, 0, 0));
        assert_eq!(colors[3], RGBColor(0xFF, 0, 0));
        assert_eq!(series_colors(2).len(), 2);
    }

    #[test]
    fn test_color_map_is_stable_and_distinct() {
        let a = ColorMap::new(["leaf", "bark", "leaf"]);
        let b = ColorMap::new(["bark", "leaf"]);
        assert_eq!(a.len(), 2);
        assert_eq!(a.color_for("leaf"), b.color_for("leaf"));
        assert_ne!(a.color_for("leaf"), a.color_for("bark"));
        assert_eq!(a.color_for("moss"), RGBColor(128, 128, 128));
        let legend: Vec<String> = a.legend_entries().into_iter().map(|(l, _)| l).collect();
        assert_eq!(legend, vec!["bark", "leaf"]);
    }
}
