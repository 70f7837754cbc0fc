use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.70, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category name → Color32
// ---------------------------------------------------------------------------

/// Maps the distinct values of a categorical column (condition,
/// manufacturer) to distinct colours. Values are keyed by name, so the
/// same value keeps its colour across refilters.
#[derive(Debug, Clone)]
pub struct ColorMap {
    pub column: String,
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map for the given column from its sorted distinct
    /// values.
    pub fn new<'a>(column: &str, values: impl IntoIterator<Item = &'a str>) -> Self {
        let values: Vec<&str> = values.into_iter().collect();
        let palette = generate_palette(values.len());
        let mapping: BTreeMap<String, Color32> = values
            .into_iter()
            .zip(palette)
            .map(|(v, c)| (v.to_string(), c))
            .collect();

        ColorMap {
            column: column.to_string(),
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a category value.
    pub fn color_for(&self, value: &str) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Legend entries (value label → colour) in sorted value order.
    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        self.mapping
            .iter()
            .map(|(v, c)| (v.clone(), *c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_distinct_colors() {
        let colors = generate_palette(5);
        assert_eq!(colors.len(), 5);
        for (i, a) in colors.iter().enumerate() {
            for b in colors.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn color_map_is_stable_per_value() {
        let map = ColorMap::new("condition", ["excellent", "fair", "good"]);
        assert_eq!(map.color_for("fair"), map.color_for("fair"));
        assert_ne!(map.color_for("fair"), map.color_for("good"));
        assert_eq!(map.color_for("unknown"), Color32::GRAY);
        assert_eq!(map.legend_entries().len(), 3);
    }
}
