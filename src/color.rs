use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// `n` distinct colours: hues evenly spread around the wheel, lightness
/// alternating between two bands so neighbouring categories stay apart.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    let step = 360.0 / n.max(1) as f32;
    (0..n)
        .map(|i| {
            let lightness = if i % 2 == 0 { 0.50 } else { 0.62 };
            let rgb: Srgb = Hsl::new(210.0 + i as f32 * step, 0.70, lightness).into_color();
            let rgb: Srgb<u8> = rgb.into_format();
            Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category → Color32
// ---------------------------------------------------------------------------

/// Assigns every category of the loaded dataset a fixed colour, so a
/// category keeps its colour while filters change which ones are visible.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from the dataset's distinct categories.
    pub fn new<'a>(categories: impl IntoIterator<Item = &'a str>) -> Self {
        let names: Vec<&str> = categories.into_iter().collect();
        let mapping = names
            .iter()
            .zip(generate_palette(names.len()))
            .map(|(name, c)| (name.to_string(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a category; unknown ones are grey.
    pub fn color_for(&self, category: &str) -> Color32 {
        self.mapping
            .get(category)
            .copied()
            .unwrap_or(self.default_color)
    }
}
