//! Color scales and the fixed-resolution lookup table (LUT) built from them.

use image::{Rgba, RgbaImage};
use overlay_common::{ColorScaleSpec, OverlayError, OverlayResult};
use std::collections::HashMap;
use tracing::warn;

/// Number of entries in a color lookup table.
pub const LUT_SIZE: usize = 256;

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Parse a CSS hex color: `#rgb`, `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let mut rgb = [0u8; 3];
                for (i, c) in hex.chars().enumerate() {
                    let v = c.to_digit(16)? as u8;
                    rgb[i] = v * 17;
                }
                Some(Self::new(rgb[0], rgb[1], rgb[2], 255))
            }
            6 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                255,
            )),
            8 => Some(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            _ => None,
        }
    }
}

/// Linear per-channel interpolation, rounded to the nearest unit.
pub fn interpolate_color(color1: Color, color2: Color, t: f64) -> Color {
    let t = t.clamp(0.0, 1.0);
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;

    Color::new(
        lerp(color1.r, color2.r),
        lerp(color1.g, color2.g),
        lerp(color1.b, color2.b),
        lerp(color1.a, color2.a),
    )
}

/// A gradient stop at a normalized position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub position: f64,
    pub color: Color,
}

impl ColorStop {
    pub fn new(position: f64, color: Color) -> Self {
        Self { position, color }
    }
}

/// Pair up CSS colors with positions into gradient stops.
pub fn stops_from_css(colors: &[&str], positions: &[f64]) -> OverlayResult<Vec<ColorStop>> {
    if colors.len() != positions.len() {
        return Err(OverlayError::InvalidColorScale(format!(
            "{} colors but {} positions",
            colors.len(),
            positions.len()
        )));
    }
    colors
        .iter()
        .zip(positions)
        .map(|(css, &position)| {
            let color = Color::from_hex(css).ok_or_else(|| {
                OverlayError::InvalidColorScale(format!("unparseable color '{}'", css))
            })?;
            Ok(ColorStop::new(position, color))
        })
        .collect()
}

fn validate_stops(stops: &[ColorStop]) -> OverlayResult<()> {
    if stops.len() < 2 {
        return Err(OverlayError::InvalidColorScale(format!(
            "need at least 2 stops, got {}",
            stops.len()
        )));
    }
    if stops.iter().any(|s| !s.position.is_finite()) {
        return Err(OverlayError::InvalidColorScale(
            "stop positions must be finite".to_string(),
        ));
    }
    let first = stops[0].position;
    let last = stops[stops.len() - 1].position;
    if first != 0.0 || last != 1.0 {
        return Err(OverlayError::InvalidColorScale(format!(
            "stops must start at 0 and end at 1, got {} and {}",
            first, last
        )));
    }
    if stops.windows(2).any(|w| w[0].position >= w[1].position) {
        return Err(OverlayError::InvalidColorScale(
            "stop positions must be strictly increasing".to_string(),
        ));
    }
    Ok(())
}

/// A 256-entry RGBA lookup table, stored as 1024 contiguous bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorLut {
    bytes: Vec<u8>,
}

impl ColorLut {
    /// Sample a gradient at `i / 255` for each of the 256 entries.
    pub fn from_stops(stops: &[ColorStop]) -> OverlayResult<Self> {
        validate_stops(stops)?;

        let mut bytes = Vec::with_capacity(LUT_SIZE * 4);
        let mut segment = 0;
        for i in 0..LUT_SIZE {
            let position = i as f64 / (LUT_SIZE - 1) as f64;
            while segment + 2 < stops.len() && position > stops[segment + 1].position {
                segment += 1;
            }
            let (low, high) = (stops[segment], stops[segment + 1]);
            let t = (position - low.position) / (high.position - low.position);
            bytes.extend_from_slice(&interpolate_color(low.color, high.color, t).to_array());
        }

        Ok(Self { bytes })
    }

    /// Accept an already-built 256x1 RGBA buffer unchanged.
    pub fn from_bytes(bytes: &[u8]) -> OverlayResult<Self> {
        if bytes.len() != LUT_SIZE * 4 {
            return Err(OverlayError::InvalidColorScale(format!(
                "LUT must be {} bytes (256 RGBA entries), got {}",
                LUT_SIZE * 4,
                bytes.len()
            )));
        }
        Ok(Self {
            bytes: bytes.to_vec(),
        })
    }

    /// RGBA entry at `index`.
    #[inline]
    pub fn get(&self, index: u8) -> [u8; 4] {
        let i = index as usize * 4;
        [
            self.bytes[i],
            self.bytes[i + 1],
            self.bytes[i + 2],
            self.bytes[i + 3],
        ]
    }

    /// Raw table bytes (256 RGBA entries).
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The table as a 256x1 image, the shape of a color-bar legend strip.
    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(LUT_SIZE as u32, 1, |x, _| Rgba(self.get(x as u8)))
    }
}

/// A color scale definition held by the registry.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorScale {
    Gradient(Vec<ColorStop>),
    Table(ColorLut),
}

impl ColorScale {
    pub fn build(&self) -> OverlayResult<ColorLut> {
        match self {
            ColorScale::Gradient(stops) => ColorLut::from_stops(stops),
            ColorScale::Table(lut) => Ok(lut.clone()),
        }
    }
}

// ============================================================================
// Named scales
// ============================================================================

const EIGHTHS: &[f64] = &[0.0, 0.125, 0.25, 0.375, 0.5, 0.625, 0.75, 0.875, 1.0];
const MPL: &[f64] = &[0.0, 0.13, 0.25, 0.38, 0.5, 0.63, 0.75, 0.88, 1.0];

#[rustfmt::skip]
const BUILTIN_SCALES: &[(&str, &[&str], &[f64])] = &[
    ("viridis", &["#440154", "#482777", "#3f4a8a", "#31678e", "#26838f", "#1f9d8a", "#6cce5a", "#b6de2b", "#fee825"], MPL),
    ("inferno", &["#000004", "#1f0c48", "#550f6d", "#88226a", "#a83655", "#e35933", "#f9950a", "#f8c932", "#fcffa4"], MPL),
    ("magma", &["#000004", "#1c1044", "#4f127b", "#812581", "#b5367a", "#e55964", "#fb8761", "#fec287", "#fbfdbf"], MPL),
    ("plasma",
        &["#0d0887", "#46039f", "#7201a8", "#9c179e", "#bd3786", "#d8576b", "#ed7953", "#fb9f3a", "#fdca26", "#f0f921"],
        &[0.0, 0.11, 0.22, 0.33, 0.44, 0.56, 0.67, 0.78, 0.89, 1.0]),
    ("rainbow", &["#96005A", "#0000C8", "#0019FF", "#0098FF", "#2CFF96", "#97FF00", "#FFEA00", "#FF6F00", "#FF0000"], EIGHTHS),
    ("jet", &["#000083", "#003CAA", "#05FFFF", "#FFFF00", "#FA0000", "#800000"], &[0.0, 0.125, 0.375, 0.625, 0.875, 1.0]),
    ("hsv",
        &["#ff0000", "#fdff02", "#f7ff02", "#00fc04", "#00fc0a", "#01f9ff", "#0200fd", "#0800fd", "#ff00fb", "#ff00f5", "#ff0006"],
        &[0.0, 0.169, 0.173, 0.337, 0.341, 0.506, 0.671, 0.675, 0.839, 0.843, 1.0]),
    ("hot", &["#000000", "#e60000", "#ffd200", "#ffffff"], &[0.0, 0.3, 0.6, 1.0]),
    ("cool", &["#00ffff", "#ff00ff"], &[0.0, 1.0]),
    ("spring", &["#ff00ff", "#ffff00"], &[0.0, 1.0]),
    ("summer", &["#008066", "#ffff66"], &[0.0, 1.0]),
    ("autumn", &["#ff0000", "#ffff00"], &[0.0, 1.0]),
    ("winter", &["#0000ff", "#00ff80"], &[0.0, 1.0]),
    ("bone", &["#000000", "#545474", "#a9c8c8", "#ffffff"], &[0.0, 0.376, 0.753, 1.0]),
    ("copper", &["#000000", "#ffa066", "#ffc77f"], &[0.0, 0.804, 1.0]),
    ("greys", &["#000000", "#ffffff"], &[0.0, 1.0]),
    ("yignbu", &["#081d58", "#253494", "#225ea8", "#1d91c0", "#41b6c4", "#7fcdbb", "#c7e9b4", "#edf8d9", "#ffffd9"], EIGHTHS),
    ("greens", &["#00441b", "#006d2c", "#238b45", "#41ab5d", "#74c476", "#a1d99b", "#c7e9c0", "#e5f5e0", "#f7fcf5"], EIGHTHS),
    ("yiorrd", &["#800026", "#bd0026", "#e31a1c", "#fc4e2a", "#fd8d3c", "#feb24c", "#fed976", "#ffeda0", "#ffffcc"], EIGHTHS),
    ("bluered", &["#0000ff", "#ff0000"], &[0.0, 1.0]),
    ("rdbu", &["#050aac", "#6a89f7", "#bebebe", "#dcaa84", "#e6915a", "#b20a1c"], &[0.0, 0.35, 0.5, 0.6, 0.7, 1.0]),
    ("picnic",
        &["#0000ff", "#3399ff", "#66ccff", "#99ccff", "#ccccff", "#ffffff", "#ffccff", "#ff99ff", "#ff66cc", "#ff6666", "#ff0000"],
        &[0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0]),
    ("portland", &["#0c3383", "#0a88ba", "#f2d338", "#f28f38", "#d91e1e"], &[0.0, 0.25, 0.5, 0.75, 1.0]),
    ("blackbody", &["#000000", "#e60000", "#e6d200", "#ffffff", "#a0c8ff"], &[0.0, 0.2, 0.4, 0.7, 1.0]),
    ("earth", &["#000082", "#00b4b4", "#28d228", "#e6e632", "#784614", "#ffffff"], &[0.0, 0.1, 0.2, 0.4, 0.6, 1.0]),
    ("electric", &["#000000", "#1e0064", "#780064", "#a05a00", "#e6c800", "#fffadc"], &[0.0, 0.15, 0.4, 0.6, 0.8, 1.0]),
];

/// Registry of named color scales.
#[derive(Debug, Clone)]
pub struct ColorScaleRegistry {
    scales: HashMap<String, ColorScale>,
}

impl ColorScaleRegistry {
    /// Registry without any scales.
    pub fn empty() -> Self {
        Self {
            scales: HashMap::new(),
        }
    }

    /// Registry pre-populated with the built-in scales.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        for (name, colors, positions) in BUILTIN_SCALES {
            if let Err(e) = registry.add_color_scale(name, colors, positions) {
                warn!(scale = name, error = %e, "Skipping invalid built-in color scale");
            }
        }
        registry
    }

    /// Register a gradient from CSS colors and positions, replacing any scale of the same name.
    pub fn add_color_scale(
        &mut self,
        name: &str,
        colors: &[&str],
        positions: &[f64],
    ) -> OverlayResult<()> {
        let stops = stops_from_css(colors, positions)?;
        validate_stops(&stops)?;
        self.scales
            .insert(name.to_string(), ColorScale::Gradient(stops));
        Ok(())
    }

    /// Register a precomputed table under `name`.
    pub fn add_table(&mut self, name: &str, lut: ColorLut) {
        self.scales.insert(name.to_string(), ColorScale::Table(lut));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.scales.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ColorScale> {
        self.scales.get(name)
    }

    /// Sorted names of all registered scales.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.scales.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build the LUT for a registered scale.
    pub fn build(&self, name: &str) -> OverlayResult<ColorLut> {
        self.scales
            .get(name)
            .ok_or_else(|| OverlayError::InvalidColorScale(format!("No such color scale '{}'", name)))?
            .build()
    }

    /// Build the LUT described by a config entry.
    pub fn resolve(&self, spec: &ColorScaleSpec) -> OverlayResult<ColorLut> {
        match spec {
            ColorScaleSpec::Name(name) => self.build(name),
            ColorScaleSpec::Stops(stops) => {
                let colors: Vec<&str> = stops.iter().map(|s| s.color.as_str()).collect();
                let positions: Vec<f64> = stops.iter().map(|s| s.position).collect();
                ColorLut::from_stops(&stops_from_css(&colors, &positions)?)
            }
            ColorScaleSpec::Lut(bytes) => ColorLut::from_bytes(bytes),
        }
    }
}

impl Default for ColorScaleRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex("#FF0000"), Some(Color::new(255, 0, 0, 255)));
        assert_eq!(Color::from_hex("00ff00"), Some(Color::new(0, 255, 0, 255)));
        assert_eq!(Color::from_hex("#fff"), Some(Color::new(255, 255, 255, 255)));
        assert_eq!(Color::from_hex("#0000ff80"), Some(Color::new(0, 0, 255, 128)));
        assert_eq!(Color::from_hex("#GGGGGG"), None);
        assert_eq!(Color::from_hex("#12345"), None);
    }

    #[test]
    fn test_interpolate_rounds() {
        let c = interpolate_color(Color::new(0, 0, 0, 255), Color::new(255, 255, 255, 255), 0.5);
        assert_eq!(c, Color::new(128, 128, 128, 255));
    }

    #[test]
    fn test_every_builtin_builds() {
        let registry = ColorScaleRegistry::with_builtins();
        assert_eq!(registry.names().len(), BUILTIN_SCALES.len());
        for (name, colors, positions) in BUILTIN_SCALES {
            assert_eq!(colors.len(), positions.len(), "{} arity", name);
            assert!(registry.contains(name), "{} missing", name);
            assert!(registry.build(name).is_ok(), "{} failed to build", name);
        }
    }

    #[test]
    fn test_viridis_endpoints() {
        let lut = ColorScaleRegistry::with_builtins().build("viridis").unwrap();
        assert_eq!(lut.get(0), [0x44, 0x01, 0x54, 255]);
        assert_eq!(lut.get(255), [0xfe, 0xe8, 0x25, 255]);
    }

    #[test]
    fn test_table_passthrough() {
        let bytes: Vec<u8> = (0..1024).map(|i| (i % 251) as u8).collect();
        let lut = ColorLut::from_bytes(&bytes).unwrap();
        assert_eq!(lut.as_bytes(), bytes.as_slice());
        assert!(ColorLut::from_bytes(&bytes[..1020]).is_err());
    }

    #[test]
    fn test_to_image_shape() {
        let lut = ColorScaleRegistry::with_builtins().build("greys").unwrap();
        let image = lut.to_image();
        assert_eq!(image.dimensions(), (256, 1));
        assert_eq!(image.get_pixel(255, 0).0, [255, 255, 255, 255]);
    }
}
