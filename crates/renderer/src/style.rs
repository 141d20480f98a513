//! Colors and per-level palettes for contour rendering.

use serde::{Deserialize, Serialize};

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }

    /// Parse `#RRGGBB` (leading `#` optional) as an opaque color.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let (r, g, b) = hex_to_rgb(hex)?;
        Some(Self::new(r, g, b, 255))
    }

    /// `#rrggbb` form, alpha dropped.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Same color with alpha replaced by `alpha` in `[0, 1]`.
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self {
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }

    /// Opaque color from hue, saturation and lightness, all in `[0, 1]`.
    pub fn from_hsl(h: f64, s: f64, l: f64) -> Self {
        let h = h.rem_euclid(1.0);
        let s = s.clamp(0.0, 1.0);
        let l = l.clamp(0.0, 1.0);

        if s == 0.0 {
            let v = (l * 255.0).round() as u8;
            return Self::new(v, v, v, 255);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        let channel = |t: f64| -> u8 {
            let t = t.rem_euclid(1.0);
            let v = if t < 1.0 / 6.0 {
                p + (q - p) * 6.0 * t
            } else if t < 0.5 {
                q
            } else if t < 2.0 / 3.0 {
                p + (q - p) * (2.0 / 3.0 - t) * 6.0
            } else {
                p
            };
            (v * 255.0).round() as u8
        };

        Self::new(channel(h + 1.0 / 3.0), channel(h), channel(h - 1.0 / 3.0), 255)
    }

    /// Components as floats in `[0, 1]`.
    pub fn to_f32(&self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

/// Parse hex color string to RGB
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}

/// Assigns a color to each threshold by its draw-order index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LevelPalette {
    /// Fully saturated hues, rotating by `step` of the color wheel per level.
    HueRotation { step: f64 },
    /// Explicit `#RRGGBB` colors, cycled when there are more levels.
    Stops { colors: Vec<String> },
}

impl Default for LevelPalette {
    fn default() -> Self {
        LevelPalette::HueRotation { step: 0.25 }
    }
}

impl LevelPalette {
    /// Color for the `index`-th threshold (0 = first drawn).
    pub fn color(&self, index: usize) -> Color {
        match self {
            LevelPalette::HueRotation { step } => {
                Color::from_hsl((index as f64 * step).rem_euclid(1.0), 1.0, 0.5)
            }
            LevelPalette::Stops { colors } if !colors.is_empty() => {
                Color::from_hex(&colors[index % colors.len()]).unwrap_or(Color::WHITE)
            }
            LevelPalette::Stops { .. } => Color::WHITE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#FF0000"), Some((255, 0, 0)));
        assert_eq!(hex_to_rgb("#00FF00"), Some((0, 255, 0)));
        assert_eq!(hex_to_rgb("#0000FF"), Some((0, 0, 255)));
        assert_eq!(hex_to_rgb("FF0000"), Some((255, 0, 0)));
        assert_eq!(hex_to_rgb("#GGGGGG"), None);
    }

    #[test]
    fn test_hsl_primaries() {
        assert_eq!(Color::from_hsl(0.0, 1.0, 0.5), Color::new(255, 0, 0, 255));
        assert_eq!(Color::from_hsl(1.0 / 3.0, 1.0, 0.5), Color::new(0, 255, 0, 255));
        assert_eq!(Color::from_hsl(2.0 / 3.0, 1.0, 0.5), Color::new(0, 0, 255, 255));
        assert_eq!(Color::from_hsl(0.3, 0.0, 1.0), Color::WHITE);
    }

    #[test]
    fn test_hue_rotation_wraps() {
        let palette = LevelPalette::default();
        assert_eq!(palette.color(0), palette.color(4));
        assert_ne!(palette.color(0), palette.color(1));
        // Quarter turn from red is chartreuse
        let c = palette.color(1);
        assert!((127..=128).contains(&c.r));
        assert_eq!((c.g, c.b), (255, 0));
    }

    #[test]
    fn test_stops_palette_cycles() {
        let palette = LevelPalette::Stops {
            colors: vec!["#000000".into(), "#ffffff".into()],
        };
        assert_eq!(palette.color(0), Color::BLACK);
        assert_eq!(palette.color(3), Color::WHITE);
    }

    #[test]
    fn test_with_alpha_and_hex() {
        let c = Color::new(255, 128, 0, 255).with_alpha(0.3);
        assert_eq!(c.a, 77);
        assert_eq!(c.to_hex(), "#ff8000");
    }
}
