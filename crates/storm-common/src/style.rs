//! Color configuration for heatmap rendering.

use serde::{Deserialize, Serialize};

/// Color representation supporting multiple formats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    /// Hex string: "#RRGGBB" or "#RRGGBBAA" (named colors are accepted too)
    Hex(String),

    /// RGB array: [r, g, b] or [r, g, b, a]
    Array(Vec<u8>),

    /// Named color
    Named(String),

    /// Explicit RGBA
    Rgba { r: u8, g: u8, b: u8, a: u8 },
}

impl Color {
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgba { r, g, b, a: 255 }
    }

    /// Color from free text: `#`-prefixed values are hex, anything else a name.
    pub fn from_text(text: &str) -> Self {
        let text = text.trim();
        if text.starts_with('#') {
            Color::Hex(text.to_string())
        } else {
            Color::Named(text.to_string())
        }
    }

    pub fn transparent() -> Self {
        Color::Rgba {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Convert to RGBA tuple.
    pub fn to_rgba(&self) -> (u8, u8, u8, u8) {
        match self {
            // Untagged strings always land in `Hex`, so both paths share one parser.
            Color::Hex(s) | Color::Named(s) => parse_color_text(s),
            Color::Array(arr) => {
                let r = arr.first().copied().unwrap_or(0);
                let g = arr.get(1).copied().unwrap_or(0);
                let b = arr.get(2).copied().unwrap_or(0);
                let a = arr.get(3).copied().unwrap_or(255);
                (r, g, b, a)
            }
            Color::Rgba { r, g, b, a } => (*r, *g, *b, *a),
        }
    }

    /// Linear interpolation between two colors, rounding each channel.
    pub fn lerp(&self, other: &Color, t: f64) -> Color {
        let (r1, g1, b1, a1) = self.to_rgba();
        let (r2, g2, b2, a2) = other.to_rgba();

        let t = t.clamp(0.0, 1.0);

        let lerp_u8 = |a: u8, b: u8, t: f64| -> u8 {
            ((a as f64) * (1.0 - t) + (b as f64) * t).round() as u8
        };

        Color::Rgba {
            r: lerp_u8(r1, r2, t),
            g: lerp_u8(g1, g2, t),
            b: lerp_u8(b1, b2, t),
            a: lerp_u8(a1, a2, t),
        }
    }

    /// Check that the color text resolves to a known color.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Color::Hex(s) | Color::Named(s) => {
                if try_parse_color_text(s).is_some() {
                    Ok(())
                } else {
                    Err(format!("Unrecognized color '{}'", s))
                }
            }
            Color::Array(arr) if arr.len() < 3 || arr.len() > 4 => {
                Err(format!("Color array must have 3 or 4 entries, got {}", arr.len()))
            }
            _ => Ok(()),
        }
    }
}

fn parse_color_text(s: &str) -> (u8, u8, u8, u8) {
    try_parse_color_text(s).unwrap_or((0, 0, 0, 255))
}

fn try_parse_color_text(s: &str) -> Option<(u8, u8, u8, u8)> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        parse_hex_color(hex)
    } else {
        named_color(s)
    }
}

fn parse_hex_color(s: &str) -> Option<(u8, u8, u8, u8)> {
    let channel = |i: usize| u8::from_str_radix(s.get(i..i + 2)?, 16).ok();

    match s.len() {
        6 => Some((channel(0)?, channel(2)?, channel(4)?, 255)),
        8 => Some((channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
        _ => None,
    }
}

fn named_color(name: &str) -> Option<(u8, u8, u8, u8)> {
    let rgba = match name.to_lowercase().as_str() {
        "transparent" => (0, 0, 0, 0),
        "black" => (0, 0, 0, 255),
        "white" => (255, 255, 255, 255),
        "red" => (255, 0, 0, 255),
        "darkred" => (139, 0, 0, 255),
        "green" => (0, 128, 0, 255),
        "blue" => (0, 0, 255, 255),
        "steelblue" => (70, 130, 180, 255),
        "yellow" => (255, 255, 0, 255),
        "orange" => (255, 165, 0, 255),
        "purple" => (128, 0, 128, 255),
        "gray" | "grey" => (128, 128, 128, 255),
        _ => return None,
    };
    Some(rgba)
}

/// Endpoint colors of the density heatmap.
///
/// Frequencies map linearly from `low` (at zero) to `high` (at the maximum
/// frequency of the current pass).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapStyle {
    #[serde(default = "default_low")]
    pub low: Color,
    #[serde(default = "default_high")]
    pub high: Color,
}

fn default_low() -> Color {
    Color::Named("white".to_string())
}

fn default_high() -> Color {
    Color::Named("darkred".to_string())
}

impl Default for HeatmapStyle {
    fn default() -> Self {
        Self {
            low: default_low(),
            high: default_high(),
        }
    }
}

impl HeatmapStyle {
    pub fn validate(&self) -> Result<(), String> {
        self.low.validate().map_err(|e| format!("low: {}", e))?;
        self.high.validate().map_err(|e| format!("high: {}", e))
    }
}
