//! Color codec
//!
//! Parses the color notations users type into an RGB triple and formats
//! colors back to canonical `#RRGGBB` text.
//!
//! Accepted input, tried in order:
//! 1. `#RRGGBB`
//! 2. `#RGB` (each digit doubled)
//! 3. bare `RRGGBB` / `RGB`
//! 4. three decimal components separated by commas or spaces, e.g. `255, 0, 0`
//!    (fractions are truncated, values clamped into 0..=255)

use image::Rgba;
use palette::Srgb;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::error::{RecolorError, Result};

/// An opaque RGB color. Alpha never takes part in matching or blending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Fallback used whenever a dominant color cannot be determined
    pub const NEUTRAL_GRAY: Color = Color::new(128, 128, 128);

    pub fn parse(text: &str) -> Result<Self> {
        parse(text)
    }

    /// Canonical `#RRGGBB` form
    pub fn format(&self) -> String {
        format(*self)
    }

    /// Six uppercase hex digits without the leading `#`
    pub fn hex_code(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// RGB part of an RGBA pixel
    pub fn from_pixel(pixel: &Rgba<u8>) -> Self {
        Self::new(pixel[0], pixel[1], pixel[2])
    }

    /// Euclidean distance in RGB space, each axis spanning 0..=255
    pub fn distance(&self, other: &Color) -> f32 {
        let dr = self.r as f32 - other.r as f32;
        let dg = self.g as f32 - other.g as f32;
        let db = self.b as f32 - other.b as f32;
        (dr * dr + dg * dg + db * db).sqrt()
    }
}

impl From<Srgb<u8>> for Color {
    fn from(c: Srgb<u8>) -> Self {
        Self::new(c.red, c.green, c.blue)
    }
}

impl From<Color> for Srgb<u8> {
    fn from(c: Color) -> Self {
        Srgb::new(c.r, c.g, c.b)
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.hex_code())
    }
}

impl FromStr for Color {
    type Err = RecolorError;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}

impl TryFrom<String> for Color {
    type Error = RecolorError;

    fn try_from(value: String) -> Result<Self> {
        parse(&value)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        format(c)
    }
}

// ============================================================================
// PARSING
// ============================================================================

/// Parse user-supplied color text
pub fn parse(text: &str) -> Result<Color> {
    let invalid = || RecolorError::InvalidColorFormat(text.to_string());
    let trimmed = text.trim();

    if let Some(digits) = trimmed.strip_prefix('#') {
        return parse_hex_digits(digits).ok_or_else(invalid);
    }

    if let Some(color) = parse_hex_digits(trimmed) {
        return Ok(color);
    }

    if trimmed.contains(',') || trimmed.contains(' ') {
        return parse_decimal_triple(trimmed).ok_or_else(invalid);
    }

    Err(invalid())
}

/// `RRGGBB` or `RGB`, hex digits only
fn parse_hex_digits(digits: &str) -> Option<Color> {
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let expanded: String = match digits.len() {
        6 => digits.to_string(),
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        _ => return None,
    };

    let r = u8::from_str_radix(&expanded[0..2], 16).ok()?;
    let g = u8::from_str_radix(&expanded[2..4], 16).ok()?;
    let b = u8::from_str_radix(&expanded[4..6], 16).ok()?;
    Some(Color::new(r, g, b))
}

fn parse_decimal_triple(text: &str) -> Option<Color> {
    let sep = if text.contains(',') { ',' } else { ' ' };
    let parts: Vec<&str> = text.split(sep).filter(|p| !p.is_empty()).collect();
    if parts.len() != 3 {
        return None;
    }

    let mut channels = [0u8; 3];
    for (slot, part) in channels.iter_mut().zip(&parts) {
        *slot = parse_component(part.trim())?;
    }
    Some(Color::from(channels))
}

fn parse_component(part: &str) -> Option<u8> {
    let value: f64 = part.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(value.trunc().clamp(0.0, 255.0) as u8)
}

// ============================================================================
// FORMATTING
// ============================================================================

/// Format as uppercase, zero-padded `#RRGGBB`
pub fn format(color: Color) -> String {
    color.to_string()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::new(255, 0, 0);

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(parse("#FF0000").unwrap(), RED);
        assert_eq!(parse("#ff0000").unwrap(), RED);
        assert_eq!(parse("#F00").unwrap(), RED);
        assert_eq!(parse("f00").unwrap(), RED);
        assert_eq!(parse("FF0000").unwrap(), RED);
        assert_eq!(parse("  #00ff7f \n").unwrap(), Color::new(0, 255, 127));
        assert_eq!(parse("#1a2").unwrap(), Color::new(0x11, 0xAA, 0x22));
    }

    #[test]
    fn test_parse_decimal_triples() {
        assert_eq!(parse("255, 0, 0").unwrap(), RED);
        assert_eq!(parse("255,0,0").unwrap(), RED);
        assert_eq!(parse("255 0 0").unwrap(), RED);
        assert_eq!(parse("12   34 56").unwrap(), Color::new(12, 34, 56));
        // Truncated, then clamped
        assert_eq!(parse("10.9, 300, -5").unwrap(), Color::new(10, 255, 0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for text in [
            "not-a-color",
            "",
            "#12",
            "#12345",
            "#GGGGGG",
            "1234",
            "1, 2",
            "1, 2, 3, 4",
            "a, b, c",
            "inf, 0, 0",
            "+ff",
        ] {
            match parse(text) {
                Err(RecolorError::InvalidColorFormat(t)) => assert_eq!(t, text),
                other => panic!("{:?} should be rejected, got {:?}", text, other),
            }
        }
    }

    #[test]
    fn test_format() {
        assert_eq!(format(RED), "#FF0000");
        assert_eq!(format(Color::new(1, 2, 171)), "#0102AB");
        assert_eq!(Color::new(10, 11, 12).hex_code(), "0A0B0C");
    }

    #[test]
    fn test_parse_format_roundtrip() {
        for r in (0..=255u8).step_by(5) {
            for g in (0..=255u8).step_by(7) {
                for b in (0..=255u8).step_by(3) {
                    let c = Color::new(r, g, b);
                    assert_eq!(parse(&format(c)).unwrap(), c);
                }
            }
        }
    }

    #[test]
    fn test_serde_uses_hex_text() {
        let json = serde_json::to_string(&RED).unwrap();
        assert_eq!(json, "\"#FF0000\"");
        let back: Color = serde_json::from_str("\"0, 255, 0\"").unwrap();
        assert_eq!(back, Color::new(0, 255, 0));
        assert!(serde_json::from_str::<Color>("\"nope\"").is_err());
    }

    #[test]
    fn test_palette_conversion() {
        let srgb: Srgb<u8> = RED.into();
        assert_eq!(srgb, Srgb::new(255, 0, 0));
        assert_eq!(Color::from(palette::named::GRAY), Color::NEUTRAL_GRAY);
    }

    #[test]
    fn test_distance() {
        assert_eq!(RED.distance(&RED), 0.0);
        assert_eq!(Color::new(0, 0, 0).distance(&Color::new(3, 4, 0)), 5.0);
    }
}
