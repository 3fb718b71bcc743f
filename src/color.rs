//! Hex color parsing and luminance-based light/dark classification.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Luminance below this value is treated as a dark color.
pub const DARK_LUMINANCE_THRESHOLD: f32 = 128.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{input}' is not a 6-digit hex color")]
pub struct ColorError {
    pub input: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn luminance(self) -> f32 {
        0.299 * f32::from(self.r) + 0.587 * f32::from(self.g) + 0.114 * f32::from(self.b)
    }

    pub fn is_dark(self) -> bool {
        self.luminance() < DARK_LUMINANCE_THRESHOLD
    }

    pub fn triple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

/// Renders as `r, g, b` so it can be dropped straight into `rgba(...)`.
impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.r, self.g, self.b)
    }
}

/// A validated `#rrggbb` color. The digits keep their original case and the
/// text always carries a leading `#`, so it can go straight into CSS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    text: String,
    rgb: Rgb,
}

impl HexColor {
    pub fn parse(input: &str) -> Result<Self, ColorError> {
        let rgb = parse_rgb(input)?;
        let digits = input.trim().trim_start_matches('#');
        Ok(Self {
            text: format!("#{digits}"),
            rgb,
        })
    }

    pub fn rgb(&self) -> Rgb {
        self.rgb
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_dark(&self) -> bool {
        self.rgb.is_dark()
    }

    /// Hex digits without the leading `#`.
    pub fn digits(&self) -> &str {
        self.text.trim_start_matches('#')
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl TryFrom<String> for HexColor {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(value: HexColor) -> Self {
        value.text
    }
}

fn parse_rgb(input: &str) -> Result<Rgb, ColorError> {
    let digits = input.trim();
    let digits = digits.strip_prefix('#').unwrap_or(digits);
    let err = || ColorError {
        input: input.to_string(),
    };

    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(err());
    }

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16);
    Ok(Rgb {
        r: channel(0..2).map_err(|_| err())?,
        g: channel(2..4).map_err(|_| err())?,
        b: channel(4..6).map_err(|_| err())?,
    })
}

pub fn hex_to_rgb_triple(hex: &str) -> Result<(u8, u8, u8), ColorError> {
    parse_rgb(hex).map(Rgb::triple)
}

pub fn luminance(hex: &str) -> Result<f32, ColorError> {
    parse_rgb(hex).map(Rgb::luminance)
}

pub fn is_dark(hex: &str) -> Result<bool, ColorError> {
    parse_rgb(hex).map(Rgb::is_dark)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_and_without_hash() {
        assert_eq!(hex_to_rgb_triple("#1e88e5"), Ok((0x1e, 0x88, 0xe5)));
        assert_eq!(hex_to_rgb_triple("1E88E5"), Ok((0x1e, 0x88, 0xe5)));
    }

    #[test]
    fn rejects_malformed_hex() {
        for bad in ["", "#fff", "#12345", "#1234567", "#gggggg", "transparent", "##123456"] {
            assert!(hex_to_rgb_triple(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn classifies_theme_backgrounds() {
        assert_eq!(is_dark("#1a1a2e"), Ok(true));
        assert_eq!(is_dark("#ffffff"), Ok(false));
        assert_eq!(is_dark("#263238"), Ok(true));
        assert_eq!(is_dark("#f5f5f5"), Ok(false));
    }

    #[test]
    fn luminance_weights_channels() {
        assert_eq!(luminance("#000000"), Ok(0.0));
        let white = luminance("#ffffff").unwrap();
        assert!((white - 255.0).abs() < 0.01);
        let green = luminance("#00ff00").unwrap();
        assert!((green - 0.587 * 255.0).abs() < 0.01);
    }

    #[test]
    fn hex_color_keeps_original_spelling() {
        let color = HexColor::parse("#4CAF50").unwrap();
        assert_eq!(color.to_string(), "#4CAF50");
        assert_eq!(color.digits(), "4CAF50");
        assert_eq!(color.rgb().to_string(), "76, 175, 80");
    }

    #[test]
    fn colors_without_hash_render_with_hash() {
        let color = HexColor::parse(" 3f3f3f ").unwrap();
        assert_eq!(color.as_str(), "#3f3f3f");
        assert_eq!(color.to_string(), "#3f3f3f");
        assert_eq!(color.digits(), "3f3f3f");
        assert_eq!(String::from(color), "#3f3f3f");
        assert_eq!(HexColor::parse("FFFFFF").unwrap(), HexColor::parse("#FFFFFF").unwrap());
    }

    #[test]
    fn hex_color_deserializes_through_validation() {
        let ok: HexColor = serde_json::from_str("\"#C62828\"").unwrap();
        assert_eq!(ok.rgb().triple(), (0xc6, 0x28, 0x28));
        assert!(serde_json::from_str::<HexColor>("\"#C628\"").is_err());
    }
}
