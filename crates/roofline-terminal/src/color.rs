//! Colours and terminal colour-mode conversion.

use crossterm::style::Color as CrosstermColor;
use std::fmt;
use std::str::FromStr;

/// An opaque sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `rrggbb`.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 {
            return Err(ColorParseError::InvalidLength);
        }
        let channel = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or(ColorParseError::InvalidHex)
        };
        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Linear interpolation in sRGB, `t` clamped to [0, 1].
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (f64::from(b) - f64::from(a)).mul_add(t, f64::from(a)).round() as u8;
        Self::rgb(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

/// Error type for colour parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    InvalidHex,
    InvalidLength,
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidHex => write!(f, "invalid hex characters"),
            Self::InvalidLength => write!(f, "invalid hex string length (expected 6)"),
        }
    }
}

impl std::error::Error for ColorParseError {}

/// Terminal colour capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// 24-bit colour.
    #[default]
    TrueColor,
    /// 256-colour palette.
    Color256,
    /// 16 ANSI colours.
    Color16,
    /// No colour escapes at all.
    Mono,
}

impl ColorMode {
    /// Detect from `COLORTERM` and `TERM`.
    #[must_use]
    pub fn detect() -> Self {
        Self::detect_with_env(
            std::env::var("COLORTERM").ok().as_deref(),
            std::env::var("TERM").ok().as_deref(),
        )
    }

    #[must_use]
    pub fn detect_with_env(colorterm: Option<&str>, term: Option<&str>) -> Self {
        if matches!(colorterm, Some("truecolor" | "24bit")) {
            return Self::TrueColor;
        }
        match term {
            Some(t) if t.contains("256color") => Self::Color256,
            Some("dumb") | None => Self::Mono,
            Some(_) => Self::Color16,
        }
    }

    /// `None` in mono mode.
    #[must_use]
    pub fn to_crossterm(self, color: Color) -> Option<CrosstermColor> {
        let Color { r, g, b } = color;
        match self {
            Self::TrueColor => Some(CrosstermColor::Rgb { r, g, b }),
            Self::Color256 => Some(CrosstermColor::AnsiValue(rgb_to_256(r, g, b))),
            Self::Color16 => Some(rgb_to_16(r, g, b)),
            Self::Mono => None,
        }
    }
}

impl FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::detect()),
            "truecolor" | "24bit" => Ok(Self::TrueColor),
            "256" => Ok(Self::Color256),
            "16" => Ok(Self::Color16),
            "mono" | "none" => Ok(Self::Mono),
            other => Err(format!(
                "unknown color mode '{other}' (expected auto, truecolor, 256, 16 or mono)"
            )),
        }
    }
}

fn rgb_to_256(r: u8, g: u8, b: u8) -> u8 {
    if r == g && g == b {
        return match r {
            0..=7 => 16,
            249..=255 => 231,
            _ => 232 + ((r - 8) / 10).min(23),
        };
    }
    let level = |c: u8| (u16::from(c) * 5 / 255) as u8;
    16 + 36 * level(r) + 6 * level(g) + level(b)
}

fn rgb_to_16(r: u8, g: u8, b: u8) -> CrosstermColor {
    let luminance = (u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114) / 1000;
    let bright = luminance > 127;
    let threshold = r.max(g).max(b) / 2;

    match (r > threshold, g > threshold, b > threshold, bright) {
        (false, false, false, false) => CrosstermColor::Black,
        (false, false, false, true) => CrosstermColor::DarkGrey,
        (true, false, false, false) => CrosstermColor::DarkRed,
        (true, false, false, true) => CrosstermColor::Red,
        (false, true, false, false) => CrosstermColor::DarkGreen,
        (false, true, false, true) => CrosstermColor::Green,
        (true, true, false, false) => CrosstermColor::DarkYellow,
        (true, true, false, true) => CrosstermColor::Yellow,
        (false, false, true, false) => CrosstermColor::DarkBlue,
        (false, false, true, true) => CrosstermColor::Blue,
        (true, false, true, false) => CrosstermColor::DarkMagenta,
        (true, false, true, true) => CrosstermColor::Magenta,
        (false, true, true, false) => CrosstermColor::DarkCyan,
        (false, true, true, true) => CrosstermColor::Cyan,
        (true, true, true, false) => CrosstermColor::Grey,
        (true, true, true, true) => CrosstermColor::White,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex("#ff8000").unwrap(), Color::rgb(255, 128, 0));
        assert_eq!(Color::from_hex("00ff00").unwrap(), Color::rgb(0, 255, 0));
        assert_eq!(Color::from_hex("#ff"), Err(ColorParseError::InvalidLength));
        assert_eq!(Color::from_hex("#gg0000"), Err(ColorParseError::InvalidHex));
    }

    #[test]
    fn test_to_hex_roundtrip() {
        let c = Color::rgb(18, 52, 86);
        assert_eq!(c.to_hex(), "#123456");
        assert_eq!(Color::from_hex(&c.to_hex()).unwrap(), c);
    }

    #[test]
    fn test_lerp_endpoints_and_midpoint() {
        assert_eq!(Color::BLACK.lerp(Color::WHITE, 0.0), Color::BLACK);
        assert_eq!(Color::BLACK.lerp(Color::WHITE, 1.0), Color::WHITE);
        assert_eq!(Color::BLACK.lerp(Color::WHITE, 0.5), Color::rgb(128, 128, 128));
        assert_eq!(Color::BLACK.lerp(Color::WHITE, 7.0), Color::WHITE);
    }

    #[test]
    fn test_detect_with_env() {
        assert_eq!(
            ColorMode::detect_with_env(Some("truecolor"), Some("xterm")),
            ColorMode::TrueColor
        );
        assert_eq!(
            ColorMode::detect_with_env(None, Some("xterm-256color")),
            ColorMode::Color256
        );
        assert_eq!(ColorMode::detect_with_env(None, Some("xterm")), ColorMode::Color16);
        assert_eq!(ColorMode::detect_with_env(None, Some("dumb")), ColorMode::Mono);
        assert_eq!(ColorMode::detect_with_env(None, None), ColorMode::Mono);
    }

    #[test]
    fn test_to_crossterm() {
        let c = Color::rgb(128, 64, 191);
        assert_eq!(
            ColorMode::TrueColor.to_crossterm(c),
            Some(CrosstermColor::Rgb { r: 128, g: 64, b: 191 })
        );
        assert_eq!(ColorMode::Mono.to_crossterm(c), None);
        assert_eq!(
            ColorMode::Color16.to_crossterm(Color::rgb(255, 0, 0)),
            Some(CrosstermColor::DarkRed)
        );
    }

    #[test]
    fn test_rgb_to_256() {
        assert_eq!(rgb_to_256(0, 0, 0), 16);
        assert_eq!(rgb_to_256(255, 255, 255), 231);
        assert_eq!(rgb_to_256(255, 0, 0), 196);
        assert_eq!(rgb_to_256(128, 128, 128), 244);
    }

    #[test]
    fn test_color_mode_from_str() {
        assert_eq!("256".parse::<ColorMode>().unwrap(), ColorMode::Color256);
        assert_eq!("Mono".parse::<ColorMode>().unwrap(), ColorMode::Mono);
        assert_eq!("truecolor".parse::<ColorMode>().unwrap(), ColorMode::TrueColor);
        assert!("sepia".parse::<ColorMode>().is_err());
    }
}
