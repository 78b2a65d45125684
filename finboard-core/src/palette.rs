//! Display palette for color-indicator cells and chart slices.
//!
//! The palette is an ordered, non-empty list of colors looked up by position.
//! Positions past the end wrap around, so row 9 of a table drawn with the
//! default eight-color palette shares its dot color with row 1.
//!
//! # Default colors
//! - **Red** `#ED6B53`
//! - **Black** `#463F3A`
//! - **Blue** `#6883BA`
//! - **Gold** `#CBA328`
//! - **Green** `#6E9075`
//! - **Pink** `#EC9192`
//! - **Blueberry** `#B68CB8`
//! - **Orange** `#FFA630`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Errors raised while building a palette from user input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaletteError {
    #[error("palette must contain at least one color")]
    Empty,

    #[error("invalid color '{0}': expected #RRGGBB")]
    InvalidColor(String),
}

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#RRGGBB`, upper-case.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PaletteError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The eight dashboard colors, in lookup order.
pub const DEFAULT_COLORS: [Color; 8] = [
    Color::rgb(0xED, 0x6B, 0x53), // red
    Color::rgb(0x46, 0x3F, 0x3A), // black
    Color::rgb(0x68, 0x83, 0xBA), // blue
    Color::rgb(0xCB, 0xA3, 0x28), // gold
    Color::rgb(0x6E, 0x90, 0x75), // green
    Color::rgb(0xEC, 0x91, 0x92), // pink
    Color::rgb(0xB6, 0x8C, 0xB8), // blueberry
    Color::rgb(0xFF, 0xA6, 0x30), // orange
];

/// Ordered, non-empty set of display colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS.to_vec(),
        }
    }
}

impl Palette {
    pub fn new(colors: Vec<Color>) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::Empty);
        }
        Ok(Self { colors })
    }

    /// Build a palette from `#RRGGBB` strings.
    pub fn from_hex<S: AsRef<str>>(hex: &[S]) -> Result<Self, PaletteError> {
        let colors = hex
            .iter()
            .map(|s| s.as_ref().parse())
            .collect::<Result<Vec<Color>, _>>()?;
        Self::new(colors)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Never true: palettes are non-empty by construction.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Color at `index`, wrapping modulo the palette length.
    pub fn color_at(&self, index: usize) -> Color {
        self.colors[index % self.colors.len()]
    }

    /// Color at `index`, wrapping after `size` entries.
    ///
    /// `size` is clamped to `1..=len()`, so a cycle can be shortened but never
    /// extended past the colors that exist.
    pub fn color_at_bounded(&self, index: usize, size: usize) -> Color {
        let cycle = size.clamp(1, self.colors.len());
        self.colors[index % cycle]
    }
}
