//! sRGB colors, WCAG contrast math, and readable random sector colors.
//!
//! Sector labels are always drawn in a fixed dark text color, so a sector
//! background is only acceptable when its contrast ratio against that text
//! reaches [`MIN_CONTRAST`]. Random colors are redrawn until one qualifies.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::consts::MIN_CONTRAST;

/// Error returned when a string is not a `#rgb` or `#rrggbb` color.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid hex color: {0:?}")]
pub struct ParseColorError(String);

/// An opaque 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from the low 24 bits of `value` (`0xRRGGBB`).
    #[must_use]
    pub const fn from_u24(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xff) as u8,
            g: ((value >> 8) & 0xff) as u8,
            b: (value & 0xff) as u8,
        }
    }

    /// Relative luminance per WCAG 2.x, in `[0, 1]`.
    #[must_use]
    pub fn relative_luminance(self) -> f64 {
        0.2126 * linear_channel(self.r) + 0.7152 * linear_channel(self.g) + 0.0722 * linear_channel(self.b)
    }

    /// Contrast ratio of this color against `other`, in `[1, 21]`.
    #[must_use]
    pub fn contrast_ratio(self, other: Self) -> f64 {
        let a = self.relative_luminance();
        let b = other.relative_luminance();
        let (light, dark) = if a >= b { (a, b) } else { (b, a) };
        (light + 0.05) / (dark + 0.05)
    }

    /// Contrast of this background against near-black text, `(L + 0.05) / 0.05`.
    #[must_use]
    pub fn dark_text_contrast(self) -> f64 {
        (self.relative_luminance() + 0.05) / 0.05
    }

    /// Whether dark label text stays legible on this background.
    #[must_use]
    pub fn is_readable(self) -> bool {
        self.dark_text_contrast() >= MIN_CONTRAST
    }

    /// Draw uniformly random colors until one is readable.
    pub fn random_readable<R: Rng + ?Sized>(rng: &mut R) -> Self {
        loop {
            let candidate = Self::from_u24(rng.random_range(0..=0x00ff_ffff));
            if candidate.is_readable() {
                return candidate;
            }
        }
    }
}

/// sRGB channel to linear light using the standard piecewise gamma curve.
fn linear_channel(channel: u8) -> f64 {
    let c = f64::from(channel) / 255.0;
    if c <= 0.039_28 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_owned());
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        match hex.len() {
            3 => {
                let value = u32::from_str_radix(hex, 16).map_err(|_| err())?;
                // Expand each nibble: 0xabc -> 0xaabbcc.
                let expand = |nibble: u32| u8::try_from(nibble * 0x11).map_err(|_| err());
                Ok(Self::new(expand((value >> 8) & 0xf)?, expand((value >> 4) & 0xf)?, expand(value & 0xf)?))
            }
            6 => Ok(Self::from_u24(u32::from_str_radix(hex, 16).map_err(|_| err())?)),
            _ => Err(err()),
        }
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
