//! Sector model: flattens a chip list into the ordered slices of a wheel.
//!
//! Chip `i` contributes `multiplier_i` consecutive sectors that share its
//! label and one freshly drawn readable color. An empty chip list produces a
//! single placeholder sector that is drawn but can never win.

#[cfg(test)]
#[path = "sector_test.rs"]
mod sector_test;

use rand::Rng;
use serde::Serialize;

use crate::chip::Chip;
use crate::color::Rgb;
use crate::consts::{PLACEHOLDER_COLOR, PLACEHOLDER_LABEL, PLACEHOLDER_TEXT_COLOR, SECTOR_TEXT_COLOR, TAU};

/// One slice of the wheel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sector {
    /// Background fill.
    pub color: Rgb,
    /// Label text color.
    pub text_color: Rgb,
    /// Full, untruncated label.
    pub label: String,
    /// `true` only for the empty-wheel placeholder.
    #[serde(skip)]
    pub placeholder: bool,
}

impl Sector {
    /// The "Add items..." sector shown when a wheel has no chips.
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            color: fixed_color(PLACEHOLDER_COLOR, Rgb::new(0xf0, 0xf0, 0xf0)),
            text_color: fixed_color(PLACEHOLDER_TEXT_COLOR, Rgb::new(0x66, 0x66, 0x66)),
            label: PLACEHOLDER_LABEL.to_owned(),
            placeholder: true,
        }
    }
}

fn fixed_color(hex: &str, fallback: Rgb) -> Rgb {
    hex.parse().unwrap_or(fallback)
}

/// Build the sector list for `chips`, drawing one color per chip from `rng`.
pub fn build_sectors<R: Rng + ?Sized>(chips: &[Chip], rng: &mut R) -> Vec<Sector> {
    if chips.is_empty() {
        return vec![Sector::placeholder()];
    }

    let text_color = fixed_color(SECTOR_TEXT_COLOR, Rgb::new(0x33, 0x33, 0x33));
    let mut sectors = Vec::new();
    for chip in chips {
        let color = Rgb::random_readable(rng);
        sectors.extend((0..chip.multiplier).map(|_| Sector {
            color,
            text_color,
            label: chip.label.clone(),
            placeholder: false,
        }));
    }
    sectors
}

/// Whether `sectors` contains at least one sector that can be won.
#[must_use]
pub fn has_winnable(sectors: &[Sector]) -> bool {
    sectors.iter().any(|s| !s.placeholder)
}

/// Angular width of each of `count` equal sectors.
#[must_use]
pub fn sector_arc(count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = count as f64;
    TAU / n
}
