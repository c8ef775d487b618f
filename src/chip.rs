//! Chips: user-entered wheel items with a label and a repeat weight.
//!
//! A chip is entered as free text such as `"Apple, 3"`: comma-separated
//! tokens where a trailing integer token is the multiplier. The multiplier
//! is kept as-is on the chip and only expanded into sectors when the wheel
//! rebuilds (see [`crate::sector`]).

#[cfg(test)]
#[path = "chip_test.rs"]
mod chip_test;

use serde::{Deserialize, Serialize};

use crate::consts::{ELLIPSIS, LABEL_KEEP_CHARS, LABEL_MAX_CHARS, MAX_MULTIPLIER};

/// A wheel item: label plus positive repeat weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chip {
    pub label: String,
    pub multiplier: u32,
}

impl Chip {
    /// Create a chip, clamping the multiplier into `1..=MAX_MULTIPLIER`.
    #[must_use]
    pub fn new(label: impl Into<String>, multiplier: u32) -> Self {
        Self { label: label.into(), multiplier: multiplier.clamp(1, MAX_MULTIPLIER) }
    }

    /// Parse chip text as typed into the item input.
    ///
    /// Returns `None` when the text has no label tokens.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let mut tokens: Vec<&str> = text.split(',').map(str::trim).filter(|t| !t.is_empty()).collect();

        let mut multiplier = 1;
        if tokens.len() > 1 {
            if let Some(weight) = tokens.last().and_then(|t| parse_multiplier(t)) {
                multiplier = weight;
                tokens.pop();
            }
        }

        if tokens.is_empty() {
            return None;
        }
        Some(Self::new(tokens.join(", "), multiplier))
    }

    /// The text that re-creates this chip through [`Chip::parse`].
    #[must_use]
    pub fn to_input_text(&self) -> String {
        if self.multiplier > 1 { format!("{}, {}", self.label, self.multiplier) } else { self.label.clone() }
    }
}

/// Interpret a token as a multiplier. Numeric tokens always count, even
/// when they clamp (`0` and negatives become 1, fractions truncate, and
/// anything above [`MAX_MULTIPLIER`] is capped).
pub(crate) fn parse_multiplier(token: &str) -> Option<u32> {
    let Ok(value) = token.trim().parse::<f64>() else {
        return None;
    };
    if !value.is_finite() {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let weight = value.clamp(1.0, f64::from(MAX_MULTIPLIER)) as u32;
    Some(weight)
}

/// Shorten a label for display: more than 15 chars become 12 chars + `...`.
#[must_use]
pub fn truncate_label(label: &str) -> String {
    if label.chars().count() > LABEL_MAX_CHARS {
        let head: String = label.chars().take(LABEL_KEEP_CHARS).collect();
        format!("{head}{ELLIPSIS}")
    } else {
        label.to_owned()
    }
}

/// Ordered chip list for one wheel.
///
/// Mutations only happen through the methods below; each reports whether
/// the list changed so the owner knows to rebuild sectors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChipList {
    chips: Vec<Chip>,
}

impl ChipList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chip: Chip) {
        self.chips.push(chip);
    }

    /// Remove the chip at `index`.
    pub fn remove(&mut self, index: usize) -> Option<Chip> {
        (index < self.chips.len()).then(|| self.chips.remove(index))
    }

    /// Remove the last chip (Backspace on an empty input).
    pub fn pop(&mut self) -> Option<Chip> {
        self.chips.pop()
    }

    /// Remove every chip. Returns `true` if any were present.
    pub fn clear(&mut self) -> bool {
        let had_any = !self.chips.is_empty();
        self.chips.clear();
        had_any
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Chip] {
        &self.chips
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chips.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chips.is_empty()
    }

    /// Sum of multipliers, i.e. the number of sectors these chips expand to.
    #[must_use]
    pub fn total_weight(&self) -> u64 {
        self.chips.iter().map(|c| u64::from(c.multiplier)).sum()
    }
}

impl FromIterator<Chip> for ChipList {
    fn from_iter<I: IntoIterator<Item = Chip>>(iter: I) -> Self {
        Self { chips: iter.into_iter().collect() }
    }
}
