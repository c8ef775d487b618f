//! Wheel widget: chip list, derived sectors, spin engine, and result banner.
//!
//! The sector list is regenerated wholesale whenever the chips change. While
//! the wheel is spinning, regenerated sectors are staged instead of shown so
//! the pointer always moves over (and the winner is always taken from) the
//! list that existed when the spin began. The staged list is swapped in on
//! the frame the wheel comes to rest, after the winner has been read.

#[cfg(test)]
#[path = "wheel_test.rs"]
mod wheel_test;

use rand::Rng;
use serde::Serialize;

use crate::chip::{Chip, ChipList, truncate_label};
use crate::color::Rgb;
use crate::consts::SPIN_LABEL;
use crate::sector::{Sector, build_sectors, has_winnable};
use crate::spin::{SpinEngine, SpinParams};

/// A settled spin as presented to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinResult {
    /// Per-wheel sequence number; dismiss requests must quote it.
    pub seq: u64,
    /// Index of the winning sector.
    pub index: usize,
    /// Full, untruncated label.
    pub label: String,
    pub color: Rgb,
    pub text_color: Rgb,
}

/// Text and colors of the spin button for the current frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonFace {
    pub text: String,
    pub background: Rgb,
    pub foreground: Rgb,
}

/// Response to a spin request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinOutcome {
    /// The wheel was idle and is now spinning.
    Started,
    /// The wheel was already moving; a result will still be reported.
    AlreadySpinning,
    /// Only the placeholder is on the wheel.
    NothingToSpin,
}

/// Everything a single animation frame produced for one wheel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WheelFrame {
    /// The pointer crossed a sector boundary.
    pub detent: bool,
    /// The wheel came to rest on this result.
    pub settled: Option<SpinResult>,
    /// The drawn sector list changed (a staged rebuild was applied).
    pub sectors_changed: bool,
}

#[derive(Debug, Clone)]
pub struct Wheel {
    chips: ChipList,
    sectors: Vec<Sector>,
    staged: Option<Vec<Sector>>,
    spin: SpinEngine,
    banner: Option<SpinResult>,
    next_seq: u64,
    revision: u64,
}

impl Wheel {
    /// An empty wheel showing the placeholder sector.
    #[must_use]
    pub fn new(params: SpinParams) -> Self {
        let mut spin = SpinEngine::new(params);
        spin.resync(1);
        Self {
            chips: ChipList::new(),
            sectors: vec![Sector::placeholder()],
            staged: None,
            spin,
            banner: None,
            next_seq: 1,
            revision: 0,
        }
    }

    /// A wheel pre-populated with `chips`.
    pub fn with_chips<R, I>(params: SpinParams, chips: I, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
        I: IntoIterator<Item = Chip>,
    {
        let mut wheel = Self::new(params);
        wheel.chips = chips.into_iter().collect();
        wheel.rebuild(rng);
        wheel
    }

    // --- Chip edits ---

    /// Parse `text` as chip input and append it. Returns `false` for blank input.
    pub fn add_chip_text<R: Rng + ?Sized>(&mut self, text: &str, rng: &mut R) -> bool {
        let Some(chip) = Chip::parse(text) else {
            return false;
        };
        self.add_chip(chip, rng);
        true
    }

    pub fn add_chip<R: Rng + ?Sized>(&mut self, chip: Chip, rng: &mut R) {
        log::debug!("add chip {:?} x{}", chip.label, chip.multiplier);
        self.chips.push(chip);
        self.rebuild(rng);
    }

    pub fn remove_chip<R: Rng + ?Sized>(&mut self, index: usize, rng: &mut R) -> Option<Chip> {
        let removed = self.chips.remove(index)?;
        self.rebuild(rng);
        Some(removed)
    }

    /// Backspace on an empty input: drop the last chip.
    pub fn remove_last_chip<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Chip> {
        let removed = self.chips.pop()?;
        self.rebuild(rng);
        Some(removed)
    }

    pub fn clear_chips<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if !self.chips.clear() {
            return false;
        }
        self.rebuild(rng);
        true
    }

    fn rebuild<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let sectors = build_sectors(self.chips.as_slice(), rng);
        if self.spin.is_spinning() {
            self.staged = Some(sectors);
        } else {
            self.show(sectors);
        }
    }

    fn show(&mut self, sectors: Vec<Sector>) {
        self.sectors = sectors;
        self.revision += 1;
        self.spin.resync(self.sectors.len());
    }

    // --- Spinning ---

    /// Handle a press of the spin button.
    pub fn spin<R: Rng + ?Sized>(&mut self, rng: &mut R) -> SpinOutcome {
        if self.spin.is_spinning() {
            self.spin.request_spin(rng);
            return SpinOutcome::AlreadySpinning;
        }
        if !has_winnable(&self.sectors) {
            log::info!("spin ignored: wheel has no items");
            return SpinOutcome::NothingToSpin;
        }
        self.spin.request_spin(rng);
        SpinOutcome::Started
    }

    /// Advance one animation frame.
    pub fn tick(&mut self) -> WheelFrame {
        let outcome = self.spin.tick(self.sectors.len());
        let mut frame = WheelFrame { detent: outcome.detent, ..WheelFrame::default() };

        if let Some(index) = outcome.settled {
            frame.settled = self.settle(index);
        }
        if !self.spin.is_spinning() {
            if let Some(sectors) = self.staged.take() {
                self.show(sectors);
                frame.sectors_changed = true;
            }
        }
        frame
    }

    fn settle(&mut self, index: usize) -> Option<SpinResult> {
        let sector = self.sectors.get(index).filter(|s| !s.placeholder)?;
        let result = SpinResult {
            seq: self.next_seq,
            index,
            label: sector.label.clone(),
            color: sector.color,
            text_color: sector.text_color,
        };
        self.next_seq += 1;
        log::info!("wheel settled on {:?} (sector {index})", result.label);
        self.banner = Some(result.clone());
        Some(result)
    }

    // --- Result banner ---

    /// The result currently on display, if any.
    #[must_use]
    pub fn banner(&self) -> Option<&SpinResult> {
        self.banner.as_ref()
    }

    /// Hide the result banner. With `Some(seq)` only the matching result is
    /// hidden, so a late timeout never hides a newer result.
    pub fn dismiss_result(&mut self, seq: Option<u64>) -> bool {
        match (&self.banner, seq) {
            (Some(shown), Some(seq)) if shown.seq != seq => false,
            (Some(_), _) => {
                self.banner = None;
                true
            }
            (None, _) => false,
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn chips(&self) -> &[Chip] {
        self.chips.as_slice()
    }

    /// Sectors currently drawn and selectable.
    #[must_use]
    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    /// Whether a rebuilt sector list is waiting for the wheel to stop.
    #[must_use]
    pub fn has_staged_sectors(&self) -> bool {
        self.staged.is_some()
    }

    /// Bumped every time [`Wheel::sectors`] changes.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn spin_state(&self) -> &SpinEngine {
        &self.spin
    }

    #[must_use]
    pub fn is_spinning(&self) -> bool {
        self.spin.is_spinning()
    }

    /// Rotation to apply to the drawn wheel, in radians.
    #[must_use]
    pub fn rotation(&self) -> f64 {
        self.spin.rotation()
    }

    /// Sector under the pointer right now.
    #[must_use]
    pub fn sector_under_pointer(&self) -> Option<&Sector> {
        self.sectors.get(self.spin.current_index())
    }

    /// Spin button face: `SPIN` at rest, otherwise the truncated label of the
    /// sector under the pointer, colored to match it.
    #[must_use]
    pub fn button_face(&self) -> ButtonFace {
        let fallback = Sector::placeholder();
        let sector = self.sector_under_pointer().unwrap_or(&fallback);
        let text = if self.spin.is_spinning() { truncate_label(&sector.label) } else { SPIN_LABEL.to_owned() };
        ButtonFace { text, background: sector.color, foreground: sector.text_color }
    }
}

impl Default for Wheel {
    fn default() -> Self {
        Self::new(SpinParams::default())
    }
}
