//! Dice roller: uniform rolls plus a two-phase (decorative, then final) animation.
//!
//! Only the value produced by the final phase is a result. The rolling
//! phase redraws throwaway values every step so the display flickers.

#[cfg(test)]
#[path = "dice_test.rs"]
mod dice_test;

use rand::Rng;
use serde::Serialize;

use crate::config::DiceTiming;
use crate::consts::{DEFAULT_DICE_COUNT, DEFAULT_DICE_SIDES, MAX_DICE_COUNT, MAX_DICE_SIDES, MIN_DICE_SIDES};

/// How many dice and how many sides each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiceSettings {
    pub count: u32,
    pub sides: u32,
}

impl Default for DiceSettings {
    fn default() -> Self {
        Self { count: DEFAULT_DICE_COUNT, sides: DEFAULT_DICE_SIDES }
    }
}

impl DiceSettings {
    /// Clamp to `1..=MAX_DICE_COUNT` dice with `MIN_DICE_SIDES..=MAX_DICE_SIDES` sides.
    #[must_use]
    pub fn new(count: u32, sides: u32) -> Self {
        if count > MAX_DICE_COUNT || sides > MAX_DICE_SIDES {
            log::warn!("{count}d{sides} too large, clamping to {MAX_DICE_COUNT}d{MAX_DICE_SIDES} at most");
        }
        Self { count: count.clamp(1, MAX_DICE_COUNT), sides: sides.clamp(MIN_DICE_SIDES, MAX_DICE_SIDES) }
    }

    /// Read the count/sides inputs. Missing, non-numeric, or zero values fall
    /// back to 1 and 6.
    #[must_use]
    pub fn from_inputs(count: &str, sides: &str) -> Self {
        Self::new(
            parse_input(count).unwrap_or(DEFAULT_DICE_COUNT),
            parse_input(sides).unwrap_or(DEFAULT_DICE_SIDES),
        )
    }
}

/// Leading-integer parse of a numeric input; `None` for blank, garbage, or zero.
fn parse_input(text: &str) -> Option<u32> {
    let trimmed = text.trim();
    let digits_end = trimmed
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map_or(trimmed.len(), |(i, _)| i);
    let Ok(value) = trimmed[..digits_end].parse::<i64>() else {
        return None;
    };
    if value == 0 {
        return None;
    }
    Some(u32::try_from(value).unwrap_or(if value < 0 { 1 } else { u32::MAX }))
}

/// Values of one roll and their sum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiceRoll {
    pub values: Vec<u32>,
    pub total: u64,
}

/// Roll `settings.count` independent dice in `[1, settings.sides]`.
pub fn roll<R: Rng + ?Sized>(settings: DiceSettings, rng: &mut R) -> DiceRoll {
    let values: Vec<u32> = (0..settings.count).map(|_| rng.random_range(1..=settings.sides)).collect();
    let total = values.iter().map(|&v| u64::from(v)).sum();
    DiceRoll { values, total }
}

/// Where a roller is in its animation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DicePhase {
    Idle,
    Rolling { elapsed_ms: u32 },
    Settled(DiceRoll),
}

/// One animation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiceFrame {
    /// Decorative values; never a result.
    Rolling(Vec<u32>),
    /// The authoritative roll.
    Final(DiceRoll),
}

/// Dice widget state for one tab.
#[derive(Debug, Clone)]
pub struct DiceRoller {
    settings: DiceSettings,
    timing: DiceTiming,
    phase: DicePhase,
}

impl DiceRoller {
    #[must_use]
    pub fn new(settings: DiceSettings, timing: DiceTiming) -> Self {
        Self { settings, timing, phase: DicePhase::Idle }
    }

    #[must_use]
    pub fn settings(&self) -> DiceSettings {
        self.settings
    }

    pub fn set_settings(&mut self, settings: DiceSettings) {
        self.settings = settings;
    }

    #[must_use]
    pub fn phase(&self) -> &DicePhase {
        &self.phase
    }

    #[must_use]
    pub fn is_rolling(&self) -> bool {
        matches!(self.phase, DicePhase::Rolling { .. })
    }

    /// Last authoritative roll, if one has finished.
    #[must_use]
    pub fn last_roll(&self) -> Option<&DiceRoll> {
        match &self.phase {
            DicePhase::Settled(roll) => Some(roll),
            _ => None,
        }
    }

    /// Begin a roll, restarting any roll already in progress.
    pub fn start(&mut self) {
        log::debug!("rolling {}d{}", self.settings.count, self.settings.sides);
        self.phase = DicePhase::Rolling { elapsed_ms: 0 };
    }

    /// Milliseconds between calls to [`DiceRoller::step`].
    #[must_use]
    pub fn step_ms(&self) -> u32 {
        self.timing.step_ms
    }

    /// Advance one animation step. Returns `None` when not rolling.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<DiceFrame> {
        let DicePhase::Rolling { elapsed_ms } = self.phase else {
            return None;
        };

        let decorative = roll(self.settings, rng);
        let elapsed_ms = elapsed_ms.saturating_add(self.timing.step_ms);
        if elapsed_ms < self.timing.animation_ms {
            self.phase = DicePhase::Rolling { elapsed_ms };
            return Some(DiceFrame::Rolling(decorative.values));
        }

        let result = roll(self.settings, rng);
        log::info!("rolled {:?} (total {})", result.values, result.total);
        self.phase = DicePhase::Settled(result.clone());
        Some(DiceFrame::Final(result))
    }

    /// Run the whole animation synchronously and return the final roll.
    pub fn roll_now<R: Rng + ?Sized>(&mut self, rng: &mut R) -> DiceRoll {
        self.start();
        loop {
            if let Some(DiceFrame::Final(result)) = self.step(rng) {
                return result;
            }
        }
    }
}

impl Default for DiceRoller {
    fn default() -> Self {
        Self::new(DiceSettings::default(), DiceTiming::default())
    }
}
