//! Tunable settings for the wheel physics, dice animation, and tick sound.
//!
//! Every field has a default taken from [`crate::consts`], so the host may
//! pass a partial JSON object (or nothing at all). Values that would break
//! an invariant (friction outside `(0, 1)`, an inverted velocity range,
//! a zero animation step) are clamped back into range with a warning.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DICE_ANIMATION_MS, DICE_STEP_MS, FRICTION, REST_THRESHOLD, RESULT_DISMISS_MS, SPIN_VELOCITY_MAX,
    SPIN_VELOCITY_MIN, TICK_DURATION_S, TICK_FREQUENCY_HZ, TICK_GAIN,
};

/// Error returned by [`Settings::from_json`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The settings text is not valid JSON for [`Settings`].
    #[error("invalid settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Spin physics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WheelSettings {
    /// Per-frame velocity multiplier.
    pub friction: f64,
    /// Velocity below which the wheel snaps to rest.
    pub rest_threshold: f64,
    /// Lower bound of the random initial velocity.
    pub min_velocity: f64,
    /// Upper bound of the random initial velocity.
    pub max_velocity: f64,
    /// Milliseconds before a result banner hides itself.
    pub result_dismiss_ms: u32,
    /// CSS font family for sector labels.
    pub font_family: String,
    /// CSS font size for sector labels.
    pub font_size: String,
}

impl Default for WheelSettings {
    fn default() -> Self {
        Self {
            friction: FRICTION,
            rest_threshold: REST_THRESHOLD,
            min_velocity: SPIN_VELOCITY_MIN,
            max_velocity: SPIN_VELOCITY_MAX,
            result_dismiss_ms: RESULT_DISMISS_MS,
            font_family: "sans-serif".to_owned(),
            font_size: "16px".to_owned(),
        }
    }
}

/// Dice animation timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DiceTiming {
    /// Total length of the decorative phase.
    pub animation_ms: u32,
    /// Interval between decorative re-rolls.
    pub step_ms: u32,
}

impl Default for DiceTiming {
    fn default() -> Self {
        Self { animation_ms: DICE_ANIMATION_MS, step_ms: DICE_STEP_MS }
    }
}

/// Detent click sound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TickSettings {
    /// Whether detent clicks are audible at all.
    pub enabled: bool,
    pub frequency_hz: f32,
    pub gain: f32,
    pub duration_s: f64,
}

impl Default for TickSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            frequency_hz: TICK_FREQUENCY_HZ,
            gain: TICK_GAIN,
            duration_s: TICK_DURATION_S,
        }
    }
}

/// Top-level settings handed to the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub wheel: WheelSettings,
    pub dice: DiceTiming,
    pub tick: TickSettings,
}

impl Settings {
    /// Parse settings from JSON. Blank input yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if `text` is not valid settings JSON.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Self = serde_json::from_str(text)?;
        Ok(settings.sanitized())
    }

    /// Clamp values that would break the spin or dice invariants.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let wheel = &mut self.wheel;

        if !is_open_unit(wheel.friction) {
            log::warn!("friction {} out of range, using {}", wheel.friction, defaults.wheel.friction);
            wheel.friction = defaults.wheel.friction;
        }
        if wheel.rest_threshold.is_nan() || wheel.rest_threshold <= 0.0 {
            log::warn!("rest threshold {} out of range, using default", wheel.rest_threshold);
            wheel.rest_threshold = defaults.wheel.rest_threshold;
        }
        if !valid_velocity_range(wheel.min_velocity, wheel.max_velocity, wheel.rest_threshold) {
            log::warn!(
                "spin velocity range [{}, {}] invalid, using default",
                wheel.min_velocity,
                wheel.max_velocity
            );
            wheel.min_velocity = defaults.wheel.min_velocity;
            wheel.max_velocity = defaults.wheel.max_velocity;
        }
        if self.dice.step_ms == 0 {
            log::warn!("dice step of 0ms, using {}ms", defaults.dice.step_ms);
            self.dice.step_ms = defaults.dice.step_ms;
        }
        self
    }
}

fn is_open_unit(value: f64) -> bool {
    value > 0.0 && value < 1.0
}

fn valid_velocity_range(min: f64, max: f64, rest: f64) -> bool {
    min > rest && max >= min
}
