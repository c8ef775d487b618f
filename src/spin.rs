//! Spin engine: angular velocity, friction decay, and pointer sector lookup.
//!
//! The engine is advanced once per animation frame with [`SpinEngine::tick`].
//! Each tick multiplies the velocity by the friction coefficient, snaps it to
//! zero once it falls under the rest threshold, adds it to the angle, and
//! wraps the angle into `[0, 2π)`. Frame-rate independence is not attempted;
//! the constants assume a ~60 Hz host clock.
//!
//! ```text
//!            request_spin            velocity < threshold
//!   Idle ───────────────────▶ Spinning ───────────────────▶ Idle (+ result once)
//!     ▲                          │ request_spin: no-op on velocity,
//!     └──────────────────────────┘ re-arms the result flag
//! ```

#[cfg(test)]
#[path = "spin_test.rs"]
mod spin_test;

use rand::Rng;

use crate::config::WheelSettings;
use crate::consts::{POINTER_OFFSET, TAU};

/// Index of the sector under the fixed top pointer.
///
/// `floor(N − (angle − π/2) / 2π × N) mod N`; `0` for an empty wheel.
#[must_use]
pub fn sector_index(angle: f64, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = count as f64;
    let raw = (n - (angle - POINTER_OFFSET) / TAU * n).floor();
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    let index = (raw as i64).rem_euclid(count as i64) as usize;
    index
}

/// Logical state of the wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinPhase {
    /// Velocity is zero.
    Idle,
    /// Velocity is positive and decaying.
    Spinning,
}

/// What happened during one [`SpinEngine::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// Sector under the pointer after this tick.
    pub index: usize,
    /// The pointer crossed into a different sector this tick.
    pub detent: bool,
    /// The wheel came to rest with a result pending; holds the winning index.
    pub settled: Option<usize>,
}

/// Physics parameters copied out of [`WheelSettings`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinParams {
    pub friction: f64,
    pub rest_threshold: f64,
    pub min_velocity: f64,
    pub max_velocity: f64,
}

impl From<&WheelSettings> for SpinParams {
    fn from(s: &WheelSettings) -> Self {
        Self {
            friction: s.friction,
            rest_threshold: s.rest_threshold,
            min_velocity: s.min_velocity,
            max_velocity: s.max_velocity,
        }
    }
}

impl Default for SpinParams {
    fn default() -> Self {
        Self::from(&WheelSettings::default())
    }
}

/// Rotation state of one wheel.
#[derive(Debug, Clone)]
pub struct SpinEngine {
    params: SpinParams,
    angle: f64,
    velocity: f64,
    result_pending: bool,
    current_index: usize,
}

impl SpinEngine {
    #[must_use]
    pub fn new(params: SpinParams) -> Self {
        Self { params, angle: 0.0, velocity: 0.0, result_pending: false, current_index: 0 }
    }

    /// Current rotation in radians, always in `[0, 2π)`.
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Current angular velocity in radians per frame.
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    #[must_use]
    pub fn phase(&self) -> SpinPhase {
        if self.velocity > 0.0 { SpinPhase::Spinning } else { SpinPhase::Idle }
    }

    #[must_use]
    pub fn is_spinning(&self) -> bool {
        self.phase() == SpinPhase::Spinning
    }

    /// Whether a result will be emitted when the wheel next comes to rest.
    #[must_use]
    pub fn result_pending(&self) -> bool {
        self.result_pending
    }

    /// Sector index last observed under the pointer.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// CSS rotation applied to the drawn wheel, `angle − π/2`.
    #[must_use]
    pub fn rotation(&self) -> f64 {
        self.angle - POINTER_OFFSET
    }

    /// Handle a spin request. Starts the wheel with a random velocity in
    /// `[min_velocity, max_velocity]` when idle; when already spinning only
    /// the result flag is set. Returns `true` if a new spin started.
    pub fn request_spin<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let velocity = rng.random_range(self.params.min_velocity..=self.params.max_velocity);
        self.launch(velocity)
    }

    /// Deterministic form of [`SpinEngine::request_spin`].
    pub fn launch(&mut self, velocity: f64) -> bool {
        self.result_pending = true;
        if self.is_spinning() {
            return false;
        }
        self.velocity = velocity.max(0.0);
        log::debug!("spin launched at {:.4} rad/frame", self.velocity);
        true
    }

    /// Advance one animation frame over a wheel of `count` sectors.
    ///
    /// Friction is applied before the angle moves, so after `k` frames the
    /// angle has advanced by `v0 * (f + f^2 + ... + f^k)`.
    pub fn tick(&mut self, count: usize) -> TickOutcome {
        self.velocity *= self.params.friction;
        if self.velocity < self.params.rest_threshold {
            self.velocity = 0.0;
        }
        self.angle = (self.angle + self.velocity).rem_euclid(TAU);

        let index = sector_index(self.angle, count);
        let detent = count > 0 && index != self.current_index;
        self.current_index = index;

        let settled = if self.result_pending && !self.is_spinning() {
            self.result_pending = false;
            log::debug!("spin settled on sector {index} of {count}");
            Some(index)
        } else {
            None
        };

        TickOutcome { index, detent, settled }
    }

    /// Re-read the pointer index after the sector list changed, without
    /// reporting a detent.
    pub fn resync(&mut self, count: usize) {
        self.current_index = sector_index(self.angle, count);
    }
}

impl Default for SpinEngine {
    fn default() -> Self {
        Self::new(SpinParams::default())
    }
}
