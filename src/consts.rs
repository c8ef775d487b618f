//! Shared numeric and string constants for the widget crate.

use std::f64::consts::PI;

// ── Math ────────────────────────────────────────────────────────

/// Full turn in radians.
pub const TAU: f64 = 2.0 * PI;

/// Offset applied to the wheel rotation so sector 0 starts under the top pointer.
pub const POINTER_OFFSET: f64 = PI / 2.0;

// ── Spin physics ────────────────────────────────────────────────

/// Per-frame multiplicative velocity decay.
pub const FRICTION: f64 = 0.991;

/// Below this angular velocity (radians/frame) the wheel is at rest.
pub const REST_THRESHOLD: f64 = 0.002;

/// Lower bound of the initial spin velocity (radians/frame).
pub const SPIN_VELOCITY_MIN: f64 = 0.25;

/// Upper bound of the initial spin velocity (radians/frame).
pub const SPIN_VELOCITY_MAX: f64 = 0.45;

// ── Labels ──────────────────────────────────────────────────────

/// Labels longer than this many characters are truncated for display.
pub const LABEL_MAX_CHARS: usize = 15;

/// Number of characters kept before the ellipsis when truncating.
pub const LABEL_KEEP_CHARS: usize = 12;

/// Appended to truncated labels.
pub const ELLIPSIS: &str = "...";

/// Spin button text while the wheel is idle.
pub const SPIN_LABEL: &str = "SPIN";

/// Largest accepted chip multiplier; bigger weights are capped.
pub const MAX_MULTIPLIER: u32 = 1000;

// ── Colors ──────────────────────────────────────────────────────

/// Text color drawn over every real sector.
pub const SECTOR_TEXT_COLOR: &str = "#333333";

/// Background of the empty-wheel placeholder sector.
pub const PLACEHOLDER_COLOR: &str = "#f0f0f0";

/// Text color of the empty-wheel placeholder sector.
pub const PLACEHOLDER_TEXT_COLOR: &str = "#666666";

/// Label of the empty-wheel placeholder sector.
pub const PLACEHOLDER_LABEL: &str = "Add items...";

/// Minimum WCAG contrast ratio between a sector background and dark text.
pub const MIN_CONTRAST: f64 = 4.5;

// ── Dice ────────────────────────────────────────────────────────

/// Dice count used when the input is missing or not a number.
pub const DEFAULT_DICE_COUNT: u32 = 1;

/// Sides per die used when the input is missing or not a number.
pub const DEFAULT_DICE_SIDES: u32 = 6;

/// Fewest sides a die may have.
pub const MIN_DICE_SIDES: u32 = 2;

/// Most dice one roll may use. Every animation step allocates this many values.
pub const MAX_DICE_COUNT: u32 = 100;

/// Most sides a die may have.
pub const MAX_DICE_SIDES: u32 = 1000;

/// Length of the decorative roll animation in milliseconds.
pub const DICE_ANIMATION_MS: u32 = 1000;

/// Interval between decorative re-rolls in milliseconds.
pub const DICE_STEP_MS: u32 = 100;

// ── Timing / audio ──────────────────────────────────────────────

/// Delay before a spin result is dismissed automatically.
pub const RESULT_DISMISS_MS: u32 = 5000;

/// Detent click pitch in Hz.
pub const TICK_FREQUENCY_HZ: f32 = 440.0;

/// Detent click gain.
pub const TICK_GAIN: f32 = 0.1;

/// Detent click length in seconds.
pub const TICK_DURATION_S: f64 = 0.1;

// ── Session ─────────────────────────────────────────────────────

/// Prefix of generated tab ids (`tab-1`, `tab-2`, ...).
pub const TAB_ID_PREFIX: &str = "tab-";

/// Suggested filename for a saved session.
pub const STATE_FILE_NAME: &str = "tabs_state.json";
