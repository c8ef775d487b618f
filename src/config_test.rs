#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn blank_input_yields_defaults() {
    let settings = Settings::from_json("  ").unwrap();
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.wheel.friction, FRICTION);
    assert_eq!(settings.dice.step_ms, DICE_STEP_MS);
}

#[test]
fn partial_json_keeps_other_defaults() {
    let settings = Settings::from_json(r#"{"wheel": {"friction": 0.98}, "tick": {"enabled": false}}"#).unwrap();
    assert_eq!(settings.wheel.friction, 0.98);
    assert_eq!(settings.wheel.rest_threshold, REST_THRESHOLD);
    assert!(!settings.tick.enabled);
    assert_eq!(settings.tick.frequency_hz, TICK_FREQUENCY_HZ);
    assert_eq!(settings.dice, DiceTiming::default());
}

#[test]
fn camel_case_field_names() {
    let settings = Settings::from_json(r#"{"dice": {"animationMs": 500, "stepMs": 50}}"#).unwrap();
    assert_eq!(settings.dice.animation_ms, 500);
    assert_eq!(settings.dice.step_ms, 50);
}

#[test]
fn invalid_json_is_an_error() {
    let err = Settings::from_json("{not json").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
    assert!(err.to_string().starts_with("invalid settings"));
}

#[test]
fn friction_out_of_range_is_reset() {
    let settings = Settings::from_json(r#"{"wheel": {"friction": 1.5}}"#).unwrap();
    assert_eq!(settings.wheel.friction, FRICTION);

    let settings = Settings::from_json(r#"{"wheel": {"friction": 0.0}}"#).unwrap();
    assert_eq!(settings.wheel.friction, FRICTION);
}

#[test]
fn inverted_velocity_range_is_reset() {
    let settings = Settings::from_json(r#"{"wheel": {"minVelocity": 0.5, "maxVelocity": 0.1}}"#).unwrap();
    assert_eq!(settings.wheel.min_velocity, SPIN_VELOCITY_MIN);
    assert_eq!(settings.wheel.max_velocity, SPIN_VELOCITY_MAX);
}

#[test]
fn zero_dice_step_is_reset() {
    let settings = Settings::from_json(r#"{"dice": {"stepMs": 0}}"#).unwrap();
    assert_eq!(settings.dice.step_ms, DICE_STEP_MS);
}
