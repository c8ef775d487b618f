use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::config::Settings;

fn rng() -> StdRng {
    StdRng::seed_from_u64(3)
}

fn empty() -> Session {
    Session::new(&Settings::default())
}

fn chips(session: &Session, id: &str) -> Vec<Chip> {
    match &session.get(id).map(|t| &t.widget) {
        Some(Widget::Wheel(wheel)) => wheel.chips().to_vec(),
        other => panic!("{id} is not a wheel: {other:?}"),
    }
}

fn dice(session: &Session, id: &str) -> DiceSettings {
    match &session.get(id).map(|t| &t.widget) {
        Some(Widget::Dice(roller)) => roller.settings(),
        other => panic!("{id} is not a dice tab: {other:?}"),
    }
}

/// Two wheels (one with Pizza and Tacos x2) plus a 3d20 dice tab, second wheel active.
fn sample_session(rng: &mut StdRng) -> Session {
    let mut session = empty();
    let lunch = session.add_wheel_tab();
    session.rename(&lunch, "Lunch");
    let wheel = session.wheel_mut(&lunch).unwrap();
    wheel.add_chip_text("Pizza", rng);
    wheel.add_chip_text("Tacos, 2", rng);

    session.add_dice_tab();
    session.dice_mut("tab-2").unwrap().set_settings(DiceSettings::new(3, 20));

    let other = session.add_wheel_tab();
    session.activate(&other);
    session
}

// =============================================================
// Save
// =============================================================

#[test]
fn save_writes_expected_shape() {
    let mut rng = rng();
    let session = sample_session(&mut rng);
    let json = save_json(&session).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["activeTabId"], "tab-3");
    let tabs = value["tabs"].as_array().unwrap();
    assert_eq!(tabs.len(), 3);

    assert_eq!(tabs[0]["id"], "tab-1");
    assert_eq!(tabs[0]["name"], "Lunch");
    assert_eq!(tabs[0]["type"], "wheel");
    assert_eq!(tabs[0]["items"], serde_json::json!([
        { "label": "Pizza", "multiplier": 1 },
        { "label": "Tacos", "multiplier": 2 },
    ]));

    assert_eq!(tabs[1]["type"], "dice");
    assert_eq!(tabs[1]["diceCount"], "3");
    assert_eq!(tabs[1]["diceSides"], "20");
    assert!(tabs[1].get("items").is_none());

    assert_eq!(tabs[2]["items"], serde_json::json!([]));
}

#[test]
fn save_is_two_space_indented() {
    let json = save_json(&Session::with_default_tab(&Settings::default())).unwrap();
    assert!(json.contains("\n  \"tabs\": ["));
}

#[test]
fn save_of_empty_session() {
    let doc = capture(&empty());
    assert!(doc.tabs.is_empty());
    assert_eq!(doc.active_tab_id, None);
}

// =============================================================
// Round trip
// =============================================================

#[test]
fn save_then_load_restores_tabs_chips_dice_and_active() {
    let mut rng = rng();
    let original = sample_session(&mut rng);
    let json = save_json(&original).unwrap();

    let mut loaded = Session::with_default_tab(&Settings::default());
    load_json(&mut loaded, &json, &mut rng).unwrap();

    let ids: Vec<&str> = loaded.tabs().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, ["tab-1", "tab-2", "tab-3"]);
    let names: Vec<&str> = loaded.tabs().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["Lunch", "Dice 2", "Wheel 3"]);
    assert_eq!(chips(&loaded, "tab-1"), [Chip::new("Pizza", 1), Chip::new("Tacos", 2)]);
    assert_eq!(dice(&loaded, "tab-2"), DiceSettings::new(3, 20));
    assert_eq!(loaded.active_id(), Some("tab-3"));
    assert_eq!(loaded.add_wheel_tab(), "tab-4");
}

#[test]
fn loaded_wheel_has_expanded_sectors() {
    let mut rng = rng();
    let json = save_json(&sample_session(&mut rng)).unwrap();
    let mut loaded = empty();
    load_json(&mut loaded, &json, &mut rng).unwrap();
    assert_eq!(loaded.wheel_mut("tab-1").unwrap().sectors().len(), 3);
    assert!(loaded.wheel_mut("tab-3").unwrap().sectors()[0].placeholder);
}

// =============================================================
// Lenient reading
// =============================================================

#[test]
fn multiplier_accepts_strings_and_bad_values() {
    let json = r#"{
        "tabs": [{
            "id": "tab-1", "name": "W", "type": "wheel",
            "items": [
                { "label": "A", "multiplier": "4" },
                { "label": "B", "multiplier": "lots" },
                { "label": "C" },
                { "label": "D", "multiplier": 2.9 },
                { "label": "   ", "multiplier": 3 }
            ]
        }],
        "activeTabId": "tab-1"
    }"#;
    let mut session = empty();
    load_json(&mut session, json, &mut rng()).unwrap();
    assert_eq!(
        chips(&session, "tab-1"),
        [Chip::new("A", 4), Chip::new("B", 1), Chip::new("C", 1), Chip::new("D", 2)]
    );
}

#[test]
fn legacy_text_items_are_parsed_per_line() {
    let json = r#"{ "tabs": [{ "id": "tab-1", "name": "W", "type": "wheel",
                    "items": "Apple, 3\n\nOrange\n" }] }"#;
    let mut session = empty();
    load_json(&mut session, json, &mut rng()).unwrap();
    assert_eq!(chips(&session, "tab-1"), [Chip::new("Apple", 3), Chip::new("Orange", 1)]);
}

#[test]
fn dice_inputs_accept_numbers_and_fall_back() {
    let json = r#"{ "tabs": [
        { "id": "tab-1", "name": "a", "type": "dice", "diceCount": 4, "diceSides": "10" },
        { "id": "tab-2", "name": "b", "type": "dice", "diceCount": "0", "diceSides": "x" },
        { "id": "tab-3", "name": "c", "type": "dice" }
    ] }"#;
    let mut session = empty();
    load_json(&mut session, json, &mut rng()).unwrap();
    assert_eq!(dice(&session, "tab-1"), DiceSettings::new(4, 10));
    assert_eq!(dice(&session, "tab-2"), DiceSettings::default());
    assert_eq!(dice(&session, "tab-3"), DiceSettings::default());
}

#[test]
fn oversized_dice_inputs_are_clamped() {
    let json = r#"{ "tabs": [{ "id": "tab-1", "name": "a", "type": "dice", "diceCount": 99999999999, "diceSides": "5000" }] }"#;
    let mut session = empty();
    load_json(&mut session, json, &mut rng()).unwrap();
    assert_eq!(dice(&session, "tab-1"), DiceSettings { count: 100, sides: 1000 });
}

#[test]
fn missing_names_get_positional_defaults() {
    let json = r#"{ "tabs": [
        { "id": "tab-1", "type": "dice" },
        { "id": "tab-2", "name": "  ", "type": "wheel" }
    ] }"#;
    let mut session = empty();
    load_json(&mut session, json, &mut rng()).unwrap();
    let names: Vec<&str> = session.tabs().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["Dice 1", "Wheel 2"]);
}

#[test]
fn unknown_types_are_skipped() {
    let json = r#"{ "tabs": [
        { "id": "tab-1", "name": "n", "type": "notes" },
        { "id": "tab-2", "name": "w", "type": "wheel" },
        { "id": "tab-3", "name": "?" }
    ], "activeTabId": "tab-1" }"#;
    let mut session = empty();
    load_json(&mut session, json, &mut rng()).unwrap();
    assert_eq!(session.len(), 1);
    assert_eq!(session.active_id(), Some("tab-2"));
}

#[test]
fn active_falls_back_to_first_tab() {
    let json = r#"{ "tabs": [
        { "id": "tab-4", "name": "a", "type": "wheel" },
        { "id": "tab-9", "name": "b", "type": "wheel" }
    ], "activeTabId": "tab-77" }"#;
    let mut session = empty();
    load_json(&mut session, json, &mut rng()).unwrap();
    assert_eq!(session.active_id(), Some("tab-4"));
    assert_eq!(session.add_dice_tab(), "tab-10");
}

#[test]
fn blank_and_duplicate_ids() {
    let json = r#"{ "tabs": [
        { "id": "tab-2", "name": "a", "type": "wheel" },
        { "name": "b", "type": "wheel" },
        { "id": "tab-2", "name": "c", "type": "dice" }
    ] }"#;
    let mut session = empty();
    load_json(&mut session, json, &mut rng()).unwrap();
    let ids: Vec<&str> = session.tabs().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, ["tab-2", "tab-3"]);
}

#[test]
fn empty_document_clears_session() {
    let mut session = Session::with_default_tab(&Settings::default());
    load_json(&mut session, "{}", &mut rng()).unwrap();
    assert!(session.is_empty());
    assert_eq!(session.active_id(), None);
}

// =============================================================
// Failure leaves the session alone
// =============================================================

#[test]
fn invalid_json_aborts_without_changes() {
    let mut rng = rng();
    let mut session = sample_session(&mut rng);
    let before = save_json(&session).unwrap();

    let err = load_json(&mut session, "{ not json", &mut rng).unwrap_err();
    assert!(matches!(err, SnapshotError::Parse(_)));
    assert_eq!(save_json(&session).unwrap(), before);
}

#[test]
fn wrong_shape_aborts_without_changes() {
    let mut rng = rng();
    let mut session = sample_session(&mut rng);
    for text in ["42", r#"{ "tabs": 5 }"#, r#"{ "tabs": [ { "id": 1, "type": "wheel" } ] }"#] {
        assert!(load_json(&mut session, text, &mut rng).is_err(), "{text}");
    }
    assert_eq!(session.len(), 3);
    assert_eq!(session.active_id(), Some("tab-3"));
}
