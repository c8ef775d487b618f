use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;

fn session() -> Session {
    Session::new(&Settings::default())
}

// =============================================================
// Creation / naming
// =============================================================

#[test]
fn default_session_has_one_active_wheel() {
    let s = Session::with_default_tab(&Settings::default());
    assert_eq!(s.len(), 1);
    let tab = &s.tabs()[0];
    assert_eq!(tab.id, "tab-1");
    assert_eq!(tab.name, "Wheel 1");
    assert_eq!(tab.widget.kind(), TabKind::Wheel);
    assert_eq!(s.active_id(), Some("tab-1"));
}

#[test]
fn tabs_are_numbered_by_creation_order_across_kinds() {
    let mut s = session();
    let a = s.add_wheel_tab();
    let b = s.add_dice_tab();
    let c = s.add_wheel_tab();
    assert_eq!((a.as_str(), b.as_str(), c.as_str()), ("tab-1", "tab-2", "tab-3"));
    let names: Vec<&str> = s.tabs().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["Wheel 1", "Dice 2", "Wheel 3"]);
}

#[test]
fn new_tab_becomes_active() {
    let mut s = session();
    s.add_wheel_tab();
    let dice = s.add_dice_tab();
    assert_eq!(s.active_id(), Some(dice.as_str()));
}

#[test]
fn ids_are_not_reused_after_close() {
    let mut s = session();
    s.add_wheel_tab();
    let b = s.add_wheel_tab();
    s.close_tab(&b);
    assert_eq!(s.add_wheel_tab(), "tab-3");
}

// =============================================================
// Close / activate / rename
// =============================================================

#[test]
fn closing_active_tab_activates_first_remaining() {
    let mut s = session();
    let a = s.add_wheel_tab();
    s.add_dice_tab();
    let c = s.add_wheel_tab();
    assert!(s.close_tab(&c));
    assert_eq!(s.active_id(), Some(a.as_str()));
}

#[test]
fn closing_inactive_tab_keeps_active() {
    let mut s = session();
    let a = s.add_wheel_tab();
    let b = s.add_wheel_tab();
    s.close_tab(&a);
    assert_eq!(s.active_id(), Some(b.as_str()));
}

#[test]
fn closing_last_tab_leaves_none_active() {
    let mut s = session();
    let a = s.add_wheel_tab();
    s.close_tab(&a);
    assert!(s.is_empty());
    assert_eq!(s.active_id(), None);
}

#[test]
fn close_unknown_tab_is_false() {
    let mut s = session();
    assert!(!s.close_tab("tab-99"));
}

#[test]
fn activate_switches_only_to_known_tabs() {
    let mut s = session();
    let a = s.add_wheel_tab();
    s.add_wheel_tab();
    assert!(s.activate(&a));
    assert_eq!(s.active_id(), Some(a.as_str()));
    assert!(!s.activate("nope"));
    assert_eq!(s.active_id(), Some(a.as_str()));
}

#[test]
fn rename_trims_and_rejects_blank() {
    let mut s = session();
    let a = s.add_wheel_tab();
    assert!(s.rename(&a, "  Lunch  "));
    assert_eq!(s.get(&a).map(|t| t.name.as_str()), Some("Lunch"));
    assert!(!s.rename(&a, "   "));
    assert_eq!(s.get(&a).map(|t| t.name.as_str()), Some("Lunch"));
    assert!(!s.rename("tab-42", "x"));
}

// =============================================================
// Widget access
// =============================================================

#[test]
fn widget_accessors_match_kind() {
    let mut s = session();
    let w = s.add_wheel_tab();
    let d = s.add_dice_tab();
    assert!(s.wheel_mut(&w).is_some());
    assert!(s.wheel_mut(&d).is_none());
    assert!(s.dice_mut(&d).is_some());
    assert!(s.dice_mut(&w).is_none());
    assert!(s.wheel_mut("missing").is_none());
    assert!(s.wheel(&w).is_some());
    assert!(s.dice(&w).is_none());
    assert!(s.dice(&d).is_some());
}

#[test]
fn tick_wheels_advances_every_wheel_including_hidden() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut s = session();
    let first = s.add_wheel_tab();
    s.add_dice_tab();
    let second = s.add_wheel_tab();
    for id in [&first, &second] {
        let wheel = s.wheel_mut(id).unwrap();
        wheel.add_chip_text("a", &mut rng);
        wheel.add_chip_text("b", &mut rng);
        wheel.spin(&mut rng);
    }

    let frames = s.tick_wheels();
    let ids: Vec<&str> = frames.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, [first.as_str(), second.as_str()]);
    assert!(s.wheel_mut(&first).unwrap().spin_state().angle() > 0.0);
}

// =============================================================
// Loading helpers
// =============================================================

#[test]
fn insert_tab_advances_counter_past_loaded_ids() {
    let mut s = session();
    s.insert_tab("tab-7".into(), "Seven".into(), Widget::Wheel(Wheel::default()));
    s.insert_tab("custom".into(), "Custom".into(), Widget::Dice(DiceRoller::default()));
    assert_eq!(s.add_wheel_tab(), "tab-8");
}

#[test]
fn insert_tab_rejects_duplicate_ids() {
    let mut s = session();
    assert!(s.insert_tab("tab-1".into(), "a".into(), Widget::Wheel(Wheel::default())));
    assert!(!s.insert_tab("tab-1".into(), "b".into(), Widget::Wheel(Wheel::default())));
    assert_eq!(s.len(), 1);
}

#[test]
fn reserve_id_moves_counter_forward_only() {
    let mut s = session();
    s.reserve_id("tab-5");
    s.reserve_id("tab-2");
    s.reserve_id("other-9");
    assert_eq!(s.next_tab_id(), "tab-6");
}

#[test]
fn insert_tab_counts_tabs_without_numeric_ids() {
    let mut s = session();
    for name in ["a", "b", "c"] {
        s.insert_tab(name.into(), name.into(), Widget::Wheel(Wheel::default()));
    }
    assert_eq!(s.add_dice_tab(), "tab-4");
}

#[test]
fn activate_or_first_falls_back() {
    let mut s = session();
    s.insert_tab("x".into(), "x".into(), Widget::Wheel(Wheel::default()));
    s.insert_tab("y".into(), "y".into(), Widget::Wheel(Wheel::default()));
    s.activate_or_first(Some("y"));
    assert_eq!(s.active_id(), Some("y"));
    s.activate_or_first(Some("gone"));
    assert_eq!(s.active_id(), Some("x"));
    s.activate_or_first(None);
    assert_eq!(s.active_id(), Some("x"));
}

#[test]
fn clear_removes_everything() {
    let mut s = Session::with_default_tab(&Settings::default());
    s.clear();
    assert!(s.is_empty());
    assert_eq!(s.active_id(), None);
    assert_eq!(s.add_wheel_tab(), "tab-1");
}
