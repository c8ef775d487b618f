#![allow(clippy::float_cmp)]

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::consts::MIN_CONTRAST;

fn rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

#[test]
fn empty_chip_list_yields_single_placeholder() {
    let sectors = build_sectors(&[], &mut rng());
    assert_eq!(sectors.len(), 1);
    let p = &sectors[0];
    assert!(p.placeholder);
    assert_eq!(p.label, "Add items...");
    assert_eq!(p.color.to_string(), "#f0f0f0");
    assert_eq!(p.text_color.to_string(), "#666666");
    assert!(!has_winnable(&sectors));
}

#[test]
fn apple_three_orange_one_makes_four_sectors() {
    let chips = [Chip::parse("Apple, 3").unwrap(), Chip::parse("Orange").unwrap()];
    let sectors = build_sectors(&chips, &mut rng());
    let labels: Vec<&str> = sectors.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, ["Apple", "Apple", "Apple", "Orange"]);
    assert!(has_winnable(&sectors));
}

#[test]
fn sector_count_is_sum_of_multipliers() {
    let chips = [Chip::new("a", 1), Chip::new("b", 5), Chip::new("c", 2), Chip::new("d", 7)];
    let sectors = build_sectors(&chips, &mut rng());
    assert_eq!(sectors.len(), 15);
}

#[test]
fn same_chip_sectors_are_contiguous_and_share_color() {
    let chips = [Chip::new("a", 3), Chip::new("b", 2), Chip::new("a", 1)];
    let sectors = build_sectors(&chips, &mut rng());

    let mut offset = 0;
    for chip in &chips {
        let run = &sectors[offset..offset + chip.multiplier as usize];
        assert!(run.iter().all(|s| s.label == chip.label));
        assert!(run.iter().all(|s| s.color == run[0].color));
        offset += chip.multiplier as usize;
    }
    assert_eq!(offset, sectors.len());
}

#[test]
fn every_sector_color_is_readable_with_dark_text() {
    let chips: Vec<Chip> = (0..50).map(|i| Chip::new(format!("item {i}"), 1)).collect();
    let sectors = build_sectors(&chips, &mut rng());
    for s in &sectors {
        assert!(s.color.dark_text_contrast() >= MIN_CONTRAST);
        assert_eq!(s.text_color.to_string(), "#333333");
        assert!(!s.placeholder);
    }
}

#[test]
fn long_labels_are_stored_in_full() {
    let label = "A very long restaurant name indeed";
    let sectors = build_sectors(&[Chip::new(label, 1)], &mut rng());
    assert_eq!(sectors[0].label, label);
}

#[test]
fn sector_arc_divides_full_turn() {
    assert_eq!(sector_arc(0), 0.0);
    assert_eq!(sector_arc(1), TAU);
    assert!((sector_arc(4) - TAU / 4.0).abs() < 1e-12);
}

#[test]
fn serialized_sector_uses_hex_colors_and_hides_placeholder_flag() {
    let json = serde_json::to_value(Sector::placeholder()).unwrap();
    assert_eq!(json["color"], "#f0f0f0");
    assert_eq!(json["textColor"], "#666666");
    assert!(json.get("placeholder").is_none());
}
